//! Values describing remote entries and open files.
//!
//! Everything in here is produced by decoding server replies, except the
//! flag types callers combine to express intent.

mod compression;
mod handle;
mod mode;
mod stat;

pub use self::{
    compression::FileCompression,
    handle::FileHandle,
    mode::{OpenMode, OpenOptions},
    stat::{EntryStat, StatFlags, VirtualFSStat},
};
