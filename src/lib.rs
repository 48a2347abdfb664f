//! Filesystem operations over the XRootD remote file-access protocol.
//!
//! The [`client::fs::FileSystem`] façade turns calls such as `dirlist`,
//! `open` or `mkdir_all` into single protocol round trips issued through a
//! [`client::Transport`]. [`client::RawSession`] is a transport which
//! multiplexes requests over one already established stream.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

mod buf;
/// Client side
pub mod client;
mod error;
/// Entities describing remote files and directories
pub mod file;
/// Protocol implementation
pub mod protocol;
mod ser;
mod utils;

pub use error::Error;
