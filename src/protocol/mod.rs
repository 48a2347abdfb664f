//! Request and reply types of the XRootD protocol verbs used by the
//! filesystem façade.
//!
//! Every request body is a fixed 16 byte parameter block followed by an
//! `i32` data length and the data itself. [`Request`] prefixes it with the
//! request id; the transport adds the stream id.

mod chmod;
mod close;
mod dirlist;
mod fsync;
mod mkdir;
mod mv;
mod open;
mod read;
mod rm;
mod rmdir;
mod stat;
mod status;
mod truncate;
mod write;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{error::Error, ser};

pub use self::{
    chmod::Chmod,
    close::Close,
    dirlist::{Dirlist, DirlistOptions, DirlistReply},
    fsync::Fsync,
    mkdir::{Mkdir, MkdirOptions},
    mv::Mv,
    open::{Open, OpenReply},
    read::Read,
    rm::Rm,
    rmdir::Rmdir,
    stat::{Stat, StatOptions, StatReply, VirtualStatReply},
    status::{ErrorCode, ServerError},
    truncate::Truncate,
    write::Write,
};

/// Size of the parameter block of every request
pub const PARAMS_LEN: usize = 16;

pub const KXR_CHMOD: u16 = 3002;
pub const KXR_CLOSE: u16 = 3003;
pub const KXR_DIRLIST: u16 = 3004;
pub const KXR_MKDIR: u16 = 3008;
pub const KXR_MV: u16 = 3009;
pub const KXR_OPEN: u16 = 3010;
pub const KXR_READ: u16 = 3013;
pub const KXR_RM: u16 = 3014;
pub const KXR_RMDIR: u16 = 3015;
pub const KXR_SYNC: u16 = 3016;
pub const KXR_STAT: u16 = 3017;
pub const KXR_WRITE: u16 = 3019;
pub const KXR_TRUNCATE: u16 = 3028;

pub const KXR_OK: u16 = 0;
pub const KXR_OKSOFAR: u16 = 4000;
pub const KXR_ERROR: u16 = 4003;
pub const KXR_REDIRECT: u16 = 4004;

macro_rules! impl_request_for {
    ($name:ident) => {
        impl From<$name> for $crate::protocol::Request {
            fn from(input: $name) -> Self {
                Self::$name(input)
            }
        }
    };
}

pub(crate) use impl_request_for;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Chmod(Chmod),
    Close(Close),
    Dirlist(Dirlist),
    Fsync(Fsync),
    Mkdir(Mkdir),
    Mv(Mv),
    Open(Open),
    Read(Read),
    Rm(Rm),
    Rmdir(Rmdir),
    Stat(Stat),
    Truncate(Truncate),
    Write(Write),
}

impl Request {
    #[must_use]
    pub const fn request_id(&self) -> u16 {
        match self {
            Self::Chmod(_) => KXR_CHMOD,
            Self::Close(_) => KXR_CLOSE,
            Self::Dirlist(_) => KXR_DIRLIST,
            Self::Fsync(_) => KXR_SYNC,
            Self::Mkdir(_) => KXR_MKDIR,
            Self::Mv(_) => KXR_MV,
            Self::Open(_) => KXR_OPEN,
            Self::Read(_) => KXR_READ,
            Self::Rm(_) => KXR_RM,
            Self::Rmdir(_) => KXR_RMDIR,
            Self::Stat(_) => KXR_STAT,
            Self::Truncate(_) => KXR_TRUNCATE,
            Self::Write(_) => KXR_WRITE,
        }
    }
}

/// Encodes the request id, parameter block and data of a request
impl TryFrom<&Request> for Bytes {
    type Error = Error;

    fn try_from(request: &Request) -> Result<Self, Self::Error> {
        let body = match request {
            Request::Chmod(p) => ser::to_bytes(p)?,
            Request::Close(p) => ser::to_bytes(p)?,
            Request::Dirlist(p) => ser::to_bytes(p)?,
            Request::Fsync(p) => ser::to_bytes(p)?,
            Request::Mkdir(p) => ser::to_bytes(p)?,
            Request::Mv(p) => ser::to_bytes(p)?,
            Request::Open(p) => ser::to_bytes(p)?,
            Request::Read(p) => ser::to_bytes(p)?,
            Request::Rm(p) => ser::to_bytes(p)?,
            Request::Rmdir(p) => ser::to_bytes(p)?,
            Request::Stat(p) => ser::to_bytes(p)?,
            Request::Truncate(p) => ser::to_bytes(p)?,
            Request::Write(p) => ser::to_bytes(p)?,
        };

        let mut bytes = BytesMut::with_capacity(2 + body.len());
        bytes.put_u16(request.request_id());
        bytes.put_slice(&body);
        Ok(bytes.freeze())
    }
}
