use bytes::{Buf, Bytes};
use serde::Serialize;

use super::impl_request_for;
use crate::{
    buf::TryBuf,
    error::Error,
    file::{EntryStat, FileCompression, FileHandle, OpenMode, OpenOptions},
};

/// Implementation for `kXR_open`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Open {
    pub mode: OpenMode,
    pub options: OpenOptions,
    reserved: [u8; 12],
    pub path: String,
}

impl Open {
    pub fn new<P: Into<String>>(path: P, mode: OpenMode, options: OpenOptions) -> Self {
        Self {
            mode,
            options,
            reserved: [0; 12],
            path: path.into(),
        }
    }
}

impl_request_for!(Open);

/// Reply to [`Open`].
///
/// Only the handle is mandatory. Compression information follows when the
/// server has any to report, and the stat text follows when the request
/// carried [`OpenOptions::RETURN_STATUS`].
#[derive(Debug)]
pub struct OpenReply {
    pub handle: FileHandle,
    pub compression: Option<FileCompression>,
    pub stat: Option<EntryStat>,
}

impl TryFrom<&mut Bytes> for OpenReply {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        let handle = FileHandle::try_from(&mut *bytes)?;

        let compression = if bytes.has_remaining() {
            Some(FileCompression::try_from(&mut *bytes)?)
        } else {
            None
        };

        let stat = if bytes.has_remaining() {
            Some(bytes.try_read_text()?.parse()?)
        } else {
            None
        };

        Ok(Self {
            handle,
            compression,
            stat,
        })
    }
}
