use serde::Serialize;

use super::impl_request_for;
use crate::file::FileHandle;

/// Implementation for `kXR_read`. The reply is the raw data read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Read {
    pub handle: FileHandle,
    pub offset: u64,
    pub len: u32,
    dlen: i32,
}

impl Read {
    #[must_use]
    pub const fn new(handle: FileHandle, offset: u64, len: u32) -> Self {
        Self {
            handle,
            offset,
            len,
            dlen: 0,
        }
    }
}

impl_request_for!(Read);
