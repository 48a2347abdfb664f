use serde::Serialize;

use super::impl_request_for;
use crate::file::FileHandle;

/// Implementation for `kXR_write`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Write {
    pub handle: FileHandle,
    pub offset: u64,
    path_id: u8,
    reserved: [u8; 3],
    pub data: Vec<u8>,
}

impl Write {
    #[must_use]
    pub const fn new(handle: FileHandle, offset: u64, data: Vec<u8>) -> Self {
        Self {
            handle,
            offset,
            path_id: 0,
            reserved: [0; 3],
            data,
        }
    }
}

impl_request_for!(Write);
