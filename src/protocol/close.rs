use serde::Serialize;

use super::impl_request_for;
use crate::file::FileHandle;

/// Implementation for `kXR_close`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Close {
    pub handle: FileHandle,
    reserved: [u8; 12],
    dlen: i32,
}

impl Close {
    #[must_use]
    pub const fn new(handle: FileHandle) -> Self {
        Self {
            handle,
            reserved: [0; 12],
            dlen: 0,
        }
    }
}

impl_request_for!(Close);
