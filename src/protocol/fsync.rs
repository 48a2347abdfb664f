use serde::Serialize;

use super::impl_request_for;
use crate::file::FileHandle;

/// Implementation for `kXR_sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fsync {
    pub handle: FileHandle,
    reserved: [u8; 12],
    dlen: i32,
}

impl Fsync {
    #[must_use]
    pub const fn new(handle: FileHandle) -> Self {
        Self {
            handle,
            reserved: [0; 12],
            dlen: 0,
        }
    }
}

impl_request_for!(Fsync);
