use serde::Serialize;

use super::impl_request_for;
use crate::file::FileHandle;

/// Implementation for `kXR_truncate`.
///
/// Addresses either a path or, with an empty path, an open file handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncate {
    pub handle: FileHandle,
    pub size: u64,
    reserved: [u8; 4],
    pub path: String,
}

impl Truncate {
    pub fn new<P: Into<String>>(path: P, size: u64) -> Self {
        Self {
            handle: FileHandle::default(),
            size,
            reserved: [0; 4],
            path: path.into(),
        }
    }

    #[must_use]
    pub fn with_handle(handle: FileHandle, size: u64) -> Self {
        Self {
            handle,
            ..Self::new("", size)
        }
    }
}

impl_request_for!(Truncate);
