use serde::Serialize;

use super::impl_request_for;
use crate::file::OpenMode;

/// Implementation for `kXR_chmod`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chmod {
    reserved: [u8; 14],
    pub mode: OpenMode,
    pub path: String,
}

impl Chmod {
    pub fn new<P: Into<String>>(path: P, mode: OpenMode) -> Self {
        Self {
            reserved: [0; 14],
            mode,
            path: path.into(),
        }
    }
}

impl_request_for!(Chmod);
