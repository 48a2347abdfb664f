use serde::Serialize;

use super::impl_request_for;

/// Implementation for `kXR_rmdir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rmdir {
    reserved: [u8; 16],
    pub path: String,
}

impl Rmdir {
    pub fn new<P: Into<String>>(path: P) -> Self {
        Self {
            reserved: [0; 16],
            path: path.into(),
        }
    }
}

impl_request_for!(Rmdir);
