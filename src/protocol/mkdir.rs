use serde::{Deserialize, Serialize};

use super::impl_request_for;
use crate::file::OpenMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MkdirOptions(u8);

bitflags! {
    impl MkdirOptions: u8 {
        /// Create missing intermediate directories on the server side
        const MAKE_PATH = 1;
    }
}

/// Implementation for `kXR_mkdir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mkdir {
    pub options: MkdirOptions,
    reserved: [u8; 13],
    pub mode: OpenMode,
    pub path: String,
}

impl Mkdir {
    pub fn new<P: Into<String>>(path: P, mode: OpenMode, options: MkdirOptions) -> Self {
        Self {
            options,
            reserved: [0; 13],
            mode,
            path: path.into(),
        }
    }
}

impl_request_for!(Mkdir);
