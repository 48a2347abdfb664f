use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{buf::TryBuf, error::Error};

/// Opaque reference to an open file, assigned by the server
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle([u8; 4]);

impl FileHandle {
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "FileHandle({a:02x}{b:02x}{c:02x}{d:02x})")
    }
}

impl TryFrom<&mut Bytes> for FileHandle {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_read_array()?))
    }
}
