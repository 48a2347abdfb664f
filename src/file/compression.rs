use bytes::Bytes;

use crate::{buf::TryBuf, error::Error};

/// Compression applied by the server to an open file.
///
/// The all-zero value means the file is not compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCompression {
    pub page_size: i32,
    pub kind: [u8; 4],
}

impl FileCompression {
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        *self != Self::default()
    }
}

impl TryFrom<&mut Bytes> for FileCompression {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        Ok(Self {
            page_size: bytes.try_read_i32()?,
            kind: bytes.try_read_array()?,
        })
    }
}
