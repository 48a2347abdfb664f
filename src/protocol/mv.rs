use serde::Serialize;

use super::impl_request_for;
use crate::error::Error;

/// Implementation for `kXR_mv`.
///
/// Both paths travel in the data section separated by a space; the length
/// of the first one is part of the parameter block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mv {
    reserved: [u8; 14],
    old_path_len: i16,
    paths: String,
}

impl Mv {
    /// Fails if `old_path` is longer than the `i16` length field can express
    pub fn new<O, N>(old_path: O, new_path: N) -> Result<Self, Error>
    where
        O: Into<String>,
        N: Into<String>,
    {
        let old_path = old_path.into();
        let new_path = new_path.into();

        let old_path_len = i16::try_from(old_path.len()).map_err(|_| {
            Error::BadMessage(format!("source path of {} bytes is too long", old_path.len()))
        })?;

        Ok(Self {
            reserved: [0; 14],
            old_path_len,
            paths: format!("{old_path} {new_path}"),
        })
    }

    #[must_use]
    pub fn old_path(&self) -> &str {
        let len = usize::try_from(self.old_path_len).unwrap_or(0);
        self.paths.get(..len).unwrap_or_default()
    }

    #[must_use]
    pub fn new_path(&self) -> &str {
        let len = usize::try_from(self.old_path_len).unwrap_or(0);
        self.paths.get(len + 1..).unwrap_or_default()
    }
}

impl_request_for!(Mv);
