use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::impl_request_for;
use crate::{
    buf::TryBuf,
    error::Error,
    file::{EntryStat, FileHandle, VirtualFSStat},
};

/// Selects the kind of information a stat request asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatOptions(u8);

bitflags! {
    impl StatOptions: u8 {
        /// Ask for the capacity of the virtual filesystem under the path
        const VFS = 1;
    }
}

/// Implementation for `kXR_stat`.
///
/// One request type serves both the entry stat and the virtual filesystem
/// stat; [`StatOptions::VFS`] is the only difference between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub options: StatOptions,
    reserved: [u8; 11],
    pub handle: FileHandle,
    pub path: String,
}

impl Stat {
    pub fn new<P: Into<String>>(path: P, options: StatOptions) -> Self {
        Self {
            options,
            reserved: [0; 11],
            handle: FileHandle::default(),
            path: path.into(),
        }
    }

    /// Stat of an open file, addressed by its handle
    #[must_use]
    pub fn with_handle(handle: FileHandle, options: StatOptions) -> Self {
        Self {
            handle,
            ..Self::new("", options)
        }
    }
}

impl_request_for!(Stat);

/// Reply to a [`Stat`] without [`StatOptions::VFS`]
#[derive(Debug)]
pub struct StatReply {
    pub stat: EntryStat,
}

impl TryFrom<&mut Bytes> for StatReply {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        Ok(Self {
            stat: bytes.try_read_text()?.parse()?,
        })
    }
}

/// Reply to a [`Stat`] with [`StatOptions::VFS`]
#[derive(Debug)]
pub struct VirtualStatReply {
    pub stat: VirtualFSStat,
}

impl TryFrom<&mut Bytes> for VirtualStatReply {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        Ok(Self {
            stat: bytes.try_read_text()?.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_are_not_cross_decoded() {
        let mut entry = Bytes::from_static(b"1 4096 2 1528801206\0");
        let mut vfs = Bytes::from_static(b"2 512 10 0 0 0\0");

        assert!(VirtualStatReply::try_from(&mut entry.clone()).is_err());
        assert!(StatReply::try_from(&mut vfs.clone()).is_err());

        assert!(StatReply::try_from(&mut entry).unwrap().stat.is_dir());
        assert_eq!(VirtualStatReply::try_from(&mut vfs).unwrap().stat.free_rw, 512);
    }
}
