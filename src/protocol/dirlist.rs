use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::impl_request_for;
use crate::{buf::TryBuf, error::Error, file::EntryStat};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirlistOptions(u8);

bitflags! {
    impl DirlistOptions: u8 {
        /// Return stat information inline with every entry
        const STAT = 2;
    }
}

/// Implementation for `kXR_dirlist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dirlist {
    reserved: [u8; 15],
    pub options: DirlistOptions,
    pub path: String,
}

impl Dirlist {
    pub fn new<P: Into<String>>(path: P, options: DirlistOptions) -> Self {
        Self {
            reserved: [0; 15],
            options,
            path: path.into(),
        }
    }
}

impl_request_for!(Dirlist);

/// Reply to [`Dirlist`].
///
/// Entries are newline separated. When stat information was granted the
/// listing starts with a `"."` entry carrying a dummy stat, and every name
/// line is followed by its stat line.
#[derive(Debug)]
pub struct DirlistReply {
    pub entries: Vec<EntryStat>,
}

const STAT_LISTING_PREFIX: [&str; 2] = [".", "0 0 0 0"];

impl TryFrom<&mut Bytes> for DirlistReply {
    type Error = Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        let text = bytes.try_read_text()?;
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.is_empty()).collect();

        if !lines.starts_with(&STAT_LISTING_PREFIX) {
            return Ok(Self {
                entries: lines.into_iter().map(EntryStat::name_only).collect(),
            });
        }

        let pairs = &lines[STAT_LISTING_PREFIX.len()..];
        if pairs.len() % 2 != 0 {
            return Err(Error::BadMessage(format!(
                "dirlist entry {:?} has no stat line",
                pairs[pairs.len() - 1]
            )));
        }

        let entries = pairs
            .chunks_exact(2)
            .map(|pair| Ok(pair[1].parse::<EntryStat>()?.with_name(pair[0])))
            .collect::<Result<_, Error>>()?;

        Ok(Self { entries })
    }
}
