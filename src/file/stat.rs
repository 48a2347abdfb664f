use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::OpenMode;
use crate::error::Error;

/// State flags of an entry. No flag set means a regular file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatFlags(i32);

bitflags! {
    impl StatFlags: i32 {
        const EXECUTABLE = 1;
        const DIR = 2;
        const OTHER = 4;
        const OFFLINE = 8;
        const READABLE = 16;
        const WRITABLE = 32;
        const POSC_PENDING = 64;
        const BACKUP_EXISTS = 128;
    }
}

fn field<T: FromStr>(fields: &mut std::str::SplitWhitespace<'_>, name: &str) -> Result<T, Error> {
    let value = fields
        .next()
        .ok_or_else(|| Error::BadMessage(format!("stat reply is missing {name}")))?;

    value
        .parse()
        .map_err(|_| Error::BadMessage(format!("invalid {name} {value:?} in stat reply")))
}

/// Extended attributes reported by servers that know about them
#[derive(Debug, Clone, PartialEq, Eq)]
struct Extended {
    ctime: i64,
    atime: i64,
    mode: OpenMode,
    owner: String,
    group: String,
}

/// Snapshot of one remote entry, as reported by a stat, dirlist or open reply.
///
/// The textual wire form is `"<id> <size> <flags> <mtime>"`, optionally
/// followed by `" <ctime> <atime> <mode> <owner> <group>"` with `mode` in octal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    name: String,
    has_stat_info: bool,
    id: i64,
    size: i64,
    mtime: i64,
    flags: StatFlags,
    extended: Option<Extended>,
}

macro_rules! impl_fn_flag {
    ($get_name:ident, $doc_name:expr, $flag:ident) => {
        #[doc = "Returns `true` if the entry is "]
        #[doc = $doc_name]
        #[must_use]
        pub fn $get_name(&self) -> bool {
            self.flags.contains(StatFlags::$flag)
        }
    };
}

impl EntryStat {
    impl_fn_flag!(is_dir, "a directory", DIR);
    impl_fn_flag!(is_executable, "executable", EXECUTABLE);
    impl_fn_flag!(is_other, "neither a file nor a directory", OTHER);
    impl_fn_flag!(is_offline, "offline", OFFLINE);
    impl_fn_flag!(is_readable, "readable", READABLE);
    impl_fn_flag!(is_writable, "writable", WRITABLE);

    /// An entry of a directory listing that came without stat information
    pub(crate) fn name_only<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            has_stat_info: false,
            id: 0,
            size: 0,
            mtime: 0,
            flags: StatFlags::empty(),
            extended: None,
        }
    }

    pub(crate) fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Name of the entry relative to the listed directory.
    /// Empty for entries returned by a plain stat
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the server sent stat information for this entry
    #[must_use]
    pub const fn has_stat_info(&self) -> bool {
        self.has_stat_info
    }

    /// Server-side identifier of the entry
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the size of the entry in bytes
    #[must_use]
    pub const fn size(&self) -> i64 {
        self.size
    }

    #[must_use]
    pub const fn flags(&self) -> StatFlags {
        self.flags
    }

    /// Last modification time in seconds since the epoch
    #[must_use]
    pub const fn mtime(&self) -> i64 {
        self.mtime
    }

    /// Returns the last modification time
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.mtime, 0)
    }

    /// Returns `true` if the entry is a regular file
    #[must_use]
    pub fn is_file(&self) -> bool {
        !self.flags.intersects(StatFlags::DIR | StatFlags::OTHER)
    }

    /// Permission bits, if the server reported extended stat information
    #[must_use]
    pub fn mode(&self) -> Option<OpenMode> {
        self.extended.as_ref().map(|e| e.mode)
    }

    #[must_use]
    pub fn ctime(&self) -> Option<i64> {
        self.extended.as_ref().map(|e| e.ctime)
    }

    #[must_use]
    pub fn atime(&self) -> Option<i64> {
        self.extended.as_ref().map(|e| e.atime)
    }

    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.extended.as_ref().map(|e| e.owner.as_str())
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.extended.as_ref().map(|e| e.group.as_str())
    }
}

impl FromStr for EntryStat {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut fields = text.split_whitespace();

        let id = field(&mut fields, "id")?;
        let size = field(&mut fields, "size")?;
        let flags = StatFlags::from_bits_retain(field(&mut fields, "flags")?);
        let mtime = field(&mut fields, "mtime")?;

        let extended = match fields.next() {
            None => None,
            Some(ctime) => {
                let ctime = ctime
                    .parse()
                    .map_err(|_| Error::BadMessage(format!("invalid ctime {ctime:?}")))?;
                let atime = field(&mut fields, "atime")?;
                let mode: String = field(&mut fields, "mode")?;
                let mode = u32::from_str_radix(&mode, 8)
                    .map_err(|_| Error::BadMessage(format!("invalid mode {mode:?}")))?;

                Some(Extended {
                    ctime,
                    atime,
                    mode: OpenMode::from_octal(mode),
                    owner: field(&mut fields, "owner")?,
                    group: field(&mut fields, "group")?,
                })
            }
        };

        Ok(Self {
            name: String::new(),
            has_stat_info: true,
            id,
            size,
            mtime,
            flags,
            extended,
        })
    }
}

/// Writes the textual wire form
impl fmt::Display for EntryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.id,
            self.size,
            self.flags.bits(),
            self.mtime
        )?;

        if let Some(ext) = &self.extended {
            write!(
                f,
                " {} {} {:04o} {} {}",
                ext.ctime,
                ext.atime,
                ext.mode.to_octal(),
                ext.owner,
                ext.group
            )?;
        }

        Ok(())
    }
}

/// Aggregate capacity of the servers and partitions that may hold objects
/// under a path prefix.
///
/// Free space is reported in megabytes and utilization in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualFSStat {
    pub number_rw: u64,
    pub free_rw: u64,
    pub utilization_rw: u8,
    pub number_staging: u64,
    pub free_staging: u64,
    pub utilization_staging: u8,
}

impl FromStr for VirtualFSStat {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut fields = text.split_whitespace();

        Ok(Self {
            number_rw: field(&mut fields, "rw node count")?,
            free_rw: field(&mut fields, "rw free space")?,
            utilization_rw: field(&mut fields, "rw utilization")?,
            number_staging: field(&mut fields, "staging node count")?,
            free_staging: field(&mut fields, "staging free space")?,
            utilization_staging: field(&mut fields, "staging utilization")?,
        })
    }
}

impl fmt::Display for VirtualFSStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.number_rw,
            self.free_rw,
            self.utilization_rw,
            self.number_staging,
            self.free_staging,
            self.utilization_staging
        )
    }
}
