use serde::{Deserialize, Serialize};

/// Permission bits of a remote path, sent to the server verbatim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenMode(u16);

/// Intents attached to an open request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpenOptions(u16);

bitflags! {
    impl OpenMode: u16 {
        const OWNER_READ = 0x100;
        const OWNER_WRITE = 0x080;
        const OWNER_EXECUTE = 0x040;
        const GROUP_READ = 0x020;
        const GROUP_WRITE = 0x010;
        const GROUP_EXECUTE = 0x008;
        const OTHER_READ = 0x004;
        const OTHER_WRITE = 0x002;
        const OTHER_EXECUTE = 0x001;
    }

    impl OpenOptions: u16 {
        const COMPRESS = 1;
        const DELETE = 2;
        const FORCE = 4;
        const NEW = 8;
        const OPEN_READ = 16;
        const OPEN_UPDATE = 32;
        const ASYNC = 64;
        const REFRESH = 128;
        const MAKE_PATH = 256;
        const OPEN_APPEND = 512;
        const RETURN_STATUS = 1024;
        const REPLICA = 2048;
        const POSC = 4096;
        const NO_WAIT = 8192;
        const SEQUENTIAL_IO = 16384;
    }
}

impl OpenMode {
    /// Builds a mode from the familiar octal form, e.g. `0o755`.
    /// Bits above the permission triplets are dropped.
    #[must_use]
    pub const fn from_octal(mode: u32) -> Self {
        Self::from_bits_truncate((mode & 0o777) as u16)
    }

    /// Returns the mode in octal form
    #[must_use]
    pub const fn to_octal(self) -> u32 {
        self.bits() as u32
    }
}
