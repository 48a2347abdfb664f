use bytes::Bytes;
use std::fmt;
use thiserror::Error;

use crate::{buf::TryBuf, error};

/// Error codes carried by a `kXR_error` reply
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    #[error("Invalid argument")]
    ArgInvalid = 3000,
    #[error("Missing argument")]
    ArgMissing = 3001,
    #[error("Argument too long")]
    ArgTooLong = 3002,
    #[error("File locked")]
    FileLocked = 3003,
    #[error("File not open")]
    FileNotOpen = 3004,
    #[error("Filesystem error")]
    FsError = 3005,
    #[error("Invalid request")]
    InvalidRequest = 3006,
    #[error("I/O error")]
    IoError = 3007,
    #[error("No memory")]
    NoMemory = 3008,
    #[error("No space")]
    NoSpace = 3009,
    #[error("Not authorized")]
    NotAuthorized = 3010,
    #[error("Not found")]
    NotFound = 3011,
    #[error("Server error")]
    ServerError = 3012,
    #[error("Unsupported")]
    Unsupported = 3013,
    #[error("No server")]
    NoServer = 3014,
    #[error("Not a file")]
    NotFile = 3015,
    #[error("Is a directory")]
    IsDirectory = 3016,
    #[error("Cancelled")]
    Cancelled = 3017,
    #[error("Already exists")]
    ItExists = 3018,
    #[error("Checksum error")]
    ChecksumError = 3019,
    #[error("In progress")]
    InProgress = 3020,
    #[error("Over quota")]
    OverQuota = 3021,
    #[error("Signature verification error")]
    SigVerError = 3022,
    #[error("Decryption error")]
    DecryptError = 3023,
    #[error("Overloaded")]
    Overloaded = 3024,
    #[error("Read-only filesystem")]
    FsReadOnly = 3025,
    #[error("Bad payload")]
    BadPayload = 3026,
    #[error("Attribute not found")]
    AttrNotFound = 3027,
    #[error("TLS required")]
    TlsRequired = 3028,
    #[error("No replicas")]
    NoReplicas = 3029,
    #[error("Authentication failed")]
    AuthFailed = 3030,
    #[error("Impossible")]
    Impossible = 3031,
    #[error("Conflict")]
    Conflict = 3032,
    #[error("Too many errors")]
    TooManyErrors = 3033,
    #[error("Request timed out")]
    RequestTimedOut = 3034,
    #[error("Timer expired")]
    TimerExpired = 3035,
}

const ERROR_CODES: [ErrorCode; 36] = [
    ErrorCode::ArgInvalid,
    ErrorCode::ArgMissing,
    ErrorCode::ArgTooLong,
    ErrorCode::FileLocked,
    ErrorCode::FileNotOpen,
    ErrorCode::FsError,
    ErrorCode::InvalidRequest,
    ErrorCode::IoError,
    ErrorCode::NoMemory,
    ErrorCode::NoSpace,
    ErrorCode::NotAuthorized,
    ErrorCode::NotFound,
    ErrorCode::ServerError,
    ErrorCode::Unsupported,
    ErrorCode::NoServer,
    ErrorCode::NotFile,
    ErrorCode::IsDirectory,
    ErrorCode::Cancelled,
    ErrorCode::ItExists,
    ErrorCode::ChecksumError,
    ErrorCode::InProgress,
    ErrorCode::OverQuota,
    ErrorCode::SigVerError,
    ErrorCode::DecryptError,
    ErrorCode::Overloaded,
    ErrorCode::FsReadOnly,
    ErrorCode::BadPayload,
    ErrorCode::AttrNotFound,
    ErrorCode::TlsRequired,
    ErrorCode::NoReplicas,
    ErrorCode::AuthFailed,
    ErrorCode::Impossible,
    ErrorCode::Conflict,
    ErrorCode::TooManyErrors,
    ErrorCode::RequestTimedOut,
    ErrorCode::TimerExpired,
];

/// Unknown codes collapse into [`ErrorCode::ServerError`]; the raw number
/// stays available in [`ServerError::errnum`]
impl From<i32> for ErrorCode {
    fn from(value: i32) -> Self {
        ERROR_CODES
            .into_iter()
            .find(|code| *code as i32 == value)
            .unwrap_or(Self::ServerError)
    }
}

/// Body of a `kXR_error` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub errnum: i32,
    pub code: ErrorCode,
    pub message: String,
}

impl ServerError {
    pub fn new<M: Into<String>>(code: ErrorCode, message: M) -> Self {
        Self {
            errnum: code as i32,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl TryFrom<&mut Bytes> for ServerError {
    type Error = error::Error;

    fn try_from(bytes: &mut Bytes) -> Result<Self, Self::Error> {
        let errnum = bytes.try_read_i32()?;

        Ok(Self {
            errnum,
            code: ErrorCode::from(errnum),
            message: bytes.try_read_text()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reply() {
        let mut bytes = Bytes::from_static(b"\x00\x00\x0b\xc3no such file /x\0");
        let err = ServerError::try_from(&mut bytes).unwrap();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.errnum, 3011);
        assert_eq!(err.to_string(), "Not found: no such file /x");
    }

    #[test]
    fn unknown_code_keeps_errnum() {
        let mut bytes = Bytes::from_static(b"\x00\x00\x00\x01?");
        let err = ServerError::try_from(&mut bytes).unwrap();

        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.errnum, 1);
    }
}
