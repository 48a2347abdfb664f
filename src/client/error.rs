use std::io;
use thiserror::Error;
use tokio::sync::mpsc::error::SendError as MpscSendError;
use tokio::time::error::Elapsed as TimeElapsed;

use crate::error;
use crate::protocol::{ErrorCode, ServerError};

/// Enum for client errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The server answered with `kXR_error`
    #[error("{0}")]
    Server(ServerError),
    /// Any errors related to I/O
    #[error("I/O: {0}")]
    IO(String),
    /// Time limit for receiving the response exceeded
    #[error("Timeout")]
    Timeout,
    /// The caller's cancellation token fired before the response arrived
    #[error("Cancelled")]
    Cancelled,
    /// The server answered with a status this client does not handle
    #[error("Unexpected response status {0}")]
    UnexpectedStatus(u16),
    /// Occurs when the server does not follow the protocol
    #[error("{0}")]
    UnexpectedBehavior(String),
}

impl Error {
    /// Returns the protocol error code if the server rejected the request
    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Server(err) => Some(err.code),
            _ => None,
        }
    }
}

impl From<ServerError> for Error {
    fn from(err: ServerError) -> Self {
        Self::Server(err)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::IO(error.to_string())
    }
}

impl<T> From<MpscSendError<T>> for Error {
    fn from(err: MpscSendError<T>) -> Self {
        Self::UnexpectedBehavior(format!("SendError: {err}"))
    }
}

impl From<TimeElapsed> for Error {
    fn from(_: TimeElapsed) -> Self {
        Self::Timeout
    }
}

impl From<error::Error> for Error {
    fn from(error: error::Error) -> Self {
        match error {
            error::Error::IO(msg) => Self::IO(msg),
            error => Self::UnexpectedBehavior(error.to_string()),
        }
    }
}
