pub mod error;
pub mod fs;
mod rawsession;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use rawsession::RawSession;
pub use transport::Transport;

pub type XrdResult<T> = Result<T, error::Error>;
