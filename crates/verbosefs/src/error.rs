use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the audit machinery itself.
///
/// Failures of the wrapped provider are never converted into this type;
/// they reach the caller as the provider's own `std::io::Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing a record to the sink failed
    #[error("info stream write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The configured log destination could not be opened
    #[error("cannot open log file '{}': {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stream was closed before the message arrived
    #[error("info stream {0} is closed")]
    StreamClosed(u64),

    /// A writer panicked while holding the sink
    #[error("info stream {0} sink lock poisoned")]
    LockPoisoned(u64),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn log_file<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::LogFile {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(err: serde_yaml_ng::Error) -> Error {
        Error::Config(err.to_string())
    }
}

/// Surface an audit failure through a provider method's `io::Result`.
///
/// The original error stays reachable with `io::Error::get_ref` + downcast.
impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        std::io::Error::other(err)
    }
}
