use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrewError {
    /// A required data file does not exist. Kept separate from [`Malformed`]
    /// so callers can tell "no data yet" apart from corrupted data.
    ///
    /// [`Malformed`]: CrewError::Malformed
    #[error("data file not found: {0}")]
    NotFound(PathBuf),

    #[error("malformed data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid slot reference: {0}")]
    InvalidSlot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrewError>;
