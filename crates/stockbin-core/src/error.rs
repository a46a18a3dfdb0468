//! Error types for loading a workbook.
//!
//! Two kinds only: the bytes could not be retrieved ([`FetchError`]) or they
//! did not decode as a workbook ([`ParseError`]). Neither is retried.

use thiserror::Error;

/// The workbook bytes could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {location}")]
    Status { location: String, status: u16 },

    #[error("request to {location} failed: {reason}")]
    Network { location: String, reason: String },

    #[error("unsupported source {location}: {reason}")]
    Unsupported { location: String, reason: String },

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The bytes did not decode as a usable workbook.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not a readable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no sheets")]
    NoSheet,

    #[error("cannot read sheet {name:?}: {reason}")]
    Sheet { name: String, reason: String },

    #[error("ingestion did not finish: {0}")]
    Aborted(String),
}

/// Any failure of a single load attempt.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Which kind of failure ended a load, kept on [`crate::store::Status`]
/// after the error value itself has been rendered into a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Fetch(_) => ErrorKind::Fetch,
            LoadError::Parse(_) => ErrorKind::Parse,
        }
    }
}
