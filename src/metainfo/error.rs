use std::path::PathBuf;

use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur while building a torrent file.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The piece length was zero or does not fit a bencode integer.
    #[error("invalid piece length: {0}")]
    InvalidPieceLength(u64),

    /// No tracker URL was supplied.
    #[error("at least one tracker URL is required")]
    NoTrackers,

    /// More ignore patterns than the configuration allows.
    #[error("too many ignore patterns: {count} (max {max})")]
    TooManyIgnorePatterns { count: usize, max: usize },

    /// An ignore pattern could not be compiled.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A file or directory could not be opened, read or inspected.
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output sink rejected a write.
    #[error("io error: {0}")]
    Sink(#[from] std::io::Error),
}

impl MetainfoError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetainfoError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Returns true for configuration errors, which are raised before any I/O.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MetainfoError::InvalidPieceLength(_)
                | MetainfoError::NoTrackers
                | MetainfoError::TooManyIgnorePatterns { .. }
                | MetainfoError::InvalidPattern { .. }
        )
    }
}

impl From<BencodeError> for MetainfoError {
    fn from(err: BencodeError) -> Self {
        match err {
            BencodeError::Io(e) => MetainfoError::Sink(e),
            // the writer only ever fails on I/O
            other => MetainfoError::Sink(std::io::Error::other(other)),
        }
    }
}
