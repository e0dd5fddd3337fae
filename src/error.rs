//! Error types for zip-rename-dl
//!
//! This module provides the error hierarchy used throughout the crate:
//! - Archive errors (the chosen file is not a readable ZIP, an entry cannot be decompressed)
//! - Session errors (editing operations that reference a missing entry)
//! - Delivery errors (an entry's bytes could not be handed to the sink)
//!
//! Every error is terminal to the operation that produced it. Nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for zip-rename-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zip-rename-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_dir")
        key: Option<String>,
    },

    /// Archive could not be parsed or an entry could not be read
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Session editing error
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// An entry could not be delivered
    #[error("failed to deliver {name}: {reason}")]
    Delivery {
        /// Download name of the entry being delivered
        name: String,
        /// Why the delivery failed
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Archive-related errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The bytes are not a readable ZIP archive
    #[error("failed to read ZIP archive: {0}")]
    Parse(String),

    /// A single entry could not be decompressed
    #[error("failed to read entry {name}: {reason}")]
    Entry {
        /// Name of the entry inside the archive
        name: String,
        /// The reason the entry could not be read
        reason: String,
    },

    /// The archive file could not be opened
    #[error("failed to open {path}: {reason}")]
    Open {
        /// Path of the archive on disk
        path: PathBuf,
        /// The reason the file could not be opened
        reason: String,
    },
}

/// Session editing errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested entry does not exist
    #[error("entry index {index} out of range (session has {len} entries)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of entries in the session
        len: usize,
    },
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Parse(err.to_string())
    }
}

impl Error {
    /// True when the error originated from archive parsing rather than delivery
    pub fn is_archive(&self) -> bool {
        matches!(self, Error::Archive(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_message_names_index_and_len() {
        let err = Error::from(SessionError::IndexOutOfRange { index: 7, len: 3 });
        let msg = err.to_string();
        assert!(msg.contains("7"), "message should name the index: {msg}");
        assert!(msg.contains("3 entries"), "message should name the length: {msg}");
    }

    #[test]
    fn zip_error_converts_to_parse_error() {
        let err: ArchiveError = zip::result::ZipError::InvalidArchive("bad magic").into();
        assert!(matches!(err, ArchiveError::Parse(ref m) if m.contains("bad magic")));
        assert!(Error::from(err).is_archive());
    }

    #[test]
    fn delivery_error_mentions_name() {
        let err = Error::Delivery {
            name: "report.pdf".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "failed to deliver report.pdf: disk full");
    }
}
