//! Error types for timetable operations.

use std::path::PathBuf;

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors surfaced by the configuration store, the codec, and file I/O.
///
/// Every variant is recoverable: the operation that produced it leaves the
/// in-memory configuration and assignments untouched.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The document text is not valid JSON.
    #[error("malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    /// The document is JSON but matches no known generation.
    #[error("unrecognized document shape: {0}")]
    UnrecognizedShape(String),

    /// Strict loading found records whose teacher may not teach the subject.
    #[error("{} eligibility violation(s) in document", .0.len())]
    EligibilityViolations(Vec<ValidationError>),

    /// Two distinct slots would be written under the same persisted key.
    #[error("ambiguous slot key '{key}': several slots encode to it")]
    AmbiguousSlotKey { key: String },

    /// A roster index past the end of the teacher list.
    #[error("teacher index {index} out of range (roster has {len})")]
    TeacherIndexOutOfRange { index: usize, len: usize },

    /// A field name that is not an enumeration or assignment field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Reading or writing a document file failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding a document to JSON failed.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TimetableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
