//! Error types for outlinerank.

use std::io;
use thiserror::Error;

/// Result type alias for outlinerank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing a document collection.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collection input is malformed or incomplete.
    #[error("Invalid collection input: {0}")]
    Input(String),

    /// The text-run collaborator failed for one document.
    #[error("Extraction failed for {document}: {message}")]
    Extraction {
        /// File name of the document that could not be extracted
        document: String,
        /// Collaborator-provided reason
        message: String,
    },

    /// Option values are out of range or could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The extraction worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Build an extraction error for `document`.
    pub fn extraction(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Extraction {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Whether the pipeline may skip the affected document and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Extraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Input("missing field `persona`".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid collection input: missing field `persona`"
        );

        let err = Error::extraction("guide.pdf", "truncated xref");
        assert_eq!(
            err.to_string(),
            "Extraction failed for guide.pdf: truncated xref"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_extraction_is_recoverable() {
        assert!(Error::extraction("a.pdf", "boom").is_recoverable());
        assert!(!Error::Config("top_sections must be positive".into()).is_recoverable());
    }
}
