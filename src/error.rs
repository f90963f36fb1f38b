//! Unified error type for the scanner CLI boundary.
//!
//! Per-call-site and per-module failures never surface here — they degrade
//! to skipped records and `tracing::warn!` events. Only the outermost CLI
//! operations (bad scan directory, unwritable output) produce a `ScanError`.

use thiserror::Error;

/// All errors that can abort a scan run.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O error (file read/write, directory access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error when writing the catalog
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Scan directory does not exist
    #[error("Directory does not exist: {0}")]
    DirNotFound(String),

    /// tree-sitter grammar could not be loaded
    #[error("Failed to load C# grammar: {0}")]
    GrammarLoad(String),

    /// Argument validation error
    #[error("{0}")]
    InvalidArgs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = ScanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_dir_not_found_display() {
        let err = ScanError::DirNotFound("/nonexistent".to_string());
        assert!(err.to_string().contains("/nonexistent"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let scan_err: ScanError = io_err.into();
        assert!(matches!(scan_err, ScanError::Io(_)));
    }
}
