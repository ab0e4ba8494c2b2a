//! Application-wide error types.
//!
//! Library modules return [`Error`] via `thiserror`, while the CLI layer
//! uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum shared by every component
//! - [`crate::config::ConfigError`] for configuration file handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use album_archiver::error::{Error, Result, ResultExt};
//!
//! fn prepare(dir: &Path) -> Result<()> {
//!     std::fs::create_dir_all(dir).with_context("creating destination")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tags could not be read or were incomplete
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// File extension is not one of the supported audio formats
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(PathBuf),

    /// External tagging tool failed to run
    #[error("Tagger error: {0}")]
    Tagger(String),

    /// Moving or deleting files during a merge failed
    #[error("Merge error: {0}")]
    Merge(String),

    /// File or directory not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a tagger error.
    pub fn tagger(message: impl Into<String>) -> Self {
        Self::Tagger(message.into())
    }

    /// Create a merge error.
    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// True when the album could not be identified from its tags.
    ///
    /// Looks through any context wrappers.
    pub fn is_identification_failure(&self) -> bool {
        match self {
            Self::Metadata { .. } | Self::UnsupportedFormat(_) => true,
            Self::WithContext { source, .. } => source.is_identification_failure(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/path/to/album");
        assert!(err.to_string().contains("/path/to/album"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::merge("disk full").context("while moving track");
        let msg = err.to_string();
        assert!(msg.contains("while moving track"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_metadata_error() {
        let err = Error::metadata("/music/song.flac", "missing album tag");
        let msg = err.to_string();
        assert!(msg.contains("song.flac"));
        assert!(msg.contains("missing album tag"));
    }

    #[test]
    fn test_identification_failure_sees_through_context() {
        let err = Error::metadata("/a.mp3", "no tags").context("identifying album");
        assert!(err.is_identification_failure());
        assert!(Error::UnsupportedFormat(PathBuf::from("/a.wav")).is_identification_failure());
        assert!(!Error::merge("nope").is_identification_failure());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::tagger("test"));
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = result.with_context("reading library").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().contains("reading library"));
    }
}
