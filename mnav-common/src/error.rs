//! Error types for the mNAV dashboard.

use thiserror::Error;

/// Result type alias using the dashboard error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for dashboard crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No company (or other record) with the given key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input rejected at a boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Snapshot or config file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An inner error annotated with what was being attempted
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with a description of the failed operation.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a not-found error, looking through context wrappers.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this is a rejected input, looking through context wrappers.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidInput(_) => true,
            Self::WithContext { source, .. } => source.is_invalid_input(),
            _ => false,
        }
    }
}

/// Attach context to any error convertible into [`Error`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
