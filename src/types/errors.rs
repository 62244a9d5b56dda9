//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for arcrs.
///
/// Tools report their own failures through this type as well. Handles and the
/// registry hand those errors back untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// A toolbox provider could not create the requested toolbox.
    #[error("toolbox provider failed: {0}")]
    ProviderInit(String),

    /// Invalid parameters, descriptors or datasets.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool index, dataset or field.
    #[error("not found: {0}")]
    NotFound(String),

    /// A tool failed while executing.
    #[error("execution failed: {0}")]
    Execution(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn provider_init(msg: impl Into<String>) -> Self {
        Self::ProviderInit(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}
