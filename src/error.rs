//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`TransportError`], [`ProviderError`], [`ConfigError`]), while the
//! CLI and `main` use `anyhow` for convenient error propagation.
//!
//! Only errors raised while classifying or resolving the top-level target
//! reach this type. Per-track problems are reported through
//! [`DownloadResult`](crate::model::DownloadResult) instead.
//!
//! [`TransportError`]: crate::transport::TransportError
//! [`ConfigError`]: crate::config::ConfigError

use crate::providers::ProviderError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider resolution error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Input could not be mapped to any provider
    #[error("Cannot classify input: {0}")]
    Classification(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a classification error.
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
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

impl<T> ResultExt<T> for std::result::Result<T, ProviderError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Provider(e).context(ctx))
    }
}
