//! Error types for docent.

use thiserror::Error;

/// Primary error type for all docent operations.
#[derive(Error, Debug)]
pub enum DocentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(i64),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// Coarse classification used to route error reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Server,
    Api,
    NotFound,
    Serialization,
    Configuration,
    Stream,
    Io,
}

impl DocentError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                404 => ErrorCategory::NotFound,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::AgentNotFound(_) => ErrorCategory::NotFound,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Stream(_) => ErrorCategory::Stream,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error invalidates the whole session (expired/missing
    /// token). Callers react by tearing the session down.
    pub fn is_auth(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DocentError>;
