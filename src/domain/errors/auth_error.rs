//! Authentication error types.

use thiserror::Error;

/// Token handling error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("invalid token format: {reason}")]
    InvalidTokenFormat { reason: String },

    #[error("failed to retrieve stored token: {message}")]
    TokenRetrievalFailed { message: String },

    #[error("failed to store token: {message}")]
    TokenStorageFailed { message: String },

    #[error("no authentication token available")]
    NoTokenAvailable,
}

impl AuthError {
    /// Creates invalid format error.
    #[must_use]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidTokenFormat {
            reason: reason.into(),
        }
    }

    /// Creates retrieval failed error.
    #[must_use]
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::TokenRetrievalFailed {
            message: message.into(),
        }
    }

    /// Creates storage failed error.
    #[must_use]
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::TokenStorageFailed {
            message: message.into(),
        }
    }

    /// Returns whether the stored credential is unusable and must be re-entered.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::InvalidTokenFormat { .. } | Self::NoTokenAvailable)
    }
}
