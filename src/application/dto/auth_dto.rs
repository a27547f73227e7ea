//! Authentication DTOs.

use crate::domain::entities::AuthToken;

/// Source of the authentication token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Token from system keyring.
    Keyring,
    /// Token from `--token` or the `DISCORD_TOKEN` environment variable.
    CommandLine,
}

impl TokenSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Keyring => "system keyring",
            Self::CommandLine => "command line / environment",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Raw token as entered.
    pub token: String,
    /// Whether to persist token.
    pub persist_token: bool,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self {
            token,
            persist_token: true,
        }
    }

    /// Disables token persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist_token = false;
        self
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Validated token.
    pub token: AuthToken,
    /// Whether token was persisted.
    pub token_persisted: bool,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(token: AuthToken, token_persisted: bool) -> Self {
        Self {
            token,
            token_persisted,
        }
    }
}
