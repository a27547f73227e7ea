//! Token resolution use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::TokenSource;
use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

/// Resolved token with its source.
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    /// The authentication token.
    pub token: AuthToken,
    /// Source of the token.
    pub source: TokenSource,
}

impl ResolvedToken {
    /// Creates new resolved token.
    #[must_use]
    pub const fn new(token: AuthToken, source: TokenSource) -> Self {
        Self { token, source }
    }
}

/// Resolves authentication token from available sources.
pub struct ResolveTokenUseCase {
    storage_port: Arc<dyn TokenStoragePort>,
}

impl ResolveTokenUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn TokenStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Resolves token from keyring or CLI/Env.
    ///
    /// Priority:
    /// 1. Keyring
    /// 2. CLI/Env (passed as argument)
    ///
    /// # Errors
    /// Returns [`AuthError::NoTokenAvailable`] when neither source has a
    /// usable token, or [`AuthError::InvalidTokenFormat`] when only a
    /// malformed CLI/Env token was given.
    pub async fn execute(&self, cli_token: Option<String>) -> Result<ResolvedToken, AuthError> {
        debug!("Checking keyring for stored token");
        match self.storage_port.get_token().await {
            Ok(Some(token)) => {
                info!("Using token from system keyring");
                return Ok(ResolvedToken::new(token, TokenSource::Keyring));
            }
            Ok(None) => {
                debug!("No token found in keyring");
            }
            Err(e) => {
                debug!(error = %e, "Failed to check keyring");
            }
        }

        let Some(token_str) = cli_token.filter(|s| !s.trim().is_empty()) else {
            debug!("No token found in any source");
            return Err(AuthError::NoTokenAvailable);
        };

        debug!("Checking command-line/env token");
        let token = AuthToken::new(token_str).ok_or_else(|| {
            debug!("Command-line token has invalid format");
            AuthError::invalid_format("token does not match expected Discord token format")
        })?;

        info!(token = %token, "Using token from command line / environment");
        Ok(ResolvedToken::new(token, TokenSource::CommandLine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockTokenStoragePort;

    fn make_valid_token() -> String {
        "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY".to_string()
    }

    fn storage_returning(
        result: impl Fn() -> Result<Option<AuthToken>, AuthError> + Send + 'static,
    ) -> Arc<MockTokenStoragePort> {
        let mut storage = MockTokenStoragePort::new();
        storage.expect_get_token().returning(move || result());
        Arc::new(storage)
    }

    #[tokio::test]
    async fn test_keyring_priority() {
        let storage =
            storage_returning(|| Ok(Some(AuthToken::new_unchecked(make_valid_token()))));
        let use_case = ResolveTokenUseCase::new(storage);

        let result = use_case
            .execute(Some("cli.token.here".to_string()))
            .await
            .unwrap();

        assert_eq!(result.source, TokenSource::Keyring);
    }

    #[tokio::test]
    async fn test_cli_fallback() {
        let use_case = ResolveTokenUseCase::new(storage_returning(|| Ok(None)));

        let result = use_case.execute(Some(make_valid_token())).await.unwrap();

        assert_eq!(result.source, TokenSource::CommandLine);
        assert_eq!(result.token.as_str(), make_valid_token());
    }

    #[tokio::test]
    async fn test_keyring_failure_falls_back_to_cli() {
        let use_case = ResolveTokenUseCase::new(storage_returning(|| {
            Err(AuthError::retrieval_failed("keyring locked"))
        }));

        let result = use_case.execute(Some(make_valid_token())).await.unwrap();

        assert_eq!(result.source, TokenSource::CommandLine);
    }

    #[tokio::test]
    async fn test_invalid_cli_token() {
        let use_case = ResolveTokenUseCase::new(storage_returning(|| Ok(None)));

        let result = use_case.execute(Some("not-a-token".to_string())).await;

        assert!(matches!(result, Err(AuthError::InvalidTokenFormat { .. })));
    }

    #[tokio::test]
    async fn test_no_token_found() {
        let use_case = ResolveTokenUseCase::new(storage_returning(|| Ok(None)));

        let result = use_case.execute(Some("   ".to_string())).await;

        assert!(matches!(result, Err(AuthError::NoTokenAvailable)));
    }
}
