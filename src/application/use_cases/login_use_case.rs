//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

/// Validates a token and keeps it in secure storage.
#[derive(Clone)]
pub struct LoginUseCase {
    storage_port: Arc<dyn TokenStoragePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn TokenStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Executes login with provided request.
    ///
    /// # Errors
    /// Returns error if the token is malformed or cannot be stored.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        debug!("Attempting login");

        let token = AuthToken::new(request.token).ok_or_else(|| {
            warn!("Invalid token format provided");
            AuthError::invalid_format("token does not match expected Discord token format")
        })?;

        if !request.persist_token {
            debug!("Token persistence disabled, skipping storage");
            return Ok(LoginResponse::new(token, false));
        }

        self.storage_port.store_token(&token).await.map_err(|e| {
            error!(error = %e, "Failed to persist token to secure storage");
            e
        })?;
        info!(token = %token, "Token persisted to secure storage");

        Ok(LoginResponse::new(token, true))
    }

    /// Deletes the stored token.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn delete_token(&self) -> Result<(), AuthError> {
        debug!("Deleting token from secure storage");
        match self.storage_port.delete_token().await {
            Ok(()) => {
                info!("Token deleted from secure storage");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to delete token from secure storage");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockTokenStoragePort;
    use mockall::predicate::function;
    use tokio_test::{assert_err, assert_ok};

    fn make_valid_token() -> String {
        "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY".to_string()
    }

    #[tokio::test]
    async fn test_successful_login() {
        let mut storage = MockTokenStoragePort::new();
        storage
            .expect_store_token()
            .with(function(|t: &AuthToken| t.as_str() == make_valid_token()))
            .times(1)
            .returning(|_| Ok(()));

        let use_case = LoginUseCase::new(Arc::new(storage));
        let response = assert_ok!(use_case.execute(LoginRequest::new(make_valid_token())).await);

        assert!(response.token_persisted);
        assert_eq!(response.token.as_str(), make_valid_token());
    }

    #[tokio::test]
    async fn test_invalid_token_format() {
        let mut storage = MockTokenStoragePort::new();
        storage.expect_store_token().never();

        let use_case = LoginUseCase::new(Arc::new(storage));
        let result = use_case.execute(LoginRequest::new("invalid".to_string())).await;

        assert!(matches!(result, Err(AuthError::InvalidTokenFormat { .. })));
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported() {
        let mut storage = MockTokenStoragePort::new();
        storage
            .expect_store_token()
            .returning(|_| Err(AuthError::storage_failed("keyring locked")));

        let use_case = LoginUseCase::new(Arc::new(storage));
        let result = use_case.execute(LoginRequest::new(make_valid_token())).await;

        assert!(matches!(result, Err(AuthError::TokenStorageFailed { .. })));
    }

    #[tokio::test]
    async fn test_login_without_persistence() {
        let mut storage = MockTokenStoragePort::new();
        storage.expect_store_token().never();

        let use_case = LoginUseCase::new(Arc::new(storage));
        let request = LoginRequest::new(make_valid_token()).without_persistence();
        let response = use_case.execute(request).await.unwrap();

        assert!(!response.token_persisted);
    }

    #[tokio::test]
    async fn test_delete_token() {
        let mut storage = MockTokenStoragePort::new();
        storage.expect_delete_token().times(1).returning(|| Ok(()));

        let use_case = LoginUseCase::new(Arc::new(storage));
        assert_ok!(use_case.delete_token().await);
    }

    #[tokio::test]
    async fn test_delete_token_failure_is_reported() {
        let mut storage = MockTokenStoragePort::new();
        storage
            .expect_delete_token()
            .returning(|| Err(AuthError::storage_failed("keyring locked")));

        let use_case = LoginUseCase::new(Arc::new(storage));
        assert_err!(use_case.delete_token().await);
    }
}
