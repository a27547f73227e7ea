//! Keyring-based token storage.

use async_trait::async_trait;
use keyring::Entry;
use tokio::task;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

const KEYRING_SERVICE: &str = "presence-gateway";
const KEYRING_USER: &str = "token";

/// System keyring token storage adapter.
///
/// Keyring backends block, so every call runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringTokenStorage {
    service: String,
    user: String,
}

impl KeyringTokenStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    async fn with_entry<T, F>(&self, operation: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> Result<T, AuthError> + Send + 'static,
    {
        let service = self.service.clone();
        let user = self.user.clone();

        task::spawn_blocking(move || {
            let entry = Entry::new(&service, &user).map_err(|e| {
                AuthError::retrieval_failed(format!("failed to access keyring: {e}"))
            })?;
            operation(entry)
        })
        .await
        .map_err(|e| AuthError::retrieval_failed(format!("keyring task failed: {e}")))?
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        debug!(service = %self.service, "Retrieving token from keyring");

        self.with_entry(|entry| match entry.get_password() {
            Ok(password) => {
                let token = AuthToken::new(password);
                if token.is_none() {
                    warn!("Stored token has invalid format, ignoring it");
                }
                Ok(token)
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No token stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve token from keyring");
                Err(AuthError::retrieval_failed(e.to_string()))
            }
        })
        .await
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        debug!(service = %self.service, "Storing token in keyring");

        let token = token.clone();
        self.with_entry(move |entry| {
            entry.set_password(token.as_str()).map_err(|e| {
                warn!(error = %e, "Failed to store token in keyring");
                AuthError::storage_failed(e.to_string())
            })
        })
        .await
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        debug!(service = %self.service, "Deleting token from keyring");

        self.with_entry(|entry| match entry.delete_credential() {
            Ok(()) => {
                debug!("Token deleted from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No token to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete token from keyring");
                Err(AuthError::storage_failed(e.to_string()))
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_token() {
        let storage = KeyringTokenStorage::with_names("presence-gateway-test", "test-token");
        let token = AuthToken::new_unchecked(
            "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY",
        );

        storage.store_token(&token).await.unwrap();

        let retrieved = storage.get_token().await.unwrap();
        assert_eq!(retrieved.map(|t| t.as_str().to_string()), Some(token.as_str().to_string()));
        assert!(storage.has_token().await.unwrap());

        storage.delete_token().await.unwrap();
        assert!(storage.get_token().await.unwrap().is_none());
    }
}
