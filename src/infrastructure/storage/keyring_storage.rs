//! Keyring-based session token storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::SessionToken;
use crate::domain::errors::ApiError;
use crate::domain::ports::TokenStoragePort;

const KEYRING_SERVICE: &str = "textline";
const KEYRING_USER: &str = "session";

/// System keyring token storage adapter.
pub struct KeyringTokenStorage {
    service: String,
    user: String,
}

impl KeyringTokenStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, ApiError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| ApiError::storage(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<SessionToken>, ApiError> {
        debug!(service = %self.service, "Retrieving token from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(password) => match SessionToken::new(&password) {
                Some(token) => {
                    debug!("Token found in keyring");
                    Ok(Some(token))
                }
                None => {
                    // A stored value that no longer decodes as a JWT is
                    // treated as absent rather than fatal.
                    warn!("Stored token is not a decodable JWT, ignoring it");
                    Ok(None)
                }
            },
            Err(keyring::Error::NoEntry) => {
                debug!("No token stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve token from keyring");
                Err(ApiError::storage(e.to_string()))
            }
        }
    }

    async fn store_token(&self, token: &SessionToken) -> Result<(), ApiError> {
        debug!(service = %self.service, "Storing token in keyring");

        let entry = self.entry()?;

        entry.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store token in keyring");
            ApiError::storage(e.to_string())
        })?;

        debug!("Token stored successfully");
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), ApiError> {
        debug!(service = %self.service, "Deleting token from keyring");

        let entry = self.entry()?;

        match entry.delete_credential() {
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
                Err(ApiError::storage(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::testing::token_without_expiry;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_token() {
        let storage = KeyringTokenStorage::with_names("textline-test", "test-session");
        let token = token_without_expiry();

        storage.store_token(&token).await.unwrap();
        let retrieved = storage.get_token().await.unwrap();
        assert_eq!(retrieved, Some(token));

        storage.delete_token().await.unwrap();
        assert!(storage.get_token().await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_delete_missing_token_is_ok() {
        let storage = KeyringTokenStorage::with_names("textline-test", "absent-session");
        assert!(storage.delete_token().await.is_ok());
    }
}
