//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::SessionToken;
use crate::domain::errors::ApiError;

/// Port for persisting the single bearer token. At most one token exists at
/// a time; storing replaces, deleting is idempotent.
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves the stored token, if any.
    async fn get_token(&self) -> Result<Option<SessionToken>, ApiError>;

    /// Stores the token, replacing any previous one.
    async fn store_token(&self, token: &SessionToken) -> Result<(), ApiError>;

    /// Deletes the stored token. Succeeds when none exists.
    async fn delete_token(&self) -> Result<(), ApiError>;

    /// Checks whether a token is stored.
    async fn has_token(&self) -> Result<bool, ApiError> {
        Ok(self.get_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use tokio::sync::RwLock;

    /// In-memory token storage for tests.
    pub struct MockTokenStorage {
        token: RwLock<Option<SessionToken>>,
    }

    impl MockTokenStorage {
        /// Creates empty storage.
        pub fn new() -> Self {
            Self {
                token: RwLock::new(None),
            }
        }

        /// Creates storage seeded with a token.
        pub fn with_token(token: SessionToken) -> Self {
            Self {
                token: RwLock::new(Some(token)),
            }
        }
    }

    impl Default for MockTokenStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TokenStoragePort for MockTokenStorage {
        async fn get_token(&self) -> Result<Option<SessionToken>, ApiError> {
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &SessionToken) -> Result<(), ApiError> {
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), ApiError> {
            *self.token.write().await = None;
            Ok(())
        }
    }
}
