//! Authenticated user entity.

use serde::{Deserialize, Serialize};

/// The logged-in account. Held as a singleton by the application state,
/// replaced wholesale on every fetch and cleared on logout or auth failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: String,
    email: String,
}

impl User {
    /// Creates a user value.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Returns the backend-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the login email, also used as the display name.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}
