//! Session DTOs.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::entities::User;

/// Login form data. The password is wiped from memory on drop and never
/// appears in Debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plaintext password, held only for the duration of the request.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from form input.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Result of a completed login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user, fetched after the token was persisted.
    pub user: User,
}

impl LoginOutcome {
    /// Creates a login outcome.
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self { user }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_password() {
        let credentials = Credentials::new("ada@example.com", "hunter22");
        let debug_output = format!("{credentials:?}");

        assert!(debug_output.contains("ada@example.com"));
        assert!(!debug_output.contains("hunter22"));
    }
}
