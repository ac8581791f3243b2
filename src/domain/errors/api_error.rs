//! Client-facing error taxonomy.

use thiserror::Error;

/// Every failure a backend call or local check can produce.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("network unavailable: {message}")]
    NetworkUnavailable { message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("server error (HTTP {status})")]
    ServerError { status: u16 },

    #[error("protocol violation: {message}")]
    ProtocolViolation { message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("token storage error: {message}")]
    Storage { message: String },

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl ApiError {
    /// Creates a no-response network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            message: message.into(),
        }
    }

    /// Creates a contract-violation error: a 2xx response missing an
    /// expected field or header.
    #[must_use]
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Creates a client-side validation error. Never reaches the network.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a token storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a catch-all error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// True for a 401, which forces local logout wherever it surfaces.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// True when no response was received at all.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. })
    }

    /// Maps the error to a message naming the suspected cause, suitable
    /// for direct display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkUnavailable { .. } => {
                "Unable to connect to the server. Check that it is running and reachable."
                    .to_string()
            }
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::NotFound => {
                "The messages endpoint was not found. Check the configured API URL.".to_string()
            }
            Self::ServerError { .. } => {
                "Server error. Check the server logs for details.".to_string()
            }
            Self::Validation { message } => message.clone(),
            Self::ProtocolViolation { .. } | Self::Storage { .. } | Self::Unexpected { .. } => {
                format!("Unexpected error: {self}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_predicate() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::NotFound.is_unauthorized());
    }

    #[test]
    fn test_user_message_names_cause() {
        assert!(
            ApiError::network("connection refused")
                .user_message()
                .contains("connect")
        );
        assert!(
            ApiError::ServerError { status: 502 }
                .user_message()
                .contains("Server error")
        );
        assert!(ApiError::NotFound.user_message().contains("not found"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let error = ApiError::validation("message is too long");
        assert_eq!(error.user_message(), "message is too long");
    }
}
