//! Bearer session token value object.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Bearer token issued by the backend, with its expiry claim decoded up
/// front. The client never generates or verifies tokens; it only reads the
/// `exp` claim to decide whether a request is worth sending.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Parses a compact JWT string, decoding the embedded expiry claim.
    ///
    /// Returns `None` if the value does not have the three-segment JWT
    /// shape or its payload is not decodable JSON. A token without an
    /// `exp` claim is accepted and never expires locally.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        let mut segments = value.split('.');
        let (_header, payload) = (segments.next()?, segments.next()?);
        let (_signature, None) = (segments.next()?, segments.next()) else {
            return None;
        };

        let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&decoded).ok()?;

        let expires_at = claims
            .exp
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Some(Self { value, expires_at })
    }

    /// Returns the raw token for the Authorization header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the decoded expiry instant, if the token carries one.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Local expiry check. Never touches the network; a token without an
    /// `exp` claim reports `false` and the server stays the authority.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Returns a masked rendering safe for logs and display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let prefix = &self.value[..4];
        let suffix = &self.value[self.value.len() - 4..];
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &self.masked())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::Duration;

    fn encode_jwt(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    /// Builds a decodable token expiring `delta` from now.
    pub(crate) fn token_expiring_in(delta: Duration) -> SessionToken {
        let payload = serde_json::json!({ "sub": "42", "exp": (Utc::now() + delta).timestamp() });
        SessionToken::new(encode_jwt(&payload)).expect("valid test token")
    }

    /// Builds a decodable token that carries no `exp` claim.
    pub(crate) fn token_without_expiry() -> SessionToken {
        let payload = serde_json::json!({ "sub": "42" });
        SessionToken::new(encode_jwt(&payload)).expect("valid test token")
    }
}
