//! Per-request bearer header attachment.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Request, Url};
use tracing::warn;

/// Decides, for every single outgoing request, whether to attach the bearer
/// token. The decision is a pure function of the request URL and the token
/// passed in; nothing is cached between calls, since the token can change
/// between any two of them.
#[derive(Debug, Clone)]
pub struct RequestAuthorizer {
    api_host: Option<String>,
}

impl RequestAuthorizer {
    /// Creates an authorizer scoped to the backend's host.
    #[must_use]
    pub fn new(api_base: &Url) -> Self {
        Self {
            api_host: api_base.host_str().map(str::to_string),
        }
    }

    /// True iff all attachment conditions hold: a token exists, it has not
    /// expired, the URL targets the backend host, and the call is not the
    /// login itself.
    #[must_use]
    pub fn should_attach(
        &self,
        url: &Url,
        token: Option<&crate::domain::entities::SessionToken>,
    ) -> bool {
        let Some(token) = token else {
            return false;
        };
        if token.is_expired() {
            return false;
        }
        if url.host_str() != self.api_host.as_deref() {
            return false;
        }
        !url.path().ends_with("/login")
    }

    /// Attaches `Authorization: Bearer <token>` and JSON content headers
    /// when [`Self::should_attach`] holds; otherwise the request passes
    /// through untouched. Takes the request by value so the caller's copy
    /// can never be mutated behind its back.
    #[must_use]
    pub fn authorize(
        &self,
        mut request: Request,
        token: Option<&crate::domain::entities::SessionToken>,
    ) -> Request {
        if self.should_attach(request.url(), token)
            && let Some(token) = token
        {
            match HeaderValue::from_str(&format!("Bearer {}", token.as_str())) {
                Ok(value) => {
                    let headers = request.headers_mut();
                    headers.insert(AUTHORIZATION, value);
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                }
                Err(e) => {
                    warn!(error = %e, "Token is not a valid header value, sending unauthenticated");
                }
            }
        }
        request
    }
}
