//! Relay backend HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Request, StatusCode, Url};
use tracing::{debug, warn};

use super::authorizer::RequestAuthorizer;
use super::dto::{
    ErrorResponse, HistoryItemResponse, LoginBody, LoginEnvelope, MessageBody, MessageEnvelope,
    SendResponse, UserResponse,
};
use crate::domain::entities::{MessageHistoryItem, OutboundMessage, SendReceipt, SessionToken, User};
use crate::domain::errors::ApiError;
use crate::domain::ports::{MessagePort, SessionPort, TokenStoragePort};

/// HTTP adapter for the relay backend's REST API. Implements both the
/// session and message ports against the same connection pool.
///
/// Every request is routed through the [`RequestAuthorizer`] with whatever
/// token storage currently holds, so a token stored or deleted between two
/// calls takes effect on the very next one.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    authorizer: RequestAuthorizer,
    token_storage: Arc<dyn TokenStoragePort>,
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        base_url: Url,
        token_storage: Arc<dyn TokenStoragePort>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::unexpected(format!("failed to create HTTP client: {e}")))?;

        let authorizer = RequestAuthorizer::new(&base_url);

        Ok(Self {
            client,
            base_url,
            authorizer,
            token_storage,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        // Url::join treats the base path as a directory only with a
        // trailing slash, so build the path by hand.
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| ApiError::unexpected(format!("invalid endpoint URL {joined}: {e}")))
    }

    /// Builds, authorizes and sends one request with an optional JSON body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;

        let mut request = Request::new(method, url);
        if let Some(body) = body {
            request.headers_mut().insert(
                reqwest::header::CONTENT_TYPE,
                reqwest::header::HeaderValue::from_static("application/json"),
            );
            *request.body_mut() = Some(serde_json::to_vec(&body)
                .map_err(|e| ApiError::unexpected(format!("failed to encode request: {e}")))?
                .into());
        }

        let token = self.token_storage.get_token().await?;
        let request = self.authorizer.authorize(request, token.as_ref());

        self.client
            .execute(request)
            .await
            .map_err(map_transport_error)
    }

    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let detail = match response.json::<ErrorResponse>().await {
            Ok(body) => body.detail().unwrap_or_else(|| format!("HTTP {status}")),
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            s if s.is_server_error() => ApiError::ServerError { status: s.as_u16() },
            _ => ApiError::unexpected(format!("unexpected response: {status} - {detail}")),
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "Request to relay backend failed");
    if e.is_timeout() {
        ApiError::network("request timed out")
    } else if e.is_connect() {
        ApiError::network("failed to connect to server")
    } else {
        ApiError::network(e.to_string())
    }
}

#[async_trait]
impl SessionPort for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<SessionToken, ApiError> {
        debug!("Authenticating against relay backend");

        let body = serde_json::to_value(LoginEnvelope {
            user: LoginBody { email, password },
        })
        .map_err(|e| ApiError::unexpected(format!("failed to encode credentials: {e}")))?;

        let response = self.send(Method::POST, "login", Some(body)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        // The token travels in the response's Authorization header, not
        // the body. A success without one is a broken backend.
        let header = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::protocol_violation("login response carried no Authorization header")
            })?;

        let raw = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::protocol_violation("Authorization header is not a bearer token")
        })?;

        let token = SessionToken::new(raw).ok_or_else(|| {
            ApiError::protocol_violation("Authorization header is not a decodable JWT")
        })?;

        debug!(token = %token, "Received session token");
        Ok(token)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        debug!("Revoking session on relay backend");

        let response = self.send(Method::DELETE, "logout", None).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        Ok(())
    }

    async fn fetch_current_user(&self) -> Result<User, ApiError> {
        let response = self.send(Method::GET, "me", None).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse user response");
            ApiError::unexpected(format!("failed to parse user response: {e}"))
        })?;

        Ok(user.into_user())
    }
}

#[async_trait]
impl MessagePort for ApiClient {
    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt, ApiError> {
        debug!(recipient = %message.recipient(), "Submitting message");

        let body = serde_json::to_value(MessageEnvelope {
            message: MessageBody {
                content: message.content(),
                sender: message.sender(),
                recipient: message.recipient(),
            },
        })
        .map_err(|e| ApiError::unexpected(format!("failed to encode message: {e}")))?;

        let response = self.send(Method::POST, "messages", Some(body)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let receipt: SendResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse send acknowledgement");
            ApiError::unexpected(format!("failed to parse send acknowledgement: {e}"))
        })?;

        Ok(receipt.into_receipt())
    }

    async fn fetch_history(&self) -> Result<Vec<MessageHistoryItem>, ApiError> {
        let response = self.send(Method::GET, "messages", None).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let items: Vec<HistoryItemResponse> = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse history response");
            ApiError::unexpected(format!("failed to parse history response: {e}"))
        })?;

        Ok(items.into_iter().map(HistoryItemResponse::into_item).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockTokenStorage;

    fn client() -> ApiClient {
        ApiClient::new(
            Url::parse("http://localhost:3000/api").unwrap(),
            Arc::new(MockTokenStorage::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let built = ApiClient::new(
            Url::parse("http://localhost:3000/api").unwrap(),
            Arc::new(MockTokenStorage::new()),
        );
        assert!(built.is_ok());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let url = client().endpoint("/messages").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/messages");
    }

    #[test]
    fn test_endpoint_joins_with_trailing_base_slash() {
        let api = ApiClient::new(
            Url::parse("http://localhost:3000/api/").unwrap(),
            Arc::new(MockTokenStorage::new()),
        )
        .unwrap();
        let url = api.endpoint("login").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/login");
    }
}
