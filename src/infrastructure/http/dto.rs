//! Wire-format types for the relay backend's JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{DeliveryStatus, MessageHistoryItem, SendReceipt, User};

/// Login request body. The backend nests the credentials under a `user` key.
#[derive(Debug, Serialize)]
pub struct LoginEnvelope<'a> {
    pub user: LoginBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// The `user` object returned by `/me`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: serde_json::Value,
    pub email: String,
}

impl UserResponse {
    pub fn into_user(self) -> User {
        // The backend has returned both numeric and string ids over time.
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        User::new(id, self.email)
    }
}

/// Send request body, nested under a `message` key.
#[derive(Debug, Serialize)]
pub struct MessageEnvelope<'a> {
    pub message: MessageBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub content: &'a str,
    pub sender: &'a str,
    pub recipient: &'a str,
}

/// Acknowledgement returned by `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_true() -> bool {
    true
}

impl SendResponse {
    pub fn into_receipt(self) -> SendReceipt {
        SendReceipt {
            id: self.id,
            success: self.success,
            message: self.message,
            timestamp: self.timestamp,
        }
    }
}

/// One history entry from `GET /messages`.
#[derive(Debug, Deserialize)]
pub struct HistoryItemResponse {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub recipient: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<DeliveryStatus>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl HistoryItemResponse {
    pub fn into_item(self) -> MessageHistoryItem {
        MessageHistoryItem {
            id: self.id,
            content: self.content,
            sender: self.sender,
            recipient: self.recipient,
            timestamp: self.timestamp,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status,
            user_id: self.user_id,
        }
    }
}

/// Error body the backend attaches to non-2xx responses, when it bothers to.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn detail(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_with_numeric_id() {
        let response: UserResponse =
            serde_json::from_str(r#"{"id": 42, "email": "a@b.com"}"#).unwrap();
        let user = response.into_user();
        assert_eq!(user.id(), "42");
        assert_eq!(user.email(), "a@b.com");
    }

    #[test]
    fn test_history_item_tolerates_missing_optional_fields() {
        let response: HistoryItemResponse = serde_json::from_str(
            r#"{
                "id": "m1",
                "content": "hi",
                "sender": "web-app",
                "recipient": "+18777804236",
                "timestamp": "2026-08-20T10:00:00Z",
                "status": "queued"
            }"#,
        )
        .unwrap();
        let item = response.into_item();
        assert!(item.created_at.is_none());
        assert_eq!(item.status, Some(DeliveryStatus::Queued));
    }

    #[test]
    fn test_unknown_status_does_not_fail_deserialization() {
        let response: HistoryItemResponse = serde_json::from_str(
            r#"{
                "id": "m1",
                "content": "hi",
                "sender": "web-app",
                "recipient": "+18777804236",
                "timestamp": "2026-08-20T10:00:00Z",
                "status": "carrier_rejected"
            }"#,
        )
        .unwrap();
        assert_eq!(response.status, Some(DeliveryStatus::Unknown));
    }

    #[test]
    fn test_send_response_defaults_success() {
        let response: SendResponse = serde_json::from_str(r#"{"id": "m9"}"#).unwrap();
        assert!(response.success);
        assert!(response.timestamp.is_none());
    }

    #[test]
    fn test_error_response_prefers_error_field() {
        let response: ErrorResponse =
            serde_json::from_str(r#"{"error": "bad", "message": "other"}"#).unwrap();
        assert_eq!(response.detail().as_deref(), Some("bad"));
    }
}
