//! Message entities: outbound submissions and history items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state reported by the backend for a sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Accepted by the backend, waiting for a carrier slot.
    Queued,
    /// Handed to the carrier.
    Sending,
    /// Carrier accepted the message.
    Sent,
    /// Delivery confirmed.
    Done,
    /// Delivery failed.
    Failed,
    /// Any status string this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl DeliveryStatus {
    /// Human-readable label ("done" reads as "Delivered").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Sending => "Sending",
            Self::Sent => "Sent",
            Self::Done => "Delivered",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    /// Single-cell glyph for list rendering.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Queued => "…",
            Self::Sending => "↗",
            Self::Sent => "➤",
            Self::Done => "✔",
            Self::Failed => "✘",
            Self::Unknown => "?",
        }
    }
}

/// A message about to be submitted. Built fresh per submission, never
/// persisted client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    content: String,
    sender: String,
    recipient: String,
}

impl OutboundMessage {
    /// Maximum content length accepted client-side, in characters.
    pub const MAX_CONTENT_CHARS: usize = 160;

    /// Fixed sender tag the backend expects from this client family.
    pub const SENDER_TAG: &'static str = "web-app";

    /// Creates an outbound message to the given wire-format recipient.
    #[must_use]
    pub fn new(content: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Self::SENDER_TAG.to_string(),
            recipient: recipient.into(),
        }
    }

    /// Returns the message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the sender tag.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the wire-format recipient number.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// Backend acknowledgement for a message submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Backend-assigned message id, when provided.
    pub id: Option<String>,
    /// Whether the backend accepted the message.
    pub success: bool,
    /// Optional human-readable detail.
    pub message: Option<String>,
    /// Optional acceptance timestamp, as reported.
    pub timestamp: Option<String>,
}

/// One entry of the sent-message history as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHistoryItem {
    /// Backend-assigned identifier.
    pub id: String,
    /// Message text.
    pub content: String,
    /// Sender tag recorded at submission time.
    pub sender: String,
    /// Recipient number in wire format.
    pub recipient: String,
    /// Submission timestamp.
    pub timestamp: DateTime<Utc>,
    /// Record creation time, when the backend reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Last status update time, when the backend reports one.
    pub updated_at: Option<DateTime<Utc>>,
    /// Current delivery state, when the backend reports one.
    pub status: Option<DeliveryStatus>,
    /// Owning user id, when the backend reports one.
    pub user_id: Option<String>,
}

impl MessageHistoryItem {
    /// Ordering key: `created_at` when present, `timestamp` otherwise.
    #[must_use]
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(self.timestamp)
    }
}
