//! Message submission use case.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::entities::{OutboundMessage, SendReceipt};
use crate::domain::errors::ApiError;
use crate::domain::ports::MessagePort;

/// Validates and submits one message to the configured recipient. No retry,
/// no backoff: a single round trip per submission.
#[derive(Clone)]
pub struct SendMessageUseCase {
    message_port: Arc<dyn MessagePort>,
    recipient: String,
}

impl SendMessageUseCase {
    /// Creates the use case, stripping display formatting from the
    /// configured recipient and validating the result.
    ///
    /// # Errors
    /// `Validation` if the recipient is not a usable phone number.
    pub fn new(
        message_port: Arc<dyn MessagePort>,
        recipient_display: &str,
    ) -> Result<Self, ApiError> {
        let recipient = strip_recipient_formatting(recipient_display);
        if !is_valid_recipient(&recipient) {
            return Err(ApiError::validation(format!(
                "Configured recipient {recipient_display:?} is not a valid phone number."
            )));
        }

        Ok(Self {
            message_port,
            recipient,
        })
    }

    /// Submits the message.
    ///
    /// # Errors
    /// `Validation` before any network call for empty or over-length
    /// content; otherwise whatever the backend call produces.
    pub async fn execute(&self, content: &str) -> Result<SendReceipt, ApiError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ApiError::validation("Message text is required."));
        }

        let chars = content.chars().count();
        if chars > OutboundMessage::MAX_CONTENT_CHARS {
            return Err(ApiError::validation(format!(
                "Message is {chars} characters; the limit is {}.",
                OutboundMessage::MAX_CONTENT_CHARS
            )));
        }

        let message = OutboundMessage::new(content, self.recipient.clone());
        debug!(recipient = %message.recipient(), chars, "Submitting message");

        let receipt = self.message_port.send_message(&message).await?;
        if receipt.success {
            info!(id = ?receipt.id, "Message accepted");
        } else {
            warn!(detail = ?receipt.message, "Backend reported an unsuccessful submission");
        }
        Ok(receipt)
    }
}

/// Drops everything except digits and `+` signs, the inverse of the
/// display formatting applied to the configured recipient.
fn strip_recipient_formatting(display: &str) -> String {
    display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn is_valid_recipient(candidate: &str) -> bool {
    static RECIPIENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let recipient_regex = RECIPIENT_REGEX
        .get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("Invalid regex"));

    recipient_regex.is_match(candidate)
}
