//! Message gateway port definition.

use async_trait::async_trait;

use crate::domain::entities::{MessageHistoryItem, OutboundMessage, SendReceipt};
use crate::domain::errors::ApiError;

/// Port for the messaging endpoints of the backend. Every call is a fresh
/// round trip; no caching, no retry.
#[async_trait]
pub trait MessagePort: Send + Sync {
    /// Posts one message. Errors propagate unmodified to the caller.
    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt, ApiError>;

    /// Fetches the full current history snapshot, unsorted. Ordering is the
    /// caller's responsibility.
    async fn fetch_history(&self) -> Result<Vec<MessageHistoryItem>, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory message backend for tests.
    pub struct MockMessagePort {
        history: Mutex<Vec<MessageHistoryItem>>,
        sent: Mutex<Vec<OutboundMessage>>,
        fail_fetch: AtomicBool,
        fetch_count: AtomicUsize,
    }

    impl MockMessagePort {
        /// Creates a backend with an empty history.
        pub fn new() -> Self {
            Self {
                history: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
                fail_fetch: AtomicBool::new(false),
                fetch_count: AtomicUsize::new(0),
            }
        }

        /// Creates a backend that reports the given history.
        pub fn with_history(items: Vec<MessageHistoryItem>) -> Self {
            let port = Self::new();
            *port.history.lock().unwrap() = items;
            port
        }

        /// Makes subsequent fetches fail with a network error.
        pub fn set_fetch_failing(&self, failing: bool) {
            self.fail_fetch.store(failing, Ordering::SeqCst);
        }

        /// Returns the messages submitted so far.
        pub fn sent(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().clone()
        }

        /// Returns how many history fetches were issued.
        pub fn fetch_count(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    impl Default for MockMessagePort {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl MessagePort for MockMessagePort {
        async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt, ApiError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(SendReceipt {
                id: Some("mock-1".to_string()),
                success: true,
                message: None,
                timestamp: None,
            })
        }

        async fn fetch_history(&self) -> Result<Vec<MessageHistoryItem>, ApiError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ApiError::network("connection refused"));
            }
            Ok(self.history.lock().unwrap().clone())
        }
    }
}
