//! Domain entity definitions.

mod history;
mod message;
mod token;
mod user;

#[cfg(test)]
pub(crate) use token::testing;

pub use history::HistorySnapshot;
pub use message::{DeliveryStatus, MessageHistoryItem, OutboundMessage, SendReceipt};
pub use token::SessionToken;
pub use user::User;
