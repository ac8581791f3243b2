//! Port definitions for external adapters.

mod message_port;
mod session_port;
mod token_storage_port;

pub use message_port::MessagePort;
pub use session_port::SessionPort;
pub use token_storage_port::TokenStoragePort;

#[cfg(test)]
pub mod mocks {
    pub use super::message_port::mock::MockMessagePort;
    pub use super::session_port::mock::MockSessionPort;
    pub use super::token_storage_port::mock::MockTokenStorage;
}
