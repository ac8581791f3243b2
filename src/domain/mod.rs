//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{HistorySnapshot, SessionToken, User};
pub use errors::ApiError;
pub use ports::{MessagePort, SessionPort, TokenStoragePort};
