//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Relay backend API client.
pub mod http;
/// Token storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use http::{ApiClient, RequestAuthorizer};
pub use storage::KeyringTokenStorage;
