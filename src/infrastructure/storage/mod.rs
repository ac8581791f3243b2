//! Token persistence adapters.

mod keyring_storage;

pub use keyring_storage::KeyringTokenStorage;
