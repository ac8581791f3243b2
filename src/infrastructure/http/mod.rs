//! HTTP adapter for the relay backend.

mod authorizer;
mod client;
mod dto;

pub use authorizer::RequestAuthorizer;
pub use client::ApiClient;
