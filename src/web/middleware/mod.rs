//! Middleware for the web API.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{ApiKey, ApiKeyState};
pub use cors::create_cors_layer;
pub use security::security_headers;
