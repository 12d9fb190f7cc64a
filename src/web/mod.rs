//! Web API module for filedrop.
//!
//! Exposes upload, download and storage statistics over HTTP. Every route
//! except `/stats`, `/health` and the OpenAPI document requires the shared
//! secret header.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
