//! filedrop - minimal HTTP file-transfer service.
//!
//! Clients upload files into per-request batch folders, download them by
//! path and query aggregate storage statistics. Access is gated by a single
//! shared-secret header.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{FiledropError, Result};
pub use storage::{format_size, FileStorage, StatsSnapshot};
pub use web::WebServer;
