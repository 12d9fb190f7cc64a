//! Data transfer objects for the web API.

pub mod response;

pub use response::{StatsResponse, UploadResponse, UploadedFile};
