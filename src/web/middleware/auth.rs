//! Shared-secret authentication.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderName},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{FiledropError, Result};

/// The configured secret and the header that carries it.
#[derive(Clone)]
pub struct ApiKeyState {
    header: HeaderName,
    key: String,
}

impl ApiKeyState {
    /// Create a new key state.
    pub fn new(header: &str, key: impl Into<String>) -> Result<Self> {
        let header = HeaderName::try_from(header)
            .map_err(|e| FiledropError::Config(format!("invalid auth header {header:?}: {e}")))?;

        Ok(Self {
            header,
            key: key.into(),
        })
    }

    /// Build from the `[auth]` config section.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        Self::new(&config.header, config.api_key.clone())
    }

    /// Header carrying the secret.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Check a provided secret against the configured one.
    pub fn matches(&self, provided: &str) -> bool {
        constant_time_eq(provided, &self.key)
    }
}

impl std::fmt::Debug for ApiKeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyState")
            .field("header", &self.header)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Constant-time string comparison.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    // Only the length may leak
    if provided.len() != expected.len() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Extractor guarding protected handlers.
///
/// Place it before any body extractor so a bad key is rejected before the
/// request body is read.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

#[async_trait]
impl<S> FromRequestParts<S> for ApiKey
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let auth = &app_state.auth;

        let Some(value) = parts.headers.get(auth.header()) else {
            tracing::debug!(path = %parts.uri.path(), "Request without API key");
            return Err(ApiError::unauthorized("Invalid API Key"));
        };

        match value.to_str() {
            Ok(provided) if auth.matches(provided) => Ok(ApiKey),
            _ => {
                tracing::debug!(path = %parts.uri.path(), "Request with invalid API key");
                Err(ApiError::unauthorized("Invalid API Key"))
            }
        }
    }
}
