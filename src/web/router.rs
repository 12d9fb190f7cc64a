//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderName,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{StatsResponse, UploadResponse, UploadedFile};
use super::handlers::{self, download_file, get_stats, stats_page, upload_files, AppState};
use super::middleware::{create_cors_layer, security_headers};

/// OpenAPI document for the service.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::file::download_file,
        handlers::file::upload_files,
        handlers::stats::get_stats,
        handlers::stats::stats_page,
    ),
    components(schemas(UploadResponse, UploadedFile, StatsResponse)),
    tags(
        (name = "files", description = "Upload and download"),
        (name = "stats", description = "Storage statistics")
    )
)]
pub struct ApiDoc;

/// Registers the shared-secret header scheme under the name `api_key`.
struct SecurityAddon<'a> {
    header: &'a HeaderName,
}

impl Modify for SecurityAddon<'_> {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(self.header.as_str()))),
            );
        }
    }
}

/// Build the OpenAPI document for a server whose secret travels in `auth_header`.
pub fn api_doc(auth_header: &HeaderName) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    SecurityAddon {
        header: auth_header,
    }
    .modify(&mut doc);
    doc
}

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let cors = create_cors_layer(cors_origins, app_state.auth.header());
    let body_limit = DefaultBodyLimit::max(app_state.max_upload_bytes);
    let openapi = create_openapi_router(app_state.auth.header());

    let api_routes = Router::new()
        .route("/download/*path", get(download_file))
        .route("/upload", post(upload_files))
        .route("/getstats", get(get_stats))
        .route("/stats", get(stats_page))
        .layer(body_limit)
        .with_state(app_state);

    Router::new()
        .merge(api_routes)
        .merge(create_health_router())
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(security_headers)),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Serve the OpenAPI document as JSON.
pub fn create_openapi_router(auth_header: &HeaderName) -> Router {
    let doc = api_doc(auth_header);
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || async move { Json(doc) }),
    )
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
