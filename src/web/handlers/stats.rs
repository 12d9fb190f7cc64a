//! Storage statistics handlers.

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use crate::web::dto::StatsResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ApiKey;

/// GET /getstats - Folder count, file count and total size.
#[utoipa::path(
    get,
    path = "/getstats",
    tag = "stats",
    responses(
        (status = 200, description = "Storage statistics", body = StatsResponse),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Storage root could not be scanned")
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn get_stats(
    _auth: ApiKey,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.storage.stats().await?;
    Ok(Json(stats.into()))
}

/// GET /stats - Statistics as an HTML page.
///
/// Public: the page only shows aggregate numbers.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Statistics page", content_type = "text/html"),
        (status = 500, description = "Storage root could not be scanned")
    )
)]
pub async fn stats_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let stats = state.storage.stats().await?;
    Ok(Html(state.stats_page.render(&stats)))
}
