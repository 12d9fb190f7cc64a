//! Upload and download handlers.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::storage::{sanitize_filename, Batch};
use crate::web::dto::{UploadResponse, UploadedFile};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ApiKey;
use crate::FiledropError;

/// Build a `Content-Disposition` value for a download.
///
/// Control characters are dropped so a crafted filename cannot inject
/// headers. Names that are not plain ASCII also get an RFC 5987
/// `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("attachment; filename=\"{filename}\"");
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();
    let encoded = urlencoding::encode(filename);

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Map a multipart read failure onto the crate error.
fn upload_error(err: MultipartError) -> FiledropError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FiledropError::TooLarge("upload exceeds the size limit".to_string())
    } else {
        FiledropError::Validation(format!("failed to read upload: {}", err.body_text()))
    }
}

/// Record a stored file, replacing an earlier entry with the same name.
///
/// A repeated name overwrites the file on disk, so the report keeps one entry
/// per name with the size of the last write.
fn record_file(files: &mut Vec<UploadedFile>, stored: UploadedFile) {
    match files.iter_mut().find(|f| f.name == stored.name) {
        Some(existing) => *existing = stored,
        None => files.push(stored),
    }
}

/// GET /download/{path} - Download a stored file.
#[utoipa::path(
    get,
    path = "/download/{path}",
    tag = "files",
    params(
        ("path" = String, Path, description = "File path relative to the storage root, e.g. `{batch}/{filename}`")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Invalid API key"),
        (status = 404, description = "File not found")
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn download_file(
    _auth: ApiKey,
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let stored = state.storage.resolve_file(&path).await?;

    let file = tokio::fs::File::open(&stored.path)
        .await
        .map_err(FiledropError::from)?;

    let content_type = mime_guess::from_path(&stored.name)
        .first_or_octet_stream()
        .to_string();

    tracing::debug!(path = %path, size = stored.size, "Serving download");

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&stored.name),
        )
        .header(header::CONTENT_LENGTH, stored.size)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// POST /upload - Upload one or more files into a new batch folder.
///
/// Request body: multipart/form-data. Every part with a filename is stored;
/// the conventional field name is `files`, repeated once per file.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    responses(
        (status = 200, description = "Files stored", body = UploadResponse),
        (status = 400, description = "No files, invalid filename or malformed multipart body"),
        (status = 401, description = "Invalid API key"),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "Storage failure")
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn upload_files(
    _auth: ApiKey,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut batch: Option<Batch> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let filename = sanitize_filename(&original_name)?;

        // The folder only appears once there is something to put in it
        let current = match batch.take() {
            Some(current) => current,
            None => state.storage.create_batch().await?,
        };

        let content = field.map(|chunk| chunk.map_err(upload_error));
        let size = state
            .storage
            .write_file(&current, &filename, content)
            .await?;

        record_file(&mut files, UploadedFile::new(filename, size));
        batch = Some(current);
    }

    let batch = batch.ok_or_else(|| ApiError::bad_request("No files provided"))?;
    let response = UploadResponse::new(batch.id(), files);

    tracing::info!(
        batch = %response.folder,
        files = response.files.len(),
        bytes = response.total_size,
        "Stored upload batch"
    );

    Ok(Json(response))
}
