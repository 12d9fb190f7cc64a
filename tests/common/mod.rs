//! Shared helpers for web API integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderName;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use filedrop::storage::FileStorage;
use filedrop::web::middleware::ApiKeyState;
use filedrop::web::{create_router, AppState};

/// Secret configured on every test server.
pub const TEST_API_KEY: &str = "test-api-key-for-testing-only";

/// A running test server and its storage root.
pub struct TestApp {
    pub server: TestServer,
    pub root: PathBuf,
    _temp_dir: TempDir,
}

/// Create a test server with a fresh temporary storage root.
pub fn create_test_app() -> TestApp {
    create_test_app_with(|state| state)
}

/// Create a test server, letting the caller adjust the state first.
pub fn create_test_app_with(configure: impl FnOnce(AppState) -> AppState) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage =
        FileStorage::new(temp_dir.path().join("files")).expect("Failed to open storage");
    let root = storage.root().to_path_buf();

    let auth = ApiKeyState::new("X-API-Key", TEST_API_KEY).expect("Invalid auth config");
    let state = configure(AppState::new(storage, auth));

    let router = create_router(Arc::new(state), &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        root,
        _temp_dir: temp_dir,
    }
}

/// Header carrying the shared secret.
pub fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

/// A file part named `files`, as browsers send it.
pub fn file_part(filename: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec()).file_name(filename.to_string())
}

/// Build a multipart form with one `files` part per entry.
pub fn upload_form(files: &[(&str, &[u8])]) -> MultipartForm {
    files
        .iter()
        .fold(MultipartForm::new(), |form, (name, content)| {
            form.add_part("files", file_part(name, content))
        })
}

/// Names of everything under `root`, recursively, sorted.
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).expect("Failed to read dir") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                pending.push(path.clone());
            }
            entries.push(path.strip_prefix(root).unwrap().to_path_buf());
        }
    }

    entries.sort();
    entries
}
