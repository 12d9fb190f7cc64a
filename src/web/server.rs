//! Web server for filedrop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::storage::FileStorage;
use crate::{FiledropError, Result};

use super::handlers::AppState;
use super::middleware::ApiKeyState;
use super::page::StatsPage;
use super::router::create_router;

/// HTTP server exposing the file-transfer API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server from configuration.
    ///
    /// Opens (and if needed creates) the storage root and loads the stats
    /// page template.
    pub fn new(config: &Config) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FiledropError::Config(format!("invalid server address: {e}")))?;

        let storage = FileStorage::new(&config.storage.path)?;
        tracing::info!("File storage initialized at: {}", storage.root().display());

        let app_state = AppState::new(storage, ApiKeyState::from_config(&config.auth)?)
            .with_stats_page(StatsPage::load(config.web.stats_template.as_deref())?)
            .with_max_upload_bytes(config.max_upload_bytes());

        Ok(Self::from_state(addr, app_state, config.web.cors_origins.clone()))
    }

    /// Create a web server around an existing state.
    pub fn from_state(addr: SocketAddr, app_state: AppState, cors_origins: Vec<String>) -> Self {
        Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins,
        }
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = create_router(self.app_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = create_router(self.app_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(storage: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.storage.path = storage.path().join("files").display().to_string();
        config.auth.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_web_server_new() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert!(temp_dir.path().join("files").is_dir());
    }

    #[test]
    fn test_web_server_invalid_host() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.server.host = "not an address".to_string();

        assert!(matches!(
            WebServer::new(&config),
            Err(FiledropError::Config(_))
        ));
    }

    #[test]
    fn test_web_server_missing_template() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.web.stats_template = Some("missing/stats.html".to_string());

        assert!(matches!(WebServer::new(&config), Err(FiledropError::Io(_))));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();

        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");

        let resp = client
            .get(format!("http://{}/getstats", addr))
            .header("X-API-Key", "test-key")
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }
}
