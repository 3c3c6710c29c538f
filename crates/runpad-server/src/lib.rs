//! HTTP surface of the runpad code playground
//!
//! Exposes code execution and snippet sharing as a small JSON API. All
//! behavior lives in `runpad-core`; this crate wires it to axum routes,
//! middleware and a listener.

pub mod error;
pub mod handlers;

pub use error::{Result, ServerError};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use runpad_core::{
    CodeExecutor, ExecutionGateway, InMemorySnippetStore, RequestValidator, ServerSettings,
    SnippetStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Configuration for the runpad server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// CORS allowed origins (if None, allows any origin)
    pub cors_origins: Option<Vec<String>>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Enable request logging
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            enable_cors: true,
            cors_origins: None,
            max_body_size: 1024 * 1024, // 1MB
            enable_logging: true,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a server configuration from the `server` section of the config file.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self> {
        Ok(Self {
            bind_addr: settings.socket_addr()?,
            enable_cors: settings.enable_cors,
            cors_origins: settings.cors_origins.clone(),
            max_body_size: settings.max_body_size,
            enable_logging: settings.enable_logging,
        })
    }

    /// Enable or disable CORS.
    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    /// Set allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set maximum request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }
}

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: ExecutionGateway,
    pub snippets: Arc<dyn SnippetStore>,
    pub validator: Arc<RequestValidator>,
}

impl AppState {
    /// State backed by `executor` and a fresh in-memory snippet store.
    pub fn new(executor: Arc<dyn CodeExecutor>) -> Result<Self> {
        Self::with_store(executor, Arc::new(InMemorySnippetStore::new()))
    }

    pub fn with_store(
        executor: Arc<dyn CodeExecutor>,
        snippets: Arc<dyn SnippetStore>,
    ) -> Result<Self> {
        Ok(Self {
            gateway: ExecutionGateway::new(executor),
            snippets,
            validator: Arc::new(RequestValidator::new()?),
        })
    }
}

/// The runpad HTTP server.
pub struct RunpadServer {
    state: AppState,
    config: ServerConfig,
}

impl RunpadServer {
    /// Create a new server with the given state and default configuration.
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            config: ServerConfig::default(),
        }
    }

    /// Create a new server with custom configuration.
    pub fn with_config(state: AppState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health_handler))
            .route("/api/languages", get(handlers::languages_handler))
            .route("/api/execute", post(handlers::execute_handler))
            .route("/api/share", post(handlers::share_handler))
            .route("/api/share/{id}", get(handlers::get_share_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .with_state(self.state.clone());

        if self.config.enable_logging {
            router = router.layer(middleware::from_fn(
                |request: axum::http::Request<axum::body::Body>,
                 next: axum::middleware::Next| async {
                    let request_id = uuid::Uuid::new_v4().to_string();
                    let method = request.method().clone();
                    let uri = request.uri().clone();

                    // Health probes are frequent; keep them out of info logs
                    if uri.path() == "/health" {
                        log::debug!("Request {} {} {}", request_id, method, uri);
                    } else {
                        log::info!("Request {} {} {}", request_id, method, uri);
                    }

                    let start = std::time::Instant::now();
                    let response = next.run(request).await;
                    let duration = start.elapsed();

                    log::debug!(
                        "Response {} {} completed in {:?}",
                        request_id,
                        response.status(),
                        duration
                    );

                    response
                },
            ));
        }

        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors_layer = if let Some(ref origins) = self.config.cors_origins {
                let origins: std::result::Result<Vec<_>, _> =
                    origins.iter().map(|s| s.parse()).collect();
                match origins {
                    Ok(origins) => CorsLayer::new()
                        .allow_origin(origins)
                        .allow_methods(Any)
                        .allow_headers(Any),
                    Err(_) => {
                        log::warn!("Invalid CORS origin in configuration, allowing any origin");
                        CorsLayer::permissive()
                    }
                }
            } else {
                CorsLayer::permissive()
            };
            router = router.layer(cors_layer);
        }

        router
    }

    async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr).await.map_err(|e| {
            ServerError::config_error(format!(
                "Failed to bind to {}: {}",
                self.config.bind_addr, e
            ))
        })
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided shutdown signal is received.
    pub async fn serve_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let listener = self.bind().await?;

        log::info!("runpad server starting on {}", self.config.bind_addr);
        log::info!("Health check: http://{}/health", self.config.bind_addr);
        log::info!("Execute endpoint: http://{}/api/execute", self.config.bind_addr);
        log::info!("Share endpoint: http://{}/api/share", self.config.bind_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::internal(format!("Server error: {}", e)))?;

        log::info!("runpad server shut down gracefully");
        Ok(())
    }
}

/// Utility function to create a shutdown signal from Ctrl+C.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, shutting down...");
        },
    }
}

#[cfg(test)]
mod tests;
