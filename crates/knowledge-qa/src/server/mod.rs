//! HTTP server for the Q&A service

pub mod routes;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::QaConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Q&A HTTP server
pub struct QaServer {
    config: QaConfig,
    state: AppState,
}

impl QaServer {
    /// Create a new server, opening the store and loading the corpus
    pub async fn new(config: QaConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn with_state(config: QaConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = routes::api_routes(self.config.server.max_upload_size)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting Q&A server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c(), self.state.clone()))
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Wait for `signal`, then report not ready while connections drain
async fn shutdown_signal<F>(signal: F, state: AppState)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    state.set_ready(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub::StubLlm;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn server(config: QaConfig) -> QaServer {
        let state = routes::test_support::state_with(Arc::new(StubLlm::new())).await;
        QaServer::with_state(config, state)
    }

    #[tokio::test]
    async fn test_shutdown_clears_readiness() {
        let server = server(QaConfig::default()).await;
        assert!(server.state.is_ready());

        shutdown_signal(std::future::ready(Ok(())), server.state.clone()).await;
        assert!(!server.state.is_ready());
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let app = server(QaConfig::default()).await.build_router();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/ask")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut config = QaConfig::default();
        config.server.max_upload_size = 64;
        let app = server(config).await.build_router();

        let boundary = "limit-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"big.txt\"\r\n\r\n{text}\r\n--{b}--\r\n",
            b = boundary,
            text = "word ".repeat(100)
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_address_format() {
        let mut config = QaConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9100;
        assert_eq!(server(config).await.address(), "127.0.0.1:9100");
    }
}
