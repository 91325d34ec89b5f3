//! HTTP routes for the Q&A server

pub mod documents;
pub mod health;
pub mod ingest;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        // Upload carries its own body limit
        .route(
            "/upload",
            post(ingest::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", delete(documents::delete_document))
        .route("/ask", post(query::ask_question))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Response};
    use serde_json::Value;
    use std::sync::Arc;

    use crate::config::QaConfig;
    use crate::providers::stub::StubLlm;
    use crate::server::state::AppState;
    use crate::storage::DocumentDb;

    /// State over an in-memory store and the given provider
    pub async fn state_with(llm: Arc<StubLlm>) -> AppState {
        let db = Arc::new(DocumentDb::in_memory().unwrap());
        AppState::with_parts(QaConfig::default(), db, llm).await.unwrap()
    }

    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
