//! Banner, health and readiness endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::providers::ComponentHealth;
use crate::server::state::AppState;
use crate::types::{HealthComponents, HealthResponse};

/// GET / - Service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Knowledge Q&A API",
        "status": "running"
    }))
}

/// GET /health - Check health of all components
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let knowledge = state.knowledge();

    let components = HealthComponents {
        backend: ComponentHealth::Healthy,
        database: knowledge.database_health().await,
        llm: knowledge.llm_health().await,
    };

    let response = HealthResponse::new(components);
    if response.status != "healthy" {
        tracing::warn!("Health check degraded: {:?}", response.components);
    }

    Json(response)
}

/// GET /ready - Readiness check
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
