//! Document management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::DocumentSummary;

/// GET /documents - List all documents, newest first
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentSummary>>> {
    let documents = state.knowledge().list_documents().await?;
    Ok(Json(documents))
}

/// DELETE /documents/:id - Delete a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.knowledge().remove(id).await?;

    Ok(Json(json!({
        "message": "Document deleted successfully"
    })))
}
