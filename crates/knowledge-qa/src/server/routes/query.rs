//! Question answering endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AnswerResponse, QuestionRequest};

/// POST /ask - Answer a question from the uploaded documents
pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>> {
    if request.is_blank() {
        return Err(Error::EmptyQuestion);
    }

    tracing::info!("Question: \"{}\"", request.question);

    let response = state.knowledge().query(&request.question).await?;
    Ok(Json(response))
}
