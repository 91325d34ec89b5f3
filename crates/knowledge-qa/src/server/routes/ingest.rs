//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::IngestResponse;

/// Multipart field carrying the uploaded file
const FILE_FIELD: &str = "file";

/// POST /upload - Upload a plain-text document
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    let start = Instant::now();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".txt") {
            return Err(Error::validation("Only .txt files are supported"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;

        let text = std::str::from_utf8(&data)
            .map_err(|_| Error::validation("File is not valid UTF-8 text"))?;

        tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

        let response = state.knowledge().ingest(&filename, text).await?;

        tracing::info!(
            "Upload of {} finished in {}ms",
            filename,
            start.elapsed().as_millis()
        );

        return Ok(Json(response));
    }

    Err(Error::validation("Missing multipart field 'file'"))
}

#[cfg(test)]
mod tests {
    use super::super::{api_routes, test_support};
    use crate::providers::stub::StubLlm;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "knowledge-qa-test-boundary";

    fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n",
            boundary = BOUNDARY,
            filename = filename
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_text_document() {
        let state = test_support::state_with(Arc::new(StubLlm::new())).await;
        let app = api_routes(1024 * 1024).with_state(state.clone());

        let response = app
            .oneshot(upload_request("pets.txt", b"The cat sat on the mat."))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = test_support::json_body(response).await;
        assert_eq!(body["message"], "Document uploaded successfully");
        assert_eq!(body["filename"], "pets.txt");
        assert_eq!(body["chunks_created"], 1);
        assert!(body["document_id"].is_i64());
        assert_eq!(state.knowledge().document_count().await, 1);
    }

    #[tokio::test]
    async fn test_upload_rejects_other_extensions() {
        let state = test_support::state_with(Arc::new(StubLlm::new())).await;
        let app = api_routes(1024 * 1024).with_state(state.clone());

        let response = app
            .oneshot(upload_request("report.pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = test_support::json_body(response).await;
        assert_eq!(body["error"]["type"], "validation_error");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Only .txt files are supported"));
        assert_eq!(state.knowledge().document_count().await, 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_utf8() {
        let state = test_support::state_with(Arc::new(StubLlm::new())).await;
        let app = api_routes(1024 * 1024).with_state(state);

        let response = app
            .oneshot(upload_request("binary.txt", &[0xff, 0xfe, 0x00, 0x41]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_document() {
        let state = test_support::state_with(Arc::new(StubLlm::new())).await;
        let app = api_routes(1024 * 1024).with_state(state);

        let response = app.oneshot(upload_request("empty.txt", b"   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
