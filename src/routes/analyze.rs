use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use std::path::Path;
use tracing::info;

use crate::llm::{OpenAiClient, ANALYSIS_PROMPT};
use crate::models::{AnalyzeResponse, AppState};
use crate::types::{AppError, AppResult};

/// Image formats the completion service can fetch, plus PDF.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_document))
        .with_state(state)
}

/// Final dot-delimited suffix, lowercased, if it is in the allow-set.
fn allowed_extension(filename: &str) -> Option<String> {
    let (_, suffix) = filename.rsplit_once('.')?;
    let extension = suffix.to_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// `POST /analyze`: validate the multipart upload, park it in the scratch
/// directory, push it through the two remote services, and relay the model
/// text. Validation and configuration failures return before any remote
/// call; the scratch file is deleted on every path once it exists.
async fn analyze_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    if filename.is_empty() {
        return Err(AppError::InvalidUpload("No selected file".to_string()));
    }
    let extension = allowed_extension(&filename)
        .ok_or_else(|| AppError::InvalidUpload("File type not allowed".to_string()))?;

    if state.config.keys.openai_api_key.is_empty() {
        return Err(AppError::Config(
            "OpenAI API key is not configured".to_string(),
        ));
    }
    if state.config.keys.imgbb_api_key.is_empty() {
        return Err(AppError::Config(
            "ImgBB API key is not configured".to_string(),
        ));
    }

    let file = state.scratch.store(&extension, &data).await?;

    let outcome = run_pipeline(&state, file.path()).await;
    file.cleanup().await;

    let content = outcome?;
    Ok(Json(AnalyzeResponse {
        raw_response: content,
    }))
}

/// First `file` field of the multipart body, as (declared filename, bytes).
async fn read_file_field(multipart: &mut Multipart) -> AppResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidUpload(format!("Malformed multipart request: {}", e)))?;
        return Ok((filename, data));
    }

    Err(AppError::InvalidUpload("No file part".to_string()))
}

/// Host the image, then ask the model about it. Strictly sequential: the
/// completion call needs the hosted URL, and a failed upload must not reach
/// the completion service at all.
async fn run_pipeline(state: &AppState, path: &Path) -> AppResult<String> {
    let image_url = state.hosting.upload(path).await?;
    info!("Using image URL: {}", image_url);

    let raw = state
        .completion
        .analyze_image(&image_url, ANALYSIS_PROMPT)
        .await?;

    OpenAiClient::extract_content(raw)
}
