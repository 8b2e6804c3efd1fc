use axum::{extract::State, routing::get, Json, Router};

use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Process status: whether each key is configured (length only, never the
/// value), the scratch directory, and how many files are resident there.
/// A non-zero count between requests points at leaked temporary files.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let keys = &state.config.keys;

    Json(HealthResponse {
        status: "healthy".to_string(),
        openai_api_key_configured: !keys.openai_api_key.is_empty(),
        openai_api_key_length: keys.openai_api_key.len(),
        imgbb_api_key_configured: !keys.imgbb_api_key.is_empty(),
        imgbb_api_key_length: keys.imgbb_api_key.len(),
        temp_dir: state.scratch.path().display().to_string(),
        temp_file_count: state.scratch.file_count(),
    })
}
