use std::time::Duration;

use crate::config::Config;
use crate::hosting::ImgbbClient;
use crate::llm::OpenAiClient;
use crate::scratch::ScratchDir;

/// Shared application state: read-only configuration plus the two remote
/// clients, built once at startup. Cloning is cheap; the underlying
/// `reqwest::Client` is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub scratch: ScratchDir,
    pub hosting: ImgbbClient,
    pub completion: OpenAiClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();

        let scratch = ScratchDir::new(&config.scratch.dir);
        let hosting = ImgbbClient::new(
            http.clone(),
            config.services.imgbb_base_url.clone(),
            config.keys.imgbb_api_key.clone(),
            config.services.image_expiration_secs,
        );
        let completion = OpenAiClient::new(
            http,
            config.services.openai_base_url.clone(),
            config.keys.openai_api_key.clone(),
            Duration::from_secs(config.services.completion_timeout_secs),
        );

        Self {
            config,
            scratch,
            hosting,
            completion,
        }
    }
}

// API response types

#[derive(Debug, serde::Serialize)]
pub struct AnalyzeResponse {
    pub raw_response: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub openai_api_key_configured: bool,
    pub openai_api_key_length: usize,
    pub imgbb_api_key_configured: bool,
    pub imgbb_api_key_length: usize,
    pub temp_dir: String,
    pub temp_file_count: usize,
}
