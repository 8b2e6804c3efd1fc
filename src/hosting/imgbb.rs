// ImgBB image-hosting client
// API Reference: https://api.imgbb.com/
//
// A single multipart POST to /1/upload with the key and an expiration window
// as query parameters. The returned URL is public but short-lived, which is
// all the completion service needs to fetch the image once.

use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

use crate::types::{AppError, AppResult};

// Remote failure detail stays in the server log; clients get this message.
const UPLOAD_FAILED_MSG: &str = "Failed to upload image to hosting service";

#[derive(Clone)]
pub struct ImgbbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    expiration_secs: u64,
}

#[derive(Deserialize)]
struct ImgbbResponse {
    data: ImgbbData,
}

#[derive(Deserialize)]
struct ImgbbData {
    url: String,
}

impl ImgbbClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        expiration_secs: u64,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            expiration_secs,
        }
    }

    /// Upload the file at `path` and return its public URL.
    ///
    /// Any failure (transport, non-success status, unexpected body) maps to
    /// [`AppError::ImageHost`] and aborts the request pipeline; the caller
    /// still removes the scratch file.
    pub async fn upload(&self, path: &Path) -> AppResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Internal(format!("failed to read upload: {}", e)))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let form = multipart::Form::new().part("image", multipart::Part::bytes(bytes).file_name(filename));

        let url = format!("{}/1/upload", self.base_url);
        let expiration = self.expiration_secs.to_string();

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str()), ("expiration", expiration.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Exception uploading to ImgBB: {}", e);
                AppError::ImageHost(UPLOAD_FAILED_MSG.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Error uploading to ImgBB ({}): {}", status, body);
            return Err(AppError::ImageHost(UPLOAD_FAILED_MSG.to_string()));
        }

        let parsed: ImgbbResponse = response.json().await.map_err(|e| {
            error!("Unexpected ImgBB response body: {}", e);
            AppError::ImageHost(UPLOAD_FAILED_MSG.to_string())
        })?;

        info!("Image uploaded to ImgBB: {}", parsed.data.url);
        Ok(parsed.data.url)
    }
}
