use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub keys: KeysConfig,
    pub scratch: ScratchConfig,
    pub services: ServicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Credentials for the two remote services.
///
/// Both are read once at startup from plain-text key files and held for the
/// process lifetime. An absent or unreadable file leaves the key empty;
/// requests then fail with a configuration error instead of reaching the
/// remote services. There is deliberately no built-in fallback key.
#[derive(Clone)]
pub struct KeysConfig {
    pub openai_api_key: String,
    pub imgbb_api_key: String,
}

// Keys never appear in logs, only their lengths.
impl std::fmt::Debug for KeysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeysConfig")
            .field("openai_api_key_length", &self.openai_api_key.len())
            .field("imgbb_api_key_length", &self.imgbb_api_key.len())
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScratchConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    pub imgbb_base_url: String,
    pub openai_base_url: String,
    pub image_expiration_secs: u64,
    pub completion_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5006".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            keys: KeysConfig {
                openai_api_key: load_key_file(
                    "OpenAI",
                    env::var("OPENAI_API_KEY_FILE").unwrap_or_else(|_| "key.txt".to_string()),
                ),
                imgbb_api_key: load_key_file(
                    "ImgBB",
                    env::var("IMGBB_API_KEY_FILE").unwrap_or_else(|_| "image_api.txt".to_string()),
                ),
            },
            scratch: ScratchConfig {
                dir: PathBuf::from(
                    env::var("TEMP_DIR").unwrap_or_else(|_| "temp_files".to_string()),
                ),
            },
            services: ServicesConfig {
                imgbb_base_url: env::var("IMGBB_BASE_URL")
                    .unwrap_or_else(|_| "https://api.imgbb.com".to_string()),
                openai_base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com".to_string()),
                image_expiration_secs: env::var("IMGBB_EXPIRATION_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()?,
                completion_timeout_secs: env::var("OPENAI_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
        })
    }
}

/// Read a key file, trimming surrounding whitespace. Missing or unreadable
/// files yield an empty key; the affected requests report a configuration
/// error rather than the process refusing to start.
fn load_key_file(service: &str, path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let key = contents.trim().to_string();
            info!(
                "{} API key loaded from {} (length: {})",
                service,
                path.display(),
                key.len()
            );
            key
        }
        Err(e) => {
            warn!(
                "{} key file {} not readable ({}); key left unconfigured",
                service,
                path.display(),
                e
            );
            String::new()
        }
    }
}
