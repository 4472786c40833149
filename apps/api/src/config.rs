use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{ApiKey, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::storage::{ReadPolicy, DEFAULT_DATA_PATH};

/// Application configuration loaded from environment variables.
///
/// Nothing is required: without `OPENAI_API_KEY` the service still starts and
/// extraction requests must carry their own key.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<ApiKey>,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub data_path: PathBuf,
    pub store_policy: ReadPolicy,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_strict = parse_or(&lookup, "STORE_STRICT", false)?;

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY").and_then(ApiKey::new),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?),
            data_path: lookup("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            store_policy: if store_strict {
                ReadPolicy::Strict
            } else {
                ReadPolicy::Lenient
            },
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        None => Ok(default),
    }
}
