use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::api_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Every variable is optional; only a malformed service URL fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the salary prediction service, without a trailing slash.
    pub api_base_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_base_url = std::env::var("PREDICTOR_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Config {
            api_base_url: normalize_base_url(&api_base_url)
                .context("PREDICTOR_API_URL must be an http(s) URL")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Validates an http(s) base URL and strips any trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid URL '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}'", url.scheme());
    }
    Ok(trimmed.to_string())
}
