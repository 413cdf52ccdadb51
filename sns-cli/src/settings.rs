use anyhow::{Result, anyhow};
use sns_client::DEFAULT_TOKEN_FILE;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub token_file: String,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_base_url = get_with_default("SNS_API_BASE_URL", DEFAULT_API_BASE_URL)?;
        let token_file = get_with_default("SNS_TOKEN_FILE", DEFAULT_TOKEN_FILE)?;
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url,
            token_file,
            log_level,
        })
    }
}

fn get_with_default(key: &str, default: &str) -> Result<String> {
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}
