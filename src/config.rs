use std::net::SocketAddr;

use anyhow::{Context, bail};

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub max_upload_bytes: usize,
    pub openai: OpenAiConfig,
}

/// Connection details for the Azure OpenAI chat deployment used to generate
/// reviews and tweets.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://marquee.db?mode=rwc".to_string());

        let database_max_connections: u32 =
            var("DATABASE_MAX_CONNECTIONS").and_then(|s| s.parse().ok()).unwrap_or(5);

        let max_upload_bytes: usize =
            var("MAX_UPLOAD_BYTES").and_then(|s| s.parse().ok()).unwrap_or(5 * 1024 * 1024);

        let endpoint = required(&var, "OPENAI_ENDPOINT")?;
        url::Url::parse(&endpoint).context("OPENAI_ENDPOINT is not a valid URL")?;
        let api_key = required(&var, "OPENAI_API_KEY")?;

        let deployment = var("OPENAI_DEPLOYMENT").unwrap_or_else(|| "gpt-4.1-nano".to_string());
        let api_version =
            var("OPENAI_API_VERSION").unwrap_or_else(|| "2024-10-21".to_string());
        let timeout_secs: u64 =
            var("OPENAI_TIMEOUT_SECS").and_then(|s| s.parse().ok()).unwrap_or(30);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            database_max_connections,
            max_upload_bytes,
            openai: OpenAiConfig { endpoint, api_key, deployment, api_version, timeout_secs },
        })
    }
}

fn required(var: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    match var(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => bail!("{key} is not set; review and tweet generation cannot start without it"),
    }
}
