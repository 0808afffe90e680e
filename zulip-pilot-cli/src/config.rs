use anyhow::{Context, Result};
use std::env;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Environment-derived configuration, loaded once per process and passed
/// down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub zulip_url: String,
    pub zulip_email: String,
    pub zulip_password: String,
    /// Absent key means the summarization stage is skipped.
    pub openai_api_key: Option<String>,
    pub webdriver_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // A .env file is optional; real environment variables win.
        dotenvy::dotenv().ok();

        Ok(Self {
            zulip_url: require("ZULIP_URL")?,
            zulip_email: require("ZULIP_EMAIL")?,
            zulip_password: require("ZULIP_PASSWORD")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            webdriver_url: env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
        })
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} environment variable not set"))
}
