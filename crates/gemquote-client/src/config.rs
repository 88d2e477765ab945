//! Client configuration from the environment

use std::time::Duration;

use anyhow::Context;
use gemquote_core::constants::DEFAULT_DAILY_SLOT_LIMIT;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Display-only daily capacity used for "slots left"
    pub daily_slot_limit: u32,
    /// No timeout unless configured
    pub http_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            daily_slot_limit: DEFAULT_DAILY_SLOT_LIMIT,
            http_timeout: None,
        }
    }
}

impl ClientConfig {
    /// `GEMQUOTE_API_URL`, `GEMQUOTE_DAILY_SLOT_LIMIT`, `GEMQUOTE_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("GEMQUOTE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let daily_slot_limit = match std::env::var("GEMQUOTE_DAILY_SLOT_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .context("GEMQUOTE_DAILY_SLOT_LIMIT must be a non-negative integer")?,
            Err(_) => DEFAULT_DAILY_SLOT_LIMIT,
        };

        let http_timeout = match std::env::var("GEMQUOTE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("GEMQUOTE_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            Err(_) => None,
        };

        Ok(ClientConfig {
            api_url,
            daily_slot_limit,
            http_timeout,
        })
    }
}
