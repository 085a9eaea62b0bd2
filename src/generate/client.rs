//! HTTP client for a messages-style text-generation API.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{truncate_chars, Generator};
use crate::error::{Error, Result};

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_API_URL: &str = "SITECLONE_API_URL";
pub const ENV_MODEL: &str = "SITECLONE_MODEL";
pub const ENV_MAX_TOKENS: &str = "SITECLONE_MAX_TOKENS";

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.1;
const API_VERSION: &str = "2023-06-01";

/// Connection settings for [`MessagesClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Default settings with the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(120),
        }
    }

    /// Load from environment variables. Only the API key is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the key is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            config.model = model;
        }
        if let Some(raw) = lookup(ENV_MAX_TOKENS) {
            config.max_tokens = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_MAX_TOKENS} is not a number: {raw}")))?;
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect()
    }
}

/// [`Generator`] backed by a messages API over HTTPS.
#[derive(Debug, Clone)]
pub struct MessagesClient {
    http: Client,
    config: ClientConfig,
}

impl MessagesClient {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Generator for MessagesClient {
    #[instrument(skip_all, fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Generation("request timed out".to_string())
                } else {
                    Error::Generation(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "api returned {status}: {}",
                truncate_chars(&detail, 200)
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("malformed response: {e}")))?;
        let text = parsed.into_text();
        if text.trim().is_empty() {
            return Err(Error::Generation("empty response".to_string()));
        }

        debug!(response_len = text.len(), "generation complete");
        Ok(text)
    }
}
