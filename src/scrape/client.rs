//! `reqwest`-backed [`PageFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};

use super::PageFetcher;
use crate::encoding::decode_body;
use crate::error::{Error, Result};

const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024;
const USER_AGENT: &str = concat!("rs-siteclone/", env!("CARGO_PKG_VERSION"));
const ACCEPT_ANY_TEXT: &str = "text/html,application/xhtml+xml,text/css,*/*;q=0.8";

/// Fetches pages and stylesheets over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY_TEXT));

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

fn exceeds_body_cap(len: u64) -> bool {
    len > MAX_BODY_SIZE
}

fn body_too_large(url: &str, len: u64) -> Error {
    Error::Fetch {
        url: url.to_string(),
        message: format!("body too large: {len} bytes"),
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url)?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length() {
            if exceeds_body_cap(declared) {
                return Err(body_too_large(url, declared));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_reqwest(url, &e))?;
        if exceeds_body_cap(body.len() as u64) {
            return Err(body_too_large(url, body.len() as u64));
        }

        debug!(bytes = body.len(), content_type = ?content_type, "fetched");
        Ok(decode_body(&body, content_type.as_deref()))
    }
}
