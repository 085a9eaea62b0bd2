//! Error types for rs-siteclone.
//!
//! Only failures the caller has to act on surface as errors. Local failures
//! (one stylesheet, one generated section, a malformed code fence) are
//! absorbed inside the pipeline and never reach this type.

/// Error type for clone operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A network fetch failed before a response was received.
    #[error("fetch of {url} failed: {message}")]
    Fetch { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("fetch of {url} returned http {status}")]
    Http { url: String, status: u16 },

    /// The text-generation collaborator failed or answered with nothing usable.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map a `reqwest` failure for `url` into a fetch error.
    pub(crate) fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Http {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self::Fetch {
            url: url.to_string(),
            message,
        }
    }
}

/// Result type alias for clone operations.
pub type Result<T> = std::result::Result<T, Error>;
