//! Typed error enum for upstream HTTP calls.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    /// The upstream rejected the forwarded session.
    #[error("session rejected by upstream")]
    Unauthorized,
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl UpstreamError {
    pub(crate) fn from_status(code: u16, body: String) -> Self {
        if matches!(code, 401 | 403) { Self::Unauthorized } else { Self::HttpStatus { code, body } }
    }
}
