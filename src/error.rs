use thiserror::Error;

/// Errors raised by digest generation and reconciliation
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Malformed timestamp '{input}': expected M:SS or H:MM:SS")]
    MalformedTimestamp { input: String },

    #[error("Invalid YouTube URL: {url}")]
    InvalidVideoUrl { url: String },

    #[error("Missing API key: {name} is not configured")]
    MissingApiKey { name: String },

    #[error("{0}")]
    Upstream(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DigestError {
    pub fn malformed(input: &str) -> Self {
        DigestError::MalformedTimestamp {
            input: input.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
