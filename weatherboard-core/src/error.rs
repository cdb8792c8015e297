use reqwest::StatusCode;
use thiserror::Error;

/// Invalid city-count or city-list input. Always fatal for a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid number of cities '{0}': expected a positive integer")]
    InvalidCount(String),
    #[error("no city names given")]
    NoCities,
}

/// Why a single city produced no record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed")]
    Connect(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request failed")]
    Request(#[source] reqwest::Error),
}

impl FetchError {
    /// Short category name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "status",
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Malformed(_) => "malformed",
            FetchError::Request(_) => "request",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else if e.is_connect() {
            FetchError::Connect(e)
        } else {
            FetchError::Request(e)
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}
