use thiserror::Error;

/// gocab error types
#[derive(Error, Debug)]
pub enum GocabError {
    /// Backend answered with a non-success HTTP status
    #[error("HTTP error! status: {status} ({url})")]
    Http { status: u16, url: String },

    /// Request never completed (DNS, TLS, timeout, connection reset)
    #[error("network error: {0}")]
    Network(String),

    /// Response body or envelope could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Session token store failure
    #[error("session error: {0}")]
    Session(String),

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GocabError {
    fn from(err: reqwest::Error) -> Self {
        GocabError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GocabError {
    fn from(err: serde_json::Error) -> Self {
        GocabError::Parse(err.to_string())
    }
}

/// Result type alias for gocab
pub type Result<T> = std::result::Result<T, GocabError>;
