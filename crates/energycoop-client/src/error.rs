// Error types for the Vensys client

/// Errors that can occur while talking to the Vensys API
#[derive(Debug, thiserror::Error)]
pub enum VensysError {
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
