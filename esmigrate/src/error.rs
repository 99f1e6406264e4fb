use thiserror::Error;

/// A write against the indexing backend failed.
///
/// Variants record the cause; callers that only care whether the write
/// landed can treat every variant the same.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Authentication failed (status {status})")]
    Auth { status: u16 },

    #[error("Write rejected (status {status}): {error_type}: {reason}")]
    Rejected {
        status: u16,
        error_type: String,
        reason: String,
    },

    #[error("Client is closed")]
    Closed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported cluster URL (expected http or https): {0}")]
    UnsupportedUrl(String),
}
