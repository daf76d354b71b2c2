use thiserror::Error;

/// Failures surfaced by a OneNote gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to Microsoft Graph failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Microsoft Graph returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("token request failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
