use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Local validation failure; raised before anything touches the network.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The exchange answered with a failure status and a JSON error body.
    #[error("API error {code}: {message} ({url})")]
    ApiError {
        code: i64,
        message: String,
        url: String,
    },

    /// Failure status with a body that is not JSON, usually an intermediary proxy.
    #[error("Transport error: {status} {status_text}: {body}")]
    TransportError {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The underlying HTTP stack failed (DNS, refused connection, timeout).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Status and headers arrived but the body could not be read.
    #[error("Failed to read response body ({status} {url}): {message}")]
    BodyReadError {
        status: u16,
        url: String,
        message: String,
    },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::ApiError { .. })
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError { .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::BodyReadError { .. })
    }

    /// Exchange error code, when the failure came from the exchange itself
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}
