//! Gateway error types
//!
//! Every failure of a remote call collapses into one of two kinds, both of
//! which carry the message shown to the user.

use thiserror::Error;

/// Errors returned by the account API gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Request could not be sent, or the response was not the expected JSON
    #[error("{0}")]
    Network(String),

    /// Server answered with a structured `{ "error": ... }` payload
    #[error("{0}")]
    Application(String),
}

impl GatewayError {
    /// Message to write into an error display region
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Network(message) | GatewayError::Application(message) => message,
        }
    }

    /// Whether the server itself rejected the request
    pub fn is_application(&self) -> bool {
        matches!(self, GatewayError::Application(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
