use thiserror::Error;

/// shopmix error types
#[derive(Error, Debug)]
pub enum ShopmixError {
    /// Provider did not answer within the request timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Provider answered with a non-success HTTP status
    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse a provider payload
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration or request error
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ShopmixError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ShopmixError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            ShopmixError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ShopmixError::Parse(err.to_string())
        } else {
            ShopmixError::Network(err.to_string())
        }
    }
}

/// Result type alias for shopmix
pub type Result<T> = std::result::Result<T, ShopmixError>;
