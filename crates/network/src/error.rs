// crates/network/src/error.rs
//! Error types for network operations

use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur while talking to an upstream API
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl NetworkError {
    /// True when retrying through the relay might help: transport failures
    /// and upstream rejections, but not decode or caller errors.
    pub fn is_relay_eligible(&self) -> bool {
        matches!(self, NetworkError::Http(_) | NetworkError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = NetworkError::Status {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_relay_eligibility() {
        assert!(NetworkError::Status {
            status: 403,
            url: String::new()
        }
        .is_relay_eligible());
        assert!(!NetworkError::Decode("bad json".to_string()).is_relay_eligible());
        assert!(!NetworkError::InvalidUrl("x".to_string()).is_relay_eligible());
    }
}
