// crates/common/src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
    
    #[error("Timeout: {0}")]
    Timeout(String),
    
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    
    #[error("Configuration error: {0}")]
    Config(String),
    
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout(_) => true,
            Error::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
    
    /// Errors the user has to wait out rather than fix
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_retryable_classification() {
        assert!(Error::Timeout("markets".into()).is_retryable());
        assert!(Error::Upstream { status: 502, message: "bad gateway".into() }.is_retryable());
        assert!(!Error::Upstream { status: 404, message: "not found".into() }.is_retryable());
        assert!(!Error::RateLimit("wait".into()).is_retryable());
        assert!(Error::RateLimit("wait".into()).is_rate_limit());
    }
}
