// src/utils/error.rs
use thiserror::Error;

/// Failures talking to EDGAR. Never retried here.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("SEC rate limit likely exceeded (403 Forbidden), check User-Agent and request rate")]
    RateLimited,

    #[error("Resource not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("EDGAR request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed EDGAR response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for EdgarError {
    fn from(err: reqwest::Error) -> Self {
        EdgarError::Transport(TransportError::Network(err))
    }
}

impl EdgarError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        EdgarError::MalformedResponse(msg.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, EdgarError::Transport(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let err = EdgarError::from(TransportError::RateLimited);
        assert!(err.is_transport());
        assert!(err.to_string().contains("403"));

        let err = EdgarError::malformed("missing filings.recent.form");
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "Malformed EDGAR response: missing filings.recent.form"
        );
    }

    #[test]
    fn test_app_error_wraps_edgar_error() {
        let app: AppError = EdgarError::InvalidInput("bad cik".to_string()).into();
        assert!(matches!(app, AppError::Edgar(EdgarError::InvalidInput(_))));
    }
}
