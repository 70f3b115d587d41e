// src/errors.rs

use thiserror::Error;

pub type ReviewBotResult<T> = Result<T, ReviewBotError>;

#[derive(Debug, Error)]
pub enum ReviewBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl ReviewBotError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn attachment_error(msg: impl Into<String>) -> Self {
        Self::Attachment(msg.into())
    }

    pub fn terminal_error(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Status code for HTTP failures, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_reports_status() {
        let err = ReviewBotError::Http {
            status: 400,
            body: "Please provide a GitHub repository URL".to_string(),
        };
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_config_error_has_no_status() {
        let err = ReviewBotError::config_error("server_url is required");
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "Configuration error: server_url is required"
        );
    }
}
