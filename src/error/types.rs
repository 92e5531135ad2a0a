//! Core error types

use thiserror::Error;

/// Infrastructure failure while moderating an image.
///
/// None of these variants carries a verdict: a caller that receives one must
/// not treat the upload as appropriate.
#[derive(Debug, Clone, Error)]
pub enum ModerationError {
    /// Transport-level failure (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success status from the moderation service
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Rejected credentials or signature
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Throttled by the service
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// The request (usually the image) was refused before or by the service
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Required credential could not be resolved from arguments, settings or environment
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Incident persistence failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ModerationError {
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status associated with the error, when there is one.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            _ => None,
        }
    }

    pub const fn is_client_error(&self) -> bool {
        match self.status_code() {
            Some(code) => code >= 400 && code < 500,
            None => matches!(self, Self::InvalidInput(_)),
        }
    }

    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationError(_) | Self::MissingCredentials(_)
        )
    }
}

/// Outcome of validating an upload that did not pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The image violated the moderation policy; carries the user-facing message.
    #[error("{0}")]
    Rejected(String),

    /// Moderation could not be performed or the incident could not be stored.
    #[error(transparent)]
    Moderation(#[from] ModerationError),
}

impl ValidationError {
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reports_status() {
        let err = ModerationError::api_error(404, "Not found");
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "API error 404: Not found");
    }

    #[test]
    fn server_errors_are_not_client_errors() {
        let err = ModerationError::api_error(503, "unavailable");
        assert!(!err.is_client_error());
        assert!(!ModerationError::HttpError("timeout".into()).is_client_error());
    }

    #[test]
    fn invalid_input_counts_as_client_error() {
        assert!(ModerationError::InvalidInput("empty".into()).is_client_error());
    }

    #[test]
    fn auth_errors() {
        assert!(ModerationError::AuthenticationError("bad sig".into()).is_auth_error());
        assert!(ModerationError::MissingCredentials("AWS_SECRET_KEY".into()).is_auth_error());
        assert!(!ModerationError::RateLimitError("slow down".into()).is_auth_error());
    }

    #[test]
    fn rejection_displays_message_only() {
        let err = ValidationError::Rejected("not suitable".into());
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "not suitable");

        let err: ValidationError = ModerationError::HttpError("reset".into()).into();
        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "HTTP error: reset");
    }
}
