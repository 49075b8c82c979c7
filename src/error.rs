use std::fmt;

/// Error types that can occur when talking to the model provider.
#[derive(Debug)]
pub enum LLMError {
    /// Transport failures: connection refused, DNS, timeouts, body read errors
    HttpError(String),
    /// Missing credential or a credential rejected by the provider
    AuthError(String),
    /// The provider refused the request because of quota or rate limits
    RateLimitError(String),
    /// Invalid request parameters or configuration values
    InvalidRequest(String),
    /// Any other non-success status returned by the provider
    ProviderError {
        /// HTTP status code, when the error came from an HTTP response
        status: Option<u16>,
        message: String,
    },
    /// The provider answered but the reply could not be turned into text
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    JsonError(String),
}

impl LLMError {
    /// Returns true for errors caused by a missing or rejected credential.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LLMError::AuthError(_))
    }
}

impl fmt::Display for LLMError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMError::HttpError(e) => write!(f, "HTTP Error: {e}"),
            LLMError::AuthError(e) => write!(f, "Auth Error: {e}"),
            LLMError::RateLimitError(e) => write!(f, "Rate Limit Error: {e}"),
            LLMError::InvalidRequest(e) => write!(f, "Invalid Request: {e}"),
            LLMError::ProviderError {
                status: Some(status),
                message,
            } => write!(f, "Provider Error ({status}): {message}"),
            LLMError::ProviderError {
                status: None,
                message,
            } => write!(f, "Provider Error: {message}"),
            LLMError::ResponseFormatError {
                message,
                raw_response,
            } => write!(f, "Response Format Error: {message}. Raw response: {raw_response}"),
            LLMError::JsonError(e) => write!(f, "JSON Parse Error: {e}"),
        }
    }
}

impl std::error::Error for LLMError {}

/// Converts reqwest HTTP errors into LLMErrors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        LLMError::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_when_known() {
        let err = LLMError::ProviderError {
            status: Some(503),
            message: "service unavailable".into(),
        };
        assert_eq!(err.to_string(), "Provider Error (503): service unavailable");
    }

    #[test]
    fn only_auth_errors_report_auth_category() {
        assert!(LLMError::AuthError("no key".into()).is_auth_error());
        assert!(!LLMError::RateLimitError("slow down".into()).is_auth_error());
        assert!(!LLMError::HttpError("refused".into()).is_auth_error());
    }

    #[test]
    fn serde_errors_become_json_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(LLMError::from(err), LLMError::JsonError(_)));
    }
}
