//! Error types for quire

use miette::Diagnostic;
use quire_api::{MediaErrorCode, ValidationErrors};

/// Main error type for quire operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum QuireError {
    /// Transport-level HTTP failure (connect, timeout, TLS, body read)
    #[error("http request failed: {0}")]
    #[diagnostic(code(quire::http))]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    /// Response body did not match the expected shape
    #[error("invalid response body: {0}")]
    #[diagnostic(code(quire::json))]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error(transparent)]
    #[diagnostic(code(quire::io))]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or written
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(quire::config), help("config files must end in .json or .toml"))]
    Config(String),

    /// A write payload failed local validation
    #[error("invalid post: {0}")]
    #[diagnostic(code(quire::validation))]
    Validation(#[from] ValidationErrors),
}

/// Error reported by the backend in a non-2xx response.
///
/// The backend sends `{ "code": "MF0004", "message": "..." }`; both fields are
/// optional here since proxies and crashes produce other bodies.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
#[diagnostic(code(quire::api))]
pub struct ApiError {
    pub status: u16,
    pub code: Option<MediaErrorCode>,
    pub message: Option<String>,
}

#[derive(serde::Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<MediaErrorCode>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Build from a status and raw response body. Undecodable bodies yield no code or message.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        Self {
            status,
            code: parsed.code,
            message: parsed.message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Best message to show a person: the server's own, else the code's description.
    pub fn user_message(&self) -> Option<String> {
        self.message.clone().or_else(|| {
            self.code
                .as_ref()
                .and_then(|c| c.description())
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let err = ApiError::from_body(400, r#"{"code":"MF0004","message":"file too large"}"#);
        assert_eq!(err.status, 400);
        assert_eq!(err.code, Some(MediaErrorCode::InvalidFileFormat));
        assert_eq!(err.user_message().as_deref(), Some("file too large"));
        assert_eq!(err.to_string(), "server responded 400: file too large");
    }

    #[test]
    fn test_api_error_code_only() {
        let err = ApiError::from_body(500, r#"{"code":"MF0002"}"#);
        assert_eq!(
            err.user_message().as_deref(),
            Some("The file could not be stored.")
        );
    }

    #[test]
    fn test_api_error_unparseable_body() {
        let err = ApiError::from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.code, None);
        assert_eq!(err.message, None);
        assert_eq!(err.user_message(), None);
        assert_eq!(err.to_string(), "server responded 502: no message");
    }

    #[test]
    fn test_blank_message_is_dropped() {
        let err = ApiError::from_body(400, r#"{"message":"   "}"#);
        assert_eq!(err.message, None);
    }
}
