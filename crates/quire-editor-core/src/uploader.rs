//! The upload API, as seen by the editor.

use std::future::Future;

use miette::Diagnostic;
use quire_api::MediaFile;
use quire_common::{ApiClient, ApiError, FileBlob, QuireError};

/// Accepts a batch of files and returns one stored-file descriptor per file.
pub trait MediaUploader {
    fn upload(&self, files: Vec<FileBlob>) -> impl Future<Output = Result<Vec<MediaFile>, UploadError>>;
}

impl MediaUploader for ApiClient {
    async fn upload(&self, files: Vec<FileBlob>) -> Result<Vec<MediaFile>, UploadError> {
        Ok(self.upload_media_files(&files).await?)
    }
}

/// Why an upload did not produce a stored file.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum UploadError {
    /// The request never got a response (network, timeout, TLS)
    #[error("{0}")]
    #[diagnostic(code(quire::upload::transport))]
    Transport(String),

    /// The server refused the file or failed to store it
    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    /// The server answered with something that wasn't a list of stored files
    #[error("unexpected response from upload service: {0}")]
    #[diagnostic(code(quire::upload::response))]
    InvalidResponse(String),

    /// The server accepted the request but stored nothing
    #[error("upload service returned no stored files")]
    #[diagnostic(code(quire::upload::empty))]
    EmptyResponse,

    #[error("upload failed")]
    #[diagnostic(code(quire::upload::unknown))]
    Unknown,
}

impl UploadError {
    /// Message worth showing a person, if the error carries one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Transport(message) => Some(message.clone()).filter(|m| !m.trim().is_empty()),
            Self::Api(err) => err.user_message(),
            Self::InvalidResponse(_) | Self::EmptyResponse | Self::Unknown => None,
        }
    }
}

impl From<QuireError> for UploadError {
    fn from(err: QuireError) -> Self {
        match err {
            QuireError::Http(e) => Self::Transport(e.to_string()),
            QuireError::Io(e) => Self::Transport(e.to_string()),
            QuireError::Api(e) => Self::Api(e),
            QuireError::Json(e) => Self::InvalidResponse(e.to_string()),
            QuireError::Config(_) | QuireError::Validation(_) => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = UploadError::from(ApiError::from_body(413, r#"{"message":"file too large"}"#));
        assert_eq!(err.user_message().as_deref(), Some("file too large"));

        let err = UploadError::from(ApiError::from_body(500, ""));
        assert_eq!(err.user_message(), None);

        let err = UploadError::Transport("connection refused".into());
        assert_eq!(err.user_message().as_deref(), Some("connection refused"));

        assert_eq!(UploadError::Unknown.user_message(), None);
        assert_eq!(UploadError::EmptyResponse.user_message(), None);
    }

    #[test]
    fn test_from_quire_error() {
        let err = UploadError::from(QuireError::Config("bad".into()));
        assert!(matches!(err, UploadError::Unknown));

        let json = serde_json_error();
        assert!(matches!(UploadError::from(QuireError::Json(json)), UploadError::InvalidResponse(_)));
    }

    fn serde_json_error() -> serde_json::Error {
        serde_json::from_str::<u8>("nope").unwrap_err()
    }
}
