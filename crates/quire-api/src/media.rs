//! Media file metadata and the error codes the media endpoints return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

/// Content type of a stored media file, as named by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    ImagePng,
    ImageJpeg,
    ImageGif,
    VideoMp4,
}

impl ContentType {
    /// Map a MIME type onto a supported content type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::ImagePng),
            "image/jpeg" | "image/jpg" => Some(Self::ImageJpeg),
            "image/gif" => Some(Self::ImageGif),
            "video/mp4" => Some(Self::VideoMp4),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageGif => "image/gif",
            Self::VideoMp4 => "video/mp4",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, Self::VideoMp4)
    }
}

/// A file stored by the media endpoint.
///
/// `file_name` is the generated storage key; `original_file_name` is what the
/// user uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: Uuid,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub file_name: String,
    pub original_file_name: String,
    pub content_type: ContentType,
    pub size: u64,
}

/// Error codes returned by the media upload endpoints.
///
/// Unknown codes are kept verbatim in `Other` so newer servers don't break
/// older clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaErrorCode {
    /// `MF0001`
    FileNotFound,
    /// `MF0002`
    StorageUploadFailed,
    /// `MF0004`
    InvalidFileFormat,
    /// `U0001`
    UnknownUser,
    /// `T0002`
    InvalidToken,
    Other(SmolStr),
}

impl MediaErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FileNotFound => "MF0001",
            Self::StorageUploadFailed => "MF0002",
            Self::InvalidFileFormat => "MF0004",
            Self::UnknownUser => "U0001",
            Self::InvalidToken => "T0002",
            Self::Other(code) => code.as_str(),
        }
    }

    /// HTTP status the backend pairs with this code.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::FileNotFound | Self::InvalidFileFormat => Some(400),
            Self::StorageUploadFailed => Some(500),
            Self::UnknownUser => Some(404),
            Self::InvalidToken => Some(401),
            Self::Other(_) => None,
        }
    }

    /// Human-readable description, used when the server sends a code but no message.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Self::FileNotFound => Some("The file could not be found."),
            Self::StorageUploadFailed => Some("The file could not be stored."),
            Self::InvalidFileFormat => Some("This file format is not supported."),
            Self::UnknownUser => Some("Unknown user."),
            Self::InvalidToken => Some("Your session has expired. Please sign in again."),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for MediaErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "MF0001" => Self::FileNotFound,
            "MF0002" => Self::StorageUploadFailed,
            "MF0004" => Self::InvalidFileFormat,
            "U0001" => Self::UnknownUser,
            "T0002" => Self::InvalidToken,
            other => Self::Other(other.into()),
        }
    }
}

impl From<String> for MediaErrorCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<MediaErrorCode> for String {
    fn from(code: MediaErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl std::fmt::Display for MediaErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA_JSON: &str = r#"{
        "id": "0b6f3c1e-2a4d-4f7e-9c8b-1d2e3f4a5b6c",
        "createdAt": "2024-05-02T10:15:30",
        "updatedAt": "2024-05-02T10:15:30Z",
        "userId": "6f1c2a4e-9b3d-4c8e-a1f0-2d7b5e9c3a10",
        "fileName": "abc123.png",
        "originalFileName": "cat.png",
        "contentType": "IMAGE_PNG",
        "size": 48213
    }"#;

    #[test]
    fn test_media_file_from_backend_json() {
        let file: MediaFile = serde_json::from_str(MEDIA_JSON).unwrap();
        assert_eq!(file.file_name, "abc123.png");
        assert_eq!(file.original_file_name, "cat.png");
        assert_eq!(file.content_type, ContentType::ImagePng);
        assert_eq!(file.size, 48213);
        // Naive and zoned timestamps land on the same instant.
        assert_eq!(file.created_at, file.updated_at);
    }

    #[test]
    fn test_content_type_mime_mapping() {
        assert_eq!(ContentType::from_mime("image/png"), Some(ContentType::ImagePng));
        assert_eq!(ContentType::from_mime("IMAGE/JPG"), Some(ContentType::ImageJpeg));
        assert_eq!(ContentType::from_mime("image/webp"), None);
        assert_eq!(ContentType::VideoMp4.mime(), "video/mp4");
        assert!(!ContentType::VideoMp4.is_image());
        assert!(ContentType::ImageGif.is_image());
    }

    #[test]
    fn test_content_type_wire_names() {
        insta::assert_snapshot!(
            serde_json::to_string(&ContentType::ImageJpeg).unwrap(),
            @r#""IMAGE_JPEG""#
        );
    }

    #[test]
    fn test_error_codes() {
        let code: MediaErrorCode = serde_json::from_str(r#""MF0004""#).unwrap();
        assert_eq!(code, MediaErrorCode::InvalidFileFormat);
        assert_eq!(code.http_status(), Some(400));

        let code: MediaErrorCode = serde_json::from_str(r#""Z9999""#).unwrap();
        assert_eq!(code, MediaErrorCode::Other("Z9999".into()));
        assert_eq!(code.http_status(), None);
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""Z9999""#);
    }
}
