//! In-memory file handed over by an editing surface for upload.

use std::path::Path;

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use quire_api::ContentType;
use smol_str::SmolStr;

use crate::error::QuireError;

const OCTET_STREAM: &str = "application/octet-stream";

/// A named blob of file content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileBlob {
    /// File name as the user supplied it (used for placeholders and alt text)
    pub name: SmolStr,
    /// MIME type, sniffed from the bytes unless given explicitly
    pub mime_type: SmolStr,
    /// Raw file bytes
    pub data: Bytes,
}

impl FileBlob {
    /// Create a blob, sniffing the MIME type from its content.
    ///
    /// Falls back to the file extension, then `application/octet-stream`.
    pub fn new(name: impl Into<SmolStr>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let data = data.into();
        let mime_type = data
            .sniff_mime_type()
            .filter(|m| *m != OCTET_STREAM)
            .or_else(|| mime_from_extension(&name))
            .unwrap_or(OCTET_STREAM)
            .into();
        Self {
            name,
            mime_type,
            data,
        }
    }

    /// Override the sniffed MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<SmolStr>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Read a blob from disk, named after the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuireError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self::new(name, data))
    }

    /// Backend content type, if the MIME type is one it accepts.
    pub fn content_type(&self) -> Option<ContentType> {
        ContentType::from_mime(&self.mime_type)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "png" => ContentType::ImagePng,
        "jpg" | "jpeg" => ContentType::ImageJpeg,
        "gif" => ContentType::ImageGif,
        "mp4" => ContentType::VideoMp4,
        _ => return None,
    };
    Some(content_type.mime())
}
