//! HTTP client for the blog backend.
//!
//! Covers the media upload endpoint the editor depends on, plus the post
//! endpoints the CLI uses.

use quire_api::{
    MediaFile, PaginatedResponse, Post, PostFilters, PostListItem, Validate, WritePostData,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::blob::FileBlob;
use crate::config::Config;
use crate::error::{ApiError, QuireError};

/// Multipart field name the media endpoint reads files from.
const MEDIA_FIELD: &str = "files";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, QuireError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Upload a batch of files. The server answers with one descriptor per file, in order.
    pub async fn upload_media_files(&self, files: &[FileBlob]) -> Result<Vec<MediaFile>, QuireError> {
        tracing::debug!(count = files.len(), "uploading media files");
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.data.to_vec())
                .file_name(file.name.to_string())
                .mime_str(&file.mime_type)?;
            form = form.part(MEDIA_FIELD, part);
        }

        let request = self
            .authorize(self.client.post(self.url("/posts/media")))
            .multipart(form);
        let stored: Vec<MediaFile> = decode(request.send().await?).await?;
        tracing::debug!(stored = stored.len(), "media upload complete");
        Ok(stored)
    }

    pub async fn list_posts(
        &self,
        filters: &PostFilters,
        page: u32,
        page_size: u32,
    ) -> Result<PaginatedResponse<PostListItem>, QuireError> {
        let mut query = filters.to_query();
        query.push(("page", page.to_string()));
        query.push(("pageSize", page_size.to_string()));

        let request = self
            .authorize(self.client.get(self.url("/posts")))
            .query(&query);
        decode(request.send().await?).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, QuireError> {
        let request = self.authorize(self.client.get(self.url(&format!("/posts/{id}"))));
        decode(request.send().await?).await
    }

    /// Create a post. The payload is validated locally before anything is sent.
    pub async fn write_post(&self, data: &WritePostData) -> Result<Post, QuireError> {
        data.validate()?;
        let request = self
            .authorize(self.client.post(self.url("/posts")))
            .json(data);
        decode(request.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, QuireError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_body(status.as_u16(), &body);
        tracing::debug!(status = err.status, code = ?err.code, "api request rejected");
        return Err(err.into());
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
