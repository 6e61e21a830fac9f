//! Blog posts: the write payload, the detail and list views, and listing filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;
use validator::Validate;

use crate::media::MediaFile;
use crate::user::{Tag, User};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

/// Payload for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WritePostData {
    #[validate(length(min = 1, max = 100, message = "title must be between 1 and 100 characters"))]
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "summary must be at most 200 characters"))]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_files: Option<Vec<MediaFile>>,
}

/// Full post as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user: User,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub status: PostStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::option"
    )]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub content: String,
    pub view_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_files: Option<Vec<MediaFile>>,
}

/// Condensed post used in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub user: User,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::timestamp::option"
    )]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
    pub view_count: u64,
}

impl From<&Post> for PostListItem {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            summary: post.summary.clone(),
            thumbnail: post.thumbnail.clone(),
            user: post.user.clone(),
            published_at: post.published_at,
            tags: post.tags.clone(),
            view_count: post.view_count,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// The page to request next, if the server says there is one.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then(|| self.page + 1)
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first.
    #[default]
    Latest,
    /// Most viewed first.
    Popular,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popular => "popular",
        }
    }
}

/// Filtering and ordering options for post listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl PostFilters {
    /// Render the set filters as query parameters. Unset filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(tag) = &self.tag {
            query.push(("tag", tag.to_string()));
        }
        if let Some(username) = &self.username {
            query.push(("username", username.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            query.push(("sortBy", sort_by.as_str().to_string()));
        }
        query
    }
}

/// Table-of-contents entry for a rendered post. `level` is the heading depth (h1 = 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub id: SmolStr,
    pub text: String,
    pub level: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "id": "3e9d1c7a-5b2f-4a6e-8d0c-9f1b2a3c4d5e",
        "user": { "id": "6f1c2a4e-9b3d-4c8e-a1f0-2d7b5e9c3a10", "username": "mina" },
        "title": "Hello",
        "status": "PUBLISHED",
        "publishedAt": "2024-05-03T08:00:00Z",
        "createdAt": "2024-05-02T10:15:30",
        "updatedAt": "2024-05-03T08:00:00Z",
        "tags": [{ "id": "0b6f3c1e-2a4d-4f7e-9c8b-1d2e3f4a5b6c", "name": "rust" }],
        "content": "![cat.png](https://cdn.example.com/abc123.png)",
        "viewCount": 42
    }"#;

    #[test]
    fn test_post_from_backend_json() {
        let post: Post = serde_json::from_str(POST_JSON).unwrap();
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.user.username, "mina");
        assert_eq!(post.tags.len(), 1);
        assert_eq!(post.view_count, 42);
        assert!(post.summary.is_none());
        assert!(post.media_files.is_none());
        assert!(post.published_at.is_some());

        let item = PostListItem::from(&post);
        assert_eq!(item.id, post.id);
        assert_eq!(item.tags, post.tags);
    }

    #[test]
    fn test_write_post_validation() {
        let mut data = WritePostData {
            title: "A title".into(),
            content: "body".into(),
            ..Default::default()
        };
        assert!(data.validate().is_ok());

        data.title = String::new();
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        // Limits count characters, not bytes.
        data.title = "가".repeat(100);
        assert!(data.validate().is_ok());
        data.title.push('가');
        assert!(data.validate().is_err());

        data.title = "ok".into();
        data.summary = Some("s".repeat(201));
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("summary"));
    }

    #[test]
    fn test_write_post_serializes_camel_case() {
        let data = WritePostData {
            title: "t".into(),
            content: "c".into(),
            tags: vec!["rust".into()],
            status: PostStatus::Draft,
            ..Default::default()
        };
        insta::assert_snapshot!(
            serde_json::to_string(&data).unwrap(),
            @r#"{"title":"t","content":"c","tags":["rust"],"status":"DRAFT"}"#
        );
    }

    #[test]
    fn test_filters_to_query() {
        assert!(PostFilters::default().to_query().is_empty());

        let filters = PostFilters {
            tag: Some("rust".into()),
            status: Some(PostStatus::Published),
            sort_by: Some(SortBy::Popular),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("tag", "rust".to_string()),
                ("status", "PUBLISHED".to_string()),
                ("sortBy", "popular".to_string()),
            ]
        );
    }

    #[test]
    fn test_next_page() {
        let page: PaginatedResponse<PostListItem> = serde_json::from_str(
            r#"{ "items": [], "total": 25, "page": 1, "pageSize": 10, "hasMore": true }"#,
        )
        .unwrap();
        assert_eq!(page.next_page(), Some(2));

        let last = PaginatedResponse::<PostListItem> {
            has_more: false,
            ..page
        };
        assert_eq!(last.next_page(), None);
    }
}
