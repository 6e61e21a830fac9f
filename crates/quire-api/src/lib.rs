//! quire-api: wire types shared between the quire editor and the blog backend.
//!
//! These types mirror the JSON the backend sends and accepts. They carry no
//! behaviour beyond serialization, field validation for writes, and a few
//! conversions (MIME types, query parameters).

pub mod media;
pub mod post;
pub mod user;

mod timestamp;

pub use media::{ContentType, MediaErrorCode, MediaFile};
pub use post::{
    PaginatedResponse, Post, PostFilters, PostListItem, PostStatus, SortBy, TocItem, WritePostData,
};
pub use user::{Tag, User};
pub use validator::{Validate, ValidationErrors};
