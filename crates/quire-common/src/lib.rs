//! quire-common: configuration, errors, and the HTTP client for the blog backend.

pub mod blob;
pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::blob::FileBlob;
pub use crate::client::ApiClient;
pub use crate::config::{Config, FileStore, Loader, Saver};
pub use crate::error::{ApiError, QuireError};
pub use quire_api;
