//! quire-editor-core: editor document model and the upload-on-edit workflow.
//!
//! This crate provides:
//! - `TextBuffer` trait for text storage, with the ropey-backed `EditorRope`
//! - `EditorDocument` - the command interface editing surfaces expose
//! - `SessionRegistry` / `DocumentSession` - open documents with liveness and change notification
//! - `UploadCoordinator` - placeholder, upload, and reconcile for attached files

pub mod document;
pub mod notify;
pub mod placeholder;
pub mod reference;
pub mod session;
pub mod text;
pub mod types;
pub mod upload;
pub mod uploader;

pub use document::{EditorDocument, PlainEditor};
pub use notify::UserNotifier;
pub use placeholder::{Placeholder, UploadId};
pub use quire_common::FileBlob;
pub use reference::MediaReference;
pub use session::{DocumentSession, Generation, SessionRegistry, WeakSession};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use types::{CursorState, EditInfo};
pub use upload::{DefaultAction, PendingUpload, UPLOAD_FAILED_MESSAGE, UploadCoordinator, UploadOutcome};
pub use uploader::{MediaUploader, UploadError};
