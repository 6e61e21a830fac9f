//! Upload-on-edit: turn an attached file into an embedded media reference.
//!
//! The editing surface hands a [`FileBlob`] to [`UploadCoordinator::begin`],
//! which synchronously drops a placeholder at the cursor. The returned
//! [`PendingUpload`] is then driven with [`UploadCoordinator::finish`]: the
//! file is uploaded, and the placeholder is swapped for the final reference
//! or removed with an alert. Nothing escapes as an error; the caller only
//! sees an [`UploadOutcome`].
//!
//! Pending uploads hold a weak handle to their session. If the session was
//! closed or replaced while the upload ran, the result is dropped without
//! touching any document.

use std::future::Future;

use quire_api::MediaFile;
use quire_common::{Config, FileBlob};
use smol_str::SmolStr;
use web_time::Instant;

use crate::document::EditorDocument;
use crate::notify::UserNotifier;
use crate::placeholder::{Placeholder, UploadId};
use crate::reference::MediaReference;
use crate::session::{DocumentSession, Generation, WeakSession};
use crate::uploader::{MediaUploader, UploadError};

/// Alert text for failures that carry no message of their own.
pub const UPLOAD_FAILED_MESSAGE: &str = "Image upload failed.";

/// What the editing surface should do with the event it handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    /// Let the surface run its own paste/drop handling.
    Allow,
    /// The coordinator owns insertion; skip default handling.
    Prevent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The placeholder was replaced by this reference.
    Inserted(MediaReference),
    /// The placeholder was removed and the user was shown `message`.
    Failed { message: String },
    /// The session went away before the upload finished; nothing was applied.
    Discarded,
}

/// An upload whose placeholder is in the document but whose file is not yet stored.
#[must_use = "a pending upload does nothing until passed to UploadCoordinator::finish"]
pub struct PendingUpload<D> {
    placeholder: Placeholder,
    blob: FileBlob,
    session: WeakSession<D>,
    generation: Generation,
    started: Instant,
}

impl<D> PendingUpload<D> {
    pub fn id(&self) -> UploadId {
        self.placeholder.id()
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Always [`DefaultAction::Prevent`]: insertion is handled here, never by the surface.
    pub fn default_action(&self) -> DefaultAction {
        DefaultAction::Prevent
    }
}

pub struct UploadCoordinator<U, N> {
    uploader: U,
    notifier: N,
    storage_base_url: String,
}

impl<U: MediaUploader, N: UserNotifier> UploadCoordinator<U, N> {
    /// `storage_base_url` is joined with each stored file name to build its public URL.
    pub fn new(uploader: U, notifier: N, storage_base_url: impl Into<String>) -> Self {
        Self {
            uploader,
            notifier,
            storage_base_url: storage_base_url.into(),
        }
    }

    pub fn from_config(uploader: U, notifier: N, config: &Config) -> Self {
        Self::new(uploader, notifier, config.storage_base_url.clone())
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    /// Insert the placeholder for `blob` at the cursor and return the pending upload.
    ///
    /// Runs synchronously; the placeholder is in the document when this returns.
    pub fn begin<D: EditorDocument>(
        &self,
        session: &DocumentSession<D>,
        blob: FileBlob,
    ) -> PendingUpload<D> {
        let placeholder = Placeholder::new(UploadId::next(), blob.name.clone());
        session.edit(|doc| doc.insert_at_cursor(placeholder.marker()));

        tracing::debug!(
            upload = %placeholder.id(),
            file = %blob.name,
            size = blob.len(),
            generation = %session.generation(),
            "placeholder inserted, upload starting"
        );
        metrics::counter!("quire_uploads_started_total").increment(1);

        PendingUpload {
            placeholder,
            blob,
            session: session.downgrade(),
            generation: session.generation(),
            started: Instant::now(),
        }
    }

    /// Upload the file and reconcile the document it was attached to.
    pub async fn finish<D: EditorDocument>(&self, pending: PendingUpload<D>) -> UploadOutcome {
        let PendingUpload {
            placeholder,
            blob,
            session,
            generation,
            started,
        } = pending;
        let label = blob.name.clone();

        let result = self
            .uploader
            .upload(vec![blob])
            .await
            .and_then(|files| files.into_iter().next().ok_or(UploadError::EmptyResponse));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let Some(session) = session.upgrade() else {
            tracing::debug!(
                upload = %placeholder.id(),
                %generation,
                elapsed_ms,
                "session closed before upload finished, discarding result"
            );
            record_outcome("discarded");
            return UploadOutcome::Discarded;
        };

        match result {
            Ok(file) => self.apply_success(&session, &placeholder, &file, label, elapsed_ms),
            Err(err) => self.apply_failure(&session, &placeholder, err, elapsed_ms),
        }
    }

    /// Placeholder, upload, and reconcile in one go.
    ///
    /// The placeholder is inserted before this returns; the future covers the rest.
    pub fn attach<'a, D: EditorDocument + 'a>(
        &'a self,
        session: &DocumentSession<D>,
        blob: FileBlob,
    ) -> impl Future<Output = UploadOutcome> + use<'a, U, N, D> {
        let pending = self.begin(session, blob);
        self.finish(pending)
    }

    /// Public URL for a stored file name.
    pub fn storage_url_for(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.storage_base_url.trim_end_matches('/'),
            file_name.trim_start_matches('/')
        )
    }

    fn apply_success<D: EditorDocument>(
        &self,
        session: &DocumentSession<D>,
        placeholder: &Placeholder,
        file: &MediaFile,
        label: SmolStr,
        elapsed_ms: u64,
    ) -> UploadOutcome {
        let reference = MediaReference::new(self.storage_url_for(&file.file_name), label);
        session.edit(|doc| {
            // If the user deleted the placeholder, the reference goes at the cursor.
            let at = doc
                .remove_first(placeholder.marker())
                .unwrap_or_else(|| doc.cursor_offset());
            doc.insert_reference(at, &reference);
        });

        tracing::debug!(
            upload = %placeholder.id(),
            stored = %file.file_name,
            elapsed_ms,
            "upload complete, reference inserted"
        );
        record_outcome("inserted");
        UploadOutcome::Inserted(reference)
    }

    fn apply_failure<D: EditorDocument>(
        &self,
        session: &DocumentSession<D>,
        placeholder: &Placeholder,
        err: UploadError,
        elapsed_ms: u64,
    ) -> UploadOutcome {
        tracing::warn!(
            upload = %placeholder.id(),
            file = %placeholder.file_name(),
            error = %err,
            elapsed_ms,
            "image upload failed"
        );
        session.edit(|doc| doc.remove_first(placeholder.marker()));

        let message = err
            .user_message()
            .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
        self.notifier.alert(&message);
        record_outcome("failed");
        UploadOutcome::Failed { message }
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("quire_uploads_total", "outcome" => outcome).increment(1);
}
