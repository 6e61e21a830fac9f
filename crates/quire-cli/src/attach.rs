//! `quire attach`: embed images into a markdown file through the upload coordinator.

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result, WrapErr};
use quire_common::FileBlob;
use quire_editor_core::{
    EditorDocument, EditorRope, MediaUploader, PlainEditor, SessionRegistry, UploadCoordinator,
    UploadOutcome, UserNotifier,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttachSummary {
    pub inserted: usize,
    pub failed: usize,
    pub discarded: usize,
}

impl AttachSummary {
    fn record(&mut self, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Inserted(_) => self.inserted += 1,
            UploadOutcome::Failed { .. } => self.failed += 1,
            UploadOutcome::Discarded => self.discarded += 1,
        }
    }
}

/// Attach every image to the end of `markdown` and write the result back.
///
/// All images are read before anything is uploaded, so a missing file aborts
/// without touching the document. Uploads then run concurrently.
pub async fn attach_images<U: MediaUploader, N: UserNotifier>(
    coordinator: &UploadCoordinator<U, N>,
    markdown: &Path,
    images: &[PathBuf],
) -> Result<AttachSummary> {
    let blobs = images
        .iter()
        .map(|path| {
            FileBlob::from_path(path).wrap_err_with(|| format!("reading {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let text = tokio::fs::read_to_string(markdown)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", markdown.display()))?;

    let registry = SessionRegistry::new();
    let session = registry.open(PlainEditor::new(EditorRope::from_str(&text)));
    session.on_change(|text| tracing::trace!(len = text.len(), "document changed"));

    if !text.is_empty() && !text.ends_with('\n') {
        session.edit(|doc| doc.insert_at_cursor("\n"));
    }

    let pending: Vec<_> = blobs
        .into_iter()
        .map(|blob| {
            let pending = coordinator.begin(&session, blob);
            session.edit(|doc| doc.insert_at_cursor("\n"));
            pending
        })
        .collect();

    tracing::debug!(count = pending.len(), file = %markdown.display(), "uploads started");
    let outcomes =
        n0_future::join_all(pending.into_iter().map(|p| coordinator.finish(p))).await;

    let mut summary = AttachSummary::default();
    for outcome in &outcomes {
        summary.record(outcome);
    }

    let text = session.text();
    registry.close_current();
    tokio::fs::write(markdown, text)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("writing {}", markdown.display()))?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Utc;
    use quire_api::{ContentType, MediaFile};
    use quire_common::ApiError;
    use quire_editor_core::{UPLOAD_FAILED_MESSAGE, UploadError};
    use uuid::Uuid;

    use super::*;

    /// Stores every file under `stored-<name>`, except names starting with `bad`.
    struct FakeUploader;

    impl MediaUploader for FakeUploader {
        async fn upload(&self, files: Vec<FileBlob>) -> Result<Vec<MediaFile>, UploadError> {
            let blob = &files[0];
            if blob.name.starts_with("bad") {
                return Err(UploadError::Api(ApiError::from_body(500, "")));
            }
            let now = Utc::now();
            Ok(vec![MediaFile {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                user_id: Uuid::nil(),
                file_name: format!("stored-{}", blob.name),
                original_file_name: blob.name.to_string(),
                content_type: ContentType::ImagePng,
                size: blob.len() as u64,
            }])
        }
    }

    fn write(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_attach_writes_references_back() {
        let dir = tempfile::tempdir().unwrap();
        let markdown = write(dir.path(), "post.md", b"# Trip");
        let images = vec![
            write(dir.path(), "cat.png", b"\x89PNG\r\n\x1a\n"),
            write(dir.path(), "bad.png", b"\x89PNG\r\n\x1a\n"),
            write(dir.path(), "dog.png", b"\x89PNG\r\n\x1a\n"),
        ];
        let alerts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&alerts);
        let coordinator = UploadCoordinator::new(
            FakeUploader,
            move |message: &str| sink.borrow_mut().push(message.to_string()),
            "https://cdn.test",
        );

        let summary = attach_images(&coordinator, &markdown, &images).await.unwrap();

        assert_eq!(
            summary,
            AttachSummary {
                inserted: 2,
                failed: 1,
                discarded: 0
            }
        );
        assert_eq!(*alerts.borrow(), vec![UPLOAD_FAILED_MESSAGE.to_string()]);
        assert_eq!(
            std::fs::read_to_string(&markdown).unwrap(),
            "# Trip\n![cat.png](https://cdn.test/stored-cat.png)\n\n![dog.png](https://cdn.test/stored-dog.png)\n"
        );
    }

    #[tokio::test]
    async fn test_invisible_characters_in_document_survive() {
        let dir = tempfile::tempdir().unwrap();
        let original = "no\u{2060}break and zw\u{2060}\u{200B}sp\n";
        let markdown = write(dir.path(), "post.md", original.as_bytes());
        let images = vec![write(dir.path(), "cat.png", b"\x89PNG\r\n\x1a\n")];
        let coordinator = UploadCoordinator::new(FakeUploader, |_: &str| {}, "https://cdn.test");

        attach_images(&coordinator, &markdown, &images).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&markdown).unwrap(),
            format!("{original}![cat.png](https://cdn.test/stored-cat.png)\n")
        );
    }

    #[tokio::test]
    async fn test_missing_image_leaves_document_alone() {
        let dir = tempfile::tempdir().unwrap();
        let markdown = write(dir.path(), "post.md", b"untouched");
        let coordinator = UploadCoordinator::new(FakeUploader, |_: &str| {}, "https://cdn.test");

        let result =
            attach_images(&coordinator, &markdown, &[dir.path().join("missing.png")]).await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&markdown).unwrap(), "untouched");
    }
}
