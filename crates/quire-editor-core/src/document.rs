//! Core editor document trait and implementations.
//!
//! `EditorDocument` is the command interface an editing surface exposes to
//! code that edits on the user's behalf (the upload coordinator, mostly).
//! Storage and cursor state are left to the implementor; the editing
//! operations are provided on top.

use std::ops::Range;

use smol_str::SmolStr;
use web_time::Instant;

use crate::reference::MediaReference;
use crate::text::TextBuffer;
use crate::types::{CursorState, EditInfo};

/// Core trait for editor documents.
///
/// Every provided mutation records an [`EditInfo`] and bumps the revision,
/// which is how sessions detect that listeners need to hear about a change.
pub trait EditorDocument {
    /// The buffer type used for text storage.
    type Buffer: TextBuffer;

    // === Required: Buffer access ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    ///
    /// Edits made directly on the buffer bypass revision tracking.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    // === Required: Cursor ===

    fn cursor(&self) -> CursorState;

    fn set_cursor(&mut self, cursor: CursorState);

    // === Required: Edit tracking ===

    fn last_edit(&self) -> Option<EditInfo>;

    fn set_last_edit(&mut self, edit: Option<EditInfo>);

    /// Monotonic counter of applied mutations.
    fn revision(&self) -> u64;

    fn set_revision(&mut self, revision: u64);

    // === Provided: Convenience accessors ===

    fn cursor_offset(&self) -> usize {
        self.cursor().offset
    }

    /// Move the cursor, clamped to the document length.
    fn set_cursor_offset(&mut self, offset: usize) {
        let offset = offset.min(self.len_chars());
        self.set_cursor(CursorState::new(offset));
    }

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    fn len_bytes(&self) -> usize {
        self.buffer().len_bytes()
    }

    fn is_empty(&self) -> bool {
        self.buffer().len_chars() == 0
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer().char_at(offset)
    }

    /// Char range of the first exact occurrence of `needle`.
    fn find(&self, needle: &str) -> Option<Range<usize>> {
        self.buffer().find(needle)
    }

    // === Provided: Text operations ===

    /// Record an applied edit. No-op edits leave the revision alone.
    fn record_edit(&mut self, edit_char_pos: usize, inserted_len: usize, deleted_len: usize) -> EditInfo {
        let edit = EditInfo {
            edit_char_pos,
            inserted_len,
            deleted_len,
            doc_len_after: self.buffer().len_chars(),
            timestamp: Instant::now(),
        };
        if inserted_len > 0 || deleted_len > 0 {
            self.set_revision(self.revision() + 1);
            self.set_last_edit(Some(edit.clone()));
        }
        edit
    }

    /// Insert text at char offset; the cursor lands after it.
    fn insert(&mut self, offset: usize, text: &str) -> EditInfo {
        let offset = offset.min(self.len_chars());
        self.buffer_mut().insert(offset, text);

        let inserted_len = text.chars().count();
        let edit = self.record_edit(offset, inserted_len, 0);
        self.set_cursor_offset(offset + inserted_len);
        edit
    }

    /// Delete char range; the cursor lands at its start.
    fn delete(&mut self, range: Range<usize>) -> EditInfo {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        let deleted_len = range.end.saturating_sub(range.start);
        if deleted_len > 0 {
            self.buffer_mut().delete(range.clone());
        }

        let edit = self.record_edit(range.start, 0, deleted_len);
        self.set_cursor_offset(range.start);
        edit
    }

    /// Replace char range with text; the cursor lands after the new text.
    fn replace(&mut self, range: Range<usize>, text: &str) -> EditInfo {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        let deleted_len = range.end.saturating_sub(range.start);
        if deleted_len > 0 {
            self.buffer_mut().delete(range.clone());
        }
        self.buffer_mut().insert(range.start, text);

        let inserted_len = text.chars().count();
        let edit = self.record_edit(range.start, inserted_len, deleted_len);
        self.set_cursor_offset(range.start + inserted_len);
        edit
    }

    /// Insert text where the cursor is.
    fn insert_at_cursor(&mut self, text: &str) -> EditInfo {
        let offset = self.cursor_offset();
        self.insert(offset, text)
    }

    /// Replace the whole document.
    fn set_content(&mut self, text: &str) -> EditInfo {
        let len = self.len_chars();
        self.replace(0..len, text)
    }

    /// Replace a range without disturbing the user's cursor.
    ///
    /// The cursor is mapped through the edit instead of jumping to it.
    fn splice_preserving_cursor(&mut self, range: Range<usize>, text: &str) -> EditInfo {
        let cursor = self.cursor_offset();
        let edit = self.replace(range, text);
        self.set_cursor_offset(edit.map_offset(cursor));
        edit
    }

    /// Remove the first exact occurrence of `needle`.
    ///
    /// Returns the char offset it was removed from. Absent text is a no-op.
    fn remove_first(&mut self, needle: &str) -> Option<usize> {
        let range = self.find(needle)?;
        let start = range.start;
        self.splice_preserving_cursor(range, "");
        Some(start)
    }

    /// Embed an uploaded media reference at `offset` as markdown image syntax.
    fn insert_reference(&mut self, offset: usize, reference: &MediaReference) -> EditInfo {
        let offset = offset.min(self.len_chars());
        self.splice_preserving_cursor(offset..offset, &reference.to_markdown())
    }
}

/// Simple field-based implementation of EditorDocument.
#[derive(Clone, Default)]
pub struct PlainEditor<T: TextBuffer> {
    buffer: T,
    cursor: CursorState,
    last_edit: Option<EditInfo>,
    revision: u64,
}

impl<T: TextBuffer> PlainEditor<T> {
    /// Create a new editor with the given buffer. The cursor starts at the end.
    pub fn new(buffer: T) -> Self {
        let cursor = CursorState::new(buffer.len_chars());
        Self {
            buffer,
            cursor,
            last_edit: None,
            revision: 0,
        }
    }

    /// Get direct access to the inner buffer (bypasses trait).
    pub fn inner(&self) -> &T {
        &self.buffer
    }

    /// Consume the editor, returning its buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<T: TextBuffer> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &Self::Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Self::Buffer {
        &mut self.buffer
    }

    fn cursor(&self) -> CursorState {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: CursorState) {
        self.cursor = cursor;
    }

    fn last_edit(&self) -> Option<EditInfo> {
        self.last_edit.clone()
    }

    fn set_last_edit(&mut self, edit: Option<EditInfo>) {
        self.last_edit = edit;
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorRope;

    type TestEditor = PlainEditor<EditorRope>;

    fn make_editor(content: &str) -> TestEditor {
        PlainEditor::new(EditorRope::from_str(content))
    }

    #[test]
    fn test_basic_insert() {
        let mut editor = make_editor("hello");
        assert_eq!(editor.cursor_offset(), 5);

        let edit = editor.insert(5, " world");
        assert_eq!(editor.content_string(), "hello world");
        assert_eq!(edit.inserted_len, 6);
        assert_eq!(editor.cursor_offset(), 11);
        assert_eq!(editor.revision(), 1);
    }

    #[test]
    fn test_delete() {
        let mut editor = make_editor("hello world");

        let edit = editor.delete(5..11);
        assert_eq!(editor.content_string(), "hello");
        assert_eq!(edit.deleted_len, 6);
        assert_eq!(editor.cursor_offset(), 5);
    }

    #[test]
    fn test_noop_edits_keep_revision() {
        let mut editor = make_editor("hello");
        editor.insert(2, "");
        editor.delete(3..3);
        assert_eq!(editor.revision(), 0);
        assert!(editor.last_edit().is_none());
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut editor = make_editor("ab");
        editor.set_cursor_offset(1);
        editor.insert_at_cursor("X");
        assert_eq!(editor.content_string(), "aXb");
        assert_eq!(editor.cursor_offset(), 2);
    }

    #[test]
    fn test_set_content() {
        let mut editor = make_editor("old text");
        editor.set_content("new");
        assert_eq!(editor.content_string(), "new");
        assert_eq!(editor.cursor_offset(), 3);
    }

    #[test]
    fn test_remove_first_only_touches_first_match() {
        let mut editor = make_editor("a [x] b [x] c");
        assert_eq!(editor.remove_first("[x]"), Some(2));
        assert_eq!(editor.content_string(), "a  b [x] c");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut editor = make_editor("nothing to see");
        editor.set_cursor_offset(4);
        assert_eq!(editor.remove_first("[x]"), None);
        assert_eq!(editor.content_string(), "nothing to see");
        assert_eq!(editor.cursor_offset(), 4);
        assert_eq!(editor.revision(), 0);
    }

    #[test]
    fn test_remove_keeps_cursor_in_place() {
        let mut editor = make_editor("[x]hello");
        editor.set_cursor_offset(8);
        editor.remove_first("[x]");
        assert_eq!(editor.cursor_offset(), 5);

        let mut editor = make_editor("hello[x]");
        editor.set_cursor_offset(2);
        editor.remove_first("[x]");
        assert_eq!(editor.cursor_offset(), 2);
    }

    #[test]
    fn test_insert_reference() {
        let mut editor = make_editor("before  after");
        editor.set_cursor_offset(0);
        let reference = MediaReference::new("https://cdn.example.com/abc123.png", "cat.png");
        editor.insert_reference(7, &reference);
        assert_eq!(
            editor.content_string(),
            "before ![cat.png](https://cdn.example.com/abc123.png) after"
        );
        assert_eq!(editor.cursor_offset(), 0);
    }
}
