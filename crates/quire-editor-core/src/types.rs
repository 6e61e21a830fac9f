//! Core editor types: cursor and edit tracking.

use std::ops::Range;

use web_time::Instant;

/// Cursor state. The offset is in chars, NOT bytes.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    pub offset: usize,
}

impl CursorState {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }
}

/// Information about the most recent edit.
#[derive(Clone, Debug)]
pub struct EditInfo {
    /// Character offset where the edit occurred
    pub edit_char_pos: usize,
    /// Number of characters inserted
    pub inserted_len: usize,
    /// Number of characters deleted
    pub deleted_len: usize,
    /// Document length (in chars) after this edit was applied.
    pub doc_len_after: usize,
    /// When this edit occurred.
    pub timestamp: Instant,
}

impl PartialEq for EditInfo {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps are not meaningful for equality.
        self.edit_char_pos == other.edit_char_pos
            && self.inserted_len == other.inserted_len
            && self.deleted_len == other.deleted_len
            && self.doc_len_after == other.doc_len_after
    }
}

impl EditInfo {
    /// Check if this edit info is stale (doc has changed since this edit).
    pub fn is_stale(&self, current_doc_len: usize) -> bool {
        self.doc_len_after != current_doc_len
    }

    /// Range of text inserted by this edit (empty for pure deletions).
    pub fn affected_range(&self) -> Range<usize> {
        self.edit_char_pos..self.edit_char_pos + self.inserted_len
    }

    /// Map an offset taken before this edit to the equivalent offset after it.
    ///
    /// Offsets before the edit are unchanged, offsets inside the deleted span
    /// collapse to the end of the inserted text, and offsets at or after the
    /// end of the deleted span shift by the length difference.
    pub fn map_offset(&self, offset: usize) -> usize {
        let deleted_end = self.edit_char_pos + self.deleted_len;
        if offset < self.edit_char_pos {
            offset
        } else if offset >= deleted_end {
            offset - self.deleted_len + self.inserted_len
        } else {
            self.edit_char_pos + self.inserted_len
        }
    }
}
