//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait is the storage interface documents are built on.
//! `EditorRope` is the ropey-backed implementation used for local editing.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;
use web_time::Instant;

use crate::types::EditInfo;

/// A text buffer that supports efficient editing and offset conversion.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Append text at end.
    fn push(&mut self, text: &str) {
        self.insert(self.len_chars(), text);
    }

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Convert char offset to byte offset.
    fn char_to_byte(&self, char_offset: usize) -> usize;

    /// Convert byte offset to char offset.
    fn byte_to_char(&self, byte_offset: usize) -> usize;

    /// Get info about the last edit operation, if any.
    fn last_edit(&self) -> Option<EditInfo>;

    /// Char range of the first exact occurrence of `needle`.
    ///
    /// An empty needle never matches.
    fn find(&self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let text = self.to_string();
        let byte_start = text.find(needle)?;
        let start = self.byte_to_char(byte_start);
        Some(start..start + needle.chars().count())
    }

    /// Number of non-overlapping occurrences of `needle`.
    fn count_matches(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        self.to_string().matches(needle).count()
    }
}

/// Ropey-backed text buffer for local editing.
///
/// Provides O(log n) editing operations and offset conversions.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
    last_edit: Option<EditInfo>,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
            last_edit: None,
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }

    fn record(&mut self, edit_char_pos: usize, inserted_len: usize, deleted_len: usize) {
        self.last_edit = Some(EditInfo {
            edit_char_pos,
            inserted_len,
            deleted_len,
            doc_len_after: self.rope.len_chars(),
            timestamp: Instant::now(),
        });
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
        self.record(char_offset, text.chars().count(), 0);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        let len = self.rope.len_chars();
        let char_range = char_range.start.min(len)..char_range.end.min(len);
        if char_range.is_empty() {
            return;
        }
        let deleted_len = char_range.len();
        self.rope.remove(char_range.clone());
        self.record(char_range.start, 0, deleted_len);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.rope.char_to_byte(char_offset)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.rope.byte_to_char(byte_offset)
    }

    fn last_edit(&self) -> Option<EditInfo> {
        self.last_edit.clone()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);
        assert_eq!(rope.to_string(), "hello world");

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        // " beautiful" is 10 chars at positions 5..15
        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn test_out_of_range_edits_are_clamped() {
        let mut rope = EditorRope::from_str("abc");
        rope.insert(99, "d");
        assert_eq!(rope.to_string(), "abcd");
        rope.delete(2..99);
        assert_eq!(rope.to_string(), "ab");
        rope.delete(5..9);
        assert_eq!(rope.to_string(), "ab");
    }

    #[test]
    fn test_slice() {
        let rope = EditorRope::from_str("hello world");
        assert_eq!(rope.slice(0..5).as_deref(), Some("hello"));
        assert_eq!(rope.slice(6..11).as_deref(), Some("world"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_find_uses_char_offsets() {
        // "안녕 " is 3 chars but 7 bytes.
        let rope = EditorRope::from_str("안녕 ![cat](x) ![cat](x)");
        assert_eq!(rope.find("![cat](x)"), Some(3..12));
        assert_eq!(rope.count_matches("![cat](x)"), 2);
        assert_eq!(rope.find("![dog](x)"), None);
        assert_eq!(rope.find(""), None);
        assert_eq!(rope.count_matches(""), 0);
    }

    #[test]
    fn test_last_edit() {
        let mut rope = EditorRope::from_str("hello");
        assert!(rope.last_edit().is_none());

        rope.insert(5, "!!");
        let edit = rope.last_edit().unwrap();
        assert_eq!(edit.edit_char_pos, 5);
        assert_eq!(edit.inserted_len, 2);
        assert_eq!(edit.doc_len_after, 7);
    }

    #[test]
    fn test_replace() {
        let mut rope = EditorRope::from_str("hello world");
        rope.replace(6..11, "rust");
        assert_eq!(rope.to_string(), "hello rust");
    }
}
