//! Placeholder markers shown while an upload is in flight.
//!
//! A marker is the visible text `![Uploading <name>...]()` followed by an
//! invisible token: the upload id in binary, written with zero-width
//! characters between two word joiners. Two uploads of `cat.png` look the
//! same on screen but never match each other's marker.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smol_str::SmolStr;

static NEXT_UPLOAD_ID: AtomicU64 = AtomicU64::new(1);

const TOKEN_DELIMITER: char = '\u{2060}';
const ZERO_BIT: char = '\u{200B}';
const ONE_BIT: char = '\u{200C}';

/// Process-unique id for one upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(u64);

impl UploadId {
    pub fn next() -> Self {
        Self(NEXT_UPLOAD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    id: UploadId,
    file_name: SmolStr,
    marker: String,
}

impl Placeholder {
    pub fn new(id: UploadId, file_name: impl Into<SmolStr>) -> Self {
        let file_name = file_name.into();
        let mut marker = Self::visible_text(&file_name);
        marker.push_str(&encode_token(id.0));
        Self {
            id,
            file_name,
            marker,
        }
    }

    /// What the user sees while `file_name` uploads.
    pub fn visible_text(file_name: &str) -> String {
        format!("![Uploading {file_name}...]()")
    }

    pub fn id(&self) -> UploadId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Exact text inserted into the document, token included.
    pub fn marker(&self) -> &str {
        &self.marker
    }
}

fn encode_token(id: u64) -> String {
    let bits = 64 - id.leading_zeros().min(63) as usize;
    let mut token = String::with_capacity((bits + 2) * ZERO_BIT.len_utf8());
    token.push(TOKEN_DELIMITER);
    for shift in (0..bits).rev() {
        token.push(if (id >> shift) & 1 == 1 { ONE_BIT } else { ZERO_BIT });
    }
    token.push(TOKEN_DELIMITER);
    token
}
