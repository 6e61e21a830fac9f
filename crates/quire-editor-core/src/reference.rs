//! References to uploaded media, as embedded in markdown.

use smol_str::SmolStr;

/// A stored media file the document can embed: where it lives and what to call it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaReference {
    pub url: String,
    /// Display label, used as the image alt text
    pub label: SmolStr,
}

impl MediaReference {
    pub fn new(url: impl Into<String>, label: impl Into<SmolStr>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }

    /// Markdown image syntax for this reference: `![label](url)`.
    pub fn to_markdown(&self) -> String {
        format!("![{}]({})", escape_label(&self.label), escape_destination(&self.url))
    }
}

fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// Spaces and parentheses would end an inline link destination early.
fn escape_destination(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reference() {
        let r = MediaReference::new("https://cdn.example.com/abc123.png", "cat.png");
        assert_eq!(r.to_markdown(), "![cat.png](https://cdn.example.com/abc123.png)");
    }

    #[test]
    fn test_awkward_names_are_escaped() {
        let r = MediaReference::new("https://cdn.example.com/my cat (1).png", "[draft] cat.png");
        assert_eq!(
            r.to_markdown(),
            r"![\[draft\] cat.png](https://cdn.example.com/my%20cat%20%281%29.png)"
        );
    }
}
