//! Section headers and project-variant tags.
//!
//! A header is one comment line centering a sheet title in `=` fill:
//!
//! ```text
//! ;==================== dio_g_DigIn_u8_DZC ====================
//! ```
//!
//! The variant tag (`DZC` above) is computed once, when the header is built,
//! and travels with it; the partitioner never re-reads rendered text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^;=+\s*(.+?)\s*=+").unwrap());

/// A 2–4 letter uppercase project-variant code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantTag(String);

impl VariantTag {
    /// Extract the tag from a section title.
    ///
    /// The title's last `_`-separated component is the tag when it is 2–4
    /// characters of uppercase ASCII letters. Titles without `_` never carry
    /// a tag.
    pub fn from_title(title: &str) -> Option<Self> {
        let (_, last) = title.trim().rsplit_once('_')?;
        let last = last.trim();
        let valid = (2..=4).contains(&last.len()) && last.bytes().all(|b| b.is_ascii_uppercase());
        valid.then(|| Self(last.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The banner line opening a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    title: String,
    tag: Option<VariantTag>,
    text: String,
}

impl SectionHeader {
    /// Build a header centering `title` in a `width`-character fill.
    ///
    /// When the fill cannot be split evenly the extra `=` goes to the right.
    pub fn new(title: &str, width: usize) -> Self {
        let title = title.trim();
        let padded = format!(" {title} ");
        let fill = width.saturating_sub(padded.chars().count());
        let left = fill / 2;
        let text = format!(";{}{}{}", "=".repeat(left), padded, "=".repeat(fill - left));
        Self {
            title: title.to_string(),
            tag: VariantTag::from_title(title),
            text,
        }
    }

    /// Recognize a header line read back from a listing.
    ///
    /// The original text is kept verbatim so re-rendering is lossless.
    pub fn parse(line: &str) -> Option<Self> {
        if !line.starts_with(";=") {
            return None;
        }
        let title = HEADER_RE
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();
        Some(Self {
            tag: VariantTag::from_title(&title),
            title,
            text: line.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The variant this section belongs to, or `None` for common sections.
    pub fn tag(&self) -> Option<&VariantTag> {
        self.tag.as_ref()
    }

    /// The rendered header line.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for SectionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
