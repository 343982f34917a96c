//! Configuration listings.
//!
//! A listing is the line-oriented text consumed by the test executor. It is
//! made of sections, one per workbook sheet, each opened by a header comment:
//!
//! ```text
//! ;========================== Master ==========================
//! wo32 main_c_SymMaster_u32         0x20000000
//! ;======================= Symbol Tables ======================
//! wo32 main_c_SymTabStd_u32         $$$$(main_c_SymMaster_u32 +  8.)
//! ;================= dio_g_DigIn_u8_DZC =======================
//! by   DIG_IN_01                    dio_g_DigIn_u8_DZC +  0x0
//! ```
//!
//! Data lines are kept as rendered text; [`Record`] is the structured form
//! used while generating them.

mod cell;
mod header;
mod record;

pub use cell::{
    format_decimal, format_hex, normalize_address, normalize_symbol, parse_decimal, parse_hex,
    parse_size, Offset, Radix,
};
pub use header::{SectionHeader, VariantTag};
pub use record::{Expr, Op, Record};

use std::path::Path;

use crate::error::{HwtpError, Result};

/// A header and the data lines following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: SectionHeader,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(header: SectionHeader) -> Self {
        Self {
            header,
            lines: Vec::new(),
        }
    }

    /// Variant tag of this section, `None` when common to every variant.
    pub fn tag(&self) -> Option<&VariantTag> {
        self.header.tag()
    }

    /// Number of data lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The header line followed by the data lines.
    pub fn all_lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.text()).chain(self.lines.iter().map(String::as_str))
    }
}

/// An ordered sequence of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub sections: Vec<Section>,
}

impl Listing {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Parse listing text back into sections.
    ///
    /// Lines before the first header belong to no section and are dropped.
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut orphans = 0usize;

        for line in text.lines() {
            if let Some(header) = SectionHeader::parse(line) {
                sections.push(Section::new(header));
            } else if let Some(section) = sections.last_mut() {
                section.lines.push(line.to_string());
            } else {
                orphans += 1;
            }
        }

        if orphans > 0 {
            tracing::debug!(lines = orphans, "dropped lines before first section header");
        }
        Self { sections }
    }

    /// Read and parse a listing file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HwtpError::file_read(path, e))?;
        Ok(Self::parse(&text))
    }

    /// All lines in order, headers included.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().flat_map(Section::all_lines)
    }

    /// Render as text: lines joined by `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in self.lines() {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "\
;==== Master ====
wo32 m 0x10
;==== dio_g_DigIn_u8_DZC ====
by   DIG_IN_01 m +  0x0

;==== pio_g_FreqIn_s_MAN ====
";

    #[test]
    fn test_parse_sections() {
        let listing = Listing::parse(TEXT);
        assert_eq!(listing.sections.len(), 3);
        assert_eq!(listing.sections[0].lines, vec!["wo32 m 0x10"]);
        assert!(listing.sections[0].tag().is_none());
        assert_eq!(listing.sections[1].tag().unwrap().as_str(), "DZC");
        assert_eq!(listing.sections[1].len(), 2);
        assert!(listing.sections[2].is_empty());
    }

    #[test]
    fn test_text_round_trip() {
        let listing = Listing::parse(TEXT);
        assert_eq!(listing.to_text(), TEXT);
    }

    #[test]
    fn test_orphan_lines_dropped() {
        let listing = Listing::parse("wo32 stray 0x1\n;== A ==\nwo32 a 0x2\n");
        assert_eq!(listing.sections.len(), 1);
        assert_eq!(listing.lines().collect::<Vec<_>>(), vec![";== A ==", "wo32 a 0x2"]);
    }

    #[test]
    fn test_empty_listing() {
        let listing = Listing::parse("");
        assert!(listing.sections.is_empty());
        assert_eq!(listing.to_text(), "");
    }
}
