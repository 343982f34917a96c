//! Audit log of skipped rows and sheets.
//!
//! Skips never abort a run and never leave a partial record in the listing;
//! they are collected here so a caller can show what was left out and why.

use std::fmt;

/// Why a row or sheet produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Sheet lacks a column its rule requires
    MissingColumns(Vec<&'static str>),
    /// Symbol-table sheet processed before a master symbol was known
    MissingMaster,
    /// Standard symbol table processed before its reference was known
    MissingStdSymtab,
    /// Row has content but no symbol, reference or address
    MissingField(&'static str),
    /// Offset cell could not be parsed in either convention
    UnparsableOffset(String),
    /// Symbol names itself as its base
    SelfReference,
    /// Base symbol not defined by any earlier row
    UndefinedBase(String),
    /// Field size is not positive, or neither 1, 2, 4 nor a multiple of 4
    UnsupportedSize(i64),
    /// A split word offset does not fit the offset range
    OffsetOverflow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns(cols) => write!(f, "missing column(s): {}", cols.join(", ")),
            Self::MissingMaster => f.write_str("no master symbol defined yet"),
            Self::MissingStdSymtab => f.write_str("no standard symtab reference defined yet"),
            Self::MissingField(field) => write!(f, "empty {field}"),
            Self::UnparsableOffset(text) => write!(f, "unparsable offset '{text}'"),
            Self::SelfReference => f.write_str("symbol references itself"),
            Self::UndefinedBase(base) => write!(f, "base '{base}' is not defined"),
            Self::UnsupportedSize(size) => write!(f, "unsupported size {size}"),
            Self::OffsetOverflow => f.write_str("split offset out of range"),
        }
    }
}

/// One skipped row, or a whole sheet when `row` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub sheet: String,
    /// Spreadsheet row number; the header is row 1
    pub row: Option<usize>,
    pub symbol: Option<String>,
    pub reason: SkipReason,
}

/// A row that was emitted but looks inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub sheet: String,
    pub row: usize,
    pub symbol: String,
    pub message: String,
}

/// Everything a generation run left out or found suspicious.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub skipped: Vec<Skip>,
    pub flagged: Vec<Flag>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(&mut self, skip: Skip) {
        match skip.row {
            Some(row) => tracing::debug!(
                sheet = %skip.sheet,
                row,
                symbol = skip.symbol.as_deref().unwrap_or(""),
                "skipped row: {}",
                skip.reason
            ),
            None => tracing::warn!(sheet = %skip.sheet, "skipped sheet: {}", skip.reason),
        }
        self.skipped.push(skip);
    }

    pub fn flag(&mut self, flag: Flag) {
        tracing::warn!(
            sheet = %flag.sheet,
            row = flag.row,
            symbol = %flag.symbol,
            "{}",
            flag.message
        );
        self.flagged.push(flag);
    }

    /// Skips for one sheet.
    pub fn for_sheet<'a>(&'a self, sheet: &'a str) -> impl Iterator<Item = &'a Skip> {
        self.skipped.iter().filter(move |s| s.sheet == sheet)
    }

    /// Number of skipped rows (sheet-level skips excluded).
    pub fn skipped_rows(&self) -> usize {
        self.skipped.iter().filter(|s| s.row.is_some()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.flagged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip(sheet: &str, row: Option<usize>, reason: SkipReason) -> Skip {
        Skip {
            sheet: sheet.to_string(),
            row,
            symbol: None,
            reason,
        }
    }

    #[test]
    fn test_counts_and_filtering() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_clean());

        diagnostics.skip(skip("Fields", Some(4), SkipReason::SelfReference));
        diagnostics.skip(skip("Symbol Tables", None, SkipReason::MissingMaster));
        diagnostics.skip(skip("Fields", Some(7), SkipReason::UnsupportedSize(3)));

        assert_eq!(diagnostics.skipped_rows(), 2);
        assert_eq!(diagnostics.for_sheet("Fields").count(), 2);
        assert_eq!(diagnostics.for_sheet("Master").count(), 0);
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            SkipReason::MissingColumns(vec!["Reference", "Size"]).to_string(),
            "missing column(s): Reference, Size"
        );
        assert_eq!(
            SkipReason::UndefinedBase("BASE_g".into()).to_string(),
            "base 'BASE_g' is not defined"
        );
        assert_eq!(SkipReason::MissingField("symbol").to_string(), "empty symbol");
        assert_eq!(SkipReason::UnsupportedSize(-4).to_string(), "unsupported size -4");
        assert_eq!(SkipReason::OffsetOverflow.to_string(), "split offset out of range");
    }
}
