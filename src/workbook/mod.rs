//! Tabular input model.
//!
//! A [`Workbook`] is an ordered list of [`Sheet`]s; each sheet has a header of
//! column labels and rows of [`CellValue`]s aligned to that header. Column
//! labels are matched loosely: case, whitespace, underscores and dots are
//! ignored, so `Size (Bytes)`, `size_bytes` and `SizeBytes` all resolve to the
//! same column.
//!
//! Two on-disk formats are supported, see [`Workbook::open`]:
//!
//! ```text
//! book.json       {"sheets": [{"name": "Master", "rows": [{"Symbol": "..", "Address": ".."}]}]}
//! book/           one CSV file per sheet, sheets ordered by file name
//! ```

mod loader;

use std::borrow::Cow;
use std::path::Path;

use serde::Deserialize;

use crate::error::{HwtpError, Result};

pub use loader::{load_csv_dir, load_json, parse_json};

/// A single cell as read from the tabular source.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl CellValue {
    /// Build a cell from text; blank text becomes [`CellValue::Empty`].
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(text.to_string())
        }
    }

    /// Trimmed textual form of the cell.
    ///
    /// Integral numbers render without a fractional part, so a numeric `16`
    /// cell reads the same as the text `"16"`.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.trim()),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Whether the cell holds no usable content.
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Normalize a column label for loose matching.
pub fn normalize_column(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// A row of cells aligned to its sheet's columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    /// Create a row from cells.
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at `column`, or an empty cell if the row is short.
    pub fn cell(&self, column: Option<usize>) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        column.and_then(|i| self.cells.get(i)).unwrap_or(EMPTY)
    }

    /// Trimmed text of the cell at `column`.
    pub fn text(&self, column: Option<usize>) -> Cow<'_, str> {
        self.cell(column).text()
    }
}

/// One sheet of the workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name as it appears in the workbook
    pub name: String,
    /// Column labels in source order
    pub columns: Vec<String>,
    /// Data rows (header excluded)
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet with the given header.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a sheet from string literals. Blank strings become empty cells.
    pub fn from_text_rows(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut sheet = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            sheet.push_row(row.iter().map(|c| CellValue::from_text(c)).collect());
        }
        sheet
    }

    /// Append a row.
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(Row::new(cells));
    }

    /// Find the first column matching any of `candidates`, tried in order.
    ///
    /// When two columns normalize to the same label, the leftmost one wins.
    pub fn column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|cand| {
            let key = normalize_column(cand);
            self.columns
                .iter()
                .position(|c| !key.is_empty() && normalize_column(c) == key)
        })
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// Sheets in workbook order
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook from sheets.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open a workbook from disk.
    ///
    /// A directory is read as one CSV file per sheet; any other path is read
    /// as a JSON workbook document.
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = if path.is_dir() {
            load_csv_dir(path)?
        } else {
            load_json(path)?
        };
        if workbook.sheets.is_empty() {
            return Err(HwtpError::EmptyWorkbook {
                path: path.display().to_string(),
            });
        }
        tracing::info!(
            path = %path.display(),
            sheets = workbook.sheets.len(),
            "loaded workbook"
        );
        Ok(workbook)
    }

    /// Sheet names in order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}
