//! Workbook loaders for JSON documents and CSV directories.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::{CellValue, Sheet, Workbook};
use crate::error::{HwtpError, Result};

#[derive(Deserialize)]
struct RawWorkbook {
    sheets: Vec<RawSheet>,
}

#[derive(Deserialize)]
struct RawSheet {
    name: String,
    #[serde(default)]
    rows: Vec<RawRow>,
}

/// A JSON object row with its keys kept in document order.
struct RawRow(Vec<(String, CellValue)>);

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping column labels to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawRow, A::Error> {
                let mut cells = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, CellValue>()? {
                    cells.push((key, value));
                }
                Ok(RawRow(cells))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

impl From<RawSheet> for Sheet {
    fn from(raw: RawSheet) -> Self {
        // The header is the union of all row keys in first-seen order.
        let mut columns: Vec<String> = Vec::new();
        for row in &raw.rows {
            for (key, _) in &row.0 {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut sheet = Sheet::new(raw.name, columns);
        for row in raw.rows {
            let mut cells = vec![CellValue::Empty; sheet.columns.len()];
            for (key, value) in row.0 {
                if let Some(i) = sheet.columns.iter().position(|c| *c == key) {
                    cells[i] = value;
                }
            }
            sheet.push_row(cells);
        }
        sheet
    }
}

/// Parse a JSON workbook document.
pub fn parse_json(text: &str) -> std::result::Result<Workbook, serde_json::Error> {
    let raw: RawWorkbook = serde_json::from_str(text)?;
    Ok(Workbook::new(raw.sheets.into_iter().map(Sheet::from).collect()))
}

/// Load a JSON workbook file.
pub fn load_json(path: &Path) -> Result<Workbook> {
    let content = std::fs::read_to_string(path).map_err(|e| HwtpError::file_read(path, e))?;
    parse_json(&content).map_err(|source| HwtpError::WorkbookFormat {
        path: path.display().to_string(),
        source,
    })
}

/// Load a directory of CSV files as a workbook.
///
/// Each `*.csv` file becomes one sheet named after its file stem; sheets are
/// ordered by file name. The first record of each file is the header.
pub fn load_csv_dir(dir: &Path) -> Result<Workbook> {
    let entries = std::fs::read_dir(dir).map_err(|e| HwtpError::file_read(dir, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HwtpError::file_read(dir, e))?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();

    let sheets = files
        .iter()
        .map(|path| load_csv_sheet(path))
        .collect::<Result<Vec<_>>>()?;
    Ok(Workbook::new(sheets))
}

fn load_csv_sheet(path: &Path) -> Result<Sheet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| HwtpError::csv_read(path, e))?;

    let columns = reader
        .headers()
        .map_err(|e| HwtpError::csv_read(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut sheet = Sheet::new(name, columns);
    for record in reader.records() {
        let record = record.map_err(|e| HwtpError::csv_read(path, e))?;
        sheet.push_row(record.iter().map(CellValue::from_text).collect());
    }
    tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "read CSV sheet");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_keeps_column_order() {
        let text = r#"{"sheets": [
            {"name": "Master", "rows": [
                {"Symbol": "main_c_SymMaster_u32", "Address": "0x1000"},
                {"Address": 2000, "Symbol": "other", "Note": null}
            ]}
        ]}"#;
        let wb = parse_json(text).unwrap();
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.name, "Master");
        assert_eq!(sheet.columns, vec!["Symbol", "Address", "Note"]);
        assert_eq!(sheet.rows[1].text(Some(0)), "other");
        assert_eq!(sheet.rows[1].text(Some(1)), "2000");
        assert!(sheet.rows[0].cell(Some(2)).is_empty());
    }

    #[test]
    fn test_parse_json_sheet_without_rows() {
        let wb = parse_json(r#"{"sheets": [{"name": "Empty"}]}"#).unwrap();
        assert_eq!(wb.sheets.len(), 1);
        assert!(wb.sheets[0].rows.is_empty());
        assert!(wb.sheets[0].columns.is_empty());
    }

    #[test]
    fn test_parse_json_rejects_bad_shape() {
        assert!(parse_json(r#"{"sheets": [{"name": "x", "rows": [[1, 2]]}]}"#).is_err());
    }

    #[test]
    fn test_load_csv_dir_orders_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b_Generic.csv"),
            "Symbol,Reference,Size,Hex\nfoo,bar,4,10\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a_Master.csv"), "Symbol,Address\nm,0x10\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let wb = load_csv_dir(dir.path()).unwrap();
        let names: Vec<&str> = wb.sheet_names().collect();
        assert_eq!(names, vec!["a_Master", "b_Generic"]);
        assert_eq!(wb.sheets[1].rows[0].text(Some(3)), "10");
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = load_json(Path::new("/nonexistent/book.json")).unwrap_err();
        assert!(matches!(err, HwtpError::FileRead { .. }));
    }
}
