//! Sheet emission rules.
//!
//! Each workbook sheet is classified into a [`SheetKind`] and processed by the
//! matching rule. Rules read rows, consult and extend the
//! [`ResolutionContext`], and emit records into one [`Section`]:
//!
//! | Kind | Required columns | Record |
//! |------|------------------|--------|
//! | Anchor | Symbol, Address | `wo32 <sym> <hex address>` |
//! | SymbolTables | Symbol, Reference, Offset | `wo32 <sym> $$$$(<ref> +  <dec>.)` |
//! | StandardSymbolTable | Symbol, Hex or Offset | `wo32 <sym> $$$$(<std ref> +  <off>)` |
//! | Generic | Symbol, Reference, Size, Hex or Offset | `by/wo16/wo32 <sym> <base> +  <off>` |
//!
//! A sheet missing a required column, or processed before the anchor it
//! depends on, yields its header alone. A row that cannot be resolved is
//! dropped whole. Both cases are recorded in [`Diagnostics`].

mod anchor;
mod context;
mod diagnostics;
mod generic;
mod kind;
mod symtab;

pub use context::{ResolutionContext, MASTER_TRIGGER, STD_SYMTAB_TRIGGER};
pub use diagnostics::{Diagnostics, Flag, Skip, SkipReason};
pub use kind::{normalize_sheet_name, SheetKind};

use crate::config::{GeneratorConfig, PointerPolicy};
use crate::listing::{parse_decimal, parse_hex, Offset, Record, Section, SectionHeader};
use crate::workbook::{Row, Sheet};

/// Settings shared by every rule in a run.
#[derive(Debug, Clone)]
pub struct RuleSettings {
    pub section_width: usize,
    pub symbol_width: usize,
    pub pointer: PointerPolicy,
}

impl RuleSettings {
    pub fn from_config(config: &GeneratorConfig) -> crate::Result<Self> {
        Ok(Self {
            section_width: config.section_width,
            symbol_width: config.symbol_width,
            pointer: config.pointer_policy()?,
        })
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            section_width: config.section_width,
            symbol_width: config.symbol_width,
            pointer: PointerPolicy::default(),
        }
    }
}

/// Process one sheet with the rule for `kind`.
pub fn apply_rule(
    kind: SheetKind,
    sheet: &Sheet,
    ctx: &mut ResolutionContext,
    settings: &RuleSettings,
    diagnostics: &mut Diagnostics,
) -> Section {
    let mut emitter = SheetEmitter::new(sheet, settings, diagnostics);
    match kind {
        SheetKind::Anchor => anchor::apply(&mut emitter, ctx),
        SheetKind::SymbolTables => symtab::apply_indirect(&mut emitter, ctx),
        SheetKind::StandardSymbolTable => symtab::apply_standard(&mut emitter, ctx),
        SheetKind::Generic => generic::apply(&mut emitter, ctx),
    }
    tracing::debug!(
        sheet = %sheet.name,
        ?kind,
        records = emitter.section.len(),
        "processed sheet"
    );
    emitter.section
}

/// Collects one sheet's output and reports skips against it.
pub(crate) struct SheetEmitter<'a> {
    sheet: &'a Sheet,
    settings: &'a RuleSettings,
    diagnostics: &'a mut Diagnostics,
    section: Section,
}

impl<'a> SheetEmitter<'a> {
    fn new(sheet: &'a Sheet, settings: &'a RuleSettings, diagnostics: &'a mut Diagnostics) -> Self {
        let header = SectionHeader::new(&sheet.name, settings.section_width);
        Self {
            sheet,
            settings,
            diagnostics,
            section: Section::new(header),
        }
    }

    pub(crate) fn pointer(&self) -> &PointerPolicy {
        &self.settings.pointer
    }

    /// Rows paired with their spreadsheet row number.
    pub(crate) fn rows(&self) -> impl Iterator<Item = (usize, &'a Row)> {
        let sheet: &'a Sheet = self.sheet;
        sheet.rows.iter().enumerate().map(|(i, row)| (i + 2, row))
    }

    pub(crate) fn emit(&mut self, record: Record) {
        let line = record.render(self.settings.symbol_width);
        self.section.lines.push(line);
    }

    pub(crate) fn skip_sheet(&mut self, reason: SkipReason) {
        self.diagnostics.skip(Skip {
            sheet: self.sheet.name.clone(),
            row: None,
            symbol: None,
            reason,
        });
    }

    pub(crate) fn skip_row(&mut self, row: usize, symbol: Option<&str>, reason: SkipReason) {
        self.diagnostics.skip(Skip {
            sheet: self.sheet.name.clone(),
            row: Some(row),
            symbol: symbol.map(str::to_string),
            reason,
        });
    }

    pub(crate) fn flag_row(&mut self, row: usize, symbol: &str, message: String) {
        self.diagnostics.flag(Flag {
            sheet: self.sheet.name.clone(),
            row,
            symbol: symbol.to_string(),
            message,
        });
    }

    /// Resolve required columns, reporting the missing ones as a sheet skip.
    ///
    /// Each entry is a list of accepted labels for one column.
    pub(crate) fn require_columns<const N: usize>(
        &mut self,
        required: [(&'static str, &[&str]); N],
    ) -> Option<[usize; N]> {
        let mut found = [0usize; N];
        let mut missing = Vec::new();
        for (i, (name, labels)) in required.iter().enumerate() {
            match self.sheet.column(labels) {
                Some(col) => found[i] = col,
                None => missing.push(*name),
            }
        }
        if missing.is_empty() {
            Some(found)
        } else {
            self.skip_sheet(SkipReason::MissingColumns(missing));
            None
        }
    }

    /// Resolve the `Hex` and `Offset` columns; at least one must exist.
    pub(crate) fn value_columns(&mut self) -> Option<(Option<usize>, Option<usize>)> {
        let hex = self.sheet.column(&["Hex"]);
        let dec = self.sheet.column(&["Offset"]);
        if hex.is_none() && dec.is_none() {
            self.skip_sheet(SkipReason::MissingColumns(vec!["Hex or Offset"]));
            return None;
        }
        Some((hex, dec))
    }
}

/// Read a row's offset, preferring the `Hex` column over the `Offset` column.
///
/// On failure returns the raw text that was tried, for the diagnostics.
pub(crate) fn read_offset(
    row: &Row,
    hex: Option<usize>,
    dec: Option<usize>,
) -> Result<Offset, String> {
    if let Some(value) = hex.and_then(|c| parse_hex(&row.text(Some(c)))) {
        return Ok(Offset::hex(value));
    }
    if let Some(value) = dec.and_then(|c| parse_decimal(&row.text(Some(c)))) {
        return Ok(Offset::decimal(value));
    }
    let tried = [hex, dec]
        .into_iter()
        .flatten()
        .map(|c| row.text(Some(c)).into_owned())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" / ");
    Err(tried)
}

/// Whether every cell of a row is blank.
pub(crate) fn is_blank(row: &Row, columns: &[Option<usize>]) -> bool {
    columns.iter().all(|c| row.cell(*c).is_empty())
}


#[cfg(test)]
mod tests {
    use super::test_support::run;
    use super::*;

    #[test]
    fn test_missing_columns_yield_header_only() {
        let sheet = Sheet::from_text_rows("Fields", &["Symbol", "Hex"], &[&["a", "10"]]);
        let mut ctx = ResolutionContext::new();
        let mut diagnostics = Diagnostics::new();
        let section = apply_rule(
            SheetKind::Generic,
            &sheet,
            &mut ctx,
            &RuleSettings::default(),
            &mut diagnostics,
        );
        assert!(section.is_empty());
        assert_eq!(section.header.title(), "Fields");
        assert_eq!(
            diagnostics.skipped[0].reason,
            SkipReason::MissingColumns(vec!["Reference", "Size"])
        );
        assert_eq!(diagnostics.skipped_rows(), 0);
    }

    #[test]
    fn test_rows_numbered_from_two() {
        let sheet = Sheet::from_text_rows(
            "Symbol Tables",
            &["Symbol", "Reference", "Offset"],
            &[&["a", "m", "4"], &["b", "m", "x"]],
        );
        let mut ctx = ResolutionContext::new();
        ctx.record_anchor_candidate("m");
        ctx.seal_anchor();
        let (lines, diagnostics) = run(SheetKind::SymbolTables, &sheet, &mut ctx);
        assert_eq!(lines.len(), 1);
        assert_eq!(diagnostics.skipped[0].row, Some(3));
        assert_eq!(diagnostics.skipped[0].symbol.as_deref(), Some("b"));
    }
}
