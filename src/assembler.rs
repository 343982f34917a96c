//! Master listing assembly.
//!
//! Sheets are processed in two passes so that anchors exist before anything
//! that refers to them:
//!
//! 1. anchor and symbol-table sheets, in workbook order;
//! 2. every other sheet, in workbook order.
//!
//! Sections are then emitted in workbook order regardless of the pass that
//! produced them.

use std::collections::BTreeMap;

use crate::listing::{Listing, Section};
use crate::rules::{apply_rule, Diagnostics, ResolutionContext, RuleSettings, SheetKind};
use crate::workbook::Workbook;

/// The result of one generation run.
#[derive(Debug, Clone)]
pub struct MasterListing {
    /// All sections in workbook order
    pub listing: Listing,
    /// Rows and sheets that produced no output
    pub diagnostics: Diagnostics,
    /// Final resolution state
    pub context: ResolutionContext,
}

impl MasterListing {
    /// The listing as text.
    pub fn text(&self) -> String {
        self.listing.to_text()
    }

    /// Output lines per sheet name, header included.
    pub fn per_sheet(&self) -> BTreeMap<String, Vec<String>> {
        self.listing
            .sections
            .iter()
            .map(|s| {
                let lines = s.all_lines().map(str::to_string).collect();
                (s.header.title().to_string(), lines)
            })
            .collect()
    }
}

/// Translate a workbook into the master configuration listing.
///
/// Each call owns a fresh [`ResolutionContext`]; nothing carries over between
/// runs.
pub fn generate_master_listing(workbook: &Workbook, settings: &RuleSettings) -> MasterListing {
    let mut ctx = ResolutionContext::new();
    let mut diagnostics = Diagnostics::new();

    let kinds: Vec<SheetKind> = workbook
        .sheets
        .iter()
        .map(|s| SheetKind::classify(&s.name))
        .collect();
    let mut sections: Vec<Option<Section>> = vec![None; workbook.sheets.len()];

    for anchor_pass in [true, false] {
        for (i, sheet) in workbook.sheets.iter().enumerate() {
            if kinds[i].is_anchor_pass() != anchor_pass {
                continue;
            }
            sections[i] = Some(apply_rule(kinds[i], sheet, &mut ctx, settings, &mut diagnostics));
        }
    }

    let listing = Listing::new(sections.into_iter().flatten().collect());
    tracing::info!(
        sheets = workbook.sheets.len(),
        records = listing.sections.iter().map(Section::len).sum::<usize>(),
        defined = ctx.defined_count(),
        skipped_rows = diagnostics.skipped_rows(),
        master = ctx.master_symbol().unwrap_or("<none>"),
        "generated master listing"
    );

    MasterListing {
        listing,
        diagnostics,
        context: ctx,
    }
}
