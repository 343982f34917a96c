//! Per-run symbol resolution state.

use std::collections::HashSet;

/// Substring marking the preferred master symbol on an anchor sheet.
pub const MASTER_TRIGGER: &str = "SymMaster";

/// Substring marking the standard symbol table reference.
pub const STD_SYMTAB_TRIGGER: &str = "SymTabStd";

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Which symbols are defined so far, plus the two anchor symbols.
///
/// One context lives for exactly one generation run. It only grows: symbols
/// are never undefined and both anchors are first-wins.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    master_symbol: Option<String>,
    master_preferred: bool,
    master_sealed: bool,
    std_symtab_ref: Option<String>,
    defined: HashSet<String>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a symbol from an anchor sheet as the master symbol.
    ///
    /// The first candidate is taken unless a later one on the same sheet
    /// contains [`MASTER_TRIGGER`]. Once [`seal_anchor`](Self::seal_anchor)
    /// has run with a master set, further candidates are ignored.
    pub fn record_anchor_candidate(&mut self, symbol: &str) {
        if self.master_sealed || symbol.is_empty() {
            return;
        }
        let preferred = contains_ci(symbol, MASTER_TRIGGER);
        let replace = match self.master_symbol {
            None => true,
            Some(_) => preferred && !self.master_preferred,
        };
        if replace {
            self.master_symbol = Some(symbol.to_string());
            self.master_preferred = preferred;
        }
    }

    /// Close the anchor sheet: the chosen master becomes defined and final.
    pub fn seal_anchor(&mut self) {
        if let Some(master) = self.master_symbol.clone() {
            self.master_sealed = true;
            self.define(&master);
        }
    }

    /// Record `symbol` as the standard symtab reference if it carries
    /// [`STD_SYMTAB_TRIGGER`] and no reference is known yet.
    pub fn record_std_symtab(&mut self, symbol: &str) {
        if self.std_symtab_ref.is_none() && contains_ci(symbol, STD_SYMTAB_TRIGGER) {
            self.std_symtab_ref = Some(symbol.to_string());
        }
    }

    /// Mark a symbol as defined.
    pub fn define(&mut self, symbol: &str) {
        if !self.defined.contains(symbol) {
            self.defined.insert(symbol.to_string());
        }
    }

    /// Whether a symbol has been defined at least once.
    pub fn is_defined(&self, symbol: &str) -> bool {
        self.defined.contains(symbol)
    }

    pub fn master_symbol(&self) -> Option<&str> {
        self.master_symbol.as_deref()
    }

    pub fn std_symtab_ref(&self) -> Option<&str> {
        self.std_symtab_ref.as_deref()
    }

    /// Number of distinct defined symbols.
    pub fn defined_count(&self) -> usize {
        self.defined.len()
    }
}
