//! Sheet classification.

/// The emission rule a sheet is processed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    /// Absolute anchor addresses (`Master`)
    Anchor,
    /// Symbol tables relative to their reference symbol (`Symbol Tables`)
    SymbolTables,
    /// Entries relative to the standard symtab reference (`Standard Symbol Table`)
    StandardSymbolTable,
    /// Field layouts relative to previously defined bases
    Generic,
}

impl SheetKind {
    /// Classify a sheet by its name.
    ///
    /// Names are compared case-insensitively with whitespace and underscore
    /// runs collapsed, so `Symbol_Tables` and ` symbol  tables ` match.
    pub fn classify(sheet_name: &str) -> Self {
        let name = normalize_sheet_name(sheet_name);
        if name.contains("master") {
            Self::Anchor
        } else if name == "symbol table" || name.contains("symbol tables") {
            Self::SymbolTables
        } else if name.contains("standard symbol table") {
            Self::StandardSymbolTable
        } else {
            Self::Generic
        }
    }

    /// Whether the sheet is processed in the first pass, before any sheet
    /// that may reference the anchors it establishes.
    pub fn is_anchor_pass(self) -> bool {
        matches!(self, Self::Anchor | Self::SymbolTables)
    }
}

/// Lowercase, trim, and collapse whitespace/underscore runs to one space.
pub fn normalize_sheet_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
