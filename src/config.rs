//! Generator configuration.
//!
//! Every field has a default matching the layout expected by the test
//! executor, so an empty JSON object (or no file at all) yields the standard
//! behavior. Use [`GeneratorConfig::from_file`] to load overrides.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{HwtpError, Result};

/// Default configuration constants.
mod defaults {
    /// Total width of a section header line, excluding the leading `;`.
    pub const SECTION_WIDTH: usize = 60;

    /// Column width the symbol name is left-padded to in data records.
    pub const SYMBOL_WIDTH: usize = 28;

    /// Suffix identifying pointer-typed symbols (`_pu8`, `_ps`, `_pu32`, ...).
    pub const POINTER_PATTERN: &str = r"(?i)_p[us]\d*$";

    /// Expected byte size of a pointer field.
    pub const POINTER_SIZE: u32 = 4;
}

/// Top-level configuration for a generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Width of the `=` fill around section titles.
    pub section_width: usize,

    /// Column width symbol names are padded to.
    pub symbol_width: usize,

    /// Regular expression that marks a symbol as pointer-typed.
    pub pointer_pattern: String,

    /// Field size a pointer-typed symbol is expected to have.
    /// Rows that disagree are flagged in the diagnostics.
    pub pointer_size: u32,

    /// Collect symbols the hardware taxonomy does not recognize under a
    /// `generic:UNCLASSIFIED` group instead of dropping them.
    pub group_unclassified: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            section_width: defaults::SECTION_WIDTH,
            symbol_width: defaults::SYMBOL_WIDTH,
            pointer_pattern: defaults::POINTER_PATTERN.to_string(),
            pointer_size: defaults::POINTER_SIZE,
            group_unclassified: false,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HwtpError::file_read(path, e))?;
        Self::from_json(&content).map_err(|source| match source {
            HwtpError::ConfigParse { source, .. } => HwtpError::ConfigParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|source| HwtpError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })?;
        // Fail early on a bad pattern rather than at the first generic sheet.
        config.pointer_policy()?;
        Ok(config)
    }

    /// Compile the pointer pattern into a [`PointerPolicy`].
    pub fn pointer_policy(&self) -> Result<PointerPolicy> {
        PointerPolicy::new(&self.pointer_pattern, self.pointer_size)
    }
}

/// Decides whether a symbol is read through a pointer.
///
/// Generic-sheet records use the `$$$$( base + offset )` indirection form when
/// either the symbol or its base matches the policy.
#[derive(Debug, Clone)]
pub struct PointerPolicy {
    pattern: Regex,
    pointer_size: u32,
}

impl PointerPolicy {
    /// Build a policy from a regular expression and the expected pointer size.
    pub fn new(pattern: &str, pointer_size: u32) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| HwtpError::InvalidPointerPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            pointer_size,
        })
    }

    /// Check whether `symbol` is pointer-typed.
    pub fn is_pointer(&self, symbol: &str) -> bool {
        self.pattern.is_match(symbol)
    }

    /// Check whether a field of `size` bytes is plausible for a pointer.
    pub fn size_matches(&self, size: u32) -> bool {
        size == self.pointer_size
    }
}

impl Default for PointerPolicy {
    fn default() -> Self {
        Self {
            pattern: Regex::new(defaults::POINTER_PATTERN).unwrap(),
            pointer_size: defaults::POINTER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pointer_policy() {
        let policy = PointerPolicy::default();
        assert!(policy.is_pointer("SPI_00_TxBuf_pu8"));
        assert!(policy.is_pointer("main_g_Table_PS"));
        assert!(policy.is_pointer("ptr_pu"));
        assert!(policy.is_pointer("x_pu32"));
        assert!(!policy.is_pointer("BASE_g"));
        assert!(!policy.is_pointer("value_pu8_x"));
        assert!(!policy.is_pointer("flag_pb"));
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config.section_width, 60);
        assert_eq!(config.symbol_width, 28);
        assert_eq!(config.pointer_size, 4);
        assert!(!config.group_unclassified);
    }

    #[test]
    fn test_override_fields() {
        let config = GeneratorConfig::from_json(
            r#"{"symbol_width": 32, "pointer_pattern": "_ptr$", "group_unclassified": true}"#,
        )
        .unwrap();
        assert_eq!(config.symbol_width, 32);
        assert!(config.group_unclassified);
        let policy = config.pointer_policy().unwrap();
        assert!(policy.is_pointer("table_ptr"));
        assert!(!policy.is_pointer("table_pu8"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = GeneratorConfig::from_json(r#"{"pointer_pattern": "(_p"}"#).unwrap_err();
        assert!(matches!(err, HwtpError::InvalidPointerPattern { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GeneratorConfig::from_json(r#"{"symbol_widht": 30}"#).unwrap_err();
        assert!(matches!(err, HwtpError::ConfigParse { .. }));
    }
}
