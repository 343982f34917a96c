//! Symbol extraction from listing text.

use std::sync::LazyLock;

use regex::Regex;

static RECORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:wo32|wo16|by)\s+(\w+)").unwrap());

/// Symbols of the `wo32`/`wo16`/`by` records in a listing, in order.
///
/// Comment lines, blank lines and `var` records are ignored.
pub fn record_symbols(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .filter_map(|line| RECORD_RE.captures(line)?.get(1).map(|m| m.as_str()))
}

/// Implementation symbols (`io_g_Table_u32`, `main_c_SymMaster_u32`) are
/// never test targets.
pub fn is_internal(symbol: &str) -> bool {
    symbol.contains("_g_") || symbol.contains("_c_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_symbols() {
        let text = "\
;==== Fields ====
wo32 SPI_00_TxBuf_pu8             $$$$(BASE_g +  0x0)
  by   DIG_IN_01                  BASE_g +  0x4
var  SPI_00_TxBuf_pu8             0x0

wo16 ADC_01                       BASE_g +  0x8
wo8  NOT_A_RECORD                 BASE_g +  0x9
; wo32 COMMENTED                  0x0
";
        let symbols: Vec<&str> = record_symbols(text).collect();
        assert_eq!(symbols, vec!["SPI_00_TxBuf_pu8", "DIG_IN_01", "ADC_01"]);
    }

    #[test]
    fn test_internal_symbols() {
        assert!(is_internal("io_g_Table_u32"));
        assert!(is_internal("main_c_SymMaster_u32"));
        assert!(!is_internal("DIG_IN_01"));
        assert!(!is_internal("SPI_00_g"));
    }
}
