//! Interactive test-menu generation.
//!
//! Reads a configuration listing, groups its symbols into hardware groups and
//! writes a menu script with one test routine per group. The script language
//! is the executor's own:
//!
//! | Command | Meaning |
//! |---------|---------|
//! | `; text` | comment |
//! | `:NAME` | label |
//! | `GO NAME`, `IF Z GO NAME`, `IF N GO NAME` | jumps |
//! | `WO #x expr` | variable assignment |
//! | `EC "text" [DW/DB sym fmt]` | console echo, optionally with a read |
//! | `IN "prompt" #x` | read a number from the console |
//! | `WA n` | wait |
//! | `CL` | clear the console |
//! | `CB`, `CW` | write a byte or word |
//! | `MD sym n fmt` | memory dump |
//!
//! Generation runs in three stages: [`record_symbols`] extracts symbols,
//! [`classify`] assigns each to a [`GroupKey`], and [`TestPlan::render`]
//! emits the script.

mod parse;
mod script;
mod taxonomy;

pub use parse::{is_internal, record_symbols};
pub use taxonomy::{classify, Category, GroupKey, UNCLASSIFIED};

use std::collections::BTreeMap;
use std::fmt;

/// Hardware groups found in a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPlan {
    /// Symbols per group, in listing order
    pub groups: BTreeMap<GroupKey, Vec<String>>,
    /// Symbols no group took
    pub excluded: Vec<String>,
    /// Number of `_g_`/`_c_` symbols skipped
    pub internal: usize,
}

impl TestPlan {
    /// Group the symbols of a listing.
    ///
    /// With `group_unclassified`, symbols no rule recognizes are collected
    /// under `generic:UNCLASSIFIED` instead of being excluded.
    pub fn from_listing(text: &str, group_unclassified: bool) -> Self {
        let mut plan = Self::default();
        for symbol in record_symbols(text) {
            if is_internal(symbol) {
                plan.internal += 1;
                continue;
            }
            let key = match classify(symbol) {
                Some(key) => key,
                None if group_unclassified => GroupKey::unclassified(),
                None => {
                    plan.excluded.push(symbol.to_string());
                    continue;
                }
            };
            plan.groups.entry(key).or_default().push(symbol.to_string());
        }

        if !plan.excluded.is_empty() {
            tracing::debug!(symbols = ?plan.excluded, "symbols outside any hardware group");
        }
        tracing::info!(
            groups = plan.groups.len(),
            excluded = plan.excluded.len(),
            internal = plan.internal,
            "grouped listing symbols"
        );
        plan
    }

    /// One entry per group, in menu order.
    pub fn summary(&self) -> Vec<GroupSummary<'_>> {
        self.groups
            .iter()
            .map(|(key, symbols)| GroupSummary {
                key,
                symbols: symbols.len(),
            })
            .collect()
    }

    /// Render the menu script.
    pub fn render(&self) -> String {
        script::render(&self.groups)
    }
}

/// A group and its size, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSummary<'a> {
    pub key: &'a GroupKey,
    pub symbols: usize,
}

impl fmt::Display for GroupSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} symbols)",
            self.key.category.label(),
            self.key.name,
            self.symbols
        )
    }
}

/// Generate the test-menu script for listing text.
pub fn generate_test_script(listing: &str, group_unclassified: bool) -> String {
    TestPlan::from_listing(listing, group_unclassified).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
;======================== Master ========================
wo32 main_c_SymMaster_u32         0x20000000
;======================== Fields ========================
wo32 io_g_Table_u32               $$$$(main_c_SymTabStd_u32 +  0x40)
wo32 SPI_00_TxBuf_pu8             $$$$(io_g_Table_u32 +  0x0)
wo32 SPI_00_RxBuf_pu8             $$$$(io_g_Table_u32 +  0x4)
by   DIG_IN_01                    io_g_Table_u32 +  0x8
by   RELAY_EN                     io_g_Table_u32 +  0x9
wo32 CAN_01_MSG_a                 io_g_Table_u32 +  0x10
var  CAN_01_MSG_a                 0x10
wo32 VBAT_MON                     io_g_Table_u32 +  0x14
wo32 PWM_OUT_01_UC                io_g_Table_u32 +  0x18
";

    fn keys(plan: &TestPlan) -> Vec<String> {
        plan.groups.keys().map(ToString::to_string).collect()
    }

    #[test]
    fn test_plan_groups() {
        let plan = TestPlan::from_listing(LISTING, false);
        assert_eq!(
            keys(&plan),
            vec!["can:CAN_01", "dig_in:DIGITAL_IN", "dig_out:DIGITAL_OUT", "spi:SPI_00"]
        );
        assert_eq!(
            plan.groups[&GroupKey::new(Category::Spi, "SPI_00")],
            vec!["SPI_00_TxBuf_pu8", "SPI_00_RxBuf_pu8"]
        );
        assert_eq!(plan.excluded, vec!["VBAT_MON", "PWM_OUT_01_UC"]);
        assert_eq!(plan.internal, 2);
    }

    #[test]
    fn test_unclassified_group() {
        let plan = TestPlan::from_listing(LISTING, true);
        assert!(plan.excluded.is_empty());
        assert_eq!(
            plan.groups[&GroupKey::unclassified()],
            vec!["VBAT_MON", "PWM_OUT_01_UC"]
        );
        let script = plan.render();
        assert!(script.contains("EC \"[4] GENERIC: UNCLASSIFIED\""));
        assert!(script.contains("EC \"  VBAT_MON\""));
    }

    #[test]
    fn test_spi_menu_and_routine() {
        let script = generate_test_script("wo32 SPI_00_TxBuf_pu8 $$$$(BASE + 0x0)\n", false);
        assert!(script.contains("EC \"[1] SPI: SPI_00\""));
        assert!(script.contains("; Detected: 1 hardware groups"));

        let routine: Vec<&str> = script
            .lines()
            .skip_while(|l| *l != ":TEST_1")
            .take_while(|l| *l != "GO MENU")
            .collect();
        let patterns: Vec<&str> = routine
            .iter()
            .filter(|l| l.starts_with("EC \"  Pattern"))
            .copied()
            .collect();
        assert_eq!(
            patterns,
            vec![
                "EC \"  Pattern 1: 0xAA55\"",
                "EC \"  Pattern 2: 0xFF00\"",
                "EC \"  Pattern 3: 0x5A5A\"",
            ]
        );
        assert!(routine.contains(&"WO #d (#i - 2.)"));
        assert!(routine.contains(&"IF N GO TEST_1_LOOP"));
    }

    #[test]
    fn test_summary() {
        let plan = TestPlan::from_listing(LISTING, false);
        let summary: Vec<String> = plan.summary().iter().map(ToString::to_string).collect();
        assert_eq!(
            summary,
            vec![
                "CAN: CAN_01 (1 symbols)",
                "DIG_IN: DIGITAL_IN (1 symbols)",
                "DIG_OUT: DIGITAL_OUT (1 symbols)",
                "SPI: SPI_00 (2 symbols)",
            ]
        );
    }

    #[test]
    fn test_empty_listing() {
        let plan = TestPlan::from_listing("", false);
        assert!(plan.groups.is_empty());
        assert!(plan.render().contains("; Detected: 0 hardware groups"));
    }
}
