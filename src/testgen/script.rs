//! Test-menu script emission.

use std::collections::BTreeMap;

use super::taxonomy::{Category, GroupKey};

const RULE: &str = "============================================================";

/// Data words written to a serial bus, one per pass of the loop body.
const SPI_PATTERNS: [&str; 3] = ["0xAA55", "0xFF00", "0x5A5A"];

/// Symbols shown per digital group.
const DIGITAL_SHOWN: usize = 8;
/// Symbols shown per CAN or unclassified group.
const LISTED_SHOWN: usize = 5;

/// The loop of one test routine.
struct Routine {
    body: Vec<String>,
    cycles: u32,
    done: &'static str,
}

impl Routine {
    fn for_group(key: &GroupKey, symbols: &[String]) -> Self {
        let name = key.name.as_str();
        match key.category {
            Category::Spi => Self {
                body: SPI_PATTERNS
                    .iter()
                    .enumerate()
                    .flat_map(|(i, pattern)| {
                        [
                            format!("EC \"  Pattern {}: {pattern}\"", i + 1),
                            format!("CB {name}_TxLim_u8 0x02"),
                            format!("CW {name}_TxBuf_pu8 {pattern}"),
                            format!("CW {name}_Ctrl_b16 0x8000"),
                            "WA 2".to_string(),
                            format!("MD {name}_RxBuf_pu8 2 %02x"),
                        ]
                    })
                    .collect(),
                cycles: 2,
                done: "Test completed (2 cycles)",
            },
            Category::PwmOut => Self {
                body: vec![
                    "WO #d (#i * 25.)".to_string(),
                    format!("CW {name}_low #d"),
                    "WO #d (100. - #d)".to_string(),
                    format!("CW {name}_high #d"),
                    "WA 3".to_string(),
                ],
                cycles: 5,
                done: "Sweep completed: 0%% -> 25%% -> 50%% -> 75%% -> 100%%",
            },
            Category::PwmIn => Self {
                body: vec![
                    format!("EC \"  Low: \" DW {name}_w0 %d"),
                    format!("EC \"  High: \" DW {name}_w1 %d"),
                    format!("EC \"  Period: \" DW {name}_w2 %d"),
                    "WA 5".to_string(),
                ],
                cycles: 5,
                done: "Monitor completed (5 cycles)",
            },
            Category::Adc => Self {
                body: vec![
                    format!("EC \"  Value: \" DW {name}_UC %d"),
                    "WA 3".to_string(),
                ],
                cycles: 5,
                done: "Monitor completed (5 readings)",
            },
            Category::DigIn | Category::DigOut => Self {
                body: symbols
                    .iter()
                    .take(DIGITAL_SHOWN)
                    .map(|s| format!("EC \"  {s}: \" DB {s} %d"))
                    .chain(["WA 5".to_string()])
                    .collect(),
                cycles: 3,
                done: "Monitor completed (3 cycles)",
            },
            Category::Can => Self {
                body: listed(symbols),
                cycles: 3,
                done: "Monitor completed (3 cycles)",
            },
            Category::Generic => Self {
                body: listed(symbols),
                cycles: 2,
                done: "Monitor completed (2 cycles)",
            },
        }
    }

    fn emit(self, option: usize, lines: &mut Vec<String>) {
        lines.push("WO #i 0.".to_string());
        lines.push(format!(":TEST_{option}_LOOP"));
        lines.extend(self.body);
        lines.push("WO #i (#i + 1.)".to_string());
        lines.push(format!("WO #d (#i - {}.)", self.cycles));
        lines.push(format!("IF N GO TEST_{option}_LOOP"));
        lines.push(format!("EC \"{}\"", self.done));
    }
}

fn listed(symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .take(LISTED_SHOWN)
        .map(|s| format!("EC \"  {s}\""))
        .chain(["WA 5".to_string()])
        .collect()
}

fn push_all(lines: &mut Vec<String>, items: &[&str]) {
    lines.extend(items.iter().map(|s| s.to_string()));
}

/// Render the menu script for a set of groups.
///
/// Options are numbered from 1 in key order. Lines are joined with `\n`; the
/// script always ends with an empty line.
pub fn render(groups: &BTreeMap<GroupKey, Vec<String>>) -> String {
    let mut lines = Vec::new();
    let rule_echo = format!("EC \"{RULE}\"");

    lines.push(format!(";{RULE}"));
    lines.push("; Auto-Generated Test Menu (V4 - Universal Single-Level)".to_string());
    lines.push(";".to_string());
    lines.push(format!("; Detected: {} hardware groups", groups.len()));
    lines.push("; Test Level: BALANCED (moderate cycles, practical testing)".to_string());
    lines.push(format!(";{RULE}"));
    lines.push(String::new());
    lines.push("CL".to_string());
    lines.push(rule_echo.clone());
    lines.push("EC \"     Universal Hardware Test Menu\"".to_string());
    lines.push(rule_echo.clone());
    lines.push(String::new());
    push_all(
        &mut lines,
        &["; Variables", "WO #d 0.", "WO #n 0.", "WO #i 0.", "WO #p 0.", ""],
    );

    lines.push(":MENU".to_string());
    lines.push(rule_echo.clone());
    lines.push("EC \"[0] Exit\"".to_string());
    for (option, key) in (1..).zip(groups.keys()) {
        lines.push(format!("EC \"[{option}] {}: {}\"", key.category.label(), key.name));
    }
    lines.push(rule_echo);
    lines.push(format!("IN \"Select [0..{}]: \" #n", groups.len()));
    lines.push(String::new());

    push_all(&mut lines, &["; Dispatcher", "WO #d (#n - 0.)", "IF Z GO EXIT"]);
    for option in 1..=groups.len() {
        lines.push(format!("WO #d (#n - {option}.)"));
        lines.push(format!("IF Z GO TEST_{option}"));
    }
    push_all(&mut lines, &["GO MENU", "", ":EXIT", "EC \"Exiting.\"", ""]);

    for (option, (key, symbols)) in (1..).zip(groups) {
        lines.push(format!("; {}: {}", key.category.label(), key.name));
        lines.push(format!(":TEST_{option}"));
        lines.push(format!("EC \"=== {} Test ===\"", key.name));
        Routine::for_group(key, symbols).emit(option, &mut lines);
        lines.push("GO MENU".to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}
