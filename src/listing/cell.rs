//! Numeric cell parsing and offset formatting.
//!
//! Offsets travel in one of two textual conventions and are never mixed in a
//! single expression: `0x<HEX>` when the value came from a `Hex` column, and
//! `<dec>.` (trailing dot) when it came from an `Offset` column.

use std::fmt;

/// The textual convention an offset is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// `0x1F`
    Hex,
    /// `31.`
    Decimal,
}

/// An integer value tagged with the convention of the column it came from.
///
/// Values are 128-bit so that any 64-bit address or offset, signed or not,
/// parses without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub value: i128,
    pub radix: Radix,
}

impl Offset {
    pub fn hex(value: i128) -> Self {
        Self {
            value,
            radix: Radix::Hex,
        }
    }

    pub fn decimal(value: i128) -> Self {
        Self {
            value,
            radix: Radix::Decimal,
        }
    }

    /// The same convention, shifted by `delta` bytes; `None` on overflow.
    pub fn shifted(self, delta: i128) -> Option<Self> {
        Some(Self {
            value: self.value.checked_add(delta)?,
            ..self
        })
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Hex => f.write_str(&format_hex(self.value)),
            Radix::Decimal => f.write_str(&format_decimal(self.value)),
        }
    }
}

/// Parse a cell from a `Hex` column.
///
/// Accepts `48`, `0x48`, `0X48`, `48h`, `a`, `0xA`. Text that is not hex
/// after stripping the markers falls back to a plain decimal parse.
pub fn parse_hex(cell: &str) -> Option<i128> {
    let text = cell.trim();
    if text.is_empty() {
        return None;
    }

    let lower = text.to_ascii_lowercase();
    let digits = lower.strip_prefix("0x").unwrap_or(&lower);
    let digits = digits.strip_suffix('h').unwrap_or(digits).trim();
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return i128::from_str_radix(digits, 16).ok();
    }

    text.parse::<i128>().ok()
}

/// Parse a cell from an `Offset` column.
///
/// Accepts `8`, `8.`, `72d`, `-4`. Anything but an optionally signed digit
/// run after stripping the trailing markers is rejected.
pub fn parse_decimal(cell: &str) -> Option<i128> {
    let lower = cell.trim().to_ascii_lowercase();
    let text = lower.trim_end_matches(['.', 'd']).trim();

    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i128>().ok()
}

/// Render a value as `0x` followed by uppercase hex digits.
///
/// The sign of a negative value follows the prefix: `0x-5`.
pub fn format_hex(value: i128) -> String {
    if value < 0 {
        format!("0x-{:X}", value.unsigned_abs())
    } else {
        format!("0x{value:X}")
    }
}

/// Render a value as decimal with a trailing dot.
pub fn format_decimal(value: i128) -> String {
    format!("{value}.")
}

/// Normalize an address cell from an anchor sheet into a hex literal.
///
/// - `0x1a2b` keeps its value with uppercase digits: `0x1A2B`
/// - hex digits containing a letter are taken as hex: `1A2B` → `0x1A2B`
/// - plain digits are decimal and converted: `2000` → `0x7D0`
/// - anything else passes through unchanged
pub fn normalize_address(cell: &str) -> String {
    let text = cell.trim();

    let prefixed = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"));
    if let Some(digits) = prefixed {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return format!("0x{}", digits.to_ascii_uppercase());
        }
        return text.to_string();
    }

    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        if text.bytes().any(|b| b.is_ascii_alphabetic()) {
            return format!("0x{}", text.to_ascii_uppercase());
        }
        if let Ok(value) = text.parse::<i128>() {
            return format_hex(value);
        }
    }

    text.to_string()
}

/// Replace whitespace runs in a symbol with single underscores.
pub fn normalize_symbol(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Parse the byte size of a field.
///
/// Takes the leading integer token of the `Size` cell (`"8"`, `"8 bytes"`,
/// numeric `8.0`, `"-4"`); when there is no integer token infers it from a
/// `_u8`/`_u16`/`_u32` suffix on the symbol, defaulting to 4. The result is
/// not range-checked.
pub fn parse_size(cell: &str, symbol: &str) -> i64 {
    if let Some(size) = cell
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<i64>().ok())
    {
        return size;
    }
    size_from_suffix(symbol).unwrap_or(4)
}

fn size_from_suffix(symbol: &str) -> Option<i64> {
    let lower = symbol.to_ascii_lowercase();
    // The suffix must end a word: `_u16` matches in `x_u16` and `x_u16.y`,
    // but not in `x_u160` or `x_u16_y`.
    lower.match_indices("_u").find_map(|(i, _)| {
        let rest = &lower[i + 2..];
        let width = rest.bytes().take_while(u8::is_ascii_digit).count();
        let at_boundary = rest[width..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_');
        match (&rest[..width], at_boundary) {
            ("8", true) => Some(1),
            ("16", true) => Some(2),
            ("32", true) => Some(4),
            _ => None,
        }
    })
}
