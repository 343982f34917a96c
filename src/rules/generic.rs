//! Generic field sheets: struct members laid out relative to a base symbol.

use super::context::contains_ci;
use super::{is_blank, read_offset, ResolutionContext, SheetEmitter, SkipReason};
use crate::listing::{normalize_symbol, parse_size, Expr, Offset, Op, Radix, Record};

/// Width of one word when a wide field is split.
const WORD_BYTES: u32 = 4;

pub(super) fn apply(emitter: &mut SheetEmitter<'_>, ctx: &mut ResolutionContext) {
    let Some([c_sym, c_ref, c_size]) = emitter.require_columns([
        ("Symbol", &["Symbol"]),
        ("Reference", &["Reference"]),
        ("Size", &["Size", "SizeBytes", "Size(Bytes)"]),
    ]) else {
        return;
    };
    let Some((c_hex, c_off)) = emitter.value_columns() else {
        return;
    };
    let (c_sym, c_ref, c_size) = (Some(c_sym), Some(c_ref), Some(c_size));

    for (n, row) in emitter.rows() {
        let symbol = normalize_symbol(&row.text(c_sym));
        let base = normalize_symbol(&row.text(c_ref));
        if symbol.is_empty() || base.is_empty() {
            if !is_blank(row, &[c_sym, c_ref, c_size, c_hex, c_off]) {
                let field = if symbol.is_empty() { "symbol" } else { "reference" };
                emitter.skip_row(n, Some(symbol.as_str()), SkipReason::MissingField(field));
            }
            continue;
        }

        if symbol == base {
            emitter.skip_row(n, Some(symbol.as_str()), SkipReason::SelfReference);
            continue;
        }
        if !ctx.is_defined(&base) {
            emitter.skip_row(n, Some(symbol.as_str()), SkipReason::UndefinedBase(base));
            continue;
        }

        let size = parse_size(&row.text(c_size), &symbol);
        let offset = match read_offset(row, c_hex, c_off) {
            Ok(offset) => offset,
            Err(raw) => {
                emitter.skip_row(n, Some(symbol.as_str()), SkipReason::UnparsableOffset(raw));
                continue;
            }
        };

        let field = Field {
            symbol: &symbol,
            base: &base,
            offset,
        };
        let Some(size) = u32::try_from(size).ok().filter(|s| *s > 0) else {
            emitter.skip_row(n, Some(symbol.as_str()), SkipReason::UnsupportedSize(size));
            continue;
        };
        if let Some(op) = Op::for_size(size) {
            let pointer = emitter.pointer();
            let symbol_is_pointer = pointer.is_pointer(&symbol);
            let indirect = symbol_is_pointer || pointer.is_pointer(&base);
            if symbol_is_pointer && !pointer.size_matches(size) {
                let message = format!("pointer-typed symbol has size {size}");
                emitter.flag_row(n, &symbol, message);
            }
            emit_simple(emitter, ctx, &field, op, indirect);
        } else if size > WORD_BYTES && size % WORD_BYTES == 0 {
            let words: Option<Vec<Offset>> = (0..size / WORD_BYTES)
                .map(|i| field.offset.shifted(i128::from(i * WORD_BYTES)))
                .collect();
            match words {
                Some(words) => emit_split(emitter, ctx, &field, &words),
                None => emitter.skip_row(n, Some(symbol.as_str()), SkipReason::OffsetOverflow),
            }
        } else {
            emitter.skip_row(
                n,
                Some(symbol.as_str()),
                SkipReason::UnsupportedSize(i64::from(size)),
            );
        }
    }
}

struct Field<'s> {
    symbol: &'s str,
    base: &'s str,
    offset: Offset,
}

impl Field<'_> {
    fn expr(&self, offset: Offset, indirect: bool) -> Expr {
        let base = self.base.to_string();
        if indirect {
            Expr::Indirect { base, offset }
        } else {
            Expr::Direct { base, offset }
        }
    }

    /// CAN message buffers also get a `var` record.
    fn is_can_message(&self) -> bool {
        contains_ci(self.symbol, "CAN") && contains_ci(self.symbol, "MSG")
    }

    fn var_record(&self) -> Record {
        Record::new(Op::Var, self.symbol, Expr::Offset(self.offset))
    }
}

fn emit_simple(
    emitter: &mut SheetEmitter<'_>,
    ctx: &mut ResolutionContext,
    field: &Field<'_>,
    op: Op,
    indirect: bool,
) {
    emitter.emit(Record::new(op, field.symbol, field.expr(field.offset, indirect)));
    if field.is_can_message() {
        emitter.emit(field.var_record());
    }
    ctx.define(field.symbol);
}

/// Emit a wide field as its base record plus one `wo32` per word offset.
///
/// Two words are named `_low`/`_high`, more are `_w0`..`_wN`. Split records
/// are always direct, and hex offsets carry their decimal value as a comment.
fn emit_split(
    emitter: &mut SheetEmitter<'_>,
    ctx: &mut ResolutionContext,
    field: &Field<'_>,
    words: &[Offset],
) {
    emitter.emit(Record::new(
        Op::Word32,
        field.symbol,
        field.expr(field.offset, false),
    ));
    ctx.define(field.symbol);

    for (i, &offset) in words.iter().enumerate() {
        let suffix = match (words.len(), i) {
            (2, 0) => "_low".to_string(),
            (2, _) => "_high".to_string(),
            _ => format!("_w{i}"),
        };
        let word_symbol = format!("{}{suffix}", field.symbol);

        let mut record = Record::new(Op::Word32, word_symbol.as_str(), field.expr(offset, false));
        if offset.radix == Radix::Hex {
            record = record.with_comment(format!("{}d", offset.value));
        }
        emitter.emit(record);
        ctx.define(&word_symbol);
    }

    if field.is_can_message() {
        emitter.emit(field.var_record());
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{run, squash};
    use super::super::{ResolutionContext, SheetKind, SkipReason};
    use crate::workbook::Sheet;
    use pretty_assertions::assert_eq;

    const COLUMNS: &[&str] = &["Symbol", "Reference", "Size", "Hex", "Offset"];

    fn with_base(base: &str) -> ResolutionContext {
        let mut ctx = ResolutionContext::new();
        ctx.define(base);
        ctx
    }

    fn generic(rows: &[&[&str]], ctx: &mut ResolutionContext) -> (Vec<String>, super::super::Diagnostics) {
        let sheet = Sheet::from_text_rows("dio_g_DigIn_u8_DZC", COLUMNS, rows);
        let (lines, diagnostics) = run(SheetKind::Generic, &sheet, ctx);
        (squash(&lines), diagnostics)
    }

    #[test]
    fn test_can_msg_emits_var() {
        let mut ctx = with_base("BASE_g");
        let (lines, _) = generic(&[&["CAN_01_MSG_a", "BASE_g", "4", "10", ""]], &mut ctx);
        assert_eq!(
            lines,
            vec!["wo32 CAN_01_MSG_a BASE_g + 0x10", "var CAN_01_MSG_a 0x10"]
        );
        assert!(ctx.is_defined("CAN_01_MSG_a"));
    }

    #[test]
    fn test_can_msg_any_order_and_case() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(&[&["msg_box_can1", "b", "2", "", "6"]], &mut ctx);
        assert_eq!(lines, vec!["wo16 msg_box_can1 b + 6.", "var msg_box_can1 6."]);
    }

    #[test]
    fn test_op_by_size() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(
            &[
                &["f8", "b", "1", "0", ""],
                &["f16", "b", "2 bytes", "", "2."],
                &["f32", "b", "4", "0x4", ""],
            ],
            &mut ctx,
        );
        assert_eq!(
            lines,
            vec!["by f8 b + 0x0", "wo16 f16 b + 2.", "wo32 f32 b + 0x4"]
        );
    }

    #[test]
    fn test_undefined_base_never_emits() {
        for size in ["1", "2", "4", "8", "16", "3", ""] {
            let mut ctx = ResolutionContext::new();
            let (lines, diagnostics) = generic(&[&["x", "nowhere", size, "0", ""]], &mut ctx);
            assert!(lines.is_empty(), "size {size} emitted {lines:?}");
            assert_eq!(
                diagnostics.skipped[0].reason,
                SkipReason::UndefinedBase("nowhere".into())
            );
            assert!(!ctx.is_defined("x"));
        }
    }

    #[test]
    fn test_self_reference_skipped() {
        let mut ctx = with_base("psu_g_Control_b16");
        let (lines, diagnostics) = generic(
            &[&["psu_g_Control_b16", "psu_g_Control_b16", "2", "0", ""]],
            &mut ctx,
        );
        assert!(lines.is_empty());
        assert_eq!(diagnostics.skipped[0].reason, SkipReason::SelfReference);
    }

    #[test]
    fn test_split_eight_bytes() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(&[&["PWM_OUT_01", "b", "8", "10", ""]], &mut ctx);
        assert_eq!(
            lines,
            vec![
                "wo32 PWM_OUT_01 b + 0x10",
                "wo32 PWM_OUT_01_low b + 0x10 ; 16d",
                "wo32 PWM_OUT_01_high b + 0x14 ; 20d",
            ]
        );
        assert!(ctx.is_defined("PWM_OUT_01"));
        assert!(ctx.is_defined("PWM_OUT_01_low"));
        assert!(ctx.is_defined("PWM_OUT_01_high"));
    }

    #[test]
    fn test_split_sixteen_bytes_decimal() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(&[&["PWM_IN_01", "b", "16", "", "8"]], &mut ctx);
        assert_eq!(
            lines,
            vec![
                "wo32 PWM_IN_01 b + 8.",
                "wo32 PWM_IN_01_w0 b + 8.",
                "wo32 PWM_IN_01_w1 b + 12.",
                "wo32 PWM_IN_01_w2 b + 16.",
                "wo32 PWM_IN_01_w3 b + 20.",
            ]
        );
    }

    #[test]
    fn test_split_is_never_indirect() {
        let mut ctx = with_base("tbl_pu32");
        let (lines, _) = generic(&[&["CAN_MSG_x", "tbl_pu32", "8", "", "0"]], &mut ctx);
        assert_eq!(
            lines,
            vec![
                "wo32 CAN_MSG_x tbl_pu32 + 0.",
                "wo32 CAN_MSG_x_low tbl_pu32 + 0.",
                "wo32 CAN_MSG_x_high tbl_pu32 + 4.",
                "var CAN_MSG_x 0.",
            ]
        );
    }

    #[test]
    fn test_unknown_sizes_drop() {
        let mut ctx = with_base("b");
        let (lines, diagnostics) = generic(
            &[&["x3", "b", "3", "0", ""], &["x5", "b", "5", "0", ""], &["x0", "b", "0", "0", ""]],
            &mut ctx,
        );
        assert!(lines.is_empty());
        assert_eq!(
            diagnostics.skipped.iter().map(|s| s.reason.clone()).collect::<Vec<_>>(),
            vec![
                SkipReason::UnsupportedSize(3),
                SkipReason::UnsupportedSize(5),
                SkipReason::UnsupportedSize(0),
            ]
        );
        assert!(!ctx.is_defined("x3"));
    }

    #[test]
    fn test_negative_sizes_drop() {
        let mut ctx = with_base("b");
        let (lines, diagnostics) = generic(
            &[&["x", "b", "-4", "0", ""], &["wide", "b", "-8", "0", ""]],
            &mut ctx,
        );
        assert!(lines.is_empty());
        assert_eq!(
            diagnostics.skipped.iter().map(|s| s.reason.clone()).collect::<Vec<_>>(),
            vec![SkipReason::UnsupportedSize(-4), SkipReason::UnsupportedSize(-8)]
        );
        assert!(!ctx.is_defined("x"));
        assert!(!ctx.is_defined("wide"));
    }

    #[test]
    fn test_split_overflow_drops_whole_row() {
        let mut ctx = with_base("b");
        let (lines, diagnostics) = generic(
            &[
                &["big", "b", "8", "7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE", ""],
                &["next", "b", "4", "8", ""],
            ],
            &mut ctx,
        );
        assert_eq!(lines, vec!["wo32 next b + 0x8"]);
        assert_eq!(diagnostics.skipped.len(), 1);
        assert_eq!(diagnostics.skipped[0].symbol.as_deref(), Some("big"));
        assert_eq!(diagnostics.skipped[0].reason, SkipReason::OffsetOverflow);
        assert!(!ctx.is_defined("big"));
        assert!(!ctx.is_defined("big_low"));
    }

    #[test]
    fn test_split_high_64_bit_offset() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(&[&["far", "b", "8", "FFFFFFFF00000000", ""]], &mut ctx);
        assert_eq!(
            lines,
            vec![
                "wo32 far b + 0xFFFFFFFF00000000",
                "wo32 far_low b + 0xFFFFFFFF00000000 ; 18446744069414584320d",
                "wo32 far_high b + 0xFFFFFFFF00000004 ; 18446744069414584324d",
            ]
        );
    }

    #[test]
    fn test_size_inferred_from_suffix() {
        let mut ctx = with_base("b");
        let (lines, _) = generic(
            &[&["val_u16", "b", "", "2", ""], &["val_u8", "b", "?", "4", ""], &["val", "b", "", "6", ""]],
            &mut ctx,
        );
        assert_eq!(
            lines,
            vec!["wo16 val_u16 b + 0x2", "by val_u8 b + 0x4", "wo32 val b + 0x6"]
        );
    }

    #[test]
    fn test_pointer_wrapper() {
        let mut ctx = with_base("b");
        ctx.define("tbl_ps");
        let (lines, diagnostics) = generic(
            &[
                &["SPI_00_TxBuf_pu8", "b", "4", "20", ""],
                &["entry", "tbl_ps", "2", "", "4"],
            ],
            &mut ctx,
        );
        assert_eq!(
            lines,
            vec![
                "wo32 SPI_00_TxBuf_pu8 $$$$(b + 0x20)",
                "wo16 entry $$$$(tbl_ps + 4.)",
            ]
        );
        assert!(diagnostics.flagged.is_empty());
    }

    #[test]
    fn test_pointer_size_mismatch_flagged() {
        let mut ctx = with_base("b");
        let (lines, diagnostics) = generic(&[&["buf_pu8", "b", "2", "0", ""]], &mut ctx);
        assert_eq!(lines, vec!["wo16 buf_pu8 $$$$(b + 0x0)"]);
        assert_eq!(diagnostics.flagged.len(), 1);
        assert_eq!(diagnostics.flagged[0].symbol, "buf_pu8");
    }

    #[test]
    fn test_chained_definitions_within_sheet() {
        let mut ctx = with_base("root");
        let (lines, diagnostics) = generic(
            &[
                &["child", "later", "4", "0", ""],
                &["later", "root", "4", "4", ""],
                &["grandchild", "later", "1", "1", ""],
            ],
            &mut ctx,
        );
        assert_eq!(
            lines,
            vec!["wo32 later root + 0x4", "by grandchild later + 0x1"]
        );
        assert_eq!(diagnostics.skipped_rows(), 1);
    }

    #[test]
    fn test_unparsable_offset() {
        let mut ctx = with_base("b");
        let (lines, diagnostics) = generic(&[&["x", "b", "4", "zz", "q"]], &mut ctx);
        assert!(lines.is_empty());
        assert_eq!(
            diagnostics.skipped[0].reason,
            SkipReason::UnparsableOffset("zz / q".into())
        );
    }
}
