//! Symbol-table sheets: entries read through a table pointer.

use super::{is_blank, read_offset, ResolutionContext, SheetEmitter, SkipReason};
use crate::listing::{normalize_symbol, parse_decimal, Expr, Offset, Op, Record};

/// `Symbol Tables`: each symbol is `$$$$(<reference> + <offset>.)`.
///
/// Needs a master symbol, so it runs after the anchor sheet. Rows naming the
/// standard symtab establish the reference used by [`apply_standard`].
pub(super) fn apply_indirect(emitter: &mut SheetEmitter<'_>, ctx: &mut ResolutionContext) {
    let Some([c_sym, c_ref, c_off]) = emitter.require_columns([
        ("Symbol", &["Symbol"]),
        ("Reference", &["Reference"]),
        ("Offset", &["Offset"]),
    ]) else {
        return;
    };
    if ctx.master_symbol().is_none() {
        emitter.skip_sheet(SkipReason::MissingMaster);
        return;
    }
    let (c_sym, c_ref, c_off) = (Some(c_sym), Some(c_ref), Some(c_off));

    for (n, row) in emitter.rows() {
        let symbol = normalize_symbol(&row.text(c_sym));
        let reference = normalize_symbol(&row.text(c_ref));
        if symbol.is_empty() || reference.is_empty() {
            if !is_blank(row, &[c_sym, c_ref, c_off]) {
                let field = if symbol.is_empty() { "symbol" } else { "reference" };
                emitter.skip_row(n, Some(symbol.as_str()), SkipReason::MissingField(field));
            }
            continue;
        }

        let raw = row.text(c_off);
        let Some(offset) = parse_decimal(&raw) else {
            let reason = SkipReason::UnparsableOffset(raw.into_owned());
            emitter.skip_row(n, Some(symbol.as_str()), reason);
            continue;
        };

        ctx.record_std_symtab(&symbol);
        ctx.define(&symbol);
        emitter.emit(Record::new(
            Op::Word32,
            symbol,
            Expr::Indirect {
                base: reference,
                offset: Offset::decimal(offset),
            },
        ));
    }
}

/// `Standard Symbol Table`: each symbol is `$$$$(<std ref> + <value>)`,
/// the value taken from `Hex` when it parses, else from `Offset`.
pub(super) fn apply_standard(emitter: &mut SheetEmitter<'_>, ctx: &mut ResolutionContext) {
    let Some(std_ref) = ctx.std_symtab_ref().map(str::to_string) else {
        emitter.skip_sheet(SkipReason::MissingStdSymtab);
        return;
    };
    let Some([c_sym]) = emitter.require_columns([("Symbol", &["Symbol"])]) else {
        return;
    };
    let Some((c_hex, c_off)) = emitter.value_columns() else {
        return;
    };
    let c_sym = Some(c_sym);

    for (n, row) in emitter.rows() {
        let symbol = normalize_symbol(&row.text(c_sym));
        if symbol.is_empty() {
            if !is_blank(row, &[c_sym, c_hex, c_off]) {
                emitter.skip_row(n, None, SkipReason::MissingField("symbol"));
            }
            continue;
        }

        let offset = match read_offset(row, c_hex, c_off) {
            Ok(offset) => offset,
            Err(raw) => {
                emitter.skip_row(n, Some(symbol.as_str()), SkipReason::UnparsableOffset(raw));
                continue;
            }
        };

        ctx.define(&symbol);
        emitter.emit(Record::new(
            Op::Word32,
            symbol,
            Expr::Indirect {
                base: std_ref.clone(),
                offset,
            },
        ));
    }
}
