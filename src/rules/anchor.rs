//! Anchor sheet: absolute addresses and the master symbol.

use super::{is_blank, ResolutionContext, SheetEmitter, SkipReason};
use crate::listing::{normalize_address, normalize_symbol, Expr, Op, Record};

pub(super) fn apply(emitter: &mut SheetEmitter<'_>, ctx: &mut ResolutionContext) {
    let Some([c_sym, c_addr]) = emitter.require_columns([
        ("Symbol", &["Symbol"]),
        ("Address", &["Address", "Adress"]),
    ]) else {
        return;
    };
    let (c_sym, c_addr) = (Some(c_sym), Some(c_addr));

    for (n, row) in emitter.rows() {
        let symbol = normalize_symbol(&row.text(c_sym));
        let address = row.text(c_addr);
        if symbol.is_empty() || address.is_empty() {
            if !is_blank(row, &[c_sym, c_addr]) {
                let field = if symbol.is_empty() { "symbol" } else { "address" };
                emitter.skip_row(n, Some(symbol.as_str()), SkipReason::MissingField(field));
            }
            continue;
        }

        ctx.record_anchor_candidate(&symbol);
        emitter.emit(Record::new(
            Op::Word32,
            symbol,
            Expr::Address(normalize_address(&address)),
        ));
    }

    ctx.seal_anchor();
}
