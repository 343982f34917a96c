//! Data records of a configuration listing.
//!
//! ```text
//! record  = op symbol expr [comment]
//! op      = "wo32" | "wo16" | "by" | "var"
//! expr    = address | base "+" offset | "$$$$(" base "+" offset ")" | offset
//! offset  = "0x" HEX | DEC "."
//! comment = ";" any
//! ```
//!
//! The op is left-padded to 4 columns and the symbol to the configured symbol
//! width; the executor does not need the alignment but existing listings have
//! it, so output stays byte-compatible.

use std::fmt;

use super::cell::Offset;

/// Write width of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// 8-bit
    Byte,
    /// 16-bit
    Word16,
    /// 32-bit
    Word32,
    /// Variable declaration (CAN message offsets)
    Var,
}

impl Op {
    /// Op for a field of `size` bytes, if it is written in one record.
    pub fn for_size(size: u32) -> Option<Self> {
        match size {
            1 => Some(Self::Byte),
            2 => Some(Self::Word16),
            4 => Some(Self::Word32),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Byte => "by",
            Self::Word16 => "wo16",
            Self::Word32 => "wo32",
            Self::Var => "var",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// Right-hand side of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Absolute address literal
    Address(String),
    /// `base +  offset`
    Direct { base: String, offset: Offset },
    /// `$$$$(base +  offset)`, read through a pointer
    Indirect { base: String, offset: Offset },
    /// Bare offset, used by `var`
    Offset(Offset),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => f.write_str(addr),
            Self::Direct { base, offset } => write!(f, "{base} +  {offset}"),
            Self::Indirect { base, offset } => write!(f, "$$$$({base} +  {offset})"),
            Self::Offset(offset) => write!(f, "{offset}"),
        }
    }
}

/// One data line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub op: Op,
    pub symbol: String,
    pub expr: Expr,
    pub comment: Option<String>,
}

impl Record {
    pub fn new(op: Op, symbol: impl Into<String>, expr: Expr) -> Self {
        Self {
            op,
            symbol: symbol.into(),
            expr,
            comment: None,
        }
    }

    /// Attach a trailing `; comment`.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Render with the symbol padded to `symbol_width` columns.
    pub fn render(&self, symbol_width: usize) -> String {
        let mut line = format!(
            "{:<4} {:<width$} {}",
            self.op,
            self.symbol,
            self.expr,
            width = symbol_width
        );
        if let Some(comment) = &self.comment {
            line.push_str(" ; ");
            line.push_str(comment);
        }
        line
    }
}
