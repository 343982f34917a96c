//! # hwtp_gen
//!
//! Generates hardware-test configuration listings and test-menu scripts from
//! a hardware-symbol workbook.
//!
//! This library provides:
//! - Loading of workbooks exported as JSON or as a directory of CSV sheets
//! - Translation of every sheet into a section of `.hwtp` configuration records
//! - Partitioning of the master listing into per-variant listings
//! - Generation of an interactive test menu from any listing
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`workbook`] - Sheet/row/cell model and its loaders
//! - [`listing`] - Cell parsing, record rendering, section headers
//! - [`rules`] - Sheet classification, the emission rules and symbol resolution
//! - [`assembler`] - Two-pass master listing assembly
//! - [`variants`] - Per-variant partitioning
//! - [`testgen`] - Hardware-group taxonomy and menu script emission
//! - [`pipeline`] - File-level operations
//!
//! ## Usage
//!
//! ```bash
//! hwtp config book.json -o config.hwtp --multi
//! hwtp test config_DZC.hwtp -o test_DZC_v4.hwtp
//! hwtp all book.json -d out/
//! ```
//!
//! ## Resolution
//!
//! Sheets refer to each other by symbol name. A generation run processes the
//! anchor and symbol-table sheets first, then every other sheet in workbook
//! order, so a record is emitted only when the symbol it is based on was
//! defined by an earlier sheet or row. Output sections keep workbook order.

pub mod assembler;
pub mod config;
pub mod error;
pub mod listing;
pub mod pipeline;
pub mod rules;
pub mod testgen;
pub mod variants;
pub mod workbook;

// Re-export main types for convenience
pub use assembler::{generate_master_listing, MasterListing};
pub use config::GeneratorConfig;
pub use error::{HwtpError, Result};
pub use listing::{Listing, VariantTag};
pub use pipeline::Generator;
pub use testgen::{generate_test_script, TestPlan};
pub use variants::{partition, VariantListing};
pub use workbook::Workbook;

/// Default base name of generated configuration listings
pub const DEFAULT_BASE_NAME: &str = "config";
