//! hwtp - Hardware Test Configuration Generator
//!
//! Turns a hardware-symbol workbook into `.hwtp` configuration listings and
//! interactive test-menu scripts.
//!
//! # Usage
//!
//! ```bash
//! hwtp config book.json -o config.hwtp --multi
//! hwtp test config_DZC.hwtp -o test_DZC_v4.hwtp
//! hwtp all book.json -d out/
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hwtp_gen::{
    error::Result, pipeline::DEFAULT_TEST_SCRIPT, Generator, GeneratorConfig, MasterListing,
    TestPlan, Workbook, DEFAULT_BASE_NAME,
};
use tracing_subscriber::EnvFilter;

/// Hardware test configuration generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generator configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log per-sheet and per-row detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the master configuration listing
    Config {
        /// Workbook (.json file or directory of .csv sheets)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Output listing
        #[arg(short, long, default_value = "config.hwtp")]
        out: PathBuf,

        /// Also write one listing per project variant next to the output
        #[arg(long)]
        multi: bool,
    },

    /// Generate a test-menu script from a listing
    Test {
        /// Configuration listing (.hwtp)
        #[arg(value_name = "LISTING")]
        listing: PathBuf,

        /// Output script
        #[arg(short, long, default_value = DEFAULT_TEST_SCRIPT)]
        out: PathBuf,
    },

    /// Generate master, variant listings and their test scripts
    All {
        /// Workbook (.json file or directory of .csv sheets)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Output directory
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,

        /// Base name of the listings
        #[arg(long, default_value = DEFAULT_BASE_NAME)]
        base: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    let generator = Generator::new(&config)?;

    match args.command {
        Command::Config {
            workbook,
            out,
            multi,
        } => {
            let workbook = Workbook::open(&workbook)?;
            if multi {
                let (dir, base) = split_output(&out);
                let output = generator.generate_variant_listings(&workbook, &dir, &base)?;
                report_master(&output.master);
                for (tag, path) in &output.variants {
                    tracing::info!(variant = %tag, path = %path.display(), "variant listing");
                }
            } else {
                let master = generator.write_master(&workbook, &out)?;
                report_master(&master);
            }
        }
        Command::Test { listing, out } => {
            let plan = generator.write_test_script(&listing, &out)?;
            report_plan(&plan);
        }
        Command::All {
            workbook,
            dir,
            base,
        } => {
            let workbook = Workbook::open(&workbook)?;
            let (output, scripts) = generator.generate_all(&workbook, &dir, &base)?;
            report_master(&output.master);
            tracing::info!(
                variants = output.variants.len(),
                scripts = scripts.len(),
                "generation complete"
            );
        }
    }

    Ok(())
}

/// Directory and base name of a listing path (`out/config.hwtp` -> `out`, `config`).
fn split_output(out: &Path) -> (PathBuf, String) {
    let dir = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let base = out
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_BASE_NAME)
        .to_string();
    (dir, base)
}

fn report_master(master: &MasterListing) {
    if !master.diagnostics.is_clean() {
        tracing::warn!(
            skipped = master.diagnostics.skipped.len(),
            flagged = master.diagnostics.flagged.len(),
            "some rows produced no output, rerun with -v for details"
        );
    }
}

fn report_plan(plan: &TestPlan) {
    for group in plan.summary() {
        tracing::info!("  - {group}");
    }
    if !plan.excluded.is_empty() {
        tracing::info!(count = plan.excluded.len(), "symbols not covered by any test");
    }
}
