//! File-level generation.
//!
//! [`Generator`] ties the stages together and owns all file output:
//!
//! ```text
//! workbook ──► <base>.hwtp ──► <base>_<TAG>.hwtp ... ──► test_<TAG>_v4.hwtp ...
//! ```
//!
//! Every output is fully generated in memory before anything is written.

use std::path::{Path, PathBuf};

use crate::assembler::{generate_master_listing, MasterListing};
use crate::config::GeneratorConfig;
use crate::error::{HwtpError, Result};
use crate::listing::VariantTag;
use crate::rules::RuleSettings;
use crate::testgen::TestPlan;
use crate::variants::partition;
use crate::workbook::Workbook;

/// Extension of configuration listings and test scripts.
pub const LISTING_EXTENSION: &str = "hwtp";

/// Test script name used when a listing has no variants.
pub const DEFAULT_TEST_SCRIPT: &str = "test_menu.hwtp";

/// `<base>_<TAG>.hwtp`
pub fn variant_file_name(base_name: &str, tag: &VariantTag) -> String {
    format!("{base_name}_{tag}.{LISTING_EXTENSION}")
}

/// `test_<TAG>_v4.hwtp`
pub fn test_script_file_name(tag: &VariantTag) -> String {
    format!("test_{tag}_v4.{LISTING_EXTENSION}")
}

/// Write a generated file, creating its parent directory.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HwtpError::create_dir(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| HwtpError::file_write(path, e))?;
    tracing::info!(path = %path.display(), lines = text.lines().count(), "wrote file");
    Ok(())
}

/// Result of a multi-variant run.
#[derive(Debug, Clone)]
pub struct VariantOutput {
    pub master: MasterListing,
    pub master_path: PathBuf,
    /// Variant tags and the files written for them, sorted by tag
    pub variants: Vec<(VariantTag, PathBuf)>,
}

impl VariantOutput {
    pub fn tags(&self) -> Vec<VariantTag> {
        self.variants.iter().map(|(tag, _)| tag.clone()).collect()
    }
}

/// Runs generation with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    settings: RuleSettings,
    group_unclassified: bool,
}

impl Generator {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self {
            settings: RuleSettings::from_config(config)?,
            group_unclassified: config.group_unclassified,
        })
    }

    /// Translate a workbook into the master listing, in memory.
    pub fn master_listing(&self, workbook: &Workbook) -> MasterListing {
        generate_master_listing(workbook, &self.settings)
    }

    /// Generate the master listing and write it to `path`.
    pub fn write_master(&self, workbook: &Workbook, path: &Path) -> Result<MasterListing> {
        let master = self.master_listing(workbook);
        write_output(path, &master.text())?;
        Ok(master)
    }

    /// Write `<base>.hwtp` and one `<base>_<TAG>.hwtp` per variant into
    /// `output_dir`.
    ///
    /// Returns no variants when the master listing carries no tags.
    pub fn generate_variant_listings(
        &self,
        workbook: &Workbook,
        output_dir: &Path,
        base_name: &str,
    ) -> Result<VariantOutput> {
        std::fs::create_dir_all(output_dir).map_err(|e| HwtpError::create_dir(output_dir, e))?;

        let master = self.master_listing(workbook);
        let variants = partition(&master.listing);

        let master_path = output_dir.join(format!("{base_name}.{LISTING_EXTENSION}"));
        write_output(&master_path, &master.text())?;

        let mut written = Vec::with_capacity(variants.len());
        for variant in variants {
            let path = output_dir.join(variant_file_name(base_name, &variant.tag));
            write_output(&path, &variant.listing.to_text())?;
            written.push((variant.tag, path));
        }

        Ok(VariantOutput {
            master,
            master_path,
            variants: written,
        })
    }

    /// Group the symbols of a listing file.
    pub fn test_plan(&self, listing_path: &Path) -> Result<TestPlan> {
        tracing::info!(path = %listing_path.display(), "parsing listing");
        let text = std::fs::read_to_string(listing_path)
            .map_err(|e| HwtpError::file_read(listing_path, e))?;
        Ok(TestPlan::from_listing(&text, self.group_unclassified))
    }

    /// Generate the test-menu script for a listing file.
    pub fn generate_test_script(&self, listing_path: &Path) -> Result<String> {
        Ok(self.test_plan(listing_path)?.render())
    }

    /// Generate a listing's test-menu script and write it to `out`.
    pub fn write_test_script(&self, listing_path: &Path, out: &Path) -> Result<TestPlan> {
        let plan = self.test_plan(listing_path)?;
        write_output(out, &plan.render())?;
        Ok(plan)
    }

    /// Write `test_<TAG>_v4.hwtp` next to every `<base>_<TAG>.hwtp` in `dir`.
    ///
    /// Returns the scripts written, in tag order.
    pub fn generate_variant_test_scripts(&self, dir: &Path, base_name: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (tag, listing) in variant_listing_files(dir, base_name)? {
            let out = dir.join(test_script_file_name(&tag));
            self.write_test_script(&listing, &out)?;
            written.push(out);
        }
        if written.is_empty() {
            tracing::warn!(dir = %dir.display(), base = base_name, "no variant listings found");
        }
        Ok(written)
    }

    /// Master, variants and test scripts in one go.
    ///
    /// One script is written per variant; without variants a single
    /// [`DEFAULT_TEST_SCRIPT`] is written for the master.
    pub fn generate_all(
        &self,
        workbook: &Workbook,
        output_dir: &Path,
        base_name: &str,
    ) -> Result<(VariantOutput, Vec<PathBuf>)> {
        let output = self.generate_variant_listings(workbook, output_dir, base_name)?;
        let scripts = if output.variants.is_empty() {
            let out = output_dir.join(DEFAULT_TEST_SCRIPT);
            self.write_test_script(&output.master_path, &out)?;
            vec![out]
        } else {
            let mut scripts = Vec::with_capacity(output.variants.len());
            for (tag, listing) in &output.variants {
                let out = output_dir.join(test_script_file_name(tag));
                self.write_test_script(listing, &out)?;
                scripts.push(out);
            }
            scripts
        };
        Ok((output, scripts))
    }
}

/// Find `<base>_<TAG>.hwtp` files in a directory, sorted by tag.
fn variant_listing_files(dir: &Path, base_name: &str) -> Result<Vec<(VariantTag, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| HwtpError::file_read(dir, e))?;
    let prefix = format!("{base_name}_");

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HwtpError::file_read(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(LISTING_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(suffix) = stem.strip_prefix(&prefix) else {
            continue;
        };
        // the suffix must be exactly one tag, not a longer name ending in one
        match VariantTag::from_title(stem) {
            Some(tag) if tag.as_str() == suffix => found.push((tag, path)),
            _ => {}
        }
    }
    found.sort();
    Ok(found)
}
