//! Per-variant listings.
//!
//! A workbook can describe several hardware variants at once: sheets whose
//! title ends in a short uppercase code (`dio_g_DigIn_u8_DZC`,
//! `pio_g_FreqIn_s_MAN`) belong to that variant only, every other sheet is
//! common. Each variant gets a listing with the common sections and its own.

use std::collections::BTreeSet;

use crate::listing::{Listing, VariantTag};

/// A listing filtered down to one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantListing {
    pub tag: VariantTag,
    pub listing: Listing,
}

/// Distinct variant tags in a listing, sorted.
pub fn variant_tags(listing: &Listing) -> Vec<VariantTag> {
    listing
        .sections
        .iter()
        .filter_map(|s| s.tag().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Split a master listing into one listing per variant tag.
///
/// Each result holds, in original order, every untagged section plus the
/// sections carrying its tag. Returns nothing when no section is tagged.
pub fn partition(master: &Listing) -> Vec<VariantListing> {
    let tags = variant_tags(master);
    if tags.is_empty() {
        tracing::info!("no project variants detected");
        return Vec::new();
    }
    tracing::info!(
        count = tags.len(),
        variants = %tags.iter().map(VariantTag::as_str).collect::<Vec<_>>().join(", "),
        "detected project variants"
    );

    tags.into_iter()
        .map(|tag| {
            let sections = master
                .sections
                .iter()
                .filter(|s| s.tag().map_or(true, |t| *t == tag))
                .cloned()
                .collect();
            VariantListing {
                tag,
                listing: Listing::new(sections),
            }
        })
        .collect()
}
