// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

pub mod filter;
pub mod normalization;

pub use normalization::normalize;

/// A single VCF allele pair at a 1-based position.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    #[getset(get = "pub")]
    chrom: String,
    #[getset(get_copy = "pub")]
    pos: i64,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_allele: String,
}

impl Variant {
    /// Normalize this variant into its minimal interval.
    pub fn normalize(&self) -> NormalizedInterval {
        normalize(&self.ref_allele, &self.alt_allele, self.pos)
    }

    /// The unnormalized `chrom:pos:ref:alt` representation.
    pub fn raw(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

/// Minimal interval of a variant, as produced by [`normalize`].
///
/// Empty alleles are stored as empty strings. Start and end are 1-based and inclusive;
/// for pure insertions (empty ref), end equals start.
#[derive(Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInterval {
    #[getset(get_copy = "pub")]
    start: i64,
    #[getset(get_copy = "pub")]
    end: i64,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_allele: String,
}

impl NormalizedInterval {
    pub(crate) fn new(start: i64, ref_allele: String, alt_allele: String) -> Self {
        let end = if ref_allele.is_empty() {
            start
        } else {
            start + ref_allele.len() as i64 - 1
        };
        NormalizedInterval {
            start,
            end,
            ref_allele,
            alt_allele,
        }
    }
}
