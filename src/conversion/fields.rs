// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Result;
use itertools::Itertools;
use rust_htslib::bcf;

use crate::errors;
use crate::utils::bcf_utils::{self, Multiplicity};

pub const DEFAULT_DEPTH_TAG: &str = "VD";
pub const DEFAULT_VAF_TAG: &str = "AF";

/// INFO tags holding total depth and variant allele frequency.
#[derive(new, Getters, Debug, Clone, PartialEq, Eq)]
pub struct FieldTags {
    #[getset(get = "pub")]
    depth: String,
    #[getset(get = "pub")]
    vaf: String,
}

impl Default for FieldTags {
    fn default() -> Self {
        FieldTags {
            depth: DEFAULT_DEPTH_TAG.to_owned(),
            vaf: DEFAULT_VAF_TAG.to_owned(),
        }
    }
}

/// Per-record annotations shared by all alternate alleles of the record.
#[derive(new, Getters, Debug, Clone, PartialEq, Eq)]
#[getset(get = "pub")]
pub struct AnnotationFields {
    depth: String,
    filter: String,
    qual: String,
    genotype: String,
}

impl AnnotationFields {
    /// Extract depth, FILTER, QUAL and the first sample's genotype from the given record.
    ///
    /// # Errors
    /// Any of the fields being absent is an error.
    pub fn extract(record: &bcf::Record, chrom: &str, tags: &FieldTags) -> Result<Self> {
        let depth_tag = tags.depth().as_bytes();
        let missing = || errors::missing_bcf_tag(depth_tag, chrom, record.pos() + 1);
        let depth = match bcf_utils::info_values(record, depth_tag)? {
            Some((Multiplicity::Scalar, mut values)) => values.swap_remove(0).ok_or_else(missing)?,
            Some((Multiplicity::PerAllele, values)) => values
                .iter()
                .map(|value| value.as_deref().unwrap_or("."))
                .join(","),
            None => return Err(missing().into()),
        };

        Ok(AnnotationFields {
            depth,
            filter: bcf_utils::filter_labels(record),
            qual: bcf_utils::qual(record, chrom)?,
            genotype: bcf_utils::first_sample_genotype(record, chrom)?,
        })
    }
}

/// Variant allele frequency of the alternate allele with the given index (0 = first ALT).
///
/// Tags declared with `Number=1` hold a single value that applies to every allele.
pub fn vaf(record: &bcf::Record, chrom: &str, tags: &FieldTags, alt_idx: usize) -> Result<String> {
    let vaf_tag = tags.vaf().as_bytes();
    let missing = || errors::missing_bcf_tag(vaf_tag, chrom, record.pos() + 1);
    let value = match bcf_utils::info_values(record, vaf_tag)? {
        Some((Multiplicity::Scalar, mut values)) => values.swap_remove(0),
        Some((Multiplicity::PerAllele, mut values)) => {
            if alt_idx < values.len() {
                values.swap_remove(alt_idx)
            } else {
                return Err(errors::invalid_bcf_record(
                    chrom,
                    record.pos() + 1,
                    &format!(
                        "{} has {} values, but ALT allele {} was requested",
                        tags.vaf(),
                        values.len(),
                        alt_idx + 1
                    ),
                )
                .into());
            }
        }
        None => None,
    };
    Ok(value.ok_or_else(missing)?)
}
