// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Splice effect annotation of indels.
//!
//! Predictions are obtained through the [`Predictor`] trait. [`annotator::Annotator`]
//! implements it on top of a reference genome, the SpliceAI gene annotation table and a
//! table of precomputed SpliceAI scores.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rust_htslib::bcf;

use crate::utils::bcf_utils;

pub mod annotation;
pub mod annotator;
pub mod merge;
pub mod scores;

pub const DEFAULT_DISTANCE: u32 = 50;

/// Genome build of reference and annotation. Parsed case-insensitively from
/// `grch37`/`hg19` and `grch38`/`hg38`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum GenomeBuild {
    #[strum(to_string = "grch37", serialize = "hg19")]
    GRCh37,
    #[strum(to_string = "grch38", serialize = "hg38")]
    GRCh38,
}

impl Default for GenomeBuild {
    fn default() -> Self {
        GenomeBuild::GRCh38
    }
}

/// Gene annotation table that belongs to the given build when none is given explicitly:
/// `<build>.txt` next to the reference genome.
pub fn default_annotation_path<P: AsRef<Path>>(reference: P, build: GenomeBuild) -> PathBuf {
    reference
        .as_ref()
        .with_file_name(format!("{}.txt", build))
}

/// A VCF record reduced to what a predictor needs.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct SpliceVariant {
    #[getset(get = "pub")]
    chrom: String,
    #[getset(get_copy = "pub")]
    pos: i64,
    #[getset(get = "pub")]
    ref_allele: String,
    #[getset(get = "pub")]
    alt_alleles: Vec<String>,
}

impl SpliceVariant {
    pub(crate) fn from_record(record: &bcf::Record, i: usize) -> Result<Self> {
        let alleles = record.alleles();
        Ok(SpliceVariant {
            chrom: bcf_utils::get_chrom(record, i)?,
            pos: record.pos() + 1,
            ref_allele: String::from_utf8_lossy(alleles[0]).into_owned(),
            alt_alleles: alleles[1..]
                .iter()
                .map(|allele| String::from_utf8_lossy(allele).into_owned())
                .collect(),
        })
    }
}

/// Splice effect predictor.
pub trait Predictor {
    /// Delta score entries (one per ALT allele and gene) for the given variant, considering
    /// splice sites at most `distance` bases away. With `mask`, gains of annotated and
    /// losses of unannotated splice sites are set to zero. An empty result means
    /// that nothing could be predicted.
    fn predict(&mut self, variant: &SpliceVariant, distance: u32, mask: bool)
        -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_genome_build_aliases() {
        assert_eq!(GenomeBuild::from_str("grch37").unwrap(), GenomeBuild::GRCh37);
        assert_eq!(GenomeBuild::from_str("hg19").unwrap(), GenomeBuild::GRCh37);
        assert_eq!(GenomeBuild::from_str("GRCh38").unwrap(), GenomeBuild::GRCh38);
        assert_eq!(GenomeBuild::from_str("hg38").unwrap(), GenomeBuild::GRCh38);
        assert!(GenomeBuild::from_str("hg18").is_err());
    }

    #[test]
    fn test_genome_build_display() {
        assert_eq!(GenomeBuild::GRCh37.to_string(), "grch37");
        assert_eq!(GenomeBuild::from_str("hg38").unwrap().to_string(), "grch38");
    }

    #[test]
    fn test_default_annotation_path() {
        assert_eq!(
            default_annotation_path("/data/ref/hg38.fa", GenomeBuild::GRCh38),
            PathBuf::from("/data/ref/grch38.txt")
        );
    }
}
