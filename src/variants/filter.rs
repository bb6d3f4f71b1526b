// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use regex::bytes::Regex;

/// Symbolic ALT allele for deletions.
pub const SYMBOLIC_DELETION: &[u8] = b"<DEL>";
/// Placeholder for an empty allele in annotation inputs.
pub const EMPTY_ALLELE: &str = "-";

const CHROM_PREFIX: &str = "chr";
const MAX_PREFIXED_CHROM_LEN: usize = 5;
const MAX_PLAIN_CHROM_LEN: usize = 2;

lazy_static! {
    static ref NON_NUCLEOTIDE: Regex = Regex::new("[^ATGC]").unwrap();
}

#[derive(Hash, PartialEq, Eq, EnumIter, Display, Debug, Clone, Copy)]
pub enum SkipReason {
    #[strum(serialize = "records on non-primary contigs")]
    NonPrimaryContig,
    #[strum(serialize = "alleles with bases other than A, C, G, T")]
    NonNucleotideAllele,
}

/// Whether the given chromosome is a primary assembly contig (e.g. `chr1`, `chrX`, `22`, `MT`),
/// judged by the length of its name.
///
/// # Example
/// assert!(!is_primary_contig("chr1_random"));
pub fn is_primary_contig(chrom: &str) -> bool {
    if chrom.starts_with(CHROM_PREFIX) {
        chrom.len() <= MAX_PREFIXED_CHROM_LEN
    } else {
        chrom.len() <= MAX_PLAIN_CHROM_LEN
    }
}

/// Effective ALT allele to normalize, or `None` if the allele has to be skipped.
///
/// Alleles consisting of uppercase A, C, G, T are kept as they are, `<DEL>` becomes `-`.
pub fn effective_alt_allele(alt_allele: &[u8]) -> Option<String> {
    if NON_NUCLEOTIDE.is_match(alt_allele) {
        if alt_allele == SYMBOLIC_DELETION {
            Some(EMPTY_ALLELE.to_owned())
        } else {
            None
        }
    } else {
        Some(String::from_utf8_lossy(alt_allele).into_owned())
    }
}
