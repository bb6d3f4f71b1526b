//! genomics.rs
//!
//! Utility functions for contig naming

const CHROM_PREFIX: &str = "chr";

/// Strip "chr" prefix, so both "chr1" and "1" normalize to "1".
pub(crate) fn normalize_chrom(chrom: &str) -> &str {
    chrom.trim_start_matches(CHROM_PREFIX)
}

/// Rename `chrom` to follow the naming style (with or without "chr") of `template`.
///
/// # Example
/// assert_eq!(match_chrom_style("chr1", "1"), "1");
/// assert_eq!(match_chrom_style("1", "chrX"), "chr1");
pub(crate) fn match_chrom_style(chrom: &str, template: &str) -> String {
    match (
        chrom.starts_with(CHROM_PREFIX),
        template.starts_with(CHROM_PREFIX),
    ) {
        (true, false) => normalize_chrom(chrom).to_owned(),
        (false, true) => format!("{}{}", CHROM_PREFIX, chrom),
        _ => chrom.to_owned(),
    }
}
