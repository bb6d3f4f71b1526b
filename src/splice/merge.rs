// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Replace existing splice annotations of indels with fresh predictions.

use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info, warn};
use rust_htslib::bcf::{self, Read};

use crate::splice::{Predictor, SpliceVariant, DEFAULT_DISTANCE};
use crate::utils::bcf_utils;

pub const DEFAULT_SPLICEAI_TAG: &str = "SpliceAI";

/// Settings of an annotation merge.
#[derive(new, Getters, CopyGetters, Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// INFO tag holding the splice annotation.
    #[getset(get = "pub")]
    tag: String,
    #[getset(get_copy = "pub")]
    distance: u32,
    #[getset(get_copy = "pub")]
    mask: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            tag: DEFAULT_SPLICEAI_TAG.to_owned(),
            distance: DEFAULT_DISTANCE,
            mask: false,
        }
    }
}

fn is_symbolic(allele: &[u8]) -> bool {
    allele.starts_with(b"<")
        || allele.contains(&b'[')
        || allele.contains(&b']')
        || (allele.len() > 1 && (allele.starts_with(b".") || allele.ends_with(b".")))
}

/// Whether a record with the given alleles is an insertion or deletion.
///
/// Alternates are inspected in order: a missing allele (`.`) makes the record an indel,
/// a symbolic allele or breakend does not, and a sequence of different length does unless
/// the record is a structural variant. A record without alternates counts as missing.
pub fn is_indel<A: AsRef<[u8]>>(ref_allele: &[u8], alt_alleles: &[A], is_sv: bool) -> bool {
    if ref_allele.len() > 1 && !is_sv {
        return true;
    }
    if alt_alleles.is_empty() {
        return true;
    }
    for alt_allele in alt_alleles.iter().map(|allele| allele.as_ref()) {
        if alt_allele == b"." {
            return true;
        }
        if is_symbolic(alt_allele) {
            return false;
        }
        if alt_allele.len() != ref_allele.len() {
            return !is_sv;
        }
    }
    false
}

/// Annotate the VCF/BCF at `input` and write the result to `output` (VCF).
pub fn annotate<P, Q, T>(input: P, output: Q, predictor: &mut T, options: &MergeOptions) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Predictor,
{
    let mut reader = bcf::Reader::from_path(&input)
        .with_context(|| format!("error reading input VCF/BCF {}", input.as_ref().display()))?;
    let header = bcf::Header::from_template(reader.header());
    let mut writer = bcf::Writer::from_path(&output, &header, true, bcf::Format::Vcf)
        .with_context(|| format!("error writing output VCF {}", output.as_ref().display()))?;

    merge_records(&mut reader, &mut writer, predictor, options)
}

/// Stream all records from `reader` to `writer`, replacing the annotation of indels that
/// already carry one whenever the predictor yields scores.
pub fn merge_records<R: Read, T: Predictor>(
    reader: &mut R,
    writer: &mut bcf::Writer,
    predictor: &mut T,
    options: &MergeOptions,
) -> Result<()> {
    let tag = options.tag().as_bytes();
    let declared = bcf_utils::has_info_tag(reader.header(), tag);
    if !declared {
        warn!(
            "Input header does not declare INFO tag {}, records are copied unchanged.",
            options.tag()
        );
    }

    let mut record_count = 0;
    let mut candidate_count = 0;
    let mut replaced_count = 0;

    for (i, record) in reader.records().enumerate() {
        let mut record =
            record.with_context(|| format!("error reading {}-th record of input VCF/BCF", i + 1))?;
        record_count += 1;
        writer.translate(&mut record);

        if declared && is_candidate(&record, tag)? {
            candidate_count += 1;
            let variant = SpliceVariant::from_record(&record, i)?;
            let scores = predictor.predict(&variant, options.distance(), options.mask())?;
            if scores.is_empty() {
                debug!(
                    "No scores for {}:{}, keeping existing annotation.",
                    variant.chrom(),
                    variant.pos()
                );
            } else {
                let value = scores.iter().join(",");
                record.push_info_string(tag, &[value.as_bytes()])?;
                replaced_count += 1;
            }
        }

        writer
            .write(&record)
            .with_context(|| format!("error writing {}-th record", i + 1))?;
    }

    info!(
        "Processed {} records, {} annotated indels, {} annotations replaced.",
        record_count, candidate_count, replaced_count
    );

    Ok(())
}

/// Indel carrying a non-empty annotation in `tag`.
fn is_candidate(record: &bcf::Record, tag: &[u8]) -> Result<bool> {
    let annotated = match bcf_utils::info_values(record, tag)? {
        Some((_, values)) => values
            .iter()
            .flatten()
            .any(|value| !value.is_empty() && value != "."),
        None => false,
    };
    if !annotated {
        return Ok(false);
    }

    let alleles = record.alleles();
    Ok(is_indel(
        alleles[0],
        &alleles[1..],
        bcf_utils::is_sv_record(record)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_indel() {
        assert!(is_indel(b"ATG", &["A"], false));
        assert!(is_indel(b"A", &["AT"], false));
        assert!(!is_indel(b"A", &["T"], false));
        assert!(!is_indel(b"AC", &["GT"], true));
        assert!(is_indel(b"A", &["T", "TG"], false));
    }

    #[test]
    fn test_is_indel_special_alleles() {
        let no_alts: &[&str] = &[];
        assert!(is_indel(b"A", &["."], false));
        assert!(is_indel(b"A", no_alts, false));
        assert!(!is_indel(b"A", &["<DEL>"], false));
        assert!(!is_indel(b"A", &["A[1:100["], false));
        assert!(!is_indel(b"A", &["<INS>", "AT"], false));
        assert!(!is_indel(b"A", &["AT"], true));
    }

    #[test]
    fn test_default_options() {
        let options = MergeOptions::default();
        assert_eq!(options.tag(), "SpliceAI");
        assert_eq!(options.distance(), 50);
        assert!(!options.mask());
    }
}
