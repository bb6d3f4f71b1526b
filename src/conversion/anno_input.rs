// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Convert VCF/BCF records into annotation inputs.
//!
//! Every alternate allele of a record on a primary contig yields one line:
//!
//! ```text
//! chr1	102	102	G	-	DEPTH=35;VAF=0.25;FILTER=PASS;QUAL=50;GT=0/1;RAW=chr1:100:ATG:AT
//! ```
//!
//! The first five columns hold the normalized interval, the last one the sample
//! annotations and the unnormalized variant.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use rust_htslib::bcf::{self, Read};

use crate::conversion::fields::{self, AnnotationFields, FieldTags};
use crate::utils::bcf_utils;
use crate::utils::SimpleCounter;
use crate::variants::filter::{self, SkipReason, EMPTY_ALLELE};
use crate::variants::{NormalizedInterval, Variant};

/// One line of annotation input.
#[derive(new, Getters, Debug, Clone, PartialEq, Eq)]
#[getset(get = "pub")]
pub struct AnnoInputRecord {
    chrom: String,
    interval: NormalizedInterval,
    vaf: String,
    fields: AnnotationFields,
    raw: String,
}

fn or_placeholder(allele: &str) -> &str {
    if allele.is_empty() {
        EMPTY_ALLELE
    } else {
        allele
    }
}

impl fmt::Display for AnnoInputRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\tDEPTH={};VAF={};FILTER={};QUAL={};GT={};RAW={}",
            self.chrom,
            self.interval.start(),
            self.interval.end(),
            or_placeholder(self.interval.ref_allele()),
            or_placeholder(self.interval.alt_allele()),
            self.fields.depth(),
            self.vaf,
            self.fields.filter(),
            self.fields.qual(),
            self.fields.genotype(),
            self.raw,
        )
    }
}

/// Convert the VCF/BCF at `vcf` into annotation input written to `anno_input`.
pub fn to_anno_input<P: AsRef<Path>, Q: AsRef<Path>>(
    vcf: P,
    anno_input: Q,
    tags: &FieldTags,
) -> Result<()> {
    let mut reader = bcf::Reader::from_path(&vcf)
        .with_context(|| format!("error reading input VCF/BCF {}", vcf.as_ref().display()))?;
    let out = File::create(&anno_input).with_context(|| {
        format!(
            "error creating annotation input {}",
            anno_input.as_ref().display()
        )
    })?;
    let mut writer = io::BufWriter::new(out);

    write_anno_input(&mut reader, &mut writer, tags)?;
    writer.flush()?;

    Ok(())
}

/// Stream all records of `reader` into `writer`, one line per surviving ALT allele,
/// preserving the input order.
pub fn write_anno_input<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    tags: &FieldTags,
) -> Result<()> {
    let mut skips = SimpleCounter::default();
    let mut record_count = 0;
    let mut line_count = 0;

    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("error reading {}-th record of input VCF/BCF", i + 1))?;
        record_count += 1;

        for line in record_to_anno_input(&record, i, tags, &mut skips)? {
            writeln!(writer, "{}", line)?;
            line_count += 1;
        }
    }

    info!(
        "Converted {} records into {} annotation input lines ({} records or alleles skipped).",
        record_count,
        line_count,
        skips.total_count()
    );
    skips.log_summary("records or alleles");

    Ok(())
}

/// Annotation input lines for a single record.
pub(crate) fn record_to_anno_input(
    record: &bcf::Record,
    i: usize,
    tags: &FieldTags,
    skips: &mut SimpleCounter<SkipReason>,
) -> Result<Vec<AnnoInputRecord>> {
    let chrom = bcf_utils::get_chrom(record, i)?;
    let pos = record.pos() + 1;

    if !filter::is_primary_contig(&chrom) {
        debug!("Skipping record {}:{} on non-primary contig.", chrom, pos);
        skips.incr(SkipReason::NonPrimaryContig);
        return Ok(Vec::new());
    }

    let fields = AnnotationFields::extract(record, &chrom, tags)?;

    let alleles = record.alleles();
    let ref_allele = String::from_utf8_lossy(alleles[0]).into_owned();

    let mut lines = Vec::with_capacity(alleles.len() - 1);
    for (alt_idx, alt_allele) in alleles.iter().skip(1).enumerate() {
        let alt_allele = match filter::effective_alt_allele(alt_allele) {
            Some(alt_allele) => alt_allele,
            None => {
                debug!(
                    "Skipping ALT allele {} of record {}:{}.",
                    String::from_utf8_lossy(alt_allele),
                    chrom,
                    pos
                );
                skips.incr(SkipReason::NonNucleotideAllele);
                continue;
            }
        };

        let variant = Variant::new(chrom.clone(), pos, ref_allele.clone(), alt_allele);
        let vaf = fields::vaf(record, &chrom, tags, alt_idx)?;
        lines.push(AnnoInputRecord::new(
            chrom.clone(),
            variant.normalize(),
            vaf,
            fields.clone(),
            variant.raw(),
        ));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::normalize;

    fn fields() -> AnnotationFields {
        AnnotationFields::new(
            "35".to_owned(),
            "PASS".to_owned(),
            "50".to_owned(),
            "0/1".to_owned(),
        )
    }

    #[test]
    fn test_deletion_line() {
        let record = AnnoInputRecord::new(
            "chr1".to_owned(),
            normalize("ATG", "AT", 100),
            "0.25".to_owned(),
            fields(),
            "chr1:100:ATG:AT".to_owned(),
        );
        assert_eq!(
            record.to_string(),
            "chr1\t102\t102\tG\t-\tDEPTH=35;VAF=0.25;FILTER=PASS;QUAL=50;GT=0/1;RAW=chr1:100:ATG:AT"
        );
    }

    #[test]
    fn test_insertion_line() {
        let record = AnnoInputRecord::new(
            "7".to_owned(),
            normalize("A", "ATG", 100),
            "1.0".to_owned(),
            AnnotationFields::new(
                "12".to_owned(),
                "LowQual,q10".to_owned(),
                "3.5".to_owned(),
                "1/1".to_owned(),
            ),
            "7:100:A:ATG".to_owned(),
        );
        assert_eq!(
            record.to_string(),
            "7\t100\t100\t-\tTG\tDEPTH=12;VAF=1.0;FILTER=LowQual,q10;QUAL=3.5;GT=1/1;RAW=7:100:A:ATG"
        );
    }

    #[test]
    fn test_snv_line() {
        let record = AnnoInputRecord::new(
            "chrX".to_owned(),
            normalize("C", "T", 5),
            "0.5".to_owned(),
            fields(),
            "chrX:5:C:T".to_owned(),
        );
        assert!(record.to_string().starts_with("chrX\t5\t5\tC\tT\t"));
    }
}
