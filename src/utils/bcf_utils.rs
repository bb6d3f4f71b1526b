//! bcf_utils.rs
//!
//! Utilities for VCF/BCF record handling.
//!
//! This module provides:
//! 1. Chromosome name resolution
//! 2. Rendering of INFO values according to their header declaration
//! 3. FILTER, QUAL and genotype projections

use anyhow::Result;
use itertools::Itertools;
use rust_htslib::bcf::{self, header::HeaderView, record::Numeric};

use crate::errors::{self, Error};
use crate::utils::{format_f32, format_qual};

/// Number of values an INFO tag carries per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Multiplicity {
    /// Exactly one value (`Number=1`).
    Scalar,
    /// Any other declaration (`Number=A`, `R`, `.`, or fixed counts > 1).
    PerAllele,
}

/// Get chromosome name from a VCF record
///
/// # Arguments
/// * `record` - VCF record
/// * `i` - Index of the record in the file (for error messages)
///
/// # Errors
/// Returns error if the RID is missing or cannot be resolved.
pub(crate) fn get_chrom(record: &bcf::Record, i: usize) -> Result<String> {
    let rid = record.rid().ok_or(Error::RecordMissingChrom { i })?;
    let chrom_bytes = record.header().rid2name(rid)?;
    Ok(String::from_utf8_lossy(chrom_bytes).into_owned())
}

/// Whether the header declares the given INFO tag.
pub(crate) fn has_info_tag(header: &HeaderView, tag: &[u8]) -> bool {
    header.info_type(tag).is_ok()
}

/// Rendered values of an INFO tag, `None` if the record does not carry it or the header
/// does not declare it.
///
/// Integers are printed as is, floats via [`format_f32`], strings are split at commas.
/// Missing numeric entries (`.`) are kept in place as `None`, so that the other values of a
/// per-allele tag stay usable.
pub(crate) fn info_values(
    record: &bcf::Record,
    tag: &[u8],
) -> Result<Option<(Multiplicity, Vec<Option<String>>)>> {
    let (tag_type, tag_length) = match record.header().info_type(tag) {
        Ok(declaration) => declaration,
        Err(_) => return Ok(None),
    };
    let multiplicity = match tag_length {
        bcf::header::TagLength::Fixed(1) => Multiplicity::Scalar,
        _ => Multiplicity::PerAllele,
    };

    let values = match tag_type {
        bcf::header::TagType::Integer => record.info(tag).integer()?.map(|values| {
            values
                .iter()
                .map(|v| if v.is_missing() { None } else { Some(v.to_string()) })
                .collect_vec()
        }),
        bcf::header::TagType::Float => record.info(tag).float()?.map(|values| {
            values
                .iter()
                .map(|v| if v.is_missing() { None } else { Some(format_f32(*v)) })
                .collect_vec()
        }),
        bcf::header::TagType::String => record.info(tag).string()?.map(|values| {
            values
                .iter()
                .map(|v| Some(String::from_utf8_lossy(v).into_owned()))
                .collect_vec()
        }),
        bcf::header::TagType::Flag => {
            return Err(Error::UnsupportedTagType {
                name: String::from_utf8_lossy(tag).into_owned(),
            }
            .into())
        }
    };

    Ok(values
        .filter(|values| !values.is_empty())
        .map(|values| (multiplicity, values)))
}

/// FILTER labels joined by comma. `PASS` and an unset FILTER both yield `PASS`.
/// Labels keep their order of appearance in the record.
pub(crate) fn filter_labels(record: &bcf::Record) -> String {
    let header = record.header();
    let labels = record
        .filters()
        .map(|id| String::from_utf8_lossy(&header.id_to_name(id)).into_owned())
        .filter(|label| label != "PASS")
        .join(",");
    if labels.is_empty() {
        "PASS".to_owned()
    } else {
        labels
    }
}

/// QUAL rendered via [`format_qual`].
pub(crate) fn qual(record: &bcf::Record, chrom: &str) -> Result<String> {
    let qual = record.qual();
    if qual.is_missing() || qual.is_nan() {
        return Err(Error::MissingQual {
            chrom: chrom.to_owned(),
            pos: record.pos() + 1,
        }
        .into());
    }
    Ok(format_qual(qual))
}

/// Allele indices of the first sample, joined by `/` regardless of phasing.
/// Missing alleles are rendered as `.`.
pub(crate) fn first_sample_genotype(record: &bcf::Record, chrom: &str) -> Result<String> {
    if record.header().sample_count() == 0 {
        return Err(Error::MissingSample.into());
    }
    let genotypes = record
        .genotypes()
        .map_err(|_| errors::missing_bcf_tag(b"GT", chrom, record.pos() + 1))?;
    let genotype = genotypes.get(0);
    if genotype.is_empty() {
        return Err(errors::missing_bcf_tag(b"GT", chrom, record.pos() + 1).into());
    }
    Ok(genotype
        .iter()
        .map(|allele| match allele.index() {
            Some(index) => index.to_string(),
            None => ".".to_owned(),
        })
        .join("/"))
}

/// Whether the record describes a structural variant (carries an SVTYPE).
pub(crate) fn is_sv_record(record: &bcf::Record) -> Result<bool> {
    if !has_info_tag(record.header(), b"SVTYPE") {
        return Ok(false);
    }
    Ok(record.info(b"SVTYPE").string()?.is_some())
}
