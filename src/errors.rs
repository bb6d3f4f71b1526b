// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum Error {
    #[error("expected tag {name} missing from BCF record at {chrom}:{pos}")]
    MissingBCFTag {
        name: String,
        chrom: String,
        pos: i64,
    },
    #[error("invalid BCF record at {chrom}:{pos}: {msg}")]
    InvalidBCFRecord {
        chrom: String,
        pos: i64,
        msg: String,
    },
    #[error("record {i} in VCF/BCF does not define a chromosome")]
    RecordMissingChrom { i: usize },
    #[error("record at {chrom}:{pos} has no QUAL value")]
    MissingQual { chrom: String, pos: i64 },
    #[error("VCF/BCF header does not define any sample, but a genotype is required")]
    MissingSample,
    #[error("unsupported type of tag {name}: only Integer, Float and String values can be rendered")]
    UnsupportedTagType { name: String },
    #[error("invalid mask value {value}, must be 0 or 1")]
    InvalidMask { value: u8 },
    #[error("invalid gene annotation in line {line} of {path}: {msg}")]
    InvalidGeneAnnotation {
        path: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("invalid SpliceAI score entry '{entry}': {msg}")]
    InvalidSpliceScore { entry: String, msg: String },
}

pub(crate) fn invalid_bcf_record(chrom: &str, pos: i64, msg: &str) -> Error {
    Error::InvalidBCFRecord {
        chrom: chrom.to_owned(),
        pos,
        msg: msg.to_owned(),
    }
}

pub(crate) fn missing_bcf_tag(name: &[u8], chrom: &str, pos: i64) -> Error {
    Error::MissingBCFTag {
        name: String::from_utf8_lossy(name).into_owned(),
        chrom: chrom.to_owned(),
        pos,
    }
}
