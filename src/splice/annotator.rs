// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fasta;
use derive_builder::Builder;
use log::{debug, warn};
use rust_htslib::bcf::{self, Read};

use crate::splice::annotation::{Gene, GeneAnnotation};
use crate::splice::merge::DEFAULT_SPLICEAI_TAG;
use crate::splice::scores::{unscored_entry, ScoreEntry};
use crate::splice::{Predictor, SpliceVariant};
use crate::utils::bcf_utils;
use crate::utils::genomics::normalize_chrom;

/// Flanking sequence considered around a variant, on top of twice the distance.
const CONTEXT_WIDTH: u64 = 10000;

/// Characters marking ALT alleles that cannot be scored.
const UNSCORABLE: &[char] = &['.', '-', '*', '<', '>'];

/// Splice effect predictor backed by precomputed SpliceAI scores.
///
/// Scores are looked up in an indexed VCF/BCF whose `SpliceAI` INFO field holds entries
/// of the form `ALLELE|SYMBOL|DS_AG|DS_AL|DS_DG|DS_DL|DP_AG|DP_AL|DP_DG|DP_DL`. The reference
/// genome and gene annotation decide which variants can be scored and which genes are
/// reported.
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct Annotator {
    #[builder(private)]
    fasta_reader: fasta::IndexedReader<fs::File>,
    #[builder(private)]
    contig_lens: HashMap<String, u64>,
    #[builder(private)]
    genes: GeneAnnotation,
    #[builder(private)]
    score_reader: bcf::IndexedReader,
}

impl AnnotatorBuilder {
    /// Reference genome (FASTA with .fai index).
    pub fn reference<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let fasta_reader = fasta::IndexedReader::from_file(&path).with_context(|| {
            format!("error reading reference genome {}", path.as_ref().display())
        })?;
        let contig_lens = fasta_reader
            .index
            .sequences()
            .into_iter()
            .map(|seq| (seq.name, seq.len))
            .collect();

        Ok(self.fasta_reader(fasta_reader).contig_lens(contig_lens))
    }

    /// Gene annotation table.
    pub fn annotation<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let genes = GeneAnnotation::from_path(path)?;
        debug!("Loaded {} genes.", genes.len());
        Ok(self.genes(genes))
    }

    /// Indexed VCF/BCF with precomputed scores.
    pub fn scores<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let score_reader = bcf::IndexedReader::from_path(&path).with_context(|| {
            format!(
                "error reading indexed SpliceAI scores {}",
                path.as_ref().display()
            )
        })?;
        Ok(self.score_reader(score_reader))
    }
}

impl Annotator {
    /// Name of the reference sequence for `chrom`, tolerating a differing "chr" prefix.
    fn contig(&self, chrom: &str) -> Option<String> {
        resolve_name(chrom, |name| self.contig_lens.contains_key(name))
    }

    /// Check the variant against the reference genome, logging why it cannot be scored.
    fn is_scorable(&mut self, variant: &SpliceVariant, distance: u32) -> Result<bool> {
        let contig = match self.contig(variant.chrom()) {
            Some(contig) => contig,
            None => {
                warn!(
                    "Skipping record {}:{}: chromosome not found in reference genome.",
                    variant.chrom(),
                    variant.pos()
                );
                return Ok(false);
            }
        };
        let contig_len = self.contig_lens[&contig];
        let ref_len = variant.ref_allele().len() as u64;
        let start = (variant.pos() - 1) as u64;

        let flank = (CONTEXT_WIDTH + 2 * u64::from(distance) + 1) / 2;
        if start < flank || start + 1 + flank > contig_len {
            warn!(
                "Skipping record {}:{}: too close to chromosome end.",
                variant.chrom(),
                variant.pos()
            );
            return Ok(false);
        }

        let mut seq = Vec::new();
        self.fasta_reader
            .fetch(&contig, start, (start + ref_len).min(contig_len))?;
        self.fasta_reader.read(&mut seq)?;
        if !seq.eq_ignore_ascii_case(variant.ref_allele().as_bytes()) {
            warn!(
                "Skipping record {}:{}: reference allele {} does not match reference genome ({}).",
                variant.chrom(),
                variant.pos(),
                variant.ref_allele(),
                String::from_utf8_lossy(&seq)
            );
            return Ok(false);
        }

        if ref_len > 2 * u64::from(distance) {
            warn!(
                "Skipping record {}:{}: reference allele longer than twice the distance.",
                variant.chrom(),
                variant.pos()
            );
            return Ok(false);
        }

        Ok(true)
    }

    /// Precomputed entries recorded for the variant's position and reference allele.
    fn lookup_scores(&mut self, variant: &SpliceVariant) -> Result<Vec<ScoreEntry>> {
        let header = self.score_reader.header().clone();
        let rid = match resolve_name(variant.chrom(), |name| {
            header.name2rid(name.as_bytes()).is_ok()
        }) {
            Some(name) => header.name2rid(name.as_bytes())?,
            None => return Ok(Vec::new()),
        };
        let start = (variant.pos() - 1) as u64;
        self.score_reader.fetch(rid, start, Some(start + 1))?;

        let mut entries = Vec::new();
        for record in self.score_reader.records() {
            let record = record.context("error reading SpliceAI score record")?;
            if record.pos() + 1 != variant.pos()
                || record.alleles()[0] != variant.ref_allele().as_bytes()
            {
                continue;
            }
            if let Some((_, values)) =
                bcf_utils::info_values(&record, DEFAULT_SPLICEAI_TAG.as_bytes())?
            {
                for value in values.into_iter().flatten() {
                    if let Some(entry) = ScoreEntry::parse(&value)? {
                        entries.push(entry);
                    }
                }
            }
        }

        Ok(entries)
    }
}

/// Resolve `chrom` to a known name, trying it as is, then without and with "chr" prefix.
fn resolve_name<F: Fn(&str) -> bool>(chrom: &str, is_known: F) -> Option<String> {
    let stripped = normalize_chrom(chrom);
    [
        chrom.to_owned(),
        stripped.to_owned(),
        format!("chr{}", stripped),
    ]
    .iter()
    .find(|name| is_known(name))
    .cloned()
}

/// Delta score entries of all scorable ALT alleles of `variant` for the given genes.
pub(crate) fn delta_entries(
    variant: &SpliceVariant,
    genes: &[&Gene],
    scores: &[ScoreEntry],
    distance: u32,
    mask: bool,
) -> Vec<String> {
    let mut entries = Vec::new();
    for alt_allele in variant.alt_alleles() {
        if alt_allele.contains(UNSCORABLE) {
            continue;
        }
        for gene in genes {
            if variant.ref_allele().len() > 1 && alt_allele.len() > 1 {
                entries.push(unscored_entry(alt_allele, gene.name()));
                continue;
            }
            let score = scores
                .iter()
                .find(|score| score.allele() == alt_allele && score.gene() == gene.name());
            match score {
                Some(score) => {
                    let boundary_offset = if mask {
                        gene.exon_boundary_offset(variant.pos())
                    } else {
                        None
                    };
                    entries.push(score.adjusted(distance, boundary_offset).to_string());
                }
                None => debug!(
                    "No precomputed score for {}:{} {}>{} in {}.",
                    variant.chrom(),
                    variant.pos(),
                    variant.ref_allele(),
                    alt_allele,
                    gene.name()
                ),
            }
        }
    }
    entries
}

impl Predictor for Annotator {
    fn predict(
        &mut self,
        variant: &SpliceVariant,
        distance: u32,
        mask: bool,
    ) -> Result<Vec<String>> {
        let genes = self
            .genes
            .overlapping(variant.chrom(), variant.pos())
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if genes.is_empty() {
            debug!(
                "No gene annotated at {}:{}.",
                variant.chrom(),
                variant.pos()
            );
            return Ok(Vec::new());
        }
        if !self.is_scorable(variant, distance)? {
            return Ok(Vec::new());
        }

        let scores = self.lookup_scores(variant)?;
        let genes = genes.iter().collect::<Vec<_>>();
        Ok(delta_entries(variant, &genes, &scores, distance, mask))
    }
}
