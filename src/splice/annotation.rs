// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Gene annotation in the SpliceAI table format.
//!
//! ```text
//! #NAME	CHROM	STRAND	TX_START	TX_END	EXON_START	EXON_END
//! OR4F5	1	+	69090	70008	69090,	70008,
//! ```
//!
//! Starts are 0-based, ends 1-based (as in GenePred); both are kept 1-based in memory.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::errors::Error;
use crate::utils::genomics::match_chrom_style;

#[derive(Debug, Deserialize)]
struct AnnotationRow {
    #[serde(rename = "#NAME")]
    name: String,
    #[serde(rename = "CHROM")]
    chrom: String,
    #[serde(rename = "STRAND")]
    strand: String,
    #[serde(rename = "TX_START")]
    tx_start: i64,
    #[serde(rename = "TX_END")]
    tx_end: i64,
    #[serde(rename = "EXON_START")]
    exon_starts: String,
    #[serde(rename = "EXON_END")]
    exon_ends: String,
}

#[derive(Getters, CopyGetters, Debug, Clone, PartialEq)]
pub struct Gene {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    chrom: String,
    #[getset(get_copy = "pub")]
    strand: char,
    /// 1-based, inclusive
    #[getset(get_copy = "pub")]
    tx_start: i64,
    /// 1-based, inclusive
    #[getset(get_copy = "pub")]
    tx_end: i64,
    /// sorted, deduplicated 1-based exon starts and ends
    exon_boundaries: Vec<i64>,
}

impl Gene {
    pub fn contains(&self, pos: i64) -> bool {
        self.tx_start <= pos && pos <= self.tx_end
    }

    /// Offset from `pos` to the closest exon boundary; on ties the upstream one wins.
    pub fn exon_boundary_offset(&self, pos: i64) -> Option<i64> {
        self.exon_boundaries
            .iter()
            .map(|boundary| boundary - pos)
            .fold(None, |closest: Option<i64>, offset| match closest {
                Some(c) if c.abs() <= offset.abs() => Some(c),
                _ => Some(offset),
            })
    }
}

#[derive(Debug, Default)]
pub struct GeneAnnotation {
    genes: Vec<Gene>,
    by_chrom: HashMap<String, Vec<usize>>,
}

impl GeneAnnotation {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(path)
            .with_context(|| format!("error reading gene annotation {}", path.display()))?;

        let mut annotation = GeneAnnotation::default();
        for (i, row) in reader.deserialize::<AnnotationRow>().enumerate() {
            let line = i + 2;
            let row = row.with_context(|| {
                format!("error parsing line {} of gene annotation {}", line, path.display())
            })?;
            let invalid = |msg: &str| Error::InvalidGeneAnnotation {
                path: path.to_owned(),
                line,
                msg: msg.to_owned(),
            };

            let strand = match row.strand.as_str() {
                "+" => '+',
                "-" => '-',
                _ => return Err(invalid("strand must be '+' or '-'").into()),
            };
            let exon_starts = parse_positions(&row.exon_starts)
                .ok_or_else(|| invalid("EXON_START must be a comma-separated list of positions"))?;
            let exon_ends = parse_positions(&row.exon_ends)
                .ok_or_else(|| invalid("EXON_END must be a comma-separated list of positions"))?;
            if exon_starts.len() != exon_ends.len() {
                return Err(invalid("EXON_START and EXON_END differ in length").into());
            }

            annotation.push(Gene {
                name: row.name,
                chrom: row.chrom,
                strand,
                tx_start: row.tx_start + 1,
                tx_end: row.tx_end,
                exon_boundaries: exon_starts
                    .into_iter()
                    .map(|start| start + 1)
                    .chain(exon_ends)
                    .sorted()
                    .dedup()
                    .collect(),
            });
        }

        Ok(annotation)
    }

    fn push(&mut self, gene: Gene) {
        self.by_chrom
            .entry(gene.chrom.clone())
            .or_insert_with(Vec::new)
            .push(self.genes.len());
        self.genes.push(gene);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Genes whose transcript contains the given 1-based position, in table order.
    /// Chromosome names are matched with or without "chr" prefix.
    pub fn overlapping(&self, chrom: &str, pos: i64) -> Vec<&Gene> {
        let chrom = match self.genes.first() {
            Some(gene) => match_chrom_style(chrom, &gene.chrom),
            None => return Vec::new(),
        };
        self.by_chrom.get(&chrom).map_or_else(Vec::new, |idxs| {
            idxs.iter()
                .map(|i| &self.genes[*i])
                .filter(|gene| gene.contains(pos))
                .collect()
        })
    }
}

fn parse_positions(list: &str) -> Option<Vec<i64>> {
    list.split(',')
        .filter(|item| !item.is_empty())
        .map(|item| item.trim().parse().ok())
        .collect()
}
