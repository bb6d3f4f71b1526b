// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! SpliceAI delta score entries of the form
//! `ALLELE|SYMBOL|DS_AG|DS_AL|DS_DG|DS_DL|DP_AG|DP_AL|DP_DG|DP_DL`.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use itertools::Itertools;

use crate::errors::Error;

const FIELD_COUNT: usize = 10;

/// Delta scores and positions of one ALT allele with respect to one gene.
/// Scores and positions are ordered acceptor gain, acceptor loss, donor gain, donor loss.
#[derive(Getters, CopyGetters, Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    #[getset(get = "pub")]
    allele: String,
    #[getset(get = "pub")]
    gene: String,
    #[getset(get_copy = "pub")]
    scores: [f64; 4],
    #[getset(get_copy = "pub")]
    positions: [i64; 4],
}

impl ScoreEntry {
    pub fn new(allele: String, gene: String, scores: [f64; 4], positions: [i64; 4]) -> Self {
        ScoreEntry {
            allele,
            gene,
            scores,
            positions,
        }
    }

    /// Parse an entry. Entries without scores (`.` fields) yield `None`.
    pub fn parse(entry: &str) -> Result<Option<Self>> {
        let invalid = |msg: &str| Error::InvalidSpliceScore {
            entry: entry.to_owned(),
            msg: msg.to_owned(),
        };

        let fields = entry.split('|').collect_vec();
        if fields.len() != FIELD_COUNT {
            return Err(invalid(&format!("expected {} fields", FIELD_COUNT)).into());
        }
        if fields[2..].iter().any(|field| *field == ".") {
            return Ok(None);
        }

        let mut scores = [0.0; 4];
        let mut positions = [0; 4];
        for k in 0..4 {
            scores[k] = f64::from_str(fields[2 + k])
                .map_err(|_| invalid("delta scores must be floats"))?;
            positions[k] = i64::from_str(fields[6 + k])
                .map_err(|_| invalid("delta positions must be integers"))?;
        }

        Ok(Some(ScoreEntry::new(
            fields[0].to_owned(),
            fields[1].to_owned(),
            scores,
            positions,
        )))
    }

    /// Entry restricted to splice sites within `distance` of the variant.
    ///
    /// With `boundary_offset` given (the offset of the closest annotated exon boundary),
    /// gains at that boundary and losses elsewhere are set to zero.
    pub fn adjusted(&self, distance: u32, boundary_offset: Option<i64>) -> Self {
        let mut adjusted = self.clone();
        for k in 0..4 {
            if self.positions[k].abs() > i64::from(distance) {
                adjusted.scores[k] = 0.0;
            }
        }
        if let Some(offset) = boundary_offset {
            // acceptor gain, donor gain
            for k in [0, 2].iter() {
                if self.positions[*k] == offset {
                    adjusted.scores[*k] = 0.0;
                }
            }
            // acceptor loss, donor loss
            for k in [1, 3].iter() {
                if self.positions[*k] != offset {
                    adjusted.scores[*k] = 0.0;
                }
            }
        }
        adjusted
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}|{}|{:.2}|{:.2}|{:.2}|{:.2}|{}|{}|{}|{}",
            self.allele,
            self.gene,
            self.scores[0],
            self.scores[1],
            self.scores[2],
            self.scores[3],
            self.positions[0],
            self.positions[1],
            self.positions[2],
            self.positions[3],
        )
    }
}

/// Entry reported for a multi-base substitution, which cannot be scored.
pub fn unscored_entry(allele: &str, gene: &str) -> String {
    format!("{}|{}|.|.|.|.|.|.|.|.", allele, gene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let entry = ScoreEntry::parse("T|BRCA1|0.01|0.00|0.84|0.20|-3|12|1|-40")
            .unwrap()
            .unwrap();
        assert_eq!(entry.allele(), "T");
        assert_eq!(entry.gene(), "BRCA1");
        assert_eq!(entry.scores(), [0.01, 0.0, 0.84, 0.2]);
        assert_eq!(entry.positions(), [-3, 12, 1, -40]);
    }

    #[test]
    fn test_parse_unscored() {
        assert!(ScoreEntry::parse("AT|BRCA1|.|.|.|.|.|.|.|.")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ScoreEntry::parse("T|BRCA1|0.01").is_err());
        assert!(ScoreEntry::parse("T|BRCA1|high|0.00|0.84|0.20|-3|12|1|-40").is_err());
    }

    #[test]
    fn test_display() {
        let entry = ScoreEntry::new(
            "T".to_owned(),
            "BRCA1".to_owned(),
            [0.014, 0.0, 0.836, 0.2],
            [-3, 12, 1, -40],
        );
        assert_eq!(entry.to_string(), "T|BRCA1|0.01|0.00|0.84|0.20|-3|12|1|-40");
    }

    #[test]
    fn test_adjusted_distance() {
        let entry = ScoreEntry::new(
            "T".to_owned(),
            "G".to_owned(),
            [0.5, 0.5, 0.5, 0.5],
            [-3, 12, 1, -40],
        );
        assert_eq!(entry.adjusted(10, None).scores(), [0.5, 0.0, 0.5, 0.0]);
        assert_eq!(entry.adjusted(50, None).scores(), [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_adjusted_mask() {
        let entry = ScoreEntry::new(
            "T".to_owned(),
            "G".to_owned(),
            [0.5, 0.5, 0.5, 0.5],
            [12, 12, -3, -3],
        );
        // gain at the annotated boundary and loss elsewhere are masked
        assert_eq!(entry.adjusted(50, Some(12)).scores(), [0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_unscored_entry() {
        assert_eq!(unscored_entry("AT", "BRCA1"), "AT|BRCA1|.|.|.|.|.|.|.|.");
    }
}
