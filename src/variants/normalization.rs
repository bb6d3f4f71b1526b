// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Trimming of VCF allele pairs into the minimal interval expected by annotation tools.
//!
//! VCF represents indels with a shared anchor base (e.g. `ATG -> AT` at 100), while
//! annotation inputs expect the edited bases only (`G -> -` at 102). The rules below
//! are applied in a fixed order:
//!
//! 1. REF starts or ends with ALT: deletion, REF loses the ALT bases.
//! 2. ALT starts or ends with REF: insertion, ALT loses the REF bases.
//! 3. Otherwise: complex substitution, shared suffix and then shared prefix are removed.

use super::NormalizedInterval;

/// Normalize the allele pair `ref_allele`/`alt_allele` located at 1-based `pos`.
///
/// Empty alleles are returned as empty strings; rendering them (e.g. as `-`) is up to the
/// caller.
pub fn normalize(ref_allele: &str, alt_allele: &str, pos: i64) -> NormalizedInterval {
    let mut start = pos;
    let mut ref_allele = ref_allele.to_owned();
    let mut alt_allele = alt_allele.to_owned();

    if ref_allele != alt_allele && (ref_allele.len() > 1 || alt_allele.len() > 1) {
        if ref_allele.starts_with(&alt_allele) || ref_allele.ends_with(&alt_allele) {
            if ref_allele.starts_with(&alt_allele) {
                start += alt_allele.len() as i64;
            }
            // Only the first occurrence is removed, even if ALT only matched as suffix.
            ref_allele = ref_allele.replacen(&alt_allele, "", 1);
            alt_allele.clear();
        } else if alt_allele.starts_with(&ref_allele) || alt_allele.ends_with(&ref_allele) {
            if alt_allele.starts_with(&ref_allele) {
                start += ref_allele.len() as i64 - 1;
            } else {
                start -= (alt_allele.len() - ref_allele.len()) as i64;
            }
            alt_allele = alt_allele.replacen(&ref_allele, "", 1);
            ref_allele.clear();
        } else {
            let suffix_len = shared_len(
                ref_allele.bytes().rev(),
                alt_allele.bytes().rev(),
            );
            ref_allele.truncate(ref_allele.len() - suffix_len);
            alt_allele.truncate(alt_allele.len() - suffix_len);

            let prefix_len = shared_len(ref_allele.bytes(), alt_allele.bytes());
            ref_allele.drain(..prefix_len);
            alt_allele.drain(..prefix_len);

            start += if prefix_len > 0 && ref_allele.is_empty() {
                prefix_len as i64 - 1
            } else {
                prefix_len as i64
            };
        }
    }

    NormalizedInterval::new(start, ref_allele, alt_allele)
}

/// Length of the run of equal bases at the beginning of both sequences.
///
/// The scan covers the full common length. Once a mismatch has been seen, later matches
/// no longer extend the run.
fn shared_len<A, B>(a: A, b: B) -> usize
where
    A: Iterator<Item = u8>,
    B: Iterator<Item = u8>,
{
    let mut len = 0;
    let mut stop = false;
    for (x, y) in a.zip(b) {
        if x != y {
            stop = true;
        }
        if x == y && !stop {
            len += 1;
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(
        (ref_allele, alt_allele, pos): (&str, &str, i64),
        (start, end, exp_ref, exp_alt): (i64, i64, &str, &str),
    ) {
        let interval = normalize(ref_allele, alt_allele, pos);
        assert_eq!(interval.start(), start, "start of {}>{}", ref_allele, alt_allele);
        assert_eq!(interval.end(), end, "end of {}>{}", ref_allele, alt_allele);
        assert_eq!(interval.ref_allele(), exp_ref);
        assert_eq!(interval.alt_allele(), exp_alt);
    }

    #[test]
    fn test_equal_alleles() {
        for allele in &["A", "AC", "ACGT"] {
            let interval = normalize(allele, allele, 100);
            assert_eq!(interval.start(), 100);
            assert_eq!(interval.ref_allele(), allele);
            assert_eq!(interval.alt_allele(), allele);
        }
    }

    #[test]
    fn test_snv() {
        check(("A", "G", 100), (100, 100, "A", "G"));
    }

    #[test]
    fn test_mnv() {
        // shared suffix and prefix, nothing in between survives trimming except the change
        check(("ATTC", "AGGC", 100), (101, 102, "TT", "GG"));
    }

    #[test]
    fn test_deletion() {
        check(("ATG", "AT", 100), (102, 102, "G", ""));
        check(("ATG", "A", 100), (101, 102, "TG", ""));
    }

    #[test]
    fn test_deletion_suffix_match() {
        // ALT matches at the end only: start stays, first occurrence is removed
        check(("GATA", "A", 10), (10, 12, "GTA", ""));
        check(("TGA", "GA", 10), (10, 10, "T", ""));
    }

    #[test]
    fn test_insertion() {
        check(("A", "ATG", 100), (100, 100, "", "TG"));
        check(("AC", "ACGT", 100), (101, 101, "", "GT"));
    }

    #[test]
    fn test_insertion_suffix_match() {
        check(("G", "AG", 100), (99, 99, "", "A"));
        check(("GT", "CAGT", 100), (98, 98, "", "CA"));
    }

    #[test]
    fn test_complex_substitution() {
        let interval = normalize("ACGT", "AGGA", 100);
        assert_eq!(interval.start(), 101);
        assert_eq!(interval.ref_allele(), "CGT");
        assert_eq!(interval.alt_allele(), "GGA");
        assert_eq!(
            interval.end() - interval.start(),
            interval.ref_allele().len() as i64 - 1
        );
    }

    #[test]
    fn test_complex_prefix_consumes_ref() {
        check(("AC", "ATC", 100), (100, 100, "", "T"));
    }

    #[test]
    fn test_symbolic_deletion_placeholder() {
        check(("AC", "-", 100), (100, 101, "AC", "-"));
    }

    #[test]
    fn test_idempotence() {
        for (ref_allele, alt_allele, pos) in &[
            ("ACGT", "AGGA", 100),
            ("ATG", "AT", 100),
            ("ATTC", "AGGC", 7),
            ("A", "G", 3),
        ] {
            let first = normalize(ref_allele, alt_allele, *pos);
            let second = normalize(first.ref_allele(), first.alt_allele(), first.start());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_shared_len_ignores_matches_after_mismatch() {
        assert_eq!(shared_len(b"ACGT".iter().cloned(), b"AGGT".iter().cloned()), 1);
        assert_eq!(shared_len(b"ACGT".iter().cloned(), b"ACGT".iter().cloned()), 4);
        assert_eq!(shared_len(b"TA".iter().cloned(), b"GA".iter().cloned()), 0);
    }
}
