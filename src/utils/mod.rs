// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::ops::Deref;

use itertools::Itertools;
use log::info;
use strum::IntoEnumIterator;

pub(crate) mod bcf_utils;
pub(crate) mod genomics;

/// Render a float the way annotation tools print it in their own outputs:
/// shortest round-trip representation, integral values with a trailing `.0`,
/// and exponent notation (`1e-05`, `1.5e+16`) outside of [1e-4, 1e16).
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_owned()
        } else if value > 0.0 {
            "inf".to_owned()
        } else {
            "-inf".to_owned()
        };
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let repr = format!("{:e}", value);
        let (mantissa, exponent) = repr.split_at(repr.find('e').unwrap_or(repr.len()));
        let exponent: i32 = exponent.trim_start_matches('e').parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Render a single precision float via its shortest decimal representation,
/// so that e.g. a VCF value of `0.1` stays `0.1`.
pub fn format_f32(value: f32) -> String {
    // going through the decimal representation avoids widening artifacts like 0.10000000149
    format_float(value.to_string().parse().unwrap_or(value as f64))
}

/// Render QUAL: integral values without fractional part.
pub fn format_qual(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format_f32(value)
    }
}

#[derive(CopyGetters, Debug)]
pub(crate) struct SimpleCounter<T>
where
    T: Eq + Hash,
{
    inner: HashMap<T, usize>,
    #[getset(get_copy = "pub(crate)")]
    total_count: usize,
}

impl<T> SimpleCounter<T>
where
    T: Eq + Hash,
{
    pub(crate) fn incr(&mut self, event: T) {
        self.total_count += 1;
        *self.inner.entry(event).or_insert(0) += 1;
    }
}

impl<T> SimpleCounter<T>
where
    T: Eq + Hash + IntoEnumIterator + Display,
{
    /// Log the number of occurrences per reason, in declaration order.
    pub(crate) fn log_summary(&self, what: &str) {
        if self.total_count == 0 {
            return;
        }
        let summary = T::iter()
            .filter_map(|reason| {
                self.inner
                    .get(&reason)
                    .map(|count| format!("{} {}", count, reason))
            })
            .join(", ");
        info!("Skipped {} {}: {}", self.total_count, what, summary);
    }
}

impl<T> Default for SimpleCounter<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        SimpleCounter {
            inner: HashMap::new(),
            total_count: 0,
        }
    }
}

impl<T> Deref for SimpleCounter<T>
where
    T: Eq + Hash,
{
    type Target = HashMap<T, usize>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
