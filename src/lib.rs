// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of VCF/BCF records into inputs for downstream annotation tools.
//!
//! Two pipelines are provided:
//!
//! * [`conversion::anno_input`] turns every alternate allele into a normalized,
//!   tab-separated line (chrom, start, end, ref, alt plus a block of sample annotations).
//! * [`splice::merge`] refreshes existing SpliceAI annotations of indel records via a
//!   [`splice::Predictor`].

#[macro_use]
extern crate getset;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate derive_new;

pub mod cli;
pub mod conversion;
pub(crate) mod errors;
pub mod splice;
pub mod utils;
pub mod variants;
