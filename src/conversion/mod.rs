// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of VCF/BCF records into annotation tool inputs.

pub mod anno_input;
pub mod fields;
