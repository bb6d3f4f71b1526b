// Copyright 2024 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use structopt::StructOpt;

use crate::conversion;
use crate::conversion::fields::{FieldTags, DEFAULT_DEPTH_TAG, DEFAULT_VAF_TAG};
use crate::errors::Error;
use crate::splice::annotator::AnnotatorBuilder;
use crate::splice::merge::{self, MergeOptions, DEFAULT_SPLICEAI_TAG};
use crate::splice::{self, GenomeBuild};

#[derive(Debug, StructOpt, Clone)]
#[structopt(
    name = "vcf2anno",
    about = "Prepare somatic variant calls for annotation and refresh splice predictions of indels.",
    setting = structopt::clap::AppSettings::ColoredHelp,
)]
pub struct Vcf2Anno {
    #[structopt(long, short, help = "Verbose output.")]
    pub verbose: bool,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, StructOpt, Clone)]
pub enum Command {
    #[structopt(
        name = "anno-input",
        about = "Convert a VCF/BCF into annotation input, one line per normalized ALT allele.",
        usage = "vcf2anno anno-input --vcf calls.vcf --anno-input calls.avinput",
        setting = structopt::clap::AppSettings::ColoredHelp,
    )]
    AnnoInput {
        #[structopt(long, short = "i", parse(from_os_str), help = "VCF/BCF file to convert.")]
        vcf: PathBuf,
        #[structopt(
            long = "anno-input",
            short = "o",
            parse(from_os_str),
            help = "Annotation input file to write."
        )]
        anno_input: PathBuf,
        #[structopt(
            long = "depth-tag",
            default_value = DEFAULT_DEPTH_TAG,
            help = "INFO tag holding the total read depth."
        )]
        depth_tag: String,
        #[structopt(
            long = "vaf-tag",
            default_value = DEFAULT_VAF_TAG,
            help = "INFO tag holding the variant allele frequency."
        )]
        vaf_tag: String,
    },
    #[structopt(
        name = "spliceai",
        about = "Replace SpliceAI annotations of indels with scores computed against the given reference.",
        usage = "vcf2anno spliceai --input calls.vcf --output calls.spliceai.vcf \
                 --reference hg38.fa --scores spliceai_scores.indel.hg38.vcf.gz",
        setting = structopt::clap::AppSettings::ColoredHelp,
    )]
    SpliceAI {
        #[structopt(long, short = "i", parse(from_os_str), help = "VCF/BCF file to annotate.")]
        input: PathBuf,
        #[structopt(long, short = "o", parse(from_os_str), help = "VCF file to write.")]
        output: PathBuf,
        #[structopt(
            long,
            short = "r",
            parse(from_os_str),
            help = "FASTA file with reference genome. Has to be indexed with samtools faidx."
        )]
        reference: PathBuf,
        #[structopt(
            long,
            short = "s",
            parse(from_os_str),
            help = "Indexed VCF/BCF with precomputed SpliceAI scores."
        )]
        scores: PathBuf,
        #[structopt(
            long,
            short = "a",
            parse(from_os_str),
            help = "Gene annotation table (default: <build>.txt next to the reference genome)."
        )]
        annotation: Option<PathBuf>,
        #[structopt(
            long,
            short = "b",
            default_value = "grch38",
            possible_values = &["grch37", "hg19", "grch38", "hg38"],
            case_insensitive = true,
            help = "Genome build of reference and annotation."
        )]
        build: GenomeBuild,
        #[structopt(
            long,
            short = "d",
            default_value = "50",
            help = "Maximum distance between variant and gained/lost splice site."
        )]
        distance: u32,
        #[structopt(
            long,
            short = "m",
            default_value = "0",
            possible_values = &["0", "1"],
            help = "Mask scores of annotated splice site gains and unannotated losses (1) or not (0)."
        )]
        mask: u8,
        #[structopt(
            long,
            default_value = DEFAULT_SPLICEAI_TAG,
            help = "INFO tag holding the SpliceAI annotation."
        )]
        tag: String,
    },
}

pub fn run(opt: Vcf2Anno) -> Result<()> {
    match opt.cmd {
        Command::AnnoInput {
            vcf,
            anno_input,
            depth_tag,
            vaf_tag,
        } => {
            let tags = FieldTags::new(depth_tag, vaf_tag);
            conversion::anno_input::to_anno_input(vcf, anno_input, &tags)
        }
        Command::SpliceAI {
            input,
            output,
            reference,
            scores,
            annotation,
            build,
            distance,
            mask,
            tag,
        } => {
            let mask = match mask {
                0 => false,
                1 => true,
                value => return Err(Error::InvalidMask { value }.into()),
            };
            let annotation = annotation
                .unwrap_or_else(|| splice::default_annotation_path(&reference, build));
            info!(
                "Using {} gene annotation {}.",
                build,
                annotation.display()
            );

            let mut annotator = AnnotatorBuilder::default()
                .reference(&reference)?
                .annotation(&annotation)?
                .scores(&scores)?
                .build()?;
            let options = MergeOptions::new(tag, distance, mask);
            merge::annotate(input, output, &mut annotator, &options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anno_input_defaults() {
        let opt = Vcf2Anno::from_iter(&["vcf2anno", "anno-input", "-i", "in.vcf", "-o", "out.txt"]);
        assert!(!opt.verbose);
        match opt.cmd {
            Command::AnnoInput {
                depth_tag, vaf_tag, ..
            } => {
                assert_eq!(depth_tag, "VD");
                assert_eq!(vaf_tag, "AF");
            }
            _ => panic!("unexpected subcommand"),
        }
    }

    #[test]
    fn test_spliceai_build_alias() {
        let opt = Vcf2Anno::from_iter(&[
            "vcf2anno",
            "spliceai",
            "--input",
            "in.vcf",
            "--output",
            "out.vcf",
            "--reference",
            "hg19.fa",
            "--scores",
            "scores.vcf.gz",
            "--build",
            "hg19",
            "--mask",
            "1",
        ]);
        match opt.cmd {
            Command::SpliceAI {
                build,
                distance,
                mask,
                annotation,
                tag,
                ..
            } => {
                assert_eq!(build, GenomeBuild::GRCh37);
                assert_eq!(distance, 50);
                assert_eq!(mask, 1);
                assert_eq!(annotation, None);
                assert_eq!(tag, "SpliceAI");
            }
            _ => panic!("unexpected subcommand"),
        }
    }

    #[test]
    fn test_spliceai_invalid_mask() {
        let result = Vcf2Anno::from_iter_safe(&[
            "vcf2anno",
            "spliceai",
            "-i",
            "in.vcf",
            "-o",
            "out.vcf",
            "-r",
            "ref.fa",
            "-s",
            "scores.vcf.gz",
            "-m",
            "2",
        ]);
        assert!(result.is_err());
    }
}
