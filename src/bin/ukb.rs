use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fmri_dvars::{logging, run_subject, Dataset};

/// DVARS for every UK Biobank `filtered_func` volume of one subject.
///
/// Sessions 2 and 3 of data fields 20249 and 20227 are visited in that order.
/// Each volume is reduced through its sibling `mask.nii.gz` and written to
/// `<dst_root>/sub=…/ses=…/src=<field>-<stem>/dvars.arrow`.
#[derive(Parser, Debug)]
#[command(name = "ukb")]
struct Args {
    /// 0-based line of the subject list to process.
    i: usize,

    /// Text file with one subject root directory per line.
    src: PathBuf,

    /// Root of the partitioned output tree.
    dst_root: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();
    run_subject(Dataset::UkBiobank, args.i, &args.src, &args.dst_root)?;
    Ok(())
}
