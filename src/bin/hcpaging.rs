use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fmri_dvars::{logging, run_subject, Dataset};

/// DVARS for every HCP-Aging dense time series of one subject.
///
/// Runs matching `<root>/MNINonLinear/Results/*MRI_*_*/*dtseries.nii` are
/// written to `<dst_root>/sub=…/ses=1/src=…/dvars.arrow`; existing outputs
/// are skipped.
#[derive(Parser, Debug)]
#[command(name = "hcpaging")]
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
    run_subject(Dataset::HcpAging, args.i, &args.src, &args.dst_root)?;
    Ok(())
}
