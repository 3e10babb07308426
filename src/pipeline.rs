//! Per-subject driver shared by both binaries.
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::dataset::Dataset;
use crate::run::{process_run, RunDescriptor, RunOutcome};
use crate::subjects::{enumerate_runs, resolve_subject};

/// Counts of what one invocation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
}

/// Process every run of subject `index` in `list`, writing under `dst_root`.
///
/// The first failing run aborts the whole invocation; runs already written
/// are kept and will be skipped on the next attempt.
pub fn run_subject(
    dataset: Dataset,
    index: usize,
    list: &Path,
    dst_root: &Path,
) -> Result<Summary> {
    let root = resolve_subject(list, index)?;
    info!("Processing {}", root.display());

    let mut summary = Summary::default();
    for source in enumerate_runs(dataset, &root)? {
        let run = RunDescriptor::new(dataset, source, dst_root)?;
        info!("Will write to {}", run.destination().display());
        match process_run(&run)? {
            RunOutcome::Written => summary.written += 1,
            RunOutcome::Skipped => summary.skipped += 1,
        }
    }

    info!(written = summary.written, skipped = summary.skipped, "completed");
    Ok(summary)
}
