//! Subject-list resolution and input discovery.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::Pattern;

use crate::config::{UKB_DATATYPES, UKB_SESSIONS};
use crate::dataset::Dataset;

/// Entry `index` (0-based) of the newline-separated subject list at `list`.
pub fn resolve_subject(list: &Path, index: usize) -> Result<PathBuf> {
    let text = std::fs::read_to_string(list)
        .with_context(|| format!("reading subject list {}", list.display()))?;
    let subjects: Vec<&str> = text.lines().collect();
    match subjects.get(index) {
        Some(line) => Ok(PathBuf::from(line)),
        None => bail!(
            "index {index} out of range for {} ({} subjects)",
            list.display(),
            subjects.len()
        ),
    }
}

/// Glob patterns for `dataset` under `root`, in enumeration order.
///
/// `root` is escaped, so glob metacharacters in directory names are literal.
pub fn input_patterns(dataset: Dataset, root: &Path) -> Vec<String> {
    let root = Pattern::escape(&root.to_string_lossy());
    match dataset {
        Dataset::HcpAging => {
            vec![format!("{root}/MNINonLinear/Results/*MRI_*_*/*dtseries.nii")]
        }
        Dataset::UkBiobank => UKB_SESSIONS
            .into_iter()
            .flat_map(|ses| {
                let root = root.clone();
                UKB_DATATYPES.into_iter().map(move |datatype| {
                    format!(
                        "{root}/ses-{ses}/non-bids/{datatype}/fMRI/*MRI*/filtered_func_*.nii.gz"
                    )
                })
            })
            .collect(),
    }
}

/// Every input file of `dataset` under `root`.
///
/// Patterns are visited in [`input_patterns`] order; matches within one
/// pattern come back sorted by path.
pub fn enumerate_runs(dataset: Dataset, root: &Path) -> Result<Vec<PathBuf>> {
    let mut runs = Vec::new();
    for pattern in input_patterns(dataset, root) {
        let entries =
            glob::glob(&pattern).with_context(|| format!("bad glob pattern {pattern}"))?;
        for entry in entries {
            runs.push(entry.context("reading glob entry")?);
        }
    }
    Ok(runs)
}
