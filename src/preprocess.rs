//! Per-run choice of preprocessing before DVARS.
//!
//! | dataset   | file name       | path                                     |
//! |-----------|-----------------|------------------------------------------|
//! | HCP-Aging | contains `clean`| raw series, untouched                    |
//! | HCP-Aging | otherwise       | detrend + 0.008 Hz high-pass, TR = 0.72 s|
//! | UKB       | any             | sibling `mask.nii.gz`, TR from header    |
use std::path::PathBuf;

use anyhow::{Context, Result};
use ndarray::Array2;
use tracing::info;

use crate::clean::clean;
use crate::config::{CleanConfig, CLEAN_MARKER, MASK_FILE_NAME};
use crate::dataset::Dataset;
use crate::masker::MaskExtractor;
use crate::run::RunDescriptor;
use crate::scan::Scan;

#[derive(Debug, Clone, PartialEq)]
pub enum Preprocessing {
    /// Data were detrended/standardised upstream; use them as loaded.
    PassThrough,
    /// Clean the series with a fixed configuration.
    Clean(CleanConfig),
    /// Extract voxel series through the mask at `mask`.
    Mask { mask: PathBuf },
}

impl Preprocessing {
    /// Decide how `run` is preprocessed. Pure; touches no files.
    pub fn select(run: &RunDescriptor) -> Self {
        match run.dataset() {
            Dataset::HcpAging => {
                let already_clean = run
                    .source()
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().contains(CLEAN_MARKER));
                if already_clean {
                    Preprocessing::PassThrough
                } else {
                    Preprocessing::Clean(CleanConfig::hcp_aging())
                }
            }
            Dataset::UkBiobank => Preprocessing::Mask {
                mask: run
                    .source()
                    .parent()
                    .map(|p| p.join(MASK_FILE_NAME))
                    .unwrap_or_else(|| PathBuf::from(MASK_FILE_NAME)),
            },
        }
    }

    /// Turn a loaded scan into the `[T, N]` array DVARS is computed on.
    pub fn apply(&self, scan: &Scan) -> Result<Array2<f64>> {
        match self {
            Preprocessing::PassThrough => scan.series(),
            Preprocessing::Clean(cfg) => {
                info!("cleaning src before calculating DVARS");
                clean(scan.series()?, cfg)
            }
            Preprocessing::Mask { mask } => {
                let t_r = scan.repetition_time()?;
                let mask_scan = Scan::load(mask)
                    .with_context(|| format!("loading mask {}", mask.display()))?;
                let extractor = MaskExtractor::new(&mask_scan, CleanConfig::masked(t_r))?;
                extractor.fit_transform(scan)
            }
        }
    }
}
