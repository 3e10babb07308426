//! # fmri-dvars — resumable per-run DVARS tables for fMRI studies
//!
//! `fmri-dvars` finds every functional run of one subject, computes DVARS
//! (the RMS of the temporal derivative, plus its D/S variance decomposition)
//! after dataset-specific preprocessing, and writes one Arrow IPC table per
//! run into a partitioned tree. Outputs that already exist are skipped, so a
//! failed batch can simply be re-run.
//!
//! ## Pipeline overview
//!
//! ```text
//! subjects.txt [i]
//!   │
//!   ├─ subjects::resolve_subject()   line i → subject root
//!   ├─ subjects::enumerate_runs()    dataset globs, fixed order
//!   │
//!   └─ for each run file
//!        ├─ RunDescriptor::new()     sub / ses / src identity (typed errors)
//!        ├─ gate::check()            destination exists → skip
//!        ├─ Scan::load()             NIfTI-1 / NIfTI-2 → ndarray
//!        ├─ Preprocessing            pass-through │ detrend + HP │ mask
//!        ├─ dvars::dvars()           [T, N] → t, a, d, s, value
//!        └─ Table::write_ipc()       <dst>/sub=…/ses=…/src=…/dvars.arrow
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use fmri_dvars::{run_subject, Dataset};
//! use std::path::Path;
//!
//! fmri_dvars::logging::init();
//! let summary = run_subject(
//!     Dataset::HcpAging,
//!     0,
//!     Path::new("subjects.txt"),
//!     Path::new("/derivatives/dvars"),
//! ).unwrap();
//! println!("{} written, {} skipped", summary.written, summary.skipped);
//! ```
//!
//! ## Running individual steps
//!
//! ```no_run
//! use fmri_dvars::{clean, dvars, CleanConfig, Scan};
//!
//! let scan   = Scan::load("rfMRI_REST1_AP_Atlas.dtseries.nii").unwrap();
//! let series = clean(scan.series().unwrap(), &CleanConfig::hcp_aging()).unwrap();
//! let table  = dvars(&series).unwrap();
//! table.write_ipc("dvars.arrow".as_ref()).unwrap();
//! ```

pub mod clean;
pub mod config;
pub mod dataset;
pub mod detrend;
pub mod dvars;
pub mod error;
pub mod filter;
pub mod gate;
pub mod identity;
pub mod logging;
pub mod masker;
pub mod nifti2;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod preprocess;
pub mod run;
pub mod scan;
pub mod subjects;
pub mod table;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::{
    CleanConfig, CLEAN_MARKER, HCP_AGING_HIGH_PASS_HZ, HCP_AGING_TR, MASK_FILE_NAME,
    UKB_DATATYPES, UKB_SESSIONS,
};

// identity
pub use dataset::Dataset;
pub use error::IdentityError;
pub use identity::{datatype, session_id, source_id, subject_id, Identity};
pub use partition::{destination, partition_path, OUTPUT_FILE_NAME};

// per-run flow
pub use gate::Gate;
pub use pipeline::{run_subject, Summary};
pub use preprocess::Preprocessing;
pub use run::{process_run, RunDescriptor, RunOutcome};
pub use subjects::{enumerate_runs, resolve_subject};

// signal processing
pub use clean::clean;
pub use detrend::detrend_inplace;
pub use dvars::dvars;
pub use filter::{apply_fir_zero_phase, design_highpass, filter_1d};
pub use masker::MaskExtractor;
pub use normalize::standardize_inplace;

// I/O
pub use scan::Scan;
pub use table::{Column, Table};
