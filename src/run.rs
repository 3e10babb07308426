//! One input file and everything derived from it.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::dvars::dvars;
use crate::error::IdentityError;
use crate::gate::{self, Gate};
use crate::identity::Identity;
use crate::partition;
use crate::preprocess::Preprocessing;
use crate::scan::Scan;

/// An input run with its identity and destination resolved at construction.
///
/// Construction is the only place identity rules run, so a descriptor that
/// exists always has a valid destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    dataset: Dataset,
    source: PathBuf,
    destination_root: PathBuf,
    identity: Identity,
    destination: PathBuf,
}

/// What [`process_run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped,
    Written,
}

impl RunDescriptor {
    pub fn new(
        dataset: Dataset,
        source: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
    ) -> Result<Self, IdentityError> {
        let source = source.into();
        let destination_root = destination_root.into();
        let identity = Identity::derive(dataset, &source)?;
        let destination = partition::destination(&destination_root, &identity);
        Ok(Self { dataset, source, destination_root, identity, destination })
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn subject_id(&self) -> &str {
        &self.identity.subject
    }

    pub fn session_id(&self) -> &str {
        &self.identity.session
    }

    pub fn source_id(&self) -> &str {
        &self.identity.source
    }

    /// `<root>/sub=…/ses=…/src=…/dvars.arrow`
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Produce the DVARS table for `run` unless it already exists.
///
/// Gate → load → preprocess → DVARS → drop dataset columns → write.
/// Nothing is loaded when the destination is already present.
pub fn process_run(run: &RunDescriptor) -> Result<RunOutcome> {
    if gate::check(run.destination())? == Gate::Skip {
        return Ok(RunOutcome::Skipped);
    }

    let scan = Scan::load(run.source())?;
    let preprocessing = Preprocessing::select(run);
    debug!(?preprocessing, src = %run.source().display(), "preprocessing");
    let series = preprocessing
        .apply(&scan)
        .with_context(|| format!("preprocessing {}", run.source().display()))?;

    let mut table = dvars(&series)?;
    for column in run.dataset().dropped_columns() {
        table = table.drop(column)?;
    }
    table.write_ipc(run.destination())?;
    info!(rows = table.n_rows(), "wrote {}", run.destination().display());
    Ok(RunOutcome::Written)
}
