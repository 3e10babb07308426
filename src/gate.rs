//! Idempotency gate.
//!
//! The presence of the output file is the only recorded processing state.
//! The check is not atomic: two processes racing on one destination can both
//! see it missing and both write it.
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Destination already exists; nothing to do for this run.
    Skip,
    /// Destination is missing and its parent directory now exists.
    Proceed,
}

/// Decide whether `destination` still has to be produced.
///
/// On [`Gate::Proceed`] every missing ancestor directory has been created.
pub fn check(destination: &Path) -> Result<Gate> {
    let exists = destination
        .try_exists()
        .with_context(|| format!("checking {}", destination.display()))?;
    if exists {
        info!("{} already exists--skipping", destination.display());
        return Ok(Gate::Skip);
    }
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(Gate::Proceed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("dvars.arrow");
        std::fs::write(&dst, b"").unwrap();
        assert_eq!(check(&dst).unwrap(), Gate::Skip);
    }

    #[test]
    fn missing_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("sub=1234567/ses=1/src=x/dvars.arrow");
        assert_eq!(check(&dst).unwrap(), Gate::Proceed);
        assert!(dst.parent().unwrap().is_dir());
        assert!(!dst.exists());
    }
}
