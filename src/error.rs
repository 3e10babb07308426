//! Typed identity failures.
//!
//! Everything else in the crate propagates `anyhow::Error`; identity errors get
//! their own type so callers can tell a malformed path apart from an I/O or
//! shape failure.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The path does not contain exactly one 7-digit subject id.
    #[error("Unexpected length of sub_id for {path}: found {found} candidates")]
    Subject { path: PathBuf, found: usize },

    /// The path does not contain exactly one `ses-<digits>` segment.
    #[error("Unexpected length of ses_id for {path}: found {found} candidates")]
    Session { path: PathBuf, found: usize },

    /// Neither known data-type code appears in the path.
    #[error("Unknown file {path}: no known datatype code in path")]
    UnknownFile { path: PathBuf },

    /// The path has no file name to derive a source id from.
    #[error("no file name in {path}")]
    NoFileName { path: PathBuf },
}
