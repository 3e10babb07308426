//! Partitioned output paths.
//!
//! ```text
//! <root>/sub=<subject>/ses=<session>/src=<source>/dvars.arrow
//! ```
//!
//! Downstream partition-aware readers depend on these exact key names.
use std::path::{Path, PathBuf};

use crate::identity::Identity;

pub const SUBJECT_KEY: &str = "sub";
pub const SESSION_KEY: &str = "ses";
pub const SOURCE_KEY: &str = "src";

/// File name of every output table.
pub const OUTPUT_FILE_NAME: &str = "dvars.arrow";

/// Destination of the table for `identity` under `root`.
pub fn destination(root: &Path, identity: &Identity) -> PathBuf {
    partition_path(root, &identity.subject, &identity.session, &identity.source)
}

/// Destination built from the three raw identity fields.
pub fn partition_path(root: &Path, subject: &str, session: &str, source: &str) -> PathBuf {
    root.join(format!("{SUBJECT_KEY}={subject}"))
        .join(format!("{SESSION_KEY}={session}"))
        .join(format!("{SOURCE_KEY}={source}"))
        .join(OUTPUT_FILE_NAME)
}
