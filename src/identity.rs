//! Subject / session / source identity from loosely structured file paths.
//!
//! Every rule is "collect all non-overlapping matches, succeed iff exactly
//! one". Paths are matched in their lossy string form, so a digit run anywhere
//! in the path (including parent directories) counts.
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::dataset::Dataset;
use crate::error::IdentityError;

static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{7}").expect("valid subject regex"));
static SESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ses-(\d+)").expect("valid session regex"));

/// Session id used for every HCP-Aging run.
pub const HCP_AGING_SESSION: &str = "1";

/// The three identity fields of one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub subject: String,
    pub session: String,
    pub source: String,
}

impl Identity {
    /// Derive all three fields of `path` under the rules of `dataset`.
    pub fn derive(dataset: Dataset, path: &Path) -> Result<Self, IdentityError> {
        Ok(Self {
            subject: subject_id(path)?,
            session: session_id(dataset, path)?,
            source: source_id(dataset, path)?,
        })
    }
}

/// The single run of 7 digits in `path`.
///
/// Matching is non-overlapping and left to right, so an 8-digit run yields one
/// match (its first seven digits) and a 14-digit run yields two.
pub fn subject_id(path: &Path) -> Result<String, IdentityError> {
    let s = path.to_string_lossy();
    let found: Vec<&str> = SUBJECT_RE.find_iter(&s).map(|m| m.as_str()).collect();
    match found.as_slice() {
        [only] => Ok((*only).to_string()),
        _ => Err(IdentityError::Subject {
            path: path.to_path_buf(),
            found: found.len(),
        }),
    }
}

/// Session id: constant for HCP-Aging, the digits after `ses-` for UKB.
pub fn session_id(dataset: Dataset, path: &Path) -> Result<String, IdentityError> {
    match dataset {
        Dataset::HcpAging => Ok(HCP_AGING_SESSION.to_string()),
        Dataset::UkBiobank => {
            let s = path.to_string_lossy();
            let found: Vec<&str> = SESSION_RE
                .captures_iter(&s)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            match found.as_slice() {
                [only] => Ok((*only).to_string()),
                _ => Err(IdentityError::Session {
                    path: path.to_path_buf(),
                    found: found.len(),
                }),
            }
        }
    }
}

/// Source id: the file stem, prefixed by the data-type code for UKB.
///
/// HCP-Aging: `rfMRI_REST1_AP_Atlas.dtseries.nii` → `rfMRI_REST1_AP_Atlas`.
/// UKB: `.../20227/fMRI/rfMRI.ica/filtered_func_data_clean.nii.gz`
/// → `20227-filtered_func_data_clean`.
pub fn source_id(dataset: Dataset, path: &Path) -> Result<String, IdentityError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| IdentityError::NoFileName {
            path: path.to_path_buf(),
        })?;

    match dataset {
        Dataset::HcpAging => Ok(strip_suffixes(&name, &[".nii", ".dtseries"]).to_string()),
        Dataset::UkBiobank => {
            let stem = strip_suffixes(&name, &[".gz", ".nii"]);
            let datatype = datatype(path)?;
            Ok(format!("{datatype}-{stem}"))
        }
    }
}

/// UK Biobank data-field code inferred from substring presence in `path`.
///
/// `20227` is checked before `20249`; a path containing both resolves to
/// `20227`.
pub fn datatype(path: &Path) -> Result<&'static str, IdentityError> {
    let s = path.to_string_lossy();
    if s.contains("20227") {
        Ok("20227")
    } else if s.contains("20249") {
        Ok("20249")
    } else {
        Err(IdentityError::UnknownFile {
            path: path.to_path_buf(),
        })
    }
}

/// Remove each suffix in turn, skipping any that is absent.
fn strip_suffixes<'a>(name: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .fold(name, |acc, suf| acc.strip_suffix(suf).unwrap_or(acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn suffixes_are_removed_in_order() {
        assert_eq!(strip_suffixes("a.dtseries.nii", &[".nii", ".dtseries"]), "a");
        // Wrong order leaves the outer suffix in place.
        assert_eq!(strip_suffixes("a.dtseries.nii", &[".dtseries", ".nii"]), "a.dtseries");
        assert_eq!(strip_suffixes("a", &[".gz", ".nii"]), "a");
    }

    #[test]
    fn eight_digit_run_matches_once() {
        let p = PathBuf::from("/data/HCA12345678/x.nii");
        assert_eq!(subject_id(&p).unwrap(), "1234567");
    }

    #[test]
    fn fourteen_digit_run_matches_twice() {
        let p = PathBuf::from("/data/12345678901234/x.nii");
        assert_eq!(
            subject_id(&p),
            Err(IdentityError::Subject { path: p.clone(), found: 2 })
        );
    }

    #[test]
    fn hcp_session_is_constant() {
        let p = PathBuf::from("/data/ses-3/HCA1234567/x.dtseries.nii");
        assert_eq!(session_id(Dataset::HcpAging, &p).unwrap(), "1");
    }

    #[test]
    fn ukb_session_requires_single_marker() {
        let p = PathBuf::from("/data/1234567/x.nii.gz");
        assert!(matches!(
            session_id(Dataset::UkBiobank, &p),
            Err(IdentityError::Session { found: 0, .. })
        ));
        let p = PathBuf::from("/data/ses-2/ses-3/x.nii.gz");
        assert!(matches!(
            session_id(Dataset::UkBiobank, &p),
            Err(IdentityError::Session { found: 2, .. })
        ));
    }

    #[test]
    fn datatype_prefers_20227() {
        let p = PathBuf::from("/data/20249/20227/x.nii.gz");
        assert_eq!(datatype(&p).unwrap(), "20227");
    }
}
