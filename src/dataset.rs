//! The two supported input layouts.
use std::fmt;

/// Which study layout a run belongs to.
///
/// Every variant-specific rule (session id, source id, input globs,
/// preprocessing policy, dropped output columns) dispatches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// HCP-Aging CIFTI dense time series (`*.dtseries.nii`).
    HcpAging,
    /// UK Biobank FSL `filtered_func_*.nii.gz` volumes with a sibling mask.
    UkBiobank,
}

impl Dataset {
    /// Columns removed from the DVARS table before it is written.
    ///
    /// `value` is derivable from `d`, and the UKB tables were defined without it.
    pub fn dropped_columns(self) -> &'static [&'static str] {
        match self {
            Dataset::HcpAging => &[],
            Dataset::UkBiobank => &["value"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::HcpAging => f.write_str("hcpaging"),
            Dataset::UkBiobank => f.write_str("ukb"),
        }
    }
}
