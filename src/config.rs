//! Cleaning configuration and dataset constants.
//!
//! [`CleanConfig`] holds every tunable parameter of the signal-cleaning step.
//! The `HCP_AGING_*` constants are properties of one known acquisition
//! protocol, not values read from the files themselves.

/// Repetition time (s) shared by every HCP-Aging resting/task run.
pub const HCP_AGING_TR: f64 = 0.72;

/// High-pass cutoff (Hz) applied to HCP-Aging runs that are not already clean.
pub const HCP_AGING_HIGH_PASS_HZ: f64 = 0.008;

/// Filename substring marking an HCP-Aging run as already cleaned upstream.
pub const CLEAN_MARKER: &str = "clean";

/// UK Biobank imaging sessions, enumerated in this order.
pub const UKB_SESSIONS: [u32; 2] = [2, 3];

/// UK Biobank data-field codes, enumerated in this order.
///
/// `20249` is task fMRI, `20227` is resting-state fMRI.
pub const UKB_DATATYPES: [&str; 2] = ["20249", "20227"];

/// Brain mask expected next to every UK Biobank `filtered_func` volume.
pub const MASK_FILE_NAME: &str = "mask.nii.gz";

/// Options for [`crate::clean::clean`].
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use fmri_dvars::CleanConfig;
///
/// let cfg = CleanConfig {
///     standardize: true,
///     ..CleanConfig::hcp_aging()
/// };
/// assert!(cfg.detrend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanConfig {
    /// Remove the least-squares linear trend from every column.
    pub detrend: bool,

    /// Z-score every column (`ddof = 0`) after filtering.
    pub standardize: bool,

    /// Cutoff of the zero-phase high-pass FIR filter in Hz.
    ///
    /// `None` skips filtering. When set, [`CleanConfig::t_r`] must be set too.
    pub high_pass: Option<f64>,

    /// Repetition time in seconds; the sampling rate is `1 / t_r`.
    pub t_r: Option<f64>,
}

impl Default for CleanConfig {
    /// Everything off: `clean` returns its input unchanged.
    fn default() -> Self {
        Self {
            detrend: false,
            standardize: false,
            high_pass: None,
            t_r: None,
        }
    }
}

impl CleanConfig {
    /// Settings for HCP-Aging runs without the `clean` marker:
    /// detrend on, standardize off, 0.008 Hz high-pass at TR = 0.72 s.
    pub fn hcp_aging() -> Self {
        Self {
            detrend: true,
            standardize: false,
            high_pass: Some(HCP_AGING_HIGH_PASS_HZ),
            t_r: Some(HCP_AGING_TR),
        }
    }

    /// Settings used when extracting UK Biobank series through a mask.
    ///
    /// Those volumes have already been high-pass filtered by the UKB pipeline,
    /// so only the repetition time is recorded.
    pub fn masked(t_r: f64) -> Self {
        Self {
            t_r: Some(t_r),
            ..Self::default()
        }
    }

    /// `true` when [`crate::clean::clean`] would leave the signal untouched.
    pub fn is_identity(&self) -> bool {
        !self.detrend && !self.standardize && self.high_pass.is_none()
    }
}
