//! Signal cleaning: detrend → high-pass → standardize.
//!
//! The order matches `nilearn.signal.clean`: trends are removed before
//! filtering so the FIR edge padding does not extrapolate a slope, and
//! standardisation comes last so it sees the filtered variance.
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use tracing::debug;

use crate::config::CleanConfig;
use crate::detrend::detrend_inplace;
use crate::filter::{apply_fir_zero_phase, design_highpass};
use crate::normalize::standardize_inplace;

/// Clean a `[T, N]` signal array according to `cfg`.
///
/// # Errors
///
/// * `high_pass` is set without `t_r`, or `t_r` is not positive.
/// * The cutoff is not below the Nyquist frequency `1 / (2 · t_r)`.
pub fn clean(mut signals: Array2<f64>, cfg: &CleanConfig) -> Result<Array2<f64>> {
    if cfg.detrend {
        detrend_inplace(&mut signals);
    }

    if let Some(hp) = cfg.high_pass {
        let t_r = match cfg.t_r {
            Some(t_r) if t_r > 0.0 => t_r,
            Some(t_r) => bail!("repetition time must be positive, got {t_r}"),
            None => bail!("high-pass filtering requires a repetition time"),
        };
        let sfreq = 1.0 / t_r;
        let h = design_highpass(hp, sfreq)
            .with_context(|| format!("designing {hp} Hz high-pass at TR={t_r}s"))?;
        debug!(taps = h.len(), n_t = signals.nrows(), "applying high-pass");
        apply_fir_zero_phase(&mut signals, &h)?;
    }

    if cfg.standardize {
        standardize_inplace(&mut signals);
    }

    Ok(signals)
}
