//! FIR high-pass design (Hamming-windowed sinc, spectral inversion).
//!
//! For a high-pass at `l_freq` Hz with sampling rate `sfreq`:
//!   • transition bandwidth = min(max(0.25 * l_freq, 2.0), l_freq)
//!   • filter length N      = ceil(3.3 / trans_bw * sfreq), rounded to odd
//!   • transition band centred on `l_freq`, so `l_freq` is the -6 dB point
//!
//! A -6 dB cutoff matches a forward-backward Butterworth at the same
//! frequency, whose squared magnitude is 1/2 there. At fMRI rates
//! (`sfreq` ≈ 1.39 Hz, `l_freq` = 0.008 Hz) the bandwidth rule collapses to
//! `l_freq` and yields a 573-tap kernel with its transition over
//! 0.004..0.012 Hz.
use std::f64::consts::PI;

use anyhow::{bail, Result};

/// Transition bandwidth for a high-pass at `l_freq`.
///
/// Rule: `min(max(0.25 * l_freq, 2.0), l_freq)`
pub fn auto_trans_bandwidth(l_freq: f64) -> f64 {
    (0.25 * l_freq).max(2.0).min(l_freq)
}

/// Number of FIR taps for a given transition bandwidth.
/// Returns an odd integer (required for zero-phase linear-phase FIR).
///
/// Formula: `ceil(3.3 / trans_bw * sfreq)` rounded up to odd.
pub fn auto_filter_length(trans_bw: f64, sfreq: f64) -> usize {
    let n_raw = (3.3 / trans_bw * sfreq).ceil() as usize;
    if n_raw % 2 == 0 { n_raw + 1 } else { n_raw }
}

/// Design a zero-phase high-pass FIR filter with its -6 dB point at `l_freq`.
///
/// Fails when `l_freq` is not strictly between 0 and Nyquist.
pub fn design_highpass(l_freq: f64, sfreq: f64) -> Result<Vec<f64>> {
    let nyq = sfreq / 2.0;
    if !(l_freq > 0.0 && l_freq < nyq) {
        bail!("high-pass cutoff {l_freq} Hz must lie in (0, {nyq}) Hz");
    }
    let trans_bw = auto_trans_bandwidth(l_freq);
    let n = auto_filter_length(trans_bw, sfreq);
    Ok(firwin(n, l_freq, sfreq, false))
}

/// Hamming-windowed sinc FIR.
///
/// `pass_zero=true` is a low-pass with unit DC gain; `false` inverts it into a
/// high-pass. `cutoff_hz` is the -6 dB point.
pub fn firwin(n: usize, cutoff_hz: f64, sfreq: f64, pass_zero: bool) -> Vec<f64> {
    assert!(n % 2 == 1, "firwin requires odd N for linear-phase filter");
    let alpha = (n - 1) as f64 / 2.0;
    let fc = cutoff_hz / (sfreq / 2.0);

    let win = hamming(n);

    let mut h: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64 - alpha;
            let sinc = if x == 0.0 { fc } else { (PI * fc * x).sin() / (PI * x) };
            sinc * win[i]
        })
        .collect();

    let s: f64 = h.iter().sum();
    h.iter_mut().for_each(|v| *v /= s);

    if !pass_zero {
        h.iter_mut().for_each(|v| *v = -*v);
        h[n / 2] += 1.0;
    }

    h
}

/// Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_length_is_odd() {
        for (l_freq, sfreq) in [(0.008, 1.0 / 0.72), (0.01, 1.0 / 0.735), (0.5, 256.0)] {
            let tb = auto_trans_bandwidth(l_freq);
            let n  = auto_filter_length(tb, sfreq);
            assert!(n % 2 == 1, "N={n} is even for l_freq={l_freq}");
        }
    }

    #[test]
    fn hcp_aging_kernel_length() {
        let h = design_highpass(0.008, 1.0 / 0.72).unwrap();
        assert_eq!(h.len(), 573);
    }

    #[test]
    fn highpass_sum_near_zero() {
        let h = design_highpass(0.008, 1.0 / 0.72).unwrap();
        let s: f64 = h.iter().sum();
        assert!(s.abs() < 1e-9, "highpass sum = {s}");
    }

    #[test]
    fn highpass_is_symmetric() {
        let h = design_highpass(0.008, 1.0 / 0.72).unwrap();
        let n = h.len();
        for i in 0..n / 2 {
            approx::assert_abs_diff_eq!(h[i], h[n - 1 - i], epsilon = 1e-12);
        }
    }

    /// Magnitude response of a symmetric odd-length kernel at `f` Hz.
    fn gain(h: &[f64], f: f64, sfreq: f64) -> f64 {
        let alpha = (h.len() - 1) as f64 / 2.0;
        h.iter()
            .enumerate()
            .map(|(k, &c)| c * (2.0 * PI * f / sfreq * (k as f64 - alpha)).cos())
            .sum::<f64>()
            .abs()
    }

    #[test]
    fn half_gain_at_cutoff() {
        let sfreq = 1.0 / 0.72;
        let h = design_highpass(0.008, sfreq).unwrap();
        let at = |f| gain(&h, f, sfreq);
        assert!((at(0.008) - 0.5).abs() < 0.05, "gain at cutoff = {}", at(0.008));
        assert!(at(0.004) < 0.05, "gain at 0.004 Hz = {}", at(0.004));
        assert!(at(0.002) < 0.02, "gain at 0.002 Hz = {}", at(0.002));
        assert!(at(0.006) < at(0.008));
        assert!(at(0.012) > 0.95, "gain at 0.012 Hz = {}", at(0.012));
        assert!((at(0.02) - 1.0).abs() < 0.01, "gain at 0.02 Hz = {}", at(0.02));
    }

    #[test]
    fn cutoff_above_nyquist_is_rejected() {
        assert!(design_highpass(0.8, 1.0 / 0.72).is_err());
        assert!(design_highpass(0.0, 1.0 / 0.72).is_err());
    }

    #[test]
    fn lowpass_dc_gain_unity() {
        let h = firwin(101, 10.0, 256.0, true);
        let dc: f64 = h.iter().sum();
        approx::assert_abs_diff_eq!(dc, 1.0, epsilon = 1e-9);
    }
}
