//! Overlap-add zero-phase FIR convolution.
//!
//! Zero-phase is achieved by shifting the output left by `(N-1)/2` samples,
//! not by running filtfilt. The edge transient is suppressed by
//! reflect-limited padding of `N-1` samples on each side; when the kernel is
//! longer than the signal the remainder of the pad is zero.
use anyhow::{bail, Result};
use ndarray::{Array2, ArrayView1, Axis};
use rustfft::{num_complex::Complex, FftPlanner};

/// Apply a zero-phase FIR filter to each column of `data` ([T, N]) in-place.
///
/// `h` must have odd length (guaranteed by `design_highpass`).
pub fn apply_fir_zero_phase(data: &mut Array2<f64>, h: &[f64]) -> Result<()> {
    if h.len() % 2 == 0 {
        bail!("zero-phase FIR needs an odd number of taps, got {}", h.len());
    }
    let n_t = data.nrows();
    if n_t == 0 {
        return Ok(());
    }

    let n_edge = h.len() - 1;
    let n_ext = n_t + 2 * n_edge;
    let n_fft = choose_fft_len(h.len(), n_ext);
    let kernel = FftKernel::new(h, n_fft);

    for mut col in data.axis_iter_mut(Axis(1)) {
        let x: Vec<f64> = col.to_vec();
        let filtered = kernel.filter(&x);
        col.assign(&ArrayView1::from(&filtered));
    }
    Ok(())
}

/// Filter a single 1-D signal with the overlap-add algorithm.
///
/// Returns a vector of the same length as `x`.
pub fn filter_1d(x: &[f64], h: &[f64]) -> Result<Vec<f64>> {
    if h.len() % 2 == 0 {
        bail!("zero-phase FIR needs an odd number of taps, got {}", h.len());
    }
    if x.is_empty() {
        return Ok(vec![]);
    }
    let n_ext = x.len() + 2 * (h.len() - 1);
    let n_fft = choose_fft_len(h.len(), n_ext);
    Ok(FftKernel::new(h, n_fft).filter(x))
}

/// FFT of the kernel plus the planned transforms, shared across columns.
struct FftKernel {
    n_h: usize,
    n_fft: usize,
    h_fft: Vec<Complex<f64>>,
    fwd: std::sync::Arc<dyn rustfft::Fft<f64>>,
    inv: std::sync::Arc<dyn rustfft::Fft<f64>>,
}

impl FftKernel {
    fn new(h: &[f64], n_fft: usize) -> Self {
        let mut planner: FftPlanner<f64> = FftPlanner::new();
        let fwd = planner.plan_fft_forward(n_fft);
        let inv = planner.plan_fft_inverse(n_fft);
        let mut h_fft = zero_padded(h, n_fft);
        fwd.process(&mut h_fft);
        Self { n_h: h.len(), n_fft, h_fft, fwd, inv }
    }

    fn filter(&self, x: &[f64]) -> Vec<f64> {
        let n_x = x.len();
        // Shift for zero-phase: (N-1)/2  (N must be odd).
        let shift = (self.n_h - 1) / 2;
        let n_edge = self.n_h - 1;

        let x_ext = reflect_limited_pad(x, n_edge, n_edge);
        let n_ext = x_ext.len();

        let n_seg = self.n_fft - self.n_h + 1;
        let n_segments = n_ext.div_ceil(n_seg);
        let mut x_filtered = vec![0.0_f64; n_ext];
        let inv_scale = 1.0 / self.n_fft as f64;

        for seg_idx in 0..n_segments {
            let start = seg_idx * n_seg;
            let stop  = (start + n_seg).min(n_ext);

            let mut buf = zero_padded(&x_ext[start..stop], self.n_fft);
            self.fwd.process(&mut buf);
            for (b, &hf) in buf.iter_mut().zip(self.h_fft.iter()) {
                *b *= hf;
            }
            self.inv.process(&mut buf);

            // Accumulate with overlap-add (accounting for zero-phase shift).
            let out_start = start.saturating_sub(shift);
            let out_end   = (out_start + self.n_fft).min(n_ext);
            let prod_start = shift.saturating_sub(start);

            for (o, p) in (out_start..out_end).zip(prod_start..) {
                if p < buf.len() {
                    x_filtered[o] += buf[p].re * inv_scale;
                }
            }
        }

        x_filtered[n_edge..n_edge + n_x].to_vec()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn zero_padded(x: &[f64], n: usize) -> Vec<Complex<f64>> {
    x.iter()
        .map(|&v| Complex { re: v, im: 0.0 })
        .chain(std::iter::repeat(Complex::default()))
        .take(n)
        .collect()
}

/// Reflect-limited padding (odd reflection around the end samples).
///
/// Left:  `pad[i] = 2*x[0] - x[n_l-i]`  for i in 1..=n_l
/// Right: `pad[i] = 2*x[-1] - x[-(i+1)]` for i in 1..=n_r
///
/// Requested padding beyond `len(x) - 1` is filled with zeros at the far ends.
fn reflect_limited_pad(x: &[f64], n_l: usize, n_r: usize) -> Vec<f64> {
    let n = x.len();
    let actual_l = n_l.min(n - 1);
    let actual_r = n_r.min(n - 1);

    let mut out = Vec::with_capacity(n_l + n + n_r);

    out.extend(std::iter::repeat(0.0).take(n_l - actual_l));
    for i in (1..=actual_l).rev() {
        out.push(2.0 * x[0] - x[i]);
    }

    out.extend_from_slice(x);

    let last = x[n - 1];
    for i in 1..=actual_r {
        out.push(2.0 * last - x[n - 1 - i]);
    }
    out.extend(std::iter::repeat(0.0).take(n_r - actual_r));

    out
}

/// Choose the FFT block size (power of 2 minimising operation count).
///
///   `cost = ceil(n_x / (N - n_h + 1)) * N * (log2(N) + 1) + 4e-5 * N * n_x`
fn choose_fft_len(n_h: usize, n_x: usize) -> usize {
    let min_fft = 2 * n_h - 1;

    let max_pow = (n_x as f64).log2().ceil() as u32 + 1;
    let min_pow = (min_fft as f64).log2().ceil() as u32;

    let mut best_n = 1_usize << max_pow.max(min_pow);
    let mut best_cost = f64::INFINITY;

    for pow in min_pow..=max_pow {
        let n = 1_usize << pow;
        if n < min_fft { continue; }
        let n_seg = (n - n_h + 1) as f64;
        let cost = (n_x as f64 / n_seg).ceil() * n as f64 * (pow as f64 + 1.0)
            + 4e-5 * n as f64 * n_x as f64;
        if cost < best_cost {
            best_cost = cost;
            best_n = n;
        }
    }
    best_n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::design::design_highpass;

    const HCP_SFREQ: f64 = 1.0 / 0.72;

    #[test]
    fn filter_preserves_length() {
        let x: Vec<f64> = (0..478).map(|i| (i as f64 / 30.0).sin()).collect();
        let h = design_highpass(0.008, HCP_SFREQ).unwrap();
        let y = filter_1d(&x, &h).unwrap();
        assert_eq!(y.len(), x.len());
    }

    #[test]
    fn filter_removes_dc() {
        // Kernel longer than the pad budget would be all edge; use a long signal.
        let x = vec![1.0_f64; 4096];
        let h = design_highpass(0.008, HCP_SFREQ).unwrap();
        let y = filter_1d(&x, &h).unwrap();
        let n_h = h.len();
        let interior = &y[n_h..y.len() - n_h];
        let max_val = interior.iter().map(|v| v.abs()).fold(0.0_f64, f64::max);
        assert!(max_val < 1e-6, "DC not removed: max={max_val}");
    }

    #[test]
    fn columns_filtered_independently() {
        let n = 2048;
        let mut data = Array2::from_shape_fn((n, 2), |(t, c)| {
            if c == 0 { 5.0 } else { (t as f64 * 0.9).sin() }
        });
        let h = design_highpass(0.008, HCP_SFREQ).unwrap();
        let expect_1 = filter_1d(&data.column(1).to_vec(), &h).unwrap();
        apply_fir_zero_phase(&mut data, &h).unwrap();
        for (a, b) in data.column(1).iter().zip(expect_1.iter()) {
            approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn reflect_limited_left_pad() {
        let x = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let padded = reflect_limited_pad(&x, 3, 0);
        // left pad: 2*1 - x[3]=4 → -2, 2*1 - x[2]=3 → -1, 2*1 - x[1]=2 → 0
        assert_eq!(&padded[..3], &[-2.0_f64, -1.0, 0.0]);
        assert_eq!(&padded[3..], &x[..]);
    }

    #[test]
    fn pad_longer_than_signal_is_zero_filled() {
        let x = [1.0_f64, 2.0, 3.0];
        let padded = reflect_limited_pad(&x, 4, 4);
        assert_eq!(padded, vec![0.0, 0.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn even_kernel_is_rejected() {
        assert!(filter_1d(&[1.0, 2.0], &[0.5, 0.5]).is_err());
    }
}
