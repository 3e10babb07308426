//! Column-wise z-score normalisation.
//!
//! `standardize_inplace` — matches `nilearn.signal._standardize(..., "zscore")`:
//!   for each column: μ = mean(x), σ = std (ddof=0)
//!   x = (x - μ) / σ
//!
//! Columns with σ below `f64::EPSILON` are only centered.
use ndarray::{Array2, Axis};

/// Z-score every column of `data` ([T, N]) in-place.
/// Returns the per-column (mean, std) used for normalisation.
pub fn standardize_inplace(data: &mut Array2<f64>) -> Vec<(f64, f64)> {
    let n_t = data.nrows();
    if n_t == 0 {
        return vec![(0.0, 0.0); data.ncols()];
    }
    let mut params = Vec::with_capacity(data.ncols());
    for mut col in data.axis_iter_mut(Axis(1)) {
        let mean = col.sum() / n_t as f64;
        let var = col.iter().map(|&v| {
            let d = v - mean; d * d
        }).sum::<f64>() / n_t as f64;
        let std = var.sqrt();

        if std > f64::EPSILON {
            col.mapv_inplace(|v| (v - mean) / std);
        } else {
            col.mapv_inplace(|v| v - mean);
        }
        params.push((mean, std));
    }
    params
}
