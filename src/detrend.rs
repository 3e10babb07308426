//! Linear detrending: subtract the least-squares line from each column.
//!
//! Matches `scipy.signal.detrend(x, axis=0, type="linear")` on `[T, N]` data:
//!
//! ```text
//! slope = Σ (t - t̄)(x_t - x̄) / Σ (t - t̄)²
//! x_t  ← x_t - x̄ - slope · (t - t̄)
//! ```
use ndarray::{Array2, Axis};

pub fn detrend_inplace(data: &mut Array2<f64>) {
    let n_t = data.nrows();
    if n_t == 0 {
        return;
    }
    let t_mean = (n_t as f64 - 1.0) / 2.0;
    let t_ss: f64 = (0..n_t).map(|t| {
        let d = t as f64 - t_mean; d * d
    }).sum();

    for mut col in data.axis_iter_mut(Axis(1)) {
        let mean = col.sum() / n_t as f64;
        let slope = if t_ss > 0.0 {
            col.iter()
                .enumerate()
                .map(|(t, &v)| (t as f64 - t_mean) * (v - mean))
                .sum::<f64>() / t_ss
        } else {
            0.0
        };
        for (t, v) in col.iter_mut().enumerate() {
            *v -= mean + slope * (t as f64 - t_mean);
        }
    }
}
