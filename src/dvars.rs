//! DVARS and its variance decomposition.
//!
//! For a `[T, N]` series Y and each t in `1..T`, with Δ = Y_t − Y_{t−1} and
//! Σ = Y_t + Y_{t−1}, averaged over the N features:
//!
//! ```text
//! a      = mean((Y_t² + Y_{t−1}²) / 2)     total variance
//! d      = mean((Δ / 2)²)                  fast ("D") variance
//! s      = mean((Σ / 2)²)                  slow ("S") variance,  a = d + s
//! value  = sqrt(mean(Δ²)) = 2·sqrt(d)      classic DVARS
//! ```
//!
//! The first timepoint has no predecessor, so a table has `T - 1` rows and
//! its `t` column starts at 1.
use anyhow::{bail, Result};
use ndarray::{Array2, Axis, Zip};

use crate::table::{Column, Table};

pub const T_COLUMN: &str = "t";
pub const A_COLUMN: &str = "a";
pub const D_COLUMN: &str = "d";
pub const S_COLUMN: &str = "s";
pub const VALUE_COLUMN: &str = "value";

/// Compute the DVARS table of a `[T, N]` series.
pub fn dvars(series: &Array2<f64>) -> Result<Table> {
    let (n_t, n_f) = series.dim();
    if n_t < 2 {
        bail!("DVARS needs at least two timepoints, got {n_t}");
    }
    if n_f == 0 {
        bail!("DVARS needs at least one feature");
    }
    let inv_n = 1.0 / n_f as f64;

    let n_rows = n_t - 1;
    let mut t = Vec::with_capacity(n_rows);
    let mut a = Vec::with_capacity(n_rows);
    let mut d = Vec::with_capacity(n_rows);
    let mut s = Vec::with_capacity(n_rows);
    let mut value = Vec::with_capacity(n_rows);

    let rows: Vec<_> = series.axis_iter(Axis(0)).collect();
    for (i, pair) in rows.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let (mut sum_d, mut sum_s) = (0.0_f64, 0.0_f64);
        Zip::from(cur).and(prev).for_each(|&y, &y0| {
            let half_diff = 0.5 * (y - y0);
            let half_sum = 0.5 * (y + y0);
            sum_d += half_diff * half_diff;
            sum_s += half_sum * half_sum;
        });
        let d_t = sum_d * inv_n;
        let s_t = sum_s * inv_n;

        t.push((i + 1) as u32);
        d.push(d_t);
        s.push(s_t);
        a.push(d_t + s_t);
        value.push(2.0 * d_t.sqrt());
    }

    Table::new()
        .with_column(T_COLUMN, Column::UInt32(t))?
        .with_column(A_COLUMN, Column::Float64(a))?
        .with_column(D_COLUMN, Column::Float64(d))?
        .with_column(S_COLUMN, Column::Float64(s))?
        .with_column(VALUE_COLUMN, Column::Float64(value))
}
