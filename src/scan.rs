//! NIfTI scan loading.
//!
//! A [`Scan`] is the whole image in memory as `f64` (slope/intercept applied)
//! plus the two header fields the pipeline needs: `dim` and `pixdim`.
//! NIfTI-2 files (CIFTI-2 dense series) go through [`crate::nifti2`], every
//! other file through `nifti`.
//!
//! # Layout
//! ```text
//! CIFTI dense series   dim = [6, 1, 1, 1, 1, T, N]   → series()  [T, N]
//! 4-D BOLD volume      dim = [4, X, Y, Z, T]          → masker    [T, V]
//! 3-D mask             dim = [3, X, Y, Z]
//! ```
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{Array2, ArrayD};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use tracing::debug;

use crate::nifti2;

#[derive(Debug, Clone)]
pub struct Scan {
    /// Voxel data indexed in header axis order.
    pub data: ArrayD<f64>,
    /// Voxel dimensions; `pixdim[1..=ndim]` are the zooms of each axis.
    pub pixdim: [f32; 8],
}

impl Scan {
    /// Read a `.nii` or `.nii.gz` file, NIfTI-1 or NIfTI-2.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if nifti2::sniff(path)?.is_some() {
            let (header, data) = nifti2::read_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            debug!(path = %path.display(), shape = ?data.shape(), "loaded NIfTI-2 scan");
            return Ok(Self { data, pixdim: header.pixdim.map(|v| v as f32) });
        }
        let obj = ReaderOptions::new()
            .read_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        let pixdim = obj.header().pixdim;
        let data = obj
            .into_volume()
            .into_ndarray::<f64>()
            .with_context(|| format!("decoding voxel data of {}", path.display()))?;
        debug!(path = %path.display(), shape = ?data.shape(), "loaded scan");
        Ok(Self { data, pixdim })
    }

    /// Build a scan from an in-memory array with unit zooms except `t_r` on
    /// the last axis.
    pub fn from_array(data: ArrayD<f64>, t_r: f32) -> Self {
        let mut pixdim = [1.0_f32; 8];
        let ndim = data.ndim().clamp(1, 7);
        pixdim[ndim] = t_r;
        Self { data, pixdim }
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Repetition time: the zoom of the last axis (`pixdim[ndim]`).
    ///
    /// The value is returned as recorded; [`crate::clean::clean`] rejects a
    /// non-positive TR only when it filters.
    pub fn repetition_time(&self) -> Result<f64> {
        let ndim = self.ndim();
        if ndim == 0 || ndim > 7 {
            bail!("scan has {ndim} axes; cannot read a repetition time");
        }
        Ok(f64::from(self.pixdim[ndim]))
    }

    /// The scan as a `[T, N]` series.
    ///
    /// Every axis before the last two must have length 1, which holds for
    /// CIFTI dense series and for plain 2-D images.
    pub fn series(&self) -> Result<Array2<f64>> {
        let shape = self.shape();
        if shape.len() < 2 {
            bail!("expected a 2-D series, got shape {shape:?}");
        }
        let (lead, tail) = shape.split_at(shape.len() - 2);
        if lead.iter().any(|&d| d != 1) {
            bail!("expected a 2-D series with unit leading axes, got shape {shape:?}");
        }
        let (n_t, n_f) = (tail[0], tail[1]);
        let series = self
            .data
            .to_shape((n_t, n_f))
            .context("reshaping scan into a series")?
            .into_owned();
        Ok(series)
    }
}
