//! Voxel time-series extraction through a binary mask.
//!
//! `fit_transform` turns a 4-D `[X, Y, Z, T]` volume into a `[T, V]` series,
//! one column per non-zero mask voxel. Voxels are visited in row-major
//! `(x, y, z)` order, the same order as boolean indexing `volume[mask]` in
//! NumPy, so column `j` of the output is stable across runs.
use anyhow::{bail, Result};
use ndarray::{s, Array2, Axis, Ix4};

use crate::clean::clean;
use crate::config::CleanConfig;
use crate::scan::Scan;

#[derive(Debug, Clone)]
pub struct MaskExtractor {
    /// Flat `(x, y, z)` indices of the selected voxels.
    voxels: Vec<[usize; 3]>,
    spatial_shape: [usize; 3],
    config: CleanConfig,
}

impl MaskExtractor {
    /// Build an extractor from a mask image.
    ///
    /// The mask must be 3-D, or 3-D followed by unit axes. Any non-zero value
    /// selects its voxel.
    pub fn new(mask: &Scan, config: CleanConfig) -> Result<Self> {
        let shape = mask.shape();
        if shape.len() < 3 || shape[3..].iter().any(|&d| d != 1) {
            bail!("mask must be a 3-D image, got shape {shape:?}");
        }
        let spatial_shape = [shape[0], shape[1], shape[2]];

        let voxels: Vec<[usize; 3]> = mask
            .data
            .indexed_iter()
            .filter(|(_, v)| **v != 0.0)
            .map(|(ix, _)| [ix[0], ix[1], ix[2]])
            .collect();
        if voxels.is_empty() {
            bail!("mask selects no voxels");
        }
        Ok(Self { voxels, spatial_shape, config })
    }

    /// Number of voxels selected by the mask.
    pub fn n_voxels(&self) -> usize {
        self.voxels.len()
    }

    /// Extract `[T, V]` series from a 4-D volume and clean them.
    pub fn fit_transform(&self, volume: &Scan) -> Result<Array2<f64>> {
        let shape = volume.shape();
        if shape.len() != 4 {
            bail!("expected a 4-D volume, got shape {shape:?}");
        }
        if shape[..3] != self.spatial_shape[..] {
            bail!(
                "mask shape {:?} does not match volume shape {:?}",
                self.spatial_shape,
                &shape[..3]
            );
        }
        let vol = volume.data.view().into_dimensionality::<Ix4>()?;
        let n_t = shape[3];

        let mut out = Array2::<f64>::zeros((n_t, self.voxels.len()));
        for (mut col, &[x, y, z]) in out.axis_iter_mut(Axis(1)).zip(self.voxels.iter()) {
            col.assign(&vol.slice(s![x, y, z, ..]));
        }

        clean(out, &self.config)
    }
}
