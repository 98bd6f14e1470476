//! Per-model dataset facade.
//!
//! [`GcmDataset`] is the public entry point: construct it from a decoded
//! dataset plus an optional manifest (auto-detected from the dataset title
//! when omitted), and call the staggered operators on arrays drawn from or
//! aligned to that dataset.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::GridAdapter;
use crate::array::DataArray;
use crate::dataset::Dataset;
use crate::error::{GcmError, Result};
use crate::manifest::{GridLabel, Manifest};
use crate::ops;

/// GCM output data plus the grid operations defined on it.
#[derive(Debug, Clone)]
pub struct GcmDataset {
    ds: Arc<Dataset>,
    adapter: GridAdapter,
}

impl GcmDataset {
    /// Wrap a dataset. With `manifest = None` the model family is inferred
    /// from the dataset's `title` attribute.
    pub fn new(ds: Dataset, manifest: Option<Manifest>) -> Result<GcmDataset> {
        let manifest = match manifest {
            Some(m) => m,
            None => {
                let title = ds.attr("title").ok_or_else(|| {
                    GcmError::configuration(
                        "no manifest supplied and the dataset has no title attribute",
                    )
                })?;
                Manifest::detect(title)?
            }
        };
        debug!(model = %manifest.model, "wrapping dataset");
        let ds = Arc::new(ds);
        let adapter = GridAdapter::new(Arc::clone(&ds), manifest)?;
        Ok(GcmDataset { ds, adapter })
    }

    pub fn adapter(&self) -> &GridAdapter {
        &self.adapter
    }

    pub fn dataset(&self) -> &Dataset {
        &self.ds
    }

    pub fn manifest(&self) -> &Manifest {
        self.adapter.manifest()
    }

    /// A variable or coordinate from the underlying dataset.
    pub fn get(&self, name: &str) -> Result<&DataArray> {
        self.ds
            .get(name)
            .ok_or_else(|| GcmError::missing_variable(name))
    }

    /// See [`ops::make_periodic_left`].
    pub fn make_periodic_left(
        &self,
        array: &DataArray,
        coord: Option<&str>,
    ) -> Result<DataArray> {
        ops::make_periodic_left(&self.adapter, array, coord)
    }

    /// See [`ops::roll`].
    pub fn roll(&self, array: &DataArray, n: isize, dim: &str) -> Result<DataArray> {
        ops::roll(array, n, dim)
    }

    /// See [`ops::pad_vertical`].
    pub fn pad_vertical(
        &self,
        array: &DataArray,
        fill_value: f64,
        new_coord: Option<&str>,
    ) -> Result<DataArray> {
        ops::pad_vertical(&self.adapter, array, fill_value, new_coord)
    }

    /// Pad an array at lower-interface points onto the edge grid.
    pub fn pad_zl_to_zp1(&self, array: &DataArray, fill_value: f64) -> Result<DataArray> {
        let zp1 = self.adapter.raw_name(GridLabel::Z_EDGE)?.to_string();
        ops::pad_vertical(&self.adapter, array, fill_value, Some(&zp1))
    }

    /// See [`ops::diff_zp1_to_z`].
    pub fn diff_zp1_to_z(&self, array: &DataArray) -> Result<DataArray> {
        ops::diff_zp1_to_z(&self.adapter, array)
    }

    /// See [`ops::diff_zl_to_z`].
    pub fn diff_zl_to_z(&self, array: &DataArray, fill_value: f64) -> Result<DataArray> {
        ops::diff_zl_to_z(&self.adapter, array, fill_value)
    }

    /// See [`ops::diff_z_to_zp1`].
    pub fn diff_z_to_zp1(&self, array: &DataArray) -> Result<DataArray> {
        ops::diff_z_to_zp1(&self.adapter, array)
    }

    /// See [`ops::derivative_zp1_to_z`].
    pub fn derivative_zp1_to_z(&self, array: &DataArray) -> Result<DataArray> {
        ops::derivative_zp1_to_z(&self.adapter, array)
    }

    /// See [`ops::derivative_zl_to_z`].
    pub fn derivative_zl_to_z(&self, array: &DataArray, fill_value: f64) -> Result<DataArray> {
        ops::derivative_zl_to_z(&self.adapter, array, fill_value)
    }

    /// See [`ops::derivative_z_to_zp1`].
    pub fn derivative_z_to_zp1(&self, array: &DataArray) -> Result<DataArray> {
        ops::derivative_z_to_zp1(&self.adapter, array)
    }

    /// See [`ops::diff_xp1_to_x`].
    pub fn diff_xp1_to_x(&self, array: &DataArray) -> Result<DataArray> {
        ops::diff_xp1_to_x(&self.adapter, array)
    }

    /// See [`ops::diff_yp1_to_y`].
    pub fn diff_yp1_to_y(&self, array: &DataArray) -> Result<DataArray> {
        ops::diff_yp1_to_y(&self.adapter, array)
    }

    /// See [`ops::integrate_vertical`].
    pub fn integrate_vertical(&self, array: &DataArray, average: bool) -> Result<DataArray> {
        ops::integrate_vertical(&self.adapter, array, average)
    }
}
