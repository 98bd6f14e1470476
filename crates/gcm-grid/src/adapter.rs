//! Grid adapter: resolves logical grid labels against a live dataset.
//!
//! The adapter is built once per dataset and is read-only afterwards, so it
//! can be shared freely across operator calls. Construction validates the
//! manifest against the dataset (fail-fast on the first missing variable)
//! and eagerly computes the cell-to-cell spacing field for every manifest
//! coordinate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::array::DataArray;
use crate::dataset::Dataset;
use crate::error::{GcmError, Result};
use crate::manifest::{Axis, GridLabel, Manifest, Placement};

/// Resolves logical coordinate names, spacings, and partial-cell factors for
/// one dataset.
#[derive(Debug, Clone)]
pub struct GridAdapter {
    ds: Arc<Dataset>,
    manifest: Manifest,
    coord_map: BTreeMap<GridLabel, String>,
    /// Coordinate sub-dataset plus the derived `"d" + name` spacing fields.
    coords: BTreeMap<String, DataArray>,
}

impl GridAdapter {
    /// Build an adapter for `ds` under `manifest`.
    pub fn new(ds: Arc<Dataset>, manifest: Manifest) -> Result<GridAdapter> {
        for var in &manifest.required_vars {
            if !ds.contains(var) {
                return Err(GcmError::missing_variable(var));
            }
        }

        let mut coord_map = BTreeMap::new();
        for (raw, spec) in &manifest.coords {
            if ds.coord(raw).is_none() {
                return Err(GcmError::missing_variable(raw));
            }
            if let Some(prev) = coord_map.insert(spec.label, raw.clone()) {
                return Err(GcmError::configuration(format!(
                    "label '{}' is mapped to both '{prev}' and '{raw}'",
                    spec.label
                )));
            }
        }

        let mut coords = ds.coords_dataset();
        for (raw, spec) in &manifest.coords {
            let values = ds.coord_values(raw)?;
            let spacing = if spec.periodic {
                wrapped_spacing(raw, values)?
            } else {
                one_sided_spacing(raw, values)?
            };
            coords.insert(format!("d{raw}"), spacing);
        }

        debug!(
            model = %manifest.model,
            coords = manifest.coords.len(),
            "built grid adapter"
        );
        Ok(GridAdapter {
            ds,
            manifest,
            coord_map,
            coords,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn dataset(&self) -> &Dataset {
        &self.ds
    }

    /// Map a logical label to its raw coordinate name.
    ///
    /// Names that are not logical labels (including already-raw names) pass
    /// through unchanged.
    pub fn resolve_logical(&self, name: &str) -> String {
        GridLabel::parse(name)
            .and_then(|label| self.coord_map.get(&label))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Raw coordinate name for a logical label. An unmapped label is a
    /// configuration error (the model family has no such grid point).
    pub fn raw_name(&self, label: GridLabel) -> Result<&str> {
        self.coord_map
            .get(&label)
            .map(|s| s.as_str())
            .ok_or_else(|| {
                GcmError::configuration(format!(
                    "manifest for '{}' has no '{label}' coordinate",
                    self.manifest.model
                ))
            })
    }

    /// Raw names of all manifest coordinates on the given axis.
    pub fn dims_for_axis(&self, axis: Axis) -> BTreeSet<String> {
        self.manifest
            .coords_on_axis(axis)
            .map(|s| s.to_string())
            .collect()
    }

    /// The single coordinate of `array` on the given axis.
    ///
    /// Zero matches and multiple matches are both errors: the caller cannot
    /// safely choose a default.
    pub fn find_unique_axis_coord(&self, axis: Axis, array: &DataArray) -> Result<String> {
        let axis_dims = self.dims_for_axis(axis);
        let mut candidates: Vec<String> = array
            .dims()
            .iter()
            .filter(|d| axis_dims.contains(*d))
            .cloned()
            .collect();
        if candidates.len() == 1 {
            Ok(candidates.remove(0))
        } else {
            Err(GcmError::ambiguous(
                format!(
                    "{axis} axis on array '{}'",
                    array.name().unwrap_or("<unnamed>")
                ),
                candidates,
            ))
        }
    }

    /// Whether a (raw or logical) coordinate is flagged periodic. Names not
    /// in the manifest are non-periodic.
    pub fn is_periodic(&self, name: &str) -> bool {
        let raw = self.resolve_logical(name);
        self.manifest
            .coords
            .get(&raw)
            .map(|spec| spec.periodic)
            .unwrap_or(false)
    }

    /// The coordinate array for a raw or logical name.
    pub fn coord(&self, name: &str) -> Result<&DataArray> {
        let raw = self.resolve_logical(name);
        self.coords
            .get(&raw)
            .ok_or_else(|| GcmError::missing_variable(raw))
    }

    /// Coordinate values for a raw or logical name.
    pub fn coord_values(&self, name: &str) -> Result<&[f64]> {
        let raw = self.resolve_logical(name);
        let coord = self
            .coords
            .get(&raw)
            .ok_or_else(|| GcmError::missing_variable(raw.clone()))?;
        coord
            .coord_values(&raw)
            .ok_or_else(|| GcmError::missing_variable(raw))
    }

    /// The precomputed spacing field for an axis coordinate.
    pub fn spacing(&self, name: &str) -> Result<&DataArray> {
        let raw = self.resolve_logical(name);
        self.coords.get(&format!("d{raw}")).ok_or_else(|| {
            GcmError::invalid_axis(format!("no spacing computed for coordinate '{raw}'"))
        })
    }

    /// The partial-cell thickness factor applicable to `array`, selected by
    /// the staggering of its horizontal dimensions.
    ///
    /// `None` means no variant applies; callers treat that as "no
    /// partial-cell weighting", never as an error.
    pub fn hfac_for(&self, array: &DataArray) -> Option<&DataArray> {
        let hfac = self.manifest.hfac.as_ref()?;
        let px = self.horizontal_placement(array, Axis::X)?;
        let py = self.horizontal_placement(array, Axis::Y)?;
        let name = match (px, py) {
            (Placement::Centre, Placement::Centre) => &hfac.centre,
            (Placement::Edge, Placement::Centre) => &hfac.west,
            (Placement::Centre, Placement::Edge) => &hfac.south,
            _ => return None,
        };
        self.ds.variable(name)
    }

    /// The full-cell vertical thickness field (e.g. MITgcm `drF`).
    pub fn cell_thickness(&self) -> Result<&DataArray> {
        self.physical_spacing(self.manifest.cell_thickness.as_deref(), "cell thickness")
    }

    /// The centre-to-centre vertical spacing field (e.g. MITgcm `drC`).
    pub fn centre_spacing(&self) -> Result<&DataArray> {
        self.physical_spacing(self.manifest.centre_spacing.as_deref(), "centre spacing")
    }

    fn physical_spacing(&self, name: Option<&str>, what: &str) -> Result<&DataArray> {
        let name = name.ok_or_else(|| {
            GcmError::configuration(format!(
                "manifest for '{}' declares no {what} variable",
                self.manifest.model
            ))
        })?;
        self.ds
            .variable(name)
            .ok_or_else(|| GcmError::missing_variable(name))
    }

    /// Placement of the array's single dimension on the given horizontal
    /// axis, or `None` when the array has zero or several.
    fn horizontal_placement(&self, array: &DataArray, axis: Axis) -> Option<Placement> {
        let mut found = None;
        for dim in array.dims() {
            if let Some(spec) = self.manifest.coords.get(dim) {
                if spec.label.axis == axis {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(spec.label.placement);
                }
            }
        }
        found
    }
}

/// One-sided differences labeled by the upper point: length N-1.
fn one_sided_spacing(name: &str, values: &[f64]) -> Result<DataArray> {
    if values.is_empty() {
        return Err(GcmError::configuration(format!(
            "coordinate '{name}' has no values"
        )));
    }
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let coords = values[1..].to_vec();
    Ok(DataArray::one_dim(name, deltas, coords)?.with_name(&format!("d{name}")))
}

/// Wrapped differences for a periodic coordinate: length N, aligned to the
/// original points.
///
/// The first delta falls across the wrap seam and is first-minus-wrapped-last,
/// the value a one-sided difference of the periodically extended coordinate
/// produces there.
fn wrapped_spacing(name: &str, values: &[f64]) -> Result<DataArray> {
    if values.len() < 2 {
        return Err(GcmError::configuration(format!(
            "periodic coordinate '{name}' needs at least two points"
        )));
    }
    let mut deltas = Vec::with_capacity(values.len());
    deltas.push(values[0] - values[values.len() - 1]);
    deltas.extend(values.windows(2).map(|w| w[1] - w[0]));
    Ok(DataArray::one_dim(name, deltas, values.to_vec())?.with_name(&format!("d{name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sided_spacing_is_upper_labeled() {
        let d = one_sided_spacing("Z", &[0.0, -1.0, -2.5]).unwrap();
        assert_eq!(d.shape(), &[2]);
        assert_eq!(d.get(&[0]), Some(-1.0));
        assert_eq!(d.get(&[1]), Some(-1.5));
        assert_eq!(d.coord_values("Z").unwrap(), &[-1.0, -2.5]);
    }

    #[test]
    fn one_sided_spacing_rejects_an_empty_coordinate() {
        assert!(matches!(
            one_sided_spacing("Z", &[]),
            Err(GcmError::Configuration(_))
        ));
    }

    #[test]
    fn wrapped_spacing_differences_across_the_seam() {
        let d = wrapped_spacing("lon", &[0.0, 90.0, 180.0, 270.0]).unwrap();
        assert_eq!(d.shape(), &[4]);
        // first-minus-wrapped-last at the seam
        assert_eq!(d.get(&[0]), Some(-270.0));
        assert_eq!(d.get(&[3]), Some(90.0));
    }
}
