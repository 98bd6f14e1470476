//! Vertical operators: padding, staggered differences, derivatives, and
//! thickness-weighted integration.

use ndarray::{ArrayD, IxDyn};

use crate::adapter::GridAdapter;
use crate::array::DataArray;
use crate::error::{GcmError, Result};
use crate::manifest::{Axis, GridLabel};
use crate::ops::derived_name;

/// Re-express an array onto an adjacent staggered vertical grid by appending
/// one synthetic bottom level of `fill_value`.
///
/// With `new_coord = None` the target grid is inferred only when the
/// manifest's vertical coordinate set has exactly two members; any other
/// cardinality is an error, never a guess. The synthetic level's coordinate
/// value is the target grid's last value.
///
/// Chunked inputs get a fill block with matching chunks (a single chunk of
/// size 1 on the vertical) and the result is re-chunked so the vertical
/// dimension is one contiguous block.
pub fn pad_vertical(
    adapter: &GridAdapter,
    array: &DataArray,
    fill_value: f64,
    new_coord: Option<&str>,
) -> Result<DataArray> {
    let orig = adapter.find_unique_axis_coord(Axis::Z, array)?;
    let new_raw = match new_coord {
        Some(c) => adapter.resolve_logical(c),
        None => {
            let zset = adapter.dims_for_axis(Axis::Z);
            if zset.len() != 2 {
                return Err(GcmError::ambiguous(
                    format!(
                        "target vertical coordinate for padding array '{}'",
                        array.name().unwrap_or("<unnamed>")
                    ),
                    zset.into_iter().filter(|d| *d != orig).collect(),
                ));
            }
            zset.into_iter()
                .find(|d| *d != orig)
                .ok_or_else(|| GcmError::invalid_axis(format!("'{orig}' is the only vertical coordinate")))?
        }
    };

    let target_values = adapter.coord_values(&new_raw)?;
    let bottom = *target_values.last().ok_or_else(|| {
        GcmError::invalid_axis(format!("coordinate '{new_raw}' is empty"))
    })?;

    let ax = array.axis(&orig)?;
    let mut shape = array.shape().to_vec();
    shape[ax] = 1;
    let dims: Vec<&str> = array.dims().iter().map(|s| s.as_str()).collect();
    let mut block = DataArray::new(&dims, ArrayD::from_elem(IxDyn(&shape), fill_value))?
        .with_coord(&orig, vec![bottom])?;
    if let Some(chunks) = array.chunks() {
        let mut layout = chunks.to_vec();
        layout[ax] = vec![1];
        block = block.with_chunks(layout)?;
    }

    let padded = array.concat(&block, &orig)?.rename_dim(&orig, &new_raw, None)?;
    if padded.is_chunked() {
        padded.rechunk_full(&new_raw)
    } else {
        Ok(padded)
    }
}

/// Difference an array at z-edge (interface) points onto z-centre points:
/// an inner difference, one point shorter than the input.
pub fn diff_zp1_to_z(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    staggered_diff(
        adapter,
        array,
        GridLabel::Z_EDGE,
        GridLabel::Z_CENTRE,
        false,
        "diff_zp1_to_z",
    )
}

/// Difference an array at lower-interface points onto z-centre points.
///
/// The array is first padded onto the edge grid; `fill_value` supplies the
/// bottom boundary condition (0 is the appropriate choice for vertical
/// fluxes).
pub fn diff_zl_to_z(
    adapter: &GridAdapter,
    array: &DataArray,
    fill_value: f64,
) -> Result<DataArray> {
    let zp1 = adapter.raw_name(GridLabel::Z_EDGE)?.to_string();
    let padded = pad_vertical(adapter, array, fill_value, Some(&zp1))?;
    let diff = diff_zp1_to_z(adapter, &padded)?;
    Ok(diff.with_name(&derived_name(array, "diff_zl_to_z")))
}

/// Difference an array at z-centre points onto z-edge points. No boundary
/// value can be derived at either end, so the result is trimmed to the
/// interior edge points.
pub fn diff_z_to_zp1(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    staggered_diff(
        adapter,
        array,
        GridLabel::Z_CENTRE,
        GridLabel::Z_EDGE,
        true,
        "diff_z_to_zp1",
    )
}

/// Vertical derivative from z-edge onto z-centre points: the staggered
/// difference divided by the full-cell thickness.
pub fn derivative_zp1_to_z(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    let diff = diff_zp1_to_z(adapter, array)?;
    let thickness = adapter.cell_thickness()?;
    Ok(diff
        .div(thickness)?
        .with_name(&derived_name(array, "derivative_zp1_to_z")))
}

/// Vertical derivative from lower-interface onto z-centre points.
pub fn derivative_zl_to_z(
    adapter: &GridAdapter,
    array: &DataArray,
    fill_value: f64,
) -> Result<DataArray> {
    let diff = diff_zl_to_z(adapter, array, fill_value)?;
    let thickness = adapter.cell_thickness()?;
    Ok(diff
        .div(thickness)?
        .with_name(&derived_name(array, "derivative_zl_to_z")))
}

/// Vertical derivative from z-centre onto interior z-edge points: the
/// staggered difference divided by the centre-to-centre spacing, trimmed at
/// both ends to the differenced length.
pub fn derivative_z_to_zp1(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    let diff = diff_z_to_zp1(adapter, array)?;
    let spacing = adapter.centre_spacing()?;
    let dim = spacing.dims()[0].clone();
    let need = diff.len_of(&dim)?;
    let have = spacing.len_of(&dim)?;
    let spacing = if have == need + 2 {
        spacing.islice(&dim, 1..have - 1)?
    } else if have == need {
        spacing.clone()
    } else {
        return Err(GcmError::invalid_axis(format!(
            "centre spacing has {have} points but {need} are needed"
        )));
    };
    Ok(diff
        .div(&spacing)?
        .with_name(&derived_name(array, "derivative_z_to_zp1")))
}

/// Integrate (or average, with `average = true`) an array along the
/// z-centre dimension, weighting each level by its thickness and, when one
/// applies, the partial-cell factor. This is a reduction: the result has one
/// fewer dimension than the input.
pub fn integrate_vertical(
    adapter: &GridAdapter,
    array: &DataArray,
    average: bool,
) -> Result<DataArray> {
    let z = adapter.raw_name(GridLabel::Z_CENTRE)?.to_string();
    if !array.has_dim(&z) {
        return Err(GcmError::invalid_axis(format!(
            "can only integrate arrays on the '{z}' grid"
        )));
    }
    let mut weights = adapter.cell_thickness()?.clone();
    if let Some(hfac) = adapter.hfac_for(array) {
        weights = weights.mul(hfac)?;
    }
    let total = array.mul(&weights)?.sum(&z)?;
    let result = if average {
        total.div(&weights.sum(&z)?)?
    } else {
        total
    };
    Ok(result.with_name(&derived_name(array, "integrate_z")))
}

/// Helper for the inner staggered differences: upper-slice minus lower-slice
/// along the source grid, relabeled onto the target grid. With `trim_ends`
/// the target coordinate is expected one point longer on each side and the
/// interior values are used.
fn staggered_diff(
    adapter: &GridAdapter,
    array: &DataArray,
    from: GridLabel,
    to: GridLabel,
    trim_ends: bool,
    suffix: &str,
) -> Result<DataArray> {
    let from_raw = adapter.raw_name(from)?.to_string();
    let n = array.len_of(&from_raw)?;
    if n < 2 {
        return Err(GcmError::invalid_axis(format!(
            "cannot difference '{from_raw}' with fewer than two points"
        )));
    }
    let upper = array.islice(&from_raw, 0..n - 1)?;
    let lower = array.islice(&from_raw, 1..n)?;
    let diff = upper.sub(&lower)?;

    let to_raw = adapter.raw_name(to)?.to_string();
    let target = adapter.coord_values(&to_raw)?;
    let values = if trim_ends {
        if target.len() != n + 1 {
            return Err(GcmError::invalid_axis(format!(
                "coordinate '{to_raw}' has {} points but {} are needed to trim to the interior",
                target.len(),
                n + 1
            )));
        }
        target[1..target.len() - 1].to_vec()
    } else {
        if target.len() != n - 1 {
            return Err(GcmError::invalid_axis(format!(
                "coordinate '{to_raw}' has {} points but the difference has {}",
                target.len(),
                n - 1
            )));
        }
        target.to_vec()
    };

    let name = derived_name(array, suffix);
    Ok(diff
        .rename_dim(&from_raw, &to_raw, Some(values))?
        .with_name(&name))
}
