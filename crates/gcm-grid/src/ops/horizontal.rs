//! Horizontal operators: periodic extension and cyclic staggered
//! differences.
//!
//! Horizontal axes on the supported model families wrap around, so the
//! "right neighbor" in a staggered difference is obtained by a cyclic roll
//! rather than a slice. Horizontal differences are therefore defined at
//! every point; there is no boundary trimming.

use crate::adapter::GridAdapter;
use crate::array::DataArray;
use crate::error::{GcmError, Result};
use crate::manifest::GridLabel;
use crate::ops::derived_name;

/// Cyclic shift by `n` positions along `dim`.
///
/// Used internally by the staggered difference operators and exposed as a
/// reusable utility.
pub fn roll(array: &DataArray, n: isize, dim: &str) -> Result<DataArray> {
    array.roll(n, dim)
}

/// Prepend the rightmost slice of `array` to its left along a periodic
/// coordinate, so that downstream one-sided differences wrap.
///
/// With `coord = None` the unique periodic coordinate on the array is used;
/// zero or multiple periodic candidates are an error. An explicitly given
/// coordinate must be flagged periodic in the manifest.
///
/// The prepended point's coordinate value is extrapolated one step left of
/// the original first point assuming uniform spacing near the seam; this is
/// a documented approximation, not a general non-uniform-grid treatment.
pub fn make_periodic_left(
    adapter: &GridAdapter,
    array: &DataArray,
    coord: Option<&str>,
) -> Result<DataArray> {
    let raw = match coord {
        Some(c) => {
            let raw = adapter.resolve_logical(c);
            if !adapter.is_periodic(&raw) {
                return Err(GcmError::NotPeriodic(raw));
            }
            // must actually be a dimension of the array
            array.axis(&raw)?;
            raw
        }
        None => {
            let mut candidates: Vec<String> = array
                .dims()
                .iter()
                .filter(|d| adapter.is_periodic(d))
                .cloned()
                .collect();
            if candidates.len() != 1 {
                return Err(GcmError::ambiguous(
                    format!(
                        "periodic coordinate on array '{}'",
                        array.name().unwrap_or("<unnamed>")
                    ),
                    candidates,
                ));
            }
            candidates.remove(0)
        }
    };

    let n = array.len_of(&raw)?;
    if n < 2 {
        return Err(GcmError::invalid_axis(format!(
            "cannot extend '{raw}' with fewer than two points"
        )));
    }
    let values = array.coord_values(&raw).ok_or_else(|| {
        GcmError::invalid_axis(format!("dimension '{raw}' carries no coordinate values"))
    })?;
    let left_value = values[0] - (values[1] - values[0]);

    let wrap = array
        .islice(&raw, n - 1..n)?
        .with_coord(&raw, vec![left_value])?;
    wrap.concat(array, &raw)
}

/// Difference an array at x-edge points onto x-centre points.
pub fn diff_xp1_to_x(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    cyclic_diff(
        adapter,
        array,
        GridLabel::X_EDGE,
        GridLabel::X_CENTRE,
        "diff_xp1_to_x",
    )
}

/// Difference an array at y-edge points onto y-centre points.
pub fn diff_yp1_to_y(adapter: &GridAdapter, array: &DataArray) -> Result<DataArray> {
    cyclic_diff(
        adapter,
        array,
        GridLabel::Y_EDGE,
        GridLabel::Y_CENTRE,
        "diff_yp1_to_y",
    )
}

/// Right-neighbor-minus-left difference along a cyclic axis, relabeled onto
/// the target grid.
fn cyclic_diff(
    adapter: &GridAdapter,
    array: &DataArray,
    from: GridLabel,
    to: GridLabel,
    suffix: &str,
) -> Result<DataArray> {
    let from_raw = adapter.raw_name(from)?.to_string();
    array.axis(&from_raw)?;
    let to_raw = adapter.raw_name(to)?.to_string();

    let right = array.roll(-1, &from_raw)?;
    let diff = right.sub(array)?;

    let to_values = adapter.coord_values(&to_raw)?.to_vec();
    let name = derived_name(array, suffix);
    Ok(diff
        .rename_dim(&from_raw, &to_raw, Some(to_values))?
        .with_name(&name))
}
