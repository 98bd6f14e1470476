//! Staggered-grid operators.
//!
//! All operators are pure functions of an adapter, one or more arrays, and
//! optional parameters; none of them mutate the dataset, so a single adapter
//! can back any number of concurrent calls. Each result's name is the input
//! name with the operator suffix appended.

pub mod horizontal;
pub mod vertical;

pub use horizontal::{diff_xp1_to_x, diff_yp1_to_y, make_periodic_left, roll};
pub use vertical::{
    derivative_z_to_zp1, derivative_zl_to_z, derivative_zp1_to_z, diff_z_to_zp1, diff_zl_to_z,
    diff_zp1_to_z, integrate_vertical, pad_vertical,
};

use crate::array::DataArray;

/// Output name for an operator applied to `input`.
pub(crate) fn derived_name(input: &DataArray, suffix: &str) -> String {
    match input.name() {
        Some(base) => format!("{base}_{suffix}"),
        None => suffix.to_string(),
    }
}
