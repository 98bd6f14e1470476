//! Synthetic dataset generators shaped like real model output.
//!
//! All values are deterministic so tests can verify exact numbers. The
//! MITgcm-style grid uses unit cell thickness and depth decreasing downward
//! (z = 0 at the surface, negative below); the GFDL-style grid uses a
//! periodic longitude and pressure levels increasing downward.

use gcm_grid::{DataArray, Dataset};
use ndarray::{ArrayD, IxDyn};

/// A synthetic MITgcm-style dataset with `nx * ny` columns of `nz` unit
/// cells.
///
/// Coordinates follow the MITgcm naming: `X`/`Xp1`, `Y`/`Yp1` (both of
/// length `nx`/`ny`, cyclic convention without a duplicated endpoint) and
/// the four vertical grids `Z` (centres), `Zp1` (interfaces, `nz + 1`
/// points), `Zl`/`Zu` (lower/upper sub-levels, `nz` points each). Includes
/// `drF`, `drC`, and all three hFac variants set to 1 everywhere.
pub fn mitgcm_dataset(nx: usize, ny: usize, nz: usize) -> Dataset {
    let x: Vec<f64> = (0..nx).map(|i| i as f64 + 0.5).collect();
    let xp1: Vec<f64> = (0..nx).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..ny).map(|j| j as f64 + 0.5).collect();
    let yp1: Vec<f64> = (0..ny).map(|j| j as f64).collect();
    let z: Vec<f64> = (0..nz).map(|k| -(k as f64 + 0.5)).collect();
    let zp1: Vec<f64> = (0..=nz).map(|k| -(k as f64)).collect();
    let zl: Vec<f64> = (0..nz).map(|k| -(k as f64)).collect();
    let zu: Vec<f64> = (1..=nz).map(|k| -(k as f64)).collect();

    let mut ds = Dataset::new();
    ds.set_attr("title", "MITgcm simulation output");
    ds.add_coord("X", x.clone());
    ds.add_coord("Xp1", xp1.clone());
    ds.add_coord("Y", y.clone());
    ds.add_coord("Yp1", yp1.clone());
    ds.add_coord("Z", z.clone());
    ds.add_coord("Zp1", zp1.clone());
    ds.add_coord("Zl", zl);
    ds.add_coord("Zu", zu);

    // unit cell thickness; centre-to-centre spacing is half a cell at the
    // surface and bottom interfaces
    let drf = DataArray::one_dim("Z", vec![1.0; nz], z.clone()).expect("lengths match");
    let mut drc = vec![1.0; nz + 1];
    drc[0] = 0.5;
    drc[nz] = 0.5;
    let drc = DataArray::one_dim("Zp1", drc, zp1.clone()).expect("lengths match");
    ds.add_variable("drF", drf);
    ds.add_variable("drC", drc);

    ds.add_variable("HFacC", hfac(&["Z", "Y", "X"], &[nz, ny, nx], &z, &y, &x));
    ds.add_variable("HFacW", hfac(&["Z", "Y", "Xp1"], &[nz, ny, nx], &z, &y, &xp1));
    ds.add_variable("HFacS", hfac(&["Z", "Yp1", "X"], &[nz, ny, nx], &z, &yp1, &x));
    ds
}

fn hfac(dims: &[&str], shape: &[usize], z: &[f64], y: &[f64], x: &[f64]) -> DataArray {
    DataArray::new(dims, ArrayD::from_elem(IxDyn(shape), 1.0))
        .expect("rank matches")
        .with_coord(dims[0], z.to_vec())
        .expect("lengths match")
        .with_coord(dims[1], y.to_vec())
        .expect("lengths match")
        .with_coord(dims[2], x.to_vec())
        .expect("lengths match")
}

/// A synthetic GFDL-style dataset: periodic longitude, `nlev` pressure
/// levels, and a `temp` variable on (pfull, lat, lon) whose value encodes
/// its indices as `k * 10000 + j * 100 + i`.
pub fn gfdl_dataset(nlon: usize, nlat: usize, nlev: usize) -> Dataset {
    let dlon = 360.0 / nlon as f64;
    let lon: Vec<f64> = (0..nlon).map(|i| i as f64 * dlon).collect();
    let lonb: Vec<f64> = (0..nlon).map(|i| i as f64 * dlon - dlon / 2.0).collect();
    let dlat = 180.0 / nlat as f64;
    let lat: Vec<f64> = (0..nlat).map(|j| -90.0 + (j as f64 + 0.5) * dlat).collect();
    let latb: Vec<f64> = (0..nlat).map(|j| -90.0 + j as f64 * dlat).collect();
    let dp = 1000.0 / nlev as f64;
    let pfull: Vec<f64> = (0..nlev).map(|k| (k as f64 + 0.5) * dp).collect();
    let phalf: Vec<f64> = (0..=nlev).map(|k| k as f64 * dp).collect();

    let mut ds = Dataset::new();
    ds.set_attr("title", "GFDL b-grid atmosphere output");
    ds.add_coord("lon", lon.clone());
    ds.add_coord("lonb", lonb);
    ds.add_coord("lat", lat.clone());
    ds.add_coord("latb", latb);
    ds.add_coord("pfull", pfull.clone());
    ds.add_coord("phalf", phalf);

    let temp = DataArray::new(
        &["pfull", "lat", "lon"],
        ArrayD::from_shape_fn(IxDyn(&[nlev, nlat, nlon]), |ix| {
            (ix[0] * 10000 + ix[1] * 100 + ix[2]) as f64
        }),
    )
    .expect("rank matches")
    .with_coord("pfull", pfull)
    .expect("lengths match")
    .with_coord("lat", lat)
    .expect("lengths match")
    .with_coord("lon", lon)
    .expect("lengths match");
    ds.add_variable("temp", temp);
    ds
}

/// An all-ones field over the given dimensions, with coordinates attached
/// from `(dim, values)` pairs.
pub fn ones(dims: &[&str], shape: &[usize], coords: &[(&str, Vec<f64>)]) -> DataArray {
    let mut out =
        DataArray::new(dims, ArrayD::from_elem(IxDyn(shape), 1.0)).expect("rank matches");
    for (dim, values) in coords {
        out = out.with_coord(dim, values.clone()).expect("lengths match");
    }
    out
}

/// A 1-D linear profile `t0 - lapse * c` over the named coordinate.
pub fn linear_profile(dim: &str, coord: &[f64], t0: f64, lapse: f64) -> DataArray {
    let values: Vec<f64> = coord.iter().map(|&c| t0 - lapse * c).collect();
    DataArray::one_dim(dim, values, coord.to_vec()).expect("lengths match")
}
