//! Vertical padding, staggered differences, derivatives, and integration.

use gcm_grid::{DataArray, GcmDataset, GcmError};
use ndarray::{ArrayD, IxDyn};
use test_utils::{gfdl_dataset, linear_profile, mitgcm_dataset, ones};

fn mit() -> GcmDataset {
    GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap()
}

#[test]
fn pad_vertical_appends_one_fill_level() {
    let mit = mit();
    let zl: Vec<f64> = (0..5).map(|k| -(k as f64)).collect();
    let flux = DataArray::one_dim("Zl", vec![0.0, 1.0, 2.0, 3.0, 4.0], zl)
        .unwrap()
        .with_name("w_flux");

    let padded = mit.pad_zl_to_zp1(&flux, 9.5).unwrap();
    assert_eq!(padded.dims(), &["Zp1".to_string()]);
    assert_eq!(padded.len_of("Zp1").unwrap(), 6);
    assert_eq!(padded.get(&[5]), Some(9.5));
    // the synthetic level takes the target grid's last coordinate value
    assert_eq!(
        padded.coord_values("Zp1").unwrap(),
        &[0.0, -1.0, -2.0, -3.0, -4.0, -5.0]
    );
}

#[test]
fn pad_vertical_inference_needs_exactly_two_vertical_coords() {
    // MITgcm has four vertical coordinate families: no safe guess
    let mit = mit();
    let zl: Vec<f64> = (0..5).map(|k| -(k as f64)).collect();
    let flux = DataArray::one_dim("Zl", vec![0.0; 5], zl).unwrap();
    assert!(matches!(
        mit.pad_vertical(&flux, 0.0, None),
        Err(GcmError::AmbiguousCoordinate { .. })
    ));

    // GFDL has exactly two, so the other one is chosen
    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 4), None).unwrap();
    let pfull: Vec<f64> = vec![125.0, 375.0, 625.0, 875.0];
    let q = DataArray::one_dim("pfull", vec![1.0, 2.0, 3.0, 4.0], pfull).unwrap();
    let padded = gfdl.pad_vertical(&q, 0.0, None).unwrap();
    assert_eq!(padded.dims(), &["phalf".to_string()]);
    assert_eq!(padded.len_of("phalf").unwrap(), 5);
    assert_eq!(padded.coord_values("phalf").unwrap().last(), Some(&1000.0));
}

#[test]
fn pad_vertical_rechunks_the_vertical_to_one_block() {
    let mit = mit();
    let zl: Vec<f64> = (0..5).map(|k| -(k as f64)).collect();
    let flux = DataArray::one_dim("Zl", vec![0.0, 1.0, 2.0, 3.0, 4.0], zl)
        .unwrap()
        .with_chunks(vec![vec![2, 2, 1]])
        .unwrap();

    let padded = mit.pad_zl_to_zp1(&flux, 0.0).unwrap();
    assert!(padded.is_chunked());
    assert_eq!(padded.chunks().unwrap()[0], vec![6]);

    // eager input stays eager
    let eager = DataArray::one_dim(
        "Zl",
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        (0..5).map(|k| -(k as f64)).collect(),
    )
    .unwrap();
    assert!(!mit.pad_zl_to_zp1(&eager, 0.0).unwrap().is_chunked());
}

#[test]
fn diff_zp1_to_z_is_an_inner_difference() {
    let mit = mit();
    let zp1: Vec<f64> = (0..=5).map(|k| -(k as f64)).collect();
    let t = linear_profile("Zp1", &zp1, 20.0, 3.0).with_name("temp");

    let dt = mit.diff_zp1_to_z(&t).unwrap();
    assert_eq!(dt.dims(), &["Z".to_string()]);
    assert_eq!(dt.len_of("Z").unwrap(), 5);
    assert_eq!(dt.name(), Some("temp_diff_zp1_to_z"));
    // upper minus lower of a linear profile: -L * dz at every level
    for k in 0..5 {
        assert!((dt.get(&[k]).unwrap() - (-3.0)).abs() < 1e-12);
    }
}

#[test]
fn vertical_derivative_recovers_the_lapse_rate() {
    let mit = mit();
    let zp1: Vec<f64> = (0..=5).map(|k| -(k as f64)).collect();
    let t = linear_profile("Zp1", &zp1, 20.0, 3.0).with_name("temp");

    let dtdz = mit.derivative_zp1_to_z(&t).unwrap();
    assert_eq!(dtdz.name(), Some("temp_derivative_zp1_to_z"));
    for k in 0..5 {
        assert!((dtdz.get(&[k]).unwrap() - (-3.0)).abs() < 1e-12);
    }
}

#[test]
fn diff_z_to_zp1_trims_both_ends() {
    let mit = mit();
    let z: Vec<f64> = (0..5).map(|k| -(k as f64 + 0.5)).collect();
    let t = linear_profile("Z", &z, 20.0, 3.0).with_name("temp");

    let dt = mit.diff_z_to_zp1(&t).unwrap();
    assert_eq!(dt.dims(), &["Zp1".to_string()]);
    // no boundary value can be derived at either end
    assert_eq!(dt.len_of("Zp1").unwrap(), 4);
    assert_eq!(
        dt.coord_values("Zp1").unwrap(),
        &[-1.0, -2.0, -3.0, -4.0]
    );

    let dtdz = mit.derivative_z_to_zp1(&t).unwrap();
    for k in 0..4 {
        assert!((dtdz.get(&[k]).unwrap() - (-3.0)).abs() < 1e-12);
    }
}

#[test]
fn diff_zl_to_z_uses_the_fill_value_at_the_bottom() {
    let mit = mit();
    let zl: Vec<f64> = (0..5).map(|k| -(k as f64)).collect();
    let flux = DataArray::one_dim("Zl", vec![0.0, 1.0, 2.0, 3.0, 4.0], zl)
        .unwrap()
        .with_name("w_flux");

    let div = mit.diff_zl_to_z(&flux, 0.0).unwrap();
    assert_eq!(div.dims(), &["Z".to_string()]);
    assert_eq!(div.len_of("Z").unwrap(), 5);
    assert_eq!(div.name(), Some("w_flux_diff_zl_to_z"));
    for k in 0..4 {
        assert_eq!(div.get(&[k]), Some(-1.0));
    }
    // bottom level differences against the fill value
    assert_eq!(div.get(&[4]), Some(4.0));
}

#[test]
fn integration_sums_thickness_weighted_levels() {
    let mit = mit();
    let z: Vec<f64> = (0..5).map(|k| -(k as f64 + 0.5)).collect();
    let field = ones(&["Z", "Y", "X"], &[5, 3, 4], &[("Z", z)]).with_name("ones");

    let total = mit.integrate_vertical(&field, false).unwrap();
    assert_eq!(total.dims(), &["Y".to_string(), "X".to_string()]);
    assert_eq!(total.name(), Some("ones_integrate_z"));
    for j in 0..3 {
        for i in 0..4 {
            assert!((total.get(&[j, i]).unwrap() - 5.0).abs() < 1e-12);
        }
    }

    let mean = mit.integrate_vertical(&field, true).unwrap();
    for j in 0..3 {
        for i in 0..4 {
            assert!((mean.get(&[j, i]).unwrap() - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn integration_applies_the_partial_cell_factor() {
    let mut ds = mitgcm_dataset(4, 3, 5);
    // half-height bottom cells
    let hfac = DataArray::new(
        &["Z", "Y", "X"],
        ArrayD::from_shape_fn(IxDyn(&[5, 3, 4]), |ix| if ix[0] == 4 { 0.5 } else { 1.0 }),
    )
    .unwrap();
    ds.add_variable("HFacC", hfac);
    let mit = GcmDataset::new(ds, None).unwrap();

    let z: Vec<f64> = (0..5).map(|k| -(k as f64 + 0.5)).collect();
    let field = ones(&["Z", "Y", "X"], &[5, 3, 4], &[("Z", z)]);

    let total = mit.integrate_vertical(&field, false).unwrap();
    for j in 0..3 {
        for i in 0..4 {
            assert!((total.get(&[j, i]).unwrap() - 4.5).abs() < 1e-12);
        }
    }
    // the average of a constant field is unaffected by the weights
    let mean = mit.integrate_vertical(&field, true).unwrap();
    for j in 0..3 {
        for i in 0..4 {
            assert!((mean.get(&[j, i]).unwrap() - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn integration_requires_the_vertical_centre_dimension() {
    let mit = mit();
    let surface = ones(&["Y", "X"], &[3, 4], &[]);
    assert!(matches!(
        mit.integrate_vertical(&surface, false),
        Err(GcmError::InvalidAxis(_))
    ));
}

#[test]
fn integration_preserves_the_chunk_layout() {
    let mit = mit();
    let z: Vec<f64> = (0..5).map(|k| -(k as f64 + 0.5)).collect();
    let field = ones(&["Z", "Y", "X"], &[5, 3, 4], &[("Z", z)])
        .with_chunks(vec![vec![5], vec![3], vec![2, 2]])
        .unwrap();

    let total = mit.integrate_vertical(&field, false).unwrap();
    assert!(total.is_chunked());
    assert_eq!(total.chunks().unwrap(), &[vec![3], vec![2, 2]]);
}
