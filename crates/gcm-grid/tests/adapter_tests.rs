//! Adapter construction, coordinate resolution, and hFac selection.

use gcm_grid::{Axis, Dataset, GcmDataset, GcmError, Manifest};
use test_utils::{gfdl_dataset, mitgcm_dataset, ones};

#[test]
fn resolve_logical_is_consistent_with_the_dataset() {
    let gcm = GcmDataset::new(mitgcm_dataset(4, 3, 5), Some(Manifest::mitgcm())).unwrap();
    let manifest = gcm.manifest().clone();
    for (raw, spec) in &manifest.coords {
        let resolved = gcm.adapter().resolve_logical(&spec.label.to_string());
        assert_eq!(&resolved, raw);
        assert!(gcm.dataset().contains(&resolved));
    }
}

#[test]
fn resolve_logical_passes_raw_names_through() {
    let gcm = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    assert_eq!(gcm.adapter().resolve_logical("Zp1"), "Zp1");
    assert_eq!(gcm.adapter().resolve_logical("not_a_label"), "not_a_label");
}

#[test]
fn manifest_is_auto_detected_from_the_title() {
    let mit = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    assert_eq!(mit.manifest().model, "mitgcm");
    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 3), None).unwrap();
    assert_eq!(gfdl.manifest().model, "gfdl");
}

#[test]
fn detection_fails_without_a_recognizable_title() {
    let mut ds = Dataset::new();
    ds.set_attr("title", "some reanalysis product");
    assert!(matches!(
        GcmDataset::new(ds, None),
        Err(GcmError::Configuration(_))
    ));
    assert!(matches!(
        GcmDataset::new(Dataset::new(), None),
        Err(GcmError::Configuration(_))
    ));
}

#[test]
fn missing_required_variable_names_the_first_absent_one() {
    let err = GcmDataset::new(Dataset::new(), Some(Manifest::gfdl())).unwrap_err();
    match err {
        GcmError::MissingVariable(name) => assert_eq!(name, "phalf"),
        other => panic!("expected MissingVariable, got {other:?}"),
    }
}

#[test]
fn dims_for_axis_collects_the_vertical_family() {
    let gcm = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    let zs = gcm.adapter().dims_for_axis(Axis::Z);
    let expected: Vec<&str> = vec!["Z", "Zl", "Zp1", "Zu"];
    assert_eq!(zs.iter().map(|s| s.as_str()).collect::<Vec<_>>(), expected);
}

#[test]
fn find_unique_axis_coord_requires_exactly_one_match() {
    let gcm = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    let tracer = ones(&["Z", "Y", "X"], &[5, 3, 4], &[]);
    assert_eq!(
        gcm.adapter().find_unique_axis_coord(Axis::Z, &tracer).unwrap(),
        "Z"
    );

    let two_vertical = ones(&["Z", "Zp1"], &[5, 6], &[]);
    assert!(matches!(
        gcm.adapter().find_unique_axis_coord(Axis::Z, &two_vertical),
        Err(GcmError::AmbiguousCoordinate { .. })
    ));

    let horizontal_only = ones(&["Y", "X"], &[3, 4], &[]);
    assert!(matches!(
        gcm.adapter().find_unique_axis_coord(Axis::Z, &horizontal_only),
        Err(GcmError::AmbiguousCoordinate { .. })
    ));
}

#[test]
fn periodicity_comes_from_the_manifest() {
    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 3), None).unwrap();
    assert!(gfdl.adapter().is_periodic("lon"));
    assert!(gfdl.adapter().is_periodic("x_centre"));
    assert!(!gfdl.adapter().is_periodic("lat"));
    // names not in the manifest are non-periodic by definition
    assert!(!gfdl.adapter().is_periodic("time"));
}

#[test]
fn spacings_are_precomputed_for_every_manifest_coordinate() {
    let mit = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    let dz = mit.adapter().spacing("Z").unwrap();
    assert_eq!(dz.shape(), &[4]);
    for k in 0..4 {
        assert_eq!(dz.get(&[k]), Some(-1.0));
    }

    // the periodic longitude keeps all N points via the wrapped difference;
    // the seam delta is first-minus-wrapped-last (0 - 315)
    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 3), None).unwrap();
    let dlon = gfdl.adapter().spacing("lon").unwrap();
    assert_eq!(dlon.shape(), &[8]);
    assert_eq!(dlon.get(&[0]), Some(-315.0));
    for i in 1..8 {
        assert_eq!(dlon.get(&[i]), Some(45.0));
    }
}

#[test]
fn hfac_selection_follows_horizontal_staggering() {
    let mit = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();

    let centre = ones(&["Z", "Y", "X"], &[5, 3, 4], &[]);
    assert_eq!(mit.adapter().hfac_for(&centre).unwrap().name(), Some("HFacC"));

    let west = ones(&["Z", "Y", "Xp1"], &[5, 3, 4], &[]);
    assert_eq!(mit.adapter().hfac_for(&west).unwrap().name(), Some("HFacW"));

    let south = ones(&["Z", "Yp1", "X"], &[5, 3, 4], &[]);
    assert_eq!(mit.adapter().hfac_for(&south).unwrap().name(), Some("HFacS"));

    // no horizontal dimensions: no weighting, not an error
    let column = ones(&["Z"], &[5], &[]);
    assert!(mit.adapter().hfac_for(&column).is_none());

    // edge-X/edge-Y matches none of the three variants
    let corner = ones(&["Z", "Yp1", "Xp1"], &[5, 3, 4], &[]);
    assert!(mit.adapter().hfac_for(&corner).is_none());

    // GFDL has no partial-cell factors at all
    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 3), None).unwrap();
    let temp = gfdl.get("temp").unwrap();
    assert!(gfdl.adapter().hfac_for(temp).is_none());
}

#[test]
fn physical_spacing_lookups_respect_the_manifest() {
    let mit = GcmDataset::new(mitgcm_dataset(4, 3, 5), None).unwrap();
    assert_eq!(mit.adapter().cell_thickness().unwrap().name(), Some("drF"));
    assert_eq!(mit.adapter().centre_spacing().unwrap().name(), Some("drC"));

    let gfdl = GcmDataset::new(gfdl_dataset(8, 4, 3), None).unwrap();
    assert!(matches!(
        gfdl.adapter().cell_thickness(),
        Err(GcmError::Configuration(_))
    ));
}
