//! Finite-volume grid operators for GCM output on staggered Arakawa grids.
//!
//! This crate turns abstract requests like "difference this field from the
//! `zp1` grid to the `z` grid" into concrete labeled-array operations, using
//! a per-model manifest to abstract away coordinate naming differences
//! between model families (MITgcm, GFDL, ...). It handles staggered
//! centre/edge point locations, periodic wrap-around, partial-cell
//! thickness factors (hFac), and boundary fill values.
//!
//! # Architecture
//!
//! ```text
//! GcmDataset::new(dataset, manifest?)
//!      │
//!      ├─► Manifest (static per-model table, auto-detected from the
//!      │            dataset title when omitted)
//!      │
//!      ├─► GridAdapter (validates required variables, resolves logical
//!      │               labels, precomputes coordinate spacings)
//!      │
//!      └─► staggered operators (diff / derivative / pad / integrate /
//!                               periodic extension) over DataArrays
//! ```
//!
//! Loading and decoding model output is out of scope: callers hand in a
//! [`Dataset`] of labeled [`DataArray`]s. Operators preserve the arrays'
//! backing kind — chunk layouts go in and come back out untouched except
//! where an operator's contract says otherwise.
//!
//! # Example
//!
//! ```
//! use gcm_grid::{DataArray, Dataset, GcmDataset, Manifest};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let mut ds = Dataset::new();
//! ds.add_coord("pfull", vec![250.0, 500.0, 750.0]);
//! ds.add_coord("phalf", vec![125.0, 375.0, 625.0, 875.0]);
//! ds.add_coord("lat", vec![-45.0, 45.0]);
//! ds.add_coord("latb", vec![-90.0, 0.0]);
//! ds.add_coord("lon", vec![0.0, 90.0, 180.0, 270.0]);
//! ds.add_coord("lonb", vec![-45.0, 45.0, 135.0, 225.0]);
//!
//! let temp = DataArray::new(&["lon"], ArrayD::from_elem(IxDyn(&[4]), 280.0))
//!     .unwrap()
//!     .with_coord("lon", vec![0.0, 90.0, 180.0, 270.0])
//!     .unwrap()
//!     .with_name("temp");
//!
//! let gcm = GcmDataset::new(ds, Some(Manifest::gfdl())).unwrap();
//! let wrapped = gcm.make_periodic_left(&temp, None).unwrap();
//! assert_eq!(wrapped.len_of("lon").unwrap(), 5);
//! ```

pub mod adapter;
pub mod array;
pub mod dataset;
pub mod error;
pub mod facade;
pub mod manifest;
pub mod ops;

// Re-export commonly used types at crate root
pub use adapter::GridAdapter;
pub use array::DataArray;
pub use dataset::Dataset;
pub use error::{GcmError, Result};
pub use facade::GcmDataset;
pub use manifest::{Axis, CoordSpec, GridLabel, HfacVars, Manifest, Placement};
