//! Shared test utilities for the gcm-grid workspace.
//!
//! This crate provides deterministic synthetic datasets shaped like real
//! model output (MITgcm and GFDL grids) plus small field generators, so the
//! test suites can exercise the grid operators without any data files.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;
