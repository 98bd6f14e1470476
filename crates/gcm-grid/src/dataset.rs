//! Dataset: a named collection of labeled arrays plus coordinates.

use std::collections::BTreeMap;

use crate::array::DataArray;
use crate::error::{GcmError, Result};

/// A collection of data variables, 1-D coordinate arrays, and free-text
/// attributes (the `title` attribute drives manifest auto-detection).
///
/// This is the in-process stand-in for a decoded model output file; loading
/// and decoding are someone else's job.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    variables: BTreeMap<String, DataArray>,
    coords: BTreeMap<String, DataArray>,
    attrs: BTreeMap<String, String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a 1-D coordinate.
    pub fn add_coord(&mut self, name: &str, values: Vec<f64>) {
        self.coords
            .insert(name.to_string(), DataArray::coordinate(name, values));
    }

    /// Register a data variable. Its name is set from the key.
    pub fn add_variable(&mut self, name: &str, array: DataArray) {
        self.variables.insert(name.to_string(), array.with_name(name));
    }

    /// Set a free-text attribute.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// True when `name` is a variable or a coordinate.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.coords.contains_key(name)
    }

    pub fn variable(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    pub fn coord(&self, name: &str) -> Option<&DataArray> {
        self.coords.get(name)
    }

    /// Variable or coordinate lookup, variables first.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name).or_else(|| self.coords.get(name))
    }

    /// Coordinate values, erroring with the missing name.
    pub fn coord_values(&self, name: &str) -> Result<&[f64]> {
        self.coords
            .get(name)
            .and_then(|c| c.coord_values(name))
            .ok_or_else(|| GcmError::missing_variable(name))
    }

    /// Names of all coordinates.
    pub fn coord_names(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(|s| s.as_str())
    }

    /// The coordinate-only sub-dataset.
    pub fn coords_dataset(&self) -> BTreeMap<String, DataArray> {
        self.coords.clone()
    }
}
