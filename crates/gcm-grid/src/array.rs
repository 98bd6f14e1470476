//! Labeled multi-dimensional arrays.
//!
//! A [`DataArray`] couples an `ndarray` block of f64 values with named
//! dimensions, per-dimension 1-D coordinate vectors, and an optional chunk
//! layout. The chunk layout is bookkeeping for lazily chunked storage: every
//! operation in this crate preserves it (chunked in, chunked out; eager in,
//! eager out) so results can be handed back to a chunked execution engine
//! with the same blocking they came in with.

use std::collections::BTreeMap;
use std::ops::Range;

use ndarray::{concatenate, Array1, ArrayD, ArrayViewD, Axis, IxDyn, Slice, Zip};

use crate::error::{GcmError, Result};

/// A labeled array: named dimensions, coordinate vectors, f64 values.
#[derive(Debug, Clone)]
pub struct DataArray {
    name: Option<String>,
    dims: Vec<String>,
    coords: BTreeMap<String, Vec<f64>>,
    data: ArrayD<f64>,
    /// Per-dimension chunk lengths, parallel to `dims`. `None` means eager.
    chunks: Option<Vec<Vec<usize>>>,
}

impl DataArray {
    /// Create an unnamed array over the given dimensions.
    pub fn new(dims: &[&str], data: ArrayD<f64>) -> Result<Self> {
        if dims.len() != data.ndim() {
            return Err(GcmError::invalid_axis(format!(
                "{} dimension names given for rank-{} data",
                dims.len(),
                data.ndim()
            )));
        }
        Ok(Self {
            name: None,
            dims: dims.iter().map(|d| d.to_string()).collect(),
            coords: BTreeMap::new(),
            data,
            chunks: None,
        })
    }

    /// Create a 1-D coordinate array: the dimension carries its own values.
    pub fn coordinate(name: &str, values: Vec<f64>) -> Self {
        let data = Array1::from(values.clone()).into_dyn();
        let mut coords = BTreeMap::new();
        coords.insert(name.to_string(), values);
        Self {
            name: Some(name.to_string()),
            dims: vec![name.to_string()],
            coords,
            data,
            chunks: None,
        }
    }

    /// Create a 1-D array over `dim` with separate data and coordinate
    /// values (e.g. a spacing field labeled by the upper points).
    pub fn one_dim(dim: &str, data: Vec<f64>, coords: Vec<f64>) -> Result<Self> {
        if data.len() != coords.len() {
            return Err(GcmError::invalid_axis(format!(
                "{} data values but {} coordinate values for '{dim}'",
                data.len(),
                coords.len()
            )));
        }
        let mut out = Self::new(&[dim], Array1::from(data).into_dyn())?;
        out.coords.insert(dim.to_string(), coords);
        Ok(out)
    }

    /// Set the array name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Append an operator suffix to the name, or use just the suffix if the
    /// array is unnamed.
    pub fn with_name_suffix(mut self, suffix: &str) -> Self {
        self.name = Some(match self.name.take() {
            Some(base) => format!("{base}_{suffix}"),
            None => suffix.to_string(),
        });
        self
    }

    /// Attach coordinate values to a dimension.
    pub fn with_coord(mut self, dim: &str, values: Vec<f64>) -> Result<Self> {
        let ax = self.axis(dim)?;
        if values.len() != self.data.len_of(Axis(ax)) {
            return Err(GcmError::invalid_axis(format!(
                "coordinate for '{}' has {} values but the dimension has length {}",
                dim,
                values.len(),
                self.data.len_of(Axis(ax))
            )));
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    /// Attach a chunk layout (per-dimension chunk lengths).
    pub fn with_chunks(mut self, chunks: Vec<Vec<usize>>) -> Result<Self> {
        if chunks.len() != self.dims.len() {
            return Err(GcmError::invalid_axis(format!(
                "chunk layout covers {} dimensions but the array has {}",
                chunks.len(),
                self.dims.len()
            )));
        }
        for (d, (list, &n)) in self.dims.iter().zip(chunks.iter().zip(self.data.shape())) {
            let total: usize = list.iter().sum();
            if total != n {
                return Err(GcmError::invalid_axis(format!(
                    "chunks along '{d}' sum to {total} but the dimension has length {n}"
                )));
            }
        }
        self.chunks = Some(chunks);
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn is_chunked(&self) -> bool {
        self.chunks.is_some()
    }

    pub fn chunks(&self) -> Option<&[Vec<usize>]> {
        self.chunks.as_deref()
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Coordinate values for a dimension, if any are attached.
    pub fn coord_values(&self, dim: &str) -> Option<&[f64]> {
        self.coords.get(dim).map(|v| v.as_slice())
    }

    /// Value at an explicit index, for inspection.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Axis position of a named dimension.
    pub fn axis(&self, dim: &str) -> Result<usize> {
        self.dims.iter().position(|d| d == dim).ok_or_else(|| {
            GcmError::invalid_axis(format!(
                "array {:?} has no dimension '{dim}'",
                self.name.as_deref().unwrap_or("<unnamed>")
            ))
        })
    }

    /// Length of a named dimension.
    pub fn len_of(&self, dim: &str) -> Result<usize> {
        Ok(self.data.len_of(Axis(self.axis(dim)?)))
    }

    fn dim_size(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|ax| self.data.len_of(Axis(ax)))
    }

    fn chunk_list(&self, dim: &str) -> Option<Vec<usize>> {
        let chunks = self.chunks.as_ref()?;
        let ax = self.dims.iter().position(|d| d == dim)?;
        Some(chunks[ax].clone())
    }

    /// Select a single index along a dimension, dropping it. Negative
    /// indices count from the end.
    pub fn isel(&self, dim: &str, index: isize) -> Result<DataArray> {
        let ax = self.axis(dim)?;
        let n = self.data.len_of(Axis(ax)) as isize;
        let i = if index < 0 { index + n } else { index };
        if i < 0 || i >= n {
            return Err(GcmError::invalid_axis(format!(
                "index {index} out of bounds for dimension '{dim}' of length {n}"
            )));
        }
        let data = self.data.index_axis(Axis(ax), i as usize).to_owned();
        let mut dims = self.dims.clone();
        dims.remove(ax);
        let mut coords = self.coords.clone();
        coords.remove(dim);
        let chunks = self.chunks.as_ref().map(|ch| {
            let mut ch = ch.clone();
            ch.remove(ax);
            ch
        });
        Ok(DataArray {
            name: self.name.clone(),
            dims,
            coords,
            data,
            chunks,
        })
    }

    /// Select a half-open index range along a dimension, keeping it.
    pub fn islice(&self, dim: &str, range: Range<usize>) -> Result<DataArray> {
        let ax = self.axis(dim)?;
        let n = self.data.len_of(Axis(ax));
        if range.start > range.end || range.end > n {
            return Err(GcmError::invalid_axis(format!(
                "slice {range:?} out of bounds for dimension '{dim}' of length {n}"
            )));
        }
        let data = self
            .data
            .slice_axis(Axis(ax), Slice::from(range.clone()))
            .to_owned();
        let mut coords = self.coords.clone();
        if let Some(v) = coords.get_mut(dim) {
            *v = v[range.clone()].to_vec();
        }
        let chunks = self.chunks.as_ref().map(|ch| {
            let mut ch = ch.clone();
            ch[ax] = clip_chunks(&ch[ax], range.start, range.end);
            ch
        });
        Ok(DataArray {
            name: self.name.clone(),
            dims: self.dims.clone(),
            coords,
            data,
            chunks,
        })
    }

    /// Concatenate another array after this one along a dimension.
    ///
    /// Both arrays must carry the same dimensions in the same order.
    pub fn concat(&self, other: &DataArray, dim: &str) -> Result<DataArray> {
        if self.dims != other.dims {
            return Err(GcmError::invalid_axis(format!(
                "cannot concatenate arrays with dimensions {:?} and {:?}",
                self.dims, other.dims
            )));
        }
        let ax = self.axis(dim)?;
        let data = concatenate(Axis(ax), &[self.data.view(), other.data.view()]).map_err(
            |e| GcmError::invalid_axis(format!("cannot concatenate along '{dim}': {e}")),
        )?;
        let mut coords = self.coords.clone();
        match (self.coords.get(dim), other.coords.get(dim)) {
            (Some(a), Some(b)) => {
                let mut v = a.clone();
                v.extend_from_slice(b);
                coords.insert(dim.to_string(), v);
            }
            _ => {
                coords.remove(dim);
            }
        }
        let chunks = if self.chunks.is_none() && other.chunks.is_none() {
            None
        } else {
            let mut out = Vec::with_capacity(self.dims.len());
            for (i, d) in self.dims.iter().enumerate() {
                if i == ax {
                    let mut list = self
                        .chunk_list(d)
                        .unwrap_or_else(|| vec![self.data.len_of(Axis(i))]);
                    list.extend(
                        other
                            .chunk_list(d)
                            .unwrap_or_else(|| vec![other.data.len_of(Axis(i))]),
                    );
                    out.push(list);
                } else {
                    out.push(
                        self.chunk_list(d)
                            .unwrap_or_else(|| vec![self.data.len_of(Axis(i))]),
                    );
                }
            }
            Some(out)
        };
        Ok(DataArray {
            name: self.name.clone(),
            dims: self.dims.clone(),
            coords,
            data,
            chunks,
        })
    }

    /// Cyclic shift by `n` positions along `dim` (positive shifts right).
    ///
    /// Both data and the dimension's coordinate values are rolled; the chunk
    /// layout is kept as-is since the total length is unchanged.
    pub fn roll(&self, n: isize, dim: &str) -> Result<DataArray> {
        let len = self.len_of(dim)?;
        if len == 0 {
            return Ok(self.clone());
        }
        let s = n.rem_euclid(len as isize) as usize;
        if s == 0 {
            return Ok(self.clone());
        }
        let tail = self.islice(dim, len - s..len)?;
        let head = self.islice(dim, 0..len - s)?;
        let mut rolled = tail.concat(&head, dim)?;
        rolled.chunks = self.chunks.clone();
        Ok(rolled)
    }

    /// Rename a dimension, optionally replacing its coordinate values.
    ///
    /// With `new_coords = None` the existing values carry over under the new
    /// name.
    pub fn rename_dim(
        &self,
        old: &str,
        new: &str,
        new_coords: Option<Vec<f64>>,
    ) -> Result<DataArray> {
        let ax = self.axis(old)?;
        let n = self.data.len_of(Axis(ax));
        let mut dims = self.dims.clone();
        dims[ax] = new.to_string();
        let mut coords = self.coords.clone();
        let carried = coords.remove(old);
        let replacement = match new_coords {
            Some(v) => {
                if v.len() != n {
                    return Err(GcmError::invalid_axis(format!(
                        "replacement coordinate for '{new}' has {} values but the dimension has length {n}",
                        v.len()
                    )));
                }
                Some(v)
            }
            None => carried,
        };
        if let Some(v) = replacement {
            coords.insert(new.to_string(), v);
        }
        Ok(DataArray {
            name: self.name.clone(),
            dims,
            coords,
            data: self.data.clone(),
            chunks: self.chunks.clone(),
        })
    }

    /// Collapse a dimension's chunks into one contiguous block.
    pub fn rechunk_full(mut self, dim: &str) -> Result<DataArray> {
        let ax = self.axis(dim)?;
        let n = self.data.len_of(Axis(ax));
        if let Some(chunks) = self.chunks.as_mut() {
            chunks[ax] = vec![n];
        }
        Ok(self)
    }

    /// Elementwise subtraction aligned by dimension name.
    pub fn sub(&self, rhs: &DataArray) -> Result<DataArray> {
        self.binary_op(rhs, |a, b| a - b)
    }

    /// Elementwise division aligned by dimension name.
    pub fn div(&self, rhs: &DataArray) -> Result<DataArray> {
        self.binary_op(rhs, |a, b| a / b)
    }

    /// Elementwise multiplication aligned by dimension name.
    pub fn mul(&self, rhs: &DataArray) -> Result<DataArray> {
        self.binary_op(rhs, |a, b| a * b)
    }

    /// Sum along a named dimension. This is a reduction: the result has one
    /// fewer dimension than the input.
    pub fn sum(&self, dim: &str) -> Result<DataArray> {
        let ax = self.axis(dim)?;
        let data = self.data.sum_axis(Axis(ax));
        let mut dims = self.dims.clone();
        dims.remove(ax);
        let mut coords = self.coords.clone();
        coords.remove(dim);
        let chunks = self.chunks.as_ref().map(|ch| {
            let mut ch = ch.clone();
            ch.remove(ax);
            ch
        });
        Ok(DataArray {
            name: self.name.clone(),
            dims,
            coords,
            data,
            chunks,
        })
    }

    /// Elementwise binary operation over the dimension-name union of both
    /// operands, broadcasting each side over the dimensions it lacks.
    ///
    /// The result's dimensions are the left operand's followed by any extra
    /// right-operand dimensions, in order of appearance. Shared dimensions
    /// must agree in length. Coordinates come from the left operand where it
    /// has them, otherwise from the right; the result is unnamed.
    fn binary_op(&self, rhs: &DataArray, f: fn(f64, f64) -> f64) -> Result<DataArray> {
        let mut dims: Vec<String> = self.dims.clone();
        for d in &rhs.dims {
            if !dims.contains(d) {
                dims.push(d.clone());
            }
        }
        let mut shape = Vec::with_capacity(dims.len());
        for d in &dims {
            match (self.dim_size(d), rhs.dim_size(d)) {
                (Some(a), Some(b)) if a != b => {
                    return Err(GcmError::invalid_axis(format!(
                        "dimension '{d}' has length {a} on the left and {b} on the right"
                    )))
                }
                (Some(a), _) => shape.push(a),
                (None, Some(b)) => shape.push(b),
                (None, None) => unreachable!("dims built from both operands"),
            }
        }
        let lhs_exp = self.expand_to(&dims, &shape)?;
        let rhs_exp = rhs.expand_to(&dims, &shape)?;
        let data = Zip::from(&lhs_exp).and(&rhs_exp).map_collect(|&a, &b| f(a, b));
        let mut coords = BTreeMap::new();
        for d in &dims {
            if let Some(v) = self.coord_values(d).or_else(|| rhs.coord_values(d)) {
                coords.insert(d.clone(), v.to_vec());
            }
        }
        let chunks = if self.chunks.is_some() || rhs.chunks.is_some() {
            let mut out = Vec::with_capacity(dims.len());
            for (d, &n) in dims.iter().zip(&shape) {
                out.push(
                    self.chunk_list(d)
                        .or_else(|| rhs.chunk_list(d))
                        .unwrap_or_else(|| vec![n]),
                );
            }
            Some(out)
        } else {
            None
        };
        Ok(DataArray {
            name: None,
            dims,
            coords,
            data,
            chunks,
        })
    }

    /// Broadcast this array to a target dimension order and shape. The
    /// target must contain every dimension of the array.
    fn expand_to(&self, dims: &[String], shape: &[usize]) -> Result<ArrayD<f64>> {
        let mut order: Vec<usize> = (0..self.dims.len()).collect();
        order.sort_by_key(|&a| {
            dims.iter()
                .position(|d| d == &self.dims[a])
                .unwrap_or(usize::MAX)
        });
        let mut view: ArrayViewD<'_, f64> = self.data.view().permuted_axes(order);
        for (i, d) in dims.iter().enumerate() {
            if !self.has_dim(d) {
                view = view.insert_axis(Axis(i));
            }
        }
        let broadcast = view.broadcast(IxDyn(shape)).ok_or_else(|| {
            GcmError::invalid_axis(format!(
                "cannot broadcast array with dimensions {:?} to {:?}",
                self.dims, dims
            ))
        })?;
        Ok(broadcast.to_owned())
    }
}

/// Restrict a chunk list to the `[start, end)` index window.
fn clip_chunks(chunks: &[usize], start: usize, end: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut pos = 0;
    for &c in chunks {
        let lo = pos.max(start);
        let hi = (pos + c).min(end);
        if hi > lo {
            out.push(hi - lo);
        }
        pos += c;
    }
    out
}
