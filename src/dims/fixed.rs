//! Immutable shape descriptor storing explicit extents only.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DimsError;
use super::print::{self, PrintEntry, PrintOptions};

/// Ordered list of explicit dimension sizes describing a buffer layout.
///
/// The descriptor is a value: a changed shape is a new instance. Every shape
/// has rank 1 or higher — constructing from zero sizes collapses to the
/// rank-1, size-0 default so collaborators can treat "no shape yet" and
/// "empty buffer" uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TensorDims {
    dims: Vec<usize>,
}

impl TensorDims {
    /// Constructs a shape from the provided sizes.
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        let mut dims = dims.into();
        if dims.is_empty() {
            dims.push(0);
        }
        TensorDims { dims }
    }

    /// Reconstructs a shape for legacy flat-count data.
    ///
    /// A positive column hint that evenly divides the count produces the
    /// matrix `[count / hint, hint]`; any other hint is ignored and the flat
    /// shape is returned. A zero count always yields the `[0]` default.
    pub fn backward_compatible(count: usize, column_hint: usize) -> Self {
        if count == 0 {
            return TensorDims::default();
        }
        if column_hint > 0 && count % column_hint == 0 {
            return TensorDims::new(vec![count / column_hint, column_hint]);
        }
        TensorDims::new(vec![count])
    }

    /// Returns the rank (number of axes) of the shape.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Borrows the raw dimension slice for downstream calculations.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Iterates over the extents in axis order.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.dims.iter()
    }

    /// Returns the extent at `index`, rejecting indices past the rank.
    pub fn dim(&self, index: usize) -> Result<usize, DimsError> {
        self.dims
            .get(index)
            .copied()
            .ok_or(DimsError::IndexOutOfRange {
                index,
                rank: self.rank(),
            })
    }

    /// Computes the total number of elements implied by the shape
    /// (0 whenever any extent is 0).
    pub fn element_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Renders the shape for diagnostics, e.g. `5×3×2` or `5×3×2 [30]`.
    pub fn print(&self, options: PrintOptions) -> String {
        let entries: Vec<PrintEntry> = self
            .dims
            .iter()
            .map(|&dim| PrintEntry::Literal(dim))
            .collect();
        print::render(&entries, self.element_count(), false, options)
    }
}

impl Default for TensorDims {
    fn default() -> Self {
        TensorDims { dims: vec![0] }
    }
}

impl Index<usize> for TensorDims {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.dims[index]
    }
}

impl fmt::Display for TensorDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print(PrintOptions::default()))
    }
}

impl<'de> Deserialize<'de> for TensorDims {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Normalizes through `new` so an empty persisted list keeps rank >= 1.
        Ok(TensorDims::new(Vec::<usize>::deserialize(deserializer)?))
    }
}
