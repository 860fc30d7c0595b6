//! Buffer descriptor tying a shape to its advisory column hint.

use serde::{Deserialize, Serialize};

use crate::dims::TensorDims;

/// Descriptor for a flat element buffer: the shape its elements are viewed
/// through plus an advisory column hint.
///
/// The hint is applied opportunistically. Whenever the hint or the element
/// count changes, the shape is recomputed from scratch as a pure function of
/// `(count, hint, prior shape)`, so the two may be assigned in either order.
/// A hint that does not evenly divide the count is silently ignored; the
/// hint value itself stays readable regardless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDesc {
    dims: TensorDims,
    column_hint: usize,
}

impl BufferDesc {
    /// Creates a descriptor with the rank-1, size-0 default shape and no
    /// column hint.
    pub fn new() -> Self {
        BufferDesc::default()
    }

    /// Creates a descriptor viewing its buffer through the given shape.
    pub fn with_dims(dims: TensorDims) -> Self {
        BufferDesc {
            dims,
            column_hint: 0,
        }
    }

    /// Current shape of the buffer.
    pub fn dims(&self) -> &TensorDims {
        &self.dims
    }

    /// Replaces the shape verbatim. The stored hint is consulted again on
    /// the next hint or count change, not retroactively.
    pub fn set_dims(&mut self, dims: TensorDims) {
        self.dims = dims;
    }

    /// The advisory column hint; 0 means no hint.
    pub fn column_hint(&self) -> usize {
        self.column_hint
    }

    /// Stores the hint and reshapes the current element count against it.
    ///
    /// With an empty buffer the hint has no visible effect on the shape
    /// until a count is assigned.
    pub fn set_column_hint(&mut self, hint: usize) {
        self.column_hint = hint;
        self.dims = reshape_for_hint(self.count(), hint, &self.dims);
    }

    /// Total element count of the underlying buffer.
    pub fn count(&self) -> usize {
        self.dims.element_count()
    }

    /// Sets the element count, reshaping against the stored hint.
    pub fn set_count(&mut self, count: usize) {
        self.dims = reshape_for_hint(count, self.column_hint, &self.dims);
    }
}

/// Stateless reshape decision.
///
/// An applicable hint collapses any prior rank to the matrix
/// `[count / hint, hint]`. Otherwise the prior shape survives when it still
/// accounts for every element, and the flat shape is the fallback.
fn reshape_for_hint(count: usize, hint: usize, prior: &TensorDims) -> TensorDims {
    if hint > 0 && count > 0 && count % hint == 0 {
        return TensorDims::new(vec![count / hint, hint]);
    }
    if count == prior.element_count() {
        return prior.clone();
    }
    TensorDims::new(vec![count])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reshape_is_idempotent() {
        let first = reshape_for_hint(12, 3, &TensorDims::new(vec![12]));
        let second = reshape_for_hint(12, 3, &first);
        assert_eq!(first, second);
        assert_eq!(first.dims(), &[4, 3]);
    }

    #[test]
    fn inapplicable_hint_keeps_prior_structure() {
        let prior = TensorDims::new(vec![6, 2]);
        assert_eq!(reshape_for_hint(12, 5, &prior), prior);
        assert_eq!(reshape_for_hint(12, 0, &prior), prior);
    }

    #[test]
    fn count_change_without_hint_flattens() {
        let prior = TensorDims::new(vec![6, 2]);
        assert_eq!(reshape_for_hint(7, 0, &prior).dims(), &[7]);
        assert_eq!(reshape_for_hint(0, 3, &prior).dims(), &[0]);
    }
}
