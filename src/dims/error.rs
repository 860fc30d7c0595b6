//! Structural failures raised by the shape descriptors.

use thiserror::Error;

/// Errors raised while constructing, indexing, or resolving a shape.
///
/// Malformed user text is not represented here: parsing reports through
/// [`InferableDims::last_warning`](super::InferableDims::last_warning) and
/// leaves the descriptor unchanged instead of failing the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DimsError {
    /// More than one free extent was supplied.
    #[error("at most one dimension may be free")]
    MultipleFreeDims,

    /// A raw size below the free sentinel can never describe an extent.
    #[error("dimension size {0} is not a valid extent")]
    InvalidSize(i64),

    /// An index past the shape rank.
    #[error("dimension index {index} is out of range for rank {rank}")]
    IndexOutOfRange { index: usize, rank: usize },

    /// The free extent does not divide the target element count evenly.
    #[error("free dimension cannot be resolved from element count {target}")]
    Unresolved { target: usize },
}
