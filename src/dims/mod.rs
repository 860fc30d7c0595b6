//! Shape descriptors for buffer-owning collaborators.
//!
//! The dims module defines the fixed [`TensorDims`] descriptor, its mutable
//! companion [`InferableDims`] that parses user-entered text and infers a
//! single free extent from a target element count, and the diagnostic
//! printing options both share. Allocation, transfer, and numeric kernels
//! live with the buffer owners; only shape arithmetic lives here.

mod dim;
mod error;
mod fixed;
mod inferable;
mod print;

pub use dim::{Dim, FREE_DIM};
pub use error::DimsError;
pub use fixed::TensorDims;
pub use inferable::InferableDims;
pub use print::PrintOptions;
