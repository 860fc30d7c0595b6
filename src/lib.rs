pub mod block;
pub mod dims;

pub use block::BufferDesc;
pub use dims::{Dim, DimsError, InferableDims, PrintOptions, TensorDims, FREE_DIM};
