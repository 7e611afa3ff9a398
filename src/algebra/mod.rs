//! Dense matrix storage and the floating point traits it is built on.
//!
//! The central type is [`Matrix`](crate::algebra::Matrix), a row-major
//! matrix whose rows are padded to a multiple of [`ROW_PADDING`] elements
//! and whose backing buffer is aligned to [`MEM_ALIGNMENT`] bytes.

mod dense;
mod error_types;
mod floats;

pub use dense::*;
pub use error_types::*;
pub use floats::*;
