mod aligned;
pub use aligned::*;
mod core;
pub use self::core::*;
mod matrix_math;
pub use self::matrix_math::*;

#[cfg(feature = "blas")]
mod blas;
#[cfg(feature = "blas")]
pub use self::blas::*;
