//! __simdchol__ is an in-place Cholesky factorization engine for dense,
//! symmetric, positive (semi)definite single precision matrices.
//!
//! Two factorizations are provided:
//!
//! $$
//! A = LL^T \qquad\text{and}\qquad A = LDL^T
//! $$
//!
//! where $L$ is lower triangular (unit lower triangular for $LDL^T$) and
//! $D$ is diagonal.  Both are computed in place in a row-major workspace
//! whose rows are padded to a multiple of four elements and whose base
//! address is aligned to 128 bytes, so that every row prefix can be fed
//! directly to a vectorized reduction kernel.
//!
//! The inner reductions are supplied by a [`KernelVariant`](crate::kernels::KernelVariant)
//! chosen once when the engine is constructed:
//!
//! * __scalar__: portable scalar loops.
//! * __simd__: 8-wide AVX/FMA reductions on x86_64 hosts that support them, with a
//!   portable 8-lane fallback elsewhere.
//! * __blas__: vendor `?dot` reductions.  Available only when compiled with the `blas`
//!   feature and one of the `blas-*` backend features.
//!
//! # Example
//!
//! ```
//! use simdchol::{algebra::*, cholesky::*, kernels::*};
//!
//! #[rustfmt::skip]
//! let A = Matrix::<f32>::from(&[
//!     [  4.,  12., -16.],
//!     [ 12.,  37., -43.],
//!     [-16., -43.,  98.],
//! ]);
//!
//! let mut engine = CholeskyEngine::with_kernel(3, KernelVariant::Simd).unwrap();
//! engine.factorize_llt(&A).unwrap();
//!
//! let L = engine.factor();
//! assert_eq!(L[(2, 0)], -8.0);
//! assert_eq!(L[(2, 2)], 3.0);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate version string
pub fn version() -> &'static str {
    VERSION
}

pub mod algebra;
pub mod cholesky;
pub mod kernels;
