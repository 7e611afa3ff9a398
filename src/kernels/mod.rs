//! Vector reduction kernels for the factorization inner loops.
//!
//! Each [`KernelVariant`] supplies two reductions over equal length spans:
//!
//! * `dot2(u, v) = Σ u[i] v[i]`, used by the $LL^T$ factorization
//! * `dot3(u, v, d) = Σ u[i] v[i] d[i]`, used by the $LDL^T$ factorization
//!
//! All variants accumulate every element exactly once and agree up to
//! floating point summation order.  A variant is resolved into a
//! [`VectorKernels`] pair of function pointers once, and is never
//! re-dispatched per call.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod scalar;
pub use scalar::*;
mod simd;
pub use simd::{dot2_lanes, dot3_lanes, SIMD_WIDTH};
#[cfg(feature = "blas")]
mod blas;
#[cfg(feature = "blas")]
pub use self::blas::*;

/// Two operand reduction `Σ u[i] v[i]`
pub type Dot2Fn = fn(&[f32], &[f32]) -> f32;
/// Three operand reduction `Σ u[i] v[i] d[i]`
pub type Dot3Fn = fn(&[f32], &[f32], &[f32]) -> f32;

/// Error type returned when resolving a kernel variant by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Not the name of any kernel variant
    #[error("Unrecognized kernel variant: \"{0}\"")]
    Unknown(String),
    /// A known variant that was not compiled into this build
    #[error("Kernel variant \"{0}\" is not available in this build")]
    Unavailable(&'static str),
}

/// Selector for the reduction kernels bound into a
/// [`CholeskyEngine`](crate::cholesky::CholeskyEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelVariant {
    /// portable scalar loops
    #[default]
    Scalar,
    /// 8-wide vector reductions (AVX/FMA when detected, portable lanes otherwise)
    Simd,
    /// vendor BLAS `sdot`.  BLAS has no three operand product, so the
    /// `dot3` kernel falls back to the scalar loop.
    #[cfg(feature = "blas")]
    Blas,
}

impl KernelVariant {
    /// All variants compiled into this build
    pub fn available() -> &'static [KernelVariant] {
        cfg_if::cfg_if! {
            if #[cfg(feature = "blas")] {
                &[KernelVariant::Scalar, KernelVariant::Simd, KernelVariant::Blas]
            } else {
                &[KernelVariant::Scalar, KernelVariant::Simd]
            }
        }
    }

    /// The variant chosen for the "auto" setting
    pub fn best() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "blas")] {
                KernelVariant::Blas
            } else {
                KernelVariant::Simd
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KernelVariant::Scalar => "scalar",
            KernelVariant::Simd => "simd",
            #[cfg(feature = "blas")]
            KernelVariant::Blas => "blas",
        }
    }

    /// Binds this variant's reduction functions.
    pub fn kernels(self) -> VectorKernels {
        VectorKernels::new(self)
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelVariant {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(KernelVariant::best()),
            "scalar" => Ok(KernelVariant::Scalar),
            "simd" => Ok(KernelVariant::Simd),
            #[cfg(feature = "blas")]
            "blas" => Ok(KernelVariant::Blas),
            #[cfg(not(feature = "blas"))]
            "blas" => Err(KernelError::Unavailable("blas")),
            _ => Err(KernelError::Unknown(s.to_string())),
        }
    }
}

/// A resolved pair of reduction kernels.
///
/// Immutable once built.  The function pointers are pure functions over
/// their arguments, so a `VectorKernels` is freely `Copy` and shareable
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct VectorKernels {
    variant: KernelVariant,
    path: &'static str,
    dot2: Dot2Fn,
    dot3: Dot3Fn,
}

impl VectorKernels {
    pub fn new(variant: KernelVariant) -> Self {
        let (dot2, dot3, path): (Dot2Fn, Dot3Fn, &'static str) = match variant {
            KernelVariant::Scalar => (dot2_scalar, dot3_scalar, "scalar"),
            KernelVariant::Simd => simd::select(),
            #[cfg(feature = "blas")]
            KernelVariant::Blas => (dot2_blas, dot3_scalar, "blas"),
        };
        Self {
            variant,
            path,
            dot2,
            dot3,
        }
    }

    pub fn variant(&self) -> KernelVariant {
        self.variant
    }

    /// Name of the code path actually bound, e.g. "avx+fma" or
    /// "portable-lanes" for the SIMD variant
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// `Σ u[i] v[i]` over the length of `u`
    #[inline]
    pub fn dot2(&self, u: &[f32], v: &[f32]) -> f32 {
        (self.dot2)(u, v)
    }

    /// `Σ u[i] v[i] d[i]` over the length of `u`
    #[inline]
    pub fn dot3(&self, u: &[f32], v: &[f32], d: &[f32]) -> f32 {
        (self.dot3)(u, v, d)
    }
}
