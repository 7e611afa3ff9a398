use num_traits::{Float, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

#[cfg(feature = "blas")]
use crate::algebra::BlasFloatT;

/// Core traits for matrix element values.
///
/// This trait defines a subset of bounds for `FloatT`, which is preferred
/// throughout for use in the matrix store.  When the "blas" feature is enabled,
/// `FloatT` is additionally restricted to f32/f64 types supported by BLAS.
pub trait CoreFloatT:
    'static
    + Send
    + Sync
    + Float
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

// if "blas" is enabled, we must add an additional trait
// bound to restrict compilation for f32/f64 types
// since there is no BLAS support otherwise

cfg_if::cfg_if! {
    if #[cfg(not(feature="blas"))] {
    /// Main trait for matrix element types.
    ///
    /// Transpose and multiply on [`Matrix`](crate::algebra::Matrix) are generic
    /// over `FloatT`.  When compiled with BLAS support the trait is implemented
    /// only for f32 and f64 so that the vendor fast paths can be dispatched
    /// statically.  The factorization engine itself is f32 only.
    ///
    /// `FloatT` relies on [`num_traits`](num_traits) for most of its constituent trait bounds.
        pub trait FloatT: CoreFloatT {}
    } else{
        pub trait FloatT: CoreFloatT + BlasFloatT {}
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature="blas")] {
        impl<T> FloatT for T where T: CoreFloatT + BlasFloatT {}
    } else{
        impl<T> FloatT for T where T: CoreFloatT {}
    }
}
