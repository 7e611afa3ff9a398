#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(clippy::too_many_arguments)]

// standard imports via blas-rs crates.  The backend library
// itself is chosen by one of the blas-* features
extern crate blas_src;
use blas::*;

/// Element types with vendor BLAS support (f32 and f64).
///
/// Sealed.  Only the routines used by the vendor kernel variant and the
/// transpose / multiply fast paths are bound.
pub trait BlasFloatT:
    private::BlasFloatSealed
    + XdotScalar
    + XcopyScalar
    + XgemmScalar
{}

impl BlasFloatT for f32 {}
impl BlasFloatT for f64 {}

mod private {
    pub trait BlasFloatSealed {}
    impl BlasFloatSealed for f32 {}
    impl BlasFloatSealed for f64 {}
}


// --------------------------------------
// ?dot : vector inner product
// --------------------------------------

pub trait XdotScalar: Sized {
    fn xdot(
        n: i32, x: &[Self], incx: i32, y: &[Self], incy: i32
    ) -> Self;
}

macro_rules! impl_blas_xdot {
    ($T:ty, $XDOT:path) => {
        impl XdotScalar for $T {
            fn xdot(
                n: i32, x: &[Self], incx: i32, y: &[Self], incy: i32
            ) -> Self {
                unsafe {
                    $XDOT(n, x, incx, y, incy)
                }
            }
        }
    };
}
impl_blas_xdot!(f32, sdot);
impl_blas_xdot!(f64, ddot);


// --------------------------------------
// ?copy : strided vector copy
// --------------------------------------

pub trait XcopyScalar: Sized {
    fn xcopy(
        n: i32, x: &[Self], incx: i32, y: &mut [Self], incy: i32
    );
}

macro_rules! impl_blas_xcopy {
    ($T:ty, $XCOPY:path) => {
        impl XcopyScalar for $T {
            fn xcopy(
                n: i32, x: &[Self], incx: i32, y: &mut [Self], incy: i32
            ) {
                unsafe {
                    $XCOPY(n, x, incx, y, incy);
                }
            }
        }
    };
}
impl_blas_xcopy!(f32, scopy);
impl_blas_xcopy!(f64, dcopy);


// --------------------------------------
// ?gemm : matrix matrix multiply
// --------------------------------------

pub trait XgemmScalar: Sized {
    fn xgemm(
        transa: u8, transb: u8, m: i32, n: i32, k: i32, alpha: Self, a: &[Self],
        lda: i32, b: &[Self], ldb: i32, beta: Self, c: &mut [Self], ldc: i32
    );
}

macro_rules! impl_blas_gemm {
    ($T:ty, $XGEMM:path) => {
        impl XgemmScalar for $T {
            fn xgemm(
                transa: u8, transb: u8, m: i32, n: i32, k: i32, alpha: Self, a: &[Self],
                lda: i32, b: &[Self], ldb: i32, beta: Self, c: &mut [Self], ldc: i32
            ) {
                unsafe {
                    $XGEMM(
                        transa, transb, m, n, k, alpha, a,
                        lda, b, ldb, beta, c, ldc
                    );
                }
            }
        }
    };
}
impl_blas_gemm!(f32, sgemm);
impl_blas_gemm!(f64, dgemm);
