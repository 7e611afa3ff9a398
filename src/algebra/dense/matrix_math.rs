#![allow(non_snake_case)]
use crate::algebra::{FloatT, Matrix};

/// General matrix-matrix multiply into a preallocated destination
pub trait MultiplyGEMM<T> {
    /// computes `self = α A B + β self`.  When `β` is zero the prior
    /// contents of `self` are ignored.
    fn mul(&mut self, A: &Matrix<T>, B: &Matrix<T>, α: T, β: T) -> &Self;
}

impl<T> MultiplyGEMM<T> for Matrix<T>
where
    T: FloatT,
{
    fn mul(&mut self, A: &Matrix<T>, B: &Matrix<T>, α: T, β: T) -> &Self {
        assert!(A.ncols() == B.nrows() && self.nrows() == A.nrows() && self.ncols() == B.ncols());

        if self.nrows() == 0 || self.ncols() == 0 {
            return self;
        }

        #[cfg(feature = "blas")]
        if gemm_blas(self, A, B, α, β) {
            return self;
        }

        gemm_native(self, A, B, α, β);
        self
    }
}

fn gemm_native<T: FloatT>(C: &mut Matrix<T>, A: &Matrix<T>, B: &Matrix<T>, α: T, β: T) {
    for i in 0..A.nrows() {
        for j in 0..B.ncols() {
            let mut sum = T::zero();
            for k in 0..A.ncols() {
                sum += A[(i, k)] * B[(k, j)];
            }
            C[(i, j)] = if β == T::zero() {
                α * sum
            } else {
                α * sum + β * C[(i, j)]
            };
        }
    }
}

// Row-major C = AB is column-major C^T = B^T A^T, and a padded row-major
// buffer is the column-major transpose with leading dimension = stride.
// Returns false if the dimensions can't be passed to BLAS.
#[cfg(feature = "blas")]
fn gemm_blas<T: FloatT>(C: &mut Matrix<T>, A: &Matrix<T>, B: &Matrix<T>, α: T, β: T) -> bool {
    let dims = (
        i32::try_from(B.ncols()),
        i32::try_from(A.nrows()),
        i32::try_from(A.ncols()),
        i32::try_from(A.stride()),
        i32::try_from(B.stride()),
        i32::try_from(C.stride()),
    );
    let (Ok(m), Ok(n), Ok(k), Ok(lda), Ok(ldb), Ok(ldc)) = dims else {
        return false;
    };
    if k == 0 {
        return false;
    }

    #[rustfmt::skip]
    T::xgemm(b'N', b'N', m, n, k, α, B.data(), ldb, A.data(), lda, β, C.data_mut(), ldc);
    true
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// Out of place transpose.
    pub fn transpose(&self) -> Matrix<T> {
        let mut MT = Matrix::zeros((self.ncols(), self.nrows()));

        #[cfg(feature = "blas")]
        if transpose_blas(self, &mut MT) {
            return MT;
        }

        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                MT[(j, i)] = self[(i, j)];
            }
        }
        MT
    }

    /// Largest absolute elementwise difference, ignoring row padding.
    pub fn norm_inf_diff(&self, other: &Matrix<T>) -> T {
        assert_eq!(self.size(), other.size());
        let mut out = T::zero();
        for r in 0..self.nrows() {
            for (&a, &b) in self.row(r).iter().zip(other.row(r)) {
                let d = T::abs(a - b);
                // propagate NaN rather than masking it
                if d > out || d.is_nan() {
                    out = d;
                }
            }
        }
        out
    }

    /// true if every logical entry is finite
    pub fn is_finite(&self) -> bool {
        (0..self.nrows()).all(|r| self.row(r).iter().all(|x| x.is_finite()))
    }

    /// true if square and `|A[i,j] - A[j,i]| <= tol` for all i, j
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.nrows() {
            for j in (i + 1)..self.ncols() {
                if !(T::abs(self[(i, j)] - self[(j, i)]) <= tol) {
                    return false;
                }
            }
        }
        true
    }
}

// copies row i of M into column i of MT with a strided ?copy
#[cfg(feature = "blas")]
fn transpose_blas<T: FloatT>(M: &Matrix<T>, MT: &mut Matrix<T>) -> bool {
    let (Ok(n), Ok(incy)) = (i32::try_from(M.ncols()), i32::try_from(MT.stride())) else {
        return false;
    };
    if n == 0 {
        return true;
    }
    for i in 0..M.nrows() {
        T::xcopy(n, M.row(i), 1, &mut MT.data_mut()[i..], incy);
    }
    true
}

macro_rules! generate_test_gemm {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            #[rustfmt::skip]
            let A = Matrix::<$fxx>::from(&[
                [1., 2., 3.],
                [4., 5., 6.],
            ]);
            #[rustfmt::skip]
            let B = Matrix::<$fxx>::from(&[
                [1.,  2.,  3.,  4.],
                [5.,  6.,  7.,  8.],
                [9., 10., 11., 12.],
            ]);
            #[rustfmt::skip]
            let mut C = Matrix::<$fxx>::from(&[
                [2., 6., 0., 4.],
                [7., 2., 7., 2.],
            ]);

            C.mul(&A, &B, 1.0, 1.0);

            #[rustfmt::skip]
            let expected = Matrix::<$fxx>::from(&[
                [40., 50., 50.,  60.],
                [90., 100., 120., 130.],
            ]);
            assert_eq!(C, expected);

            // overwrite, ignoring NaN in the destination
            C[(0, 0)] = <$fxx>::NAN;
            C.mul(&A, &B, 2.0, 0.0);
            assert_eq!(C[(0, 0)], 76.0);
            assert_eq!(C[(1, 3)], 256.0);
        }
    };
}

generate_test_gemm!(f32, test_gemm_f32);
generate_test_gemm!(f64, test_gemm_f64);

macro_rules! generate_test_transpose {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            let src: Vec<$fxx> = (0..35).map(|x| x as $fxx).collect();
            let M = Matrix::<$fxx>::new_from_slice((5, 7), &src);
            let MT = M.transpose();

            assert_eq!(MT.size(), (7, 5));
            assert_eq!(MT.stride(), 8);
            for i in 0..5 {
                for j in 0..7 {
                    assert_eq!(MT[(j, i)], M[(i, j)]);
                }
            }
            assert_eq!(MT.transpose(), M);
        }
    };
}

generate_test_transpose!(f32, test_transpose_f32);
generate_test_transpose!(f64, test_transpose_f64);

#[test]
fn test_norm_inf_diff_and_checks() {
    #[rustfmt::skip]
    let A = Matrix::<f32>::from(&[
        [ 4., 12.],
        [12., 37.],
    ]);
    let mut B = A.clone();
    assert!(A.is_symmetric(0.0));
    assert!(A.is_finite());
    assert_eq!(A.norm_inf_diff(&B), 0.0);

    B[(0, 1)] = 11.5;
    assert_eq!(A.norm_inf_diff(&B), 0.5);
    assert!(!B.is_symmetric(0.1));
    assert!(B.is_symmetric(0.5));

    B[(1, 1)] = f32::NAN;
    assert!(!B.is_finite());
    assert!(A.norm_inf_diff(&B).is_nan());
}
