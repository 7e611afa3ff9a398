#![allow(non_snake_case)]

use crate::algebra::{AlignedBuffer, Matrix, MatrixError};
use crate::cholesky::{CholeskySettings, SettingsError};
use crate::kernels::{KernelError, KernelVariant, VectorKernels};
use thiserror::Error;

/// Error codes returnable from [`CholeskyEngine`] construction and factor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CholeskyError {
    #[error("Input matrix is {0}x{1}, but the engine factors {2}x{2} matrices")]
    IncompatibleDimension(usize, usize, usize),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// In-place $LL^T$ and $LDL^T$ factorization of symmetric positive
/// (semi)definite matrices of a fixed size.
///
/// The engine owns an `n x n` workspace that is overwritten with a copy of
/// the input at the start of each call, so one engine can factor any number
/// of same-sized matrices in turn.  Only the lower triangle (including the
/// diagonal) of the workspace is meaningful after a call; see
/// [`factor`](CholeskyEngine::factor) and
/// [`extract_symmetric`](CholeskyEngine::extract_symmetric).
///
/// No positive definiteness check is made.  A non-positive pivot produces
/// NaN or infinite values that propagate silently through the remaining
/// columns.  Use [`Matrix::is_finite`] on the result to detect this.
#[derive(Debug, Clone)]
pub struct CholeskyEngine {
    /// packed factor, stored in place over a copy of the input
    L: Matrix<f32>,
    /// raw (not square rooted) pivots of the last LDL^T factorization
    D: AlignedBuffer<f32>,
    kernels: VectorKernels,
}

impl CholeskyEngine {
    /// Creates an engine for `n x n` inputs.  Default settings select the
    /// scalar kernels.
    pub fn new(n: usize, opts: Option<CholeskySettings>) -> Result<Self, CholeskyError> {
        let settings = opts.unwrap_or_default();
        settings.validate()?;
        Self::with_kernel(n, settings.kernel()?)
    }

    /// Creates an engine for `n x n` inputs using the given kernel variant.
    pub fn with_kernel(n: usize, variant: KernelVariant) -> Result<Self, CholeskyError> {
        let L = Matrix::try_zeros((n, n))?;
        let D = AlignedBuffer::try_filled(n, 0.0)?;
        let kernels = variant.kernels();

        log::debug!(
            "cholesky engine: size {}, kernel {} ({})",
            n,
            kernels.variant(),
            kernels.path()
        );

        Ok(Self { L, D, kernels })
    }

    /// dimension of the matrices this engine factors
    pub fn size(&self) -> usize {
        self.L.nrows()
    }

    pub fn kernel(&self) -> KernelVariant {
        self.kernels.variant()
    }

    pub fn kernels(&self) -> &VectorKernels {
        &self.kernels
    }

    /// The packed factor from the last call.
    ///
    /// After [`factorize_llt`](CholeskyEngine::factorize_llt) the lower
    /// triangle holds $L$.  After
    /// [`factorize_ldlt`](CholeskyEngine::factorize_ldlt) the strict lower
    /// triangle holds the strict lower part of the unit triangular $L$ and
    /// the diagonal holds the raw pivots $D$.  The strict upper triangle is
    /// whatever the input held there.
    pub fn factor(&self) -> &Matrix<f32> {
        &self.L
    }

    /// Raw pivots $D$ of the last $LDL^T$ factorization
    pub fn diag(&self) -> &[f32] {
        &self.D
    }

    fn load(&mut self, A: &Matrix<f32>) -> Result<(), CholeskyError> {
        let n = self.size();
        if A.size() != (n, n) {
            return Err(CholeskyError::IncompatibleDimension(
                A.nrows(),
                A.ncols(),
                n,
            ));
        }
        self.L.copy_from(A)?;
        Ok(())
    }

    /// Computes $A = LDL^T$ in place, with $L$ unit lower triangular.
    ///
    /// Only the lower triangle of `A` is referenced.  The diagonal of the
    /// result holds the pivots $D$ without square roots applied.  Callers
    /// wanting $L D^{1/2}$ must form it themselves.
    pub fn factorize_ldlt(&mut self, A: &Matrix<f32>) -> Result<(), CholeskyError> {
        self.load(A)?;
        log::trace!("LDL^T factorization, n = {}", self.size());

        let n = self.size();
        let kernels = self.kernels;
        let (L, D) = (&mut self.L, &mut self.D);

        for j in 0..n {
            let Lj = &L.row(j)[..j];
            let sum = kernels.dot3(Lj, Lj, &D[..j]);
            let pivot = L[(j, j)] - sum;
            L[(j, j)] = pivot;
            D[j] = pivot;

            let invpivot = pivot.recip();
            for i in (j + 1)..n {
                let sum = kernels.dot3(&L.row(i)[..j], &L.row(j)[..j], &D[..j]);
                L[(i, j)] = invpivot * (L[(i, j)] - sum);
            }
        }
        Ok(())
    }

    /// Computes $A = LL^T$ in place, with $L$ lower triangular.
    ///
    /// Only the lower triangle of `A` is referenced.  `A` must be strictly
    /// positive definite to avoid square roots of non-positive pivots.
    pub fn factorize_llt(&mut self, A: &Matrix<f32>) -> Result<(), CholeskyError> {
        self.load(A)?;
        log::trace!("LL^T factorization, n = {}", self.size());

        let n = self.size();
        let kernels = self.kernels;
        let L = &mut self.L;

        for j in 0..n {
            let Lj = &L.row(j)[..j];
            let sum = kernels.dot2(Lj, Lj);
            let pivot = f32::sqrt(L[(j, j)] - sum);
            L[(j, j)] = pivot;

            let invpivot = pivot.recip();
            for i in (j + 1)..n {
                let sum = kernels.dot2(&L.row(i)[..j], &L.row(j)[..j]);
                L[(i, j)] = invpivot * (L[(i, j)] - sum);
            }
        }
        Ok(())
    }

    /// Returns a copy of the factor with its strict lower triangle
    /// mirrored into the strict upper triangle.
    ///
    /// No other transformation is applied; in particular the diagonal of an
    /// $LDL^T$ result still holds raw pivots.
    pub fn extract_symmetric(&self) -> Matrix<f32> {
        let mut S = self.L.clone();
        let n = self.size();
        for i in 0..n {
            for j in (i + 1)..n {
                S[(i, j)] = self.L[(j, i)];
            }
        }
        S
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    fn test_matrix_3x3() -> Matrix<f32> {
        Matrix::from(&[
            [  4.,  12., -16.],
            [ 12.,  37., -43.],
            [-16., -43.,  98.],
        ])
    }

    #[test]
    fn test_llt_3x3() {
        for &variant in KernelVariant::available() {
            let mut eng = CholeskyEngine::with_kernel(3, variant).unwrap();
            eng.factorize_llt(&test_matrix_3x3()).unwrap();

            #[rustfmt::skip]
            let expected = Matrix::<f32>::from(&[
                [ 2.,  6., -8.],
                [ 6.,  1.,  5.],
                [-8.,  5.,  3.],
            ]);
            assert_eq!(eng.extract_symmetric(), expected);
        }
    }

    #[test]
    fn test_ldlt_3x3() {
        for &variant in KernelVariant::available() {
            let mut eng = CholeskyEngine::with_kernel(3, variant).unwrap();
            eng.factorize_ldlt(&test_matrix_3x3()).unwrap();

            #[rustfmt::skip]
            let expected = Matrix::<f32>::from(&[
                [ 4.,  3., -4.],
                [ 3.,  1.,  5.],
                [-4.,  5.,  9.],
            ]);
            assert_eq!(eng.extract_symmetric(), expected);
            assert_eq!(eng.diag(), &[4., 1., 9.]);
        }
    }

    #[test]
    fn test_upper_triangle_untouched() {
        let mut A = test_matrix_3x3();
        A[(0, 2)] = 1000.0;
        let mut eng = CholeskyEngine::new(3, None).unwrap();
        eng.factorize_llt(&A).unwrap();
        assert_eq!(eng.factor()[(0, 2)], 1000.0);
        assert_eq!(eng.factor()[(2, 0)], -8.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut eng = CholeskyEngine::new(4, None).unwrap();
        assert_eq!(
            eng.factorize_llt(&test_matrix_3x3()),
            Err(CholeskyError::IncompatibleDimension(3, 3, 4))
        );
        let A = Matrix::<f32>::zeros((4, 3));
        assert!(eng.factorize_ldlt(&A).is_err());
    }

    #[test]
    fn test_zero_pivot_propagates() {
        // positive semidefinite, rank one
        #[rustfmt::skip]
        let A = Matrix::<f32>::from(&[
            [1., 1.],
            [1., 1.],
        ]);
        let mut eng = CholeskyEngine::new(2, None).unwrap();
        eng.factorize_llt(&A).unwrap();
        assert_eq!(eng.factor()[(1, 1)], 0.0);
        assert!(eng.factor().is_finite());

        // zero leading pivot divides by zero
        #[rustfmt::skip]
        let A = Matrix::<f32>::from(&[
            [0., 1.],
            [1., 1.],
        ]);
        eng.factorize_ldlt(&A).unwrap();
        assert!(!eng.factor().is_finite());
    }

    #[test]
    fn test_settings_select_kernel() {
        let settings = CholeskySettings {
            kernel_method: "simd".to_string(),
        };
        let eng = CholeskyEngine::new(2, Some(settings)).unwrap();
        assert_eq!(eng.kernel(), KernelVariant::Simd);

        let settings = CholeskySettings {
            kernel_method: "nope".to_string(),
        };
        assert!(matches!(
            CholeskyEngine::new(2, Some(settings)),
            Err(CholeskyError::Settings(_))
        ));
    }

    #[test]
    fn test_empty_engine() {
        let mut eng = CholeskyEngine::new(0, None).unwrap();
        let A = Matrix::<f32>::zeros((0, 0));
        eng.factorize_llt(&A).unwrap();
        eng.factorize_ldlt(&A).unwrap();
        assert_eq!(eng.extract_symmetric().size(), (0, 0));
    }
}
