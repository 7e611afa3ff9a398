#![allow(non_snake_case)]

use crate::algebra::{AlignedBuffer, FloatT, MatrixError};
use std::ops::{Index, IndexMut};

/// Rows are padded to a multiple of this many elements.
///
/// Four f32 values make a 16 byte SSE lane, so every row of an f32 matrix
/// starts on a vector boundary relative to the aligned base pointer.
pub const ROW_PADDING: usize = 4;

/// Row pitch, in elements, of a matrix with `cols` logical columns.
///
/// This is the smallest multiple of [`ROW_PADDING`] that is at least `cols`.
#[inline]
pub const fn padded_stride(cols: usize) -> usize {
    (cols + (ROW_PADDING - 1)) & !(ROW_PADDING - 1)
}

fn checked_stride(cols: usize) -> Option<usize> {
    Some(cols.checked_add(ROW_PADDING - 1)? & !(ROW_PADDING - 1))
}

/// Dense row-major matrix with padded rows and aligned storage.
///
/// Element `(r, c)` lives at offset `r * stride + c` of the backing buffer,
/// with `stride = padded_stride(ncols)`.  Columns at index `>= ncols` within a
/// row are padding.  They are zero after construction but carry no meaning
/// after any copy or factorization, and are never read by the engine.
///
/// Copies are deep (`Clone`, [`copy_from`](Matrix::copy_from)) and never alias.
/// [`move_from`](Matrix::move_from) and [`take`](Matrix::take) transfer the
/// buffer and leave the source as an empty 0x0 matrix without storage.
pub struct Matrix<T = f32> {
    m: usize,
    n: usize,
    stride: usize,
    data: AlignedBuffer<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// Allocates a zero filled `m x n` matrix, reporting allocation failure.
    pub fn try_zeros(size: (usize, usize)) -> Result<Self, MatrixError> {
        let (m, n) = size;
        let overflow = || MatrixError::LayoutOverflow { rows: m, cols: n };
        let stride = checked_stride(n).ok_or_else(overflow)?;
        let len = m.checked_mul(stride).ok_or_else(overflow)?;
        let data = AlignedBuffer::try_filled(len, T::zero())?;
        Ok(Self { m, n, stride, data })
    }

    /// Allocates a zero filled `m x n` matrix.
    ///
    /// Aborts on allocation failure in the same way as `Vec`.  Use
    /// [`try_zeros`](Matrix::try_zeros) to handle the failure instead.
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let stride = padded_stride(n);
        let len = m.checked_mul(stride).unwrap_or_else(|| {
            panic!("matrix of size {}x{} exceeds the addressable size", m, n)
        });
        let data = AlignedBuffer::filled(len, T::zero());
        Self { m, n, stride, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data.fill(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    /// Builds a matrix from unpadded row-major data of length `m * n`,
    /// inserting row padding as needed.
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        let mut mat = Matrix::zeros(size);
        if n > 0 {
            for (r, row) in src.chunks_exact(n).enumerate() {
                mat.row_mut(r).copy_from_slice(row);
            }
        }
        mat
    }

    /// Bulk loads the whole padded buffer from `src`.
    ///
    /// `src` must already be laid out with this matrix's stride, i.e. have
    /// length `nrows() * stride()` with each row padded to `stride()`
    /// elements.  Only the length is checked.
    pub fn copy_from_slice(&mut self, src: &[T]) -> &mut Self {
        self.data.copy_from_slice(src);
        self
    }

    /// Deep copy assignment from a matrix of identical shape.
    pub fn copy_from(&mut self, src: &Matrix<T>) -> Result<&mut Self, MatrixError> {
        if self.size() != src.size() {
            return Err(MatrixError::IncompatibleDimension);
        }
        self.data.copy_from_slice(&src.data);
        Ok(self)
    }

    /// Move assignment from a matrix of identical shape.
    ///
    /// The storage of `src` is transferred to `self` and `src` is left as
    /// an empty 0x0 matrix that owns no buffer.
    pub fn move_from(&mut self, src: &mut Matrix<T>) -> Result<&mut Self, MatrixError> {
        if self.size() != src.size() {
            return Err(MatrixError::IncompatibleDimension);
        }
        *self = src.take();
        Ok(self)
    }

    /// Moves this matrix out, leaving an empty 0x0 matrix behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// true if this matrix currently owns a storage buffer
    pub fn has_buffer(&self) -> bool {
        self.data.is_allocated()
    }

    pub fn nrows(&self) -> usize {
        self.m
    }

    pub fn ncols(&self) -> usize {
        self.n
    }

    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    /// Row pitch of the backing buffer in elements
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// Padded backing buffer of length `nrows() * stride()`
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 * self.stride + idx.1
    }

    /// Logical (unpadded) contents of row `row`
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.m);
        let start = row * self.stride;
        &self.data[start..start + self.n]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.m);
        let start = row * self.stride;
        &mut self.data[start..start + self.n]
    }
}

impl<T: FloatT> Default for Matrix<T> {
    /// Empty 0x0 matrix holding no buffer
    fn default() -> Self {
        Self {
            m: 0,
            n: 0,
            stride: 0,
            data: AlignedBuffer::empty(),
        }
    }
}

impl<T: FloatT> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            m: self.m,
            n: self.n,
            stride: self.stride,
            data: self.data.clone(),
        }
    }
}

// Bounds are the caller's responsibility: column indices in the padding
// region are only caught in debug builds.  The backing buffer itself is
// always bounds checked.
impl<T: FloatT> Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        debug_assert!(idx.0 < self.m && idx.1 < self.n);
        &self.data[self.index_linear(idx)]
    }
}

impl<T: FloatT> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        debug_assert!(idx.0 < self.m && idx.1 < self.n);
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

// equality ignores row padding
impl<T: FloatT> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && (0..self.m).all(|r| self.row(r) == other.row(r))
    }
}

impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    /// Builds a matrix from row literals, one inner array per row.
    fn from(rows: &[[T; N]; M]) -> Self {
        let mut mat = Matrix::zeros((M, N));
        for (r, row) in rows.iter().enumerate() {
            mat.row_mut(r).copy_from_slice(row);
        }
        mat
    }
}

impl<T> std::fmt::Debug for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("size", &self.size())
            .field("stride", &self.stride)
            .field("rows", &(0..self.m).map(|r| self.row(r)).collect::<Vec<_>>())
            .finish()
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "[")?;
        for r in 0..self.m {
            for c in 0..self.n {
                write!(f, "{},\t", self[(r, c)])?;
            }
            writeln!(f)?;
        }
        writeln!(f, "]")?;
        Ok(())
    }
}
