use thiserror::Error;

/// Error type returned by dense matrix construction and assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Source and destination matrices have different shapes
    #[error("Matrix dimensions are incompatible")]
    IncompatibleDimension,
    /// The aligned allocator could not satisfy the request
    #[error("Failed to allocate {bytes} bytes of aligned matrix storage")]
    AllocationFailed {
        /// size of the rejected request
        bytes: usize,
    },
    /// `rows * stride` does not fit in an allocation layout
    #[error("Matrix of size {rows}x{cols} exceeds the addressable size")]
    LayoutOverflow {
        /// requested row count
        rows: usize,
        /// requested column count
        cols: usize,
    },
}
