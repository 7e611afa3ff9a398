use crate::algebra::MatrixError;
use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Alignment in bytes of every matrix and diagonal buffer allocation.
///
/// Large enough for the widest vector loads in use (AVX-512) and a full
/// cache line on all supported targets.
pub const MEM_ALIGNMENT: usize = 128;

/// An owned, [`MEM_ALIGNMENT`]-aligned, initialised buffer of `T`.
///
/// The buffer dereferences to a slice.  An empty buffer owns no allocation,
/// which is also the state left behind by [`take`](AlignedBuffer::take).
pub struct AlignedBuffer<T> {
    ptr: NonNull<T>,
    len: usize,
}

// SAFETY: the buffer owns its allocation exclusively, as for `Vec<T>`.
unsafe impl<T: Send> Send for AlignedBuffer<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Sync> Sync for AlignedBuffer<T> {}

impl<T> AlignedBuffer<T> {
    /// A buffer with no allocation
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// true if this buffer currently owns heap memory
    pub fn is_allocated(&self) -> bool {
        Self::layout(self.len).is_some_and(|l| l.size() != 0)
    }

    /// Moves the allocation out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::empty())
    }

    fn layout(len: usize) -> Option<Layout> {
        let layout = Layout::array::<T>(len).ok()?;
        Some(layout.align_to(MEM_ALIGNMENT).ok()?.pad_to_align())
    }

    // allocates uninitialised storage for `len` values
    fn allocate(len: usize) -> Result<NonNull<T>, MatrixError> {
        let bytes = len.saturating_mul(std::mem::size_of::<T>());
        let layout = Self::layout(len).ok_or(MatrixError::AllocationFailed { bytes })?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout has nonzero size
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(MatrixError::AllocationFailed { bytes })
    }

    // infallible constructors abort the way `Vec` does
    fn allocation_failure(len: usize) -> ! {
        match Self::layout(len) {
            Some(layout) => alloc::handle_alloc_error(layout),
            None => panic!("aligned buffer capacity overflow"),
        }
    }
}

impl<T: Copy> AlignedBuffer<T> {
    /// Allocates `len` copies of `value`.
    pub fn try_filled(len: usize, value: T) -> Result<Self, MatrixError> {
        let ptr = Self::allocate(len)?;
        for i in 0..len {
            // SAFETY: `ptr` is valid for `len` writes
            unsafe { ptr.as_ptr().add(i).write(value) };
        }
        Ok(Self { ptr, len })
    }

    /// Allocates `len` copies of `value`, aborting on allocation failure.
    pub fn filled(len: usize, value: T) -> Self {
        Self::try_filled(len, value).unwrap_or_else(|_| Self::allocation_failure(len))
    }

    /// Allocates a copy of `src`.
    pub fn try_from_slice(src: &[T]) -> Result<Self, MatrixError> {
        let len = src.len();
        let ptr = Self::allocate(len)?;
        // SAFETY: the new allocation is valid for `len` writes and
        // cannot overlap a live slice
        unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), len) };
        Ok(Self { ptr, len })
    }
}

impl<T> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if let Some(layout) = Self::layout(self.len) {
            if layout.size() != 0 {
                // SAFETY: allocated in `allocate` with this same layout.
                // elements are Copy in all constructors, so there is
                // nothing to drop in place
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
            }
        }
    }
}

impl<T: Copy> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        Self::try_from_slice(self).unwrap_or_else(|_| Self::allocation_failure(self.len))
    }
}

impl<T> Default for AlignedBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for AlignedBuffer<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid and initialised for len values, or
        // dangling (but aligned) with len == 0
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as for deref, plus exclusive access through &mut self
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_buffer_alignment() {
        for len in [1, 3, 4, 17, 128, 1000] {
            let buf = AlignedBuffer::<f32>::filled(len, 0.0);
            assert_eq!(buf.len(), len);
            assert_eq!(
                (buf.as_ptr() as usize) % MEM_ALIGNMENT,
                0,
                "buffer of length {} is not aligned to {}",
                len,
                MEM_ALIGNMENT
            );
            assert!(buf.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_aligned_buffer_take() {
        let mut buf = AlignedBuffer::<f64>::filled(8, 2.0);
        assert!(buf.is_allocated());

        let moved = buf.take();
        assert!(!buf.is_allocated());
        assert!(buf.is_empty());
        assert!(moved.is_allocated());
        assert_eq!(&moved[..], &[2.0; 8]);
        // both dropped here, with only one deallocation
    }

    #[test]
    fn test_aligned_buffer_clone_is_deep() {
        let mut a = AlignedBuffer::<f32>::try_from_slice(&[1.0, 2.0, 3.0]).unwrap();
        let b = a.clone();
        a[1] = 10.0;
        assert_eq!(&b[..], &[1.0, 2.0, 3.0]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn test_aligned_buffer_empty() {
        let buf = AlignedBuffer::<f32>::empty();
        assert!(!buf.is_allocated());
        assert_eq!(buf.len(), 0);
        let buf = AlignedBuffer::<f32>::filled(0, 1.0);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn test_aligned_buffer_overflow() {
        let err = AlignedBuffer::<f32>::try_filled(usize::MAX / 2, 0.0);
        assert!(matches!(err, Err(MatrixError::AllocationFailed { .. })));
    }
}
