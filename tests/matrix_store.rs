#![allow(non_snake_case)]

use simdchol::algebra::*;

#[test]
fn test_stride_invariant() {
    for n in 0..=17 {
        let M = Matrix::<f32>::zeros((3, n));
        assert_eq!(M.stride() % ROW_PADDING, 0);
        assert!(M.stride() >= n && M.stride() < n + ROW_PADDING);
        assert_eq!(M.data().len(), 3 * M.stride());
        if M.has_buffer() {
            assert_eq!(M.data().as_ptr() as usize % MEM_ALIGNMENT, 0);
        }
    }
}

#[test]
fn test_row_major_layout() {
    let src: Vec<f32> = (0..15).map(|x| x as f32).collect();
    let M = Matrix::new_from_slice((3, 5), &src);
    assert_eq!(M.stride(), 8);
    assert_eq!(M.index_linear((2, 4)), 20);
    assert_eq!(M.data()[20], 14.0);
    assert_eq!(M.row(1), &[5., 6., 7., 8., 9.]);
    // padding starts zeroed
    assert_eq!(&M.data()[5..8], &[0., 0., 0.]);
}

#[test]
fn test_padding_ignored_by_equality() {
    let mut A = Matrix::<f32>::identity(3);
    let B = A.clone();
    A.data_mut()[3] = 123.0;
    assert_eq!(A, B);
    A[(0, 2)] = 1.0;
    assert_ne!(A, B);
}

#[test]
fn test_copy_and_move() {
    let src = Matrix::<f32>::from(&[[1., 2.], [3., 4.]]);

    let mut dst = Matrix::<f32>::zeros((2, 2));
    dst.copy_from(&src).unwrap();
    assert_eq!(dst, src);
    dst[(0, 0)] = -1.0;
    assert_eq!(src[(0, 0)], 1.0);

    let mut moved_from = src.clone();
    let mut moved_to = Matrix::<f32>::zeros((2, 2));
    moved_to.move_from(&mut moved_from).unwrap();
    assert_eq!(moved_to, src);
    assert_eq!(moved_from.size(), (0, 0));
    assert!(!moved_from.has_buffer());

    let mut wrong = Matrix::<f32>::zeros((3, 2));
    assert_eq!(wrong.copy_from(&src).err(), Some(MatrixError::IncompatibleDimension));
    assert_eq!(
        wrong.move_from(&mut moved_to).err(),
        Some(MatrixError::IncompatibleDimension)
    );
    // failed move leaves the source intact
    assert_eq!(moved_to, src);
}

#[test]
fn test_bulk_load_padded() {
    let mut M = Matrix::<f32>::zeros((2, 3));
    M.copy_from_slice(&[1., 2., 3., 0., 4., 5., 6., 0.]);
    assert_eq!(M, Matrix::from(&[[1., 2., 3.], [4., 5., 6.]]));
}

#[test]
fn test_allocation_overflow() {
    assert!(matches!(
        Matrix::<f32>::try_zeros((usize::MAX / 2, 8)),
        Err(MatrixError::LayoutOverflow { .. })
    ));
}

#[test]
fn test_gram_product() {
    #[rustfmt::skip]
    let M = Matrix::<f32>::from(&[
        [1., 2.],
        [0., 1.],
        [1., 0.],
    ]);
    let mut G = Matrix::<f32>::zeros((2, 2));
    G.mul(&M.transpose(), &M, 1.0, 0.0);
    assert_eq!(G, Matrix::from(&[[2., 2.], [2., 5.]]));
    assert!(G.is_symmetric(0.0));
}
