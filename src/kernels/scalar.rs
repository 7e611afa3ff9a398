use itertools::izip;

/// Portable `Σ u[i] v[i]`.
///
/// Operands must have equal length.
pub fn dot2_scalar(u: &[f32], v: &[f32]) -> f32 {
    debug_assert_eq!(u.len(), v.len());
    let v = &v[..u.len()];
    u.iter().zip(v).fold(0.0, |acc, (&a, &b)| acc + a * b)
}

/// Portable `Σ u[i] v[i] d[i]`.
pub fn dot3_scalar(u: &[f32], v: &[f32], d: &[f32]) -> f32 {
    debug_assert!(u.len() == v.len() && u.len() == d.len());
    let n = u.len();
    izip!(u, &v[..n], &d[..n]).fold(0.0, |acc, (&a, &b, &c)| acc + a * b * c)
}

#[test]
fn test_scalar_kernels() {
    let u = [1.0, 2.0, 3.0];
    let v = [4.0, -5.0, 6.0];
    let d = [0.5, 2.0, -1.0];
    assert_eq!(dot2_scalar(&u, &v), 12.0);
    assert_eq!(dot3_scalar(&u, &v, &d), -36.0);
    assert_eq!(dot2_scalar(&[], &[]), 0.0);
    assert_eq!(dot3_scalar(&[], &[], &[]), 0.0);
}
