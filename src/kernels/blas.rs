use crate::algebra::XdotScalar;
use crate::kernels::dot2_scalar;

/// Vendor `?dot` reduction.  Falls back to the scalar kernel for spans
/// too long to describe with a BLAS integer.
pub fn dot2_blas(u: &[f32], v: &[f32]) -> f32 {
    debug_assert_eq!(u.len(), v.len());
    match i32::try_from(u.len()) {
        Ok(0) => 0.0,
        Ok(n) => f32::xdot(n, u, 1, &v[..u.len()], 1),
        Err(_) => dot2_scalar(u, v),
    }
}

#[test]
fn test_dot2_blas() {
    let u: Vec<f32> = (0..19).map(|i| i as f32).collect();
    assert_eq!(dot2_blas(&u, &u), dot2_scalar(&u, &u));
    assert_eq!(dot2_blas(&[], &[]), 0.0);
}
