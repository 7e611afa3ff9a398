//! 8-wide reductions.
//!
//! Every kernel here splits `[0, n)` into a bulk region of whole
//! [`SIMD_WIDTH`] groups and a scalar remainder covering `n % SIMD_WIDTH`
//! trailing elements.  The two partial sums are added at the end.

use super::{Dot2Fn, Dot3Fn};
use itertools::izip;

/// f32 lanes per 256-bit vector register
pub const SIMD_WIDTH: usize = 8;

/// Picks the fastest 8-wide kernel pair available on this host.
///
/// Returns the kernels and a short name for the selected code path.
pub(crate) fn select() -> (Dot2Fn, Dot3Fn, &'static str) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx") && is_x86_feature_detected!("fma") {
            return (dot2_avx_fma, dot3_avx_fma, "avx+fma");
        }
    }
    log::debug!("avx/fma not detected, using portable 8-lane kernels");
    (dot2_lanes, dot3_lanes, "portable-lanes")
}

/// Portable 8-lane `Σ u[i] v[i]`.  Written so that the bulk loop
/// autovectorizes on any target.
pub fn dot2_lanes(u: &[f32], v: &[f32]) -> f32 {
    debug_assert_eq!(u.len(), v.len());
    let n = u.len();
    let v = &v[..n];
    let bulk = n - n % SIMD_WIDTH;

    let mut acc = [0.0f32; SIMD_WIDTH];
    let groups = u[..bulk].chunks_exact(SIMD_WIDTH).zip(v[..bulk].chunks_exact(SIMD_WIDTH));
    for (a, b) in groups {
        for (s, &x, &y) in izip!(&mut acc, a, b) {
            *s += x * y;
        }
    }
    let sum = acc.iter().fold(0.0, |s, &x| s + x);

    u[bulk..].iter().zip(&v[bulk..]).fold(sum, |s, (&x, &y)| s + x * y)
}

/// Portable 8-lane `Σ u[i] v[i] d[i]`.
pub fn dot3_lanes(u: &[f32], v: &[f32], d: &[f32]) -> f32 {
    debug_assert!(u.len() == v.len() && u.len() == d.len());
    let n = u.len();
    let (v, d) = (&v[..n], &d[..n]);
    let bulk = n - n % SIMD_WIDTH;

    let mut acc = [0.0f32; SIMD_WIDTH];
    let groups = izip!(
        u[..bulk].chunks_exact(SIMD_WIDTH),
        v[..bulk].chunks_exact(SIMD_WIDTH),
        d[..bulk].chunks_exact(SIMD_WIDTH)
    );
    for (a, b, c) in groups {
        for (s, &x, &y, &z) in izip!(&mut acc, a, b, c) {
            *s += x * y * z;
        }
    }
    let sum = acc.iter().fold(0.0, |s, &x| s + x);

    izip!(&u[bulk..], &v[bulk..], &d[bulk..]).fold(sum, |s, (&x, &y, &z)| s + x * y * z)
}

// Safe wrappers so the AVX kernels coerce to plain fn pointers.

#[cfg(target_arch = "x86_64")]
fn dot2_avx_fma(u: &[f32], v: &[f32]) -> f32 {
    // SAFETY: only handed out by `select` after runtime detection of avx and fma
    unsafe { x86::dot2(u, v) }
}

#[cfg(target_arch = "x86_64")]
fn dot3_avx_fma(u: &[f32], v: &[f32], d: &[f32]) -> f32 {
    // SAFETY: only handed out by `select` after runtime detection of avx and fma
    unsafe { x86::dot3(u, v, d) }
}

// Matrix rows are only 16 byte aligned (stride is a multiple of 4 floats),
// so all loads here are unaligned loads.
#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::SIMD_WIDTH;
    use std::arch::x86_64::*;

    #[target_feature(enable = "avx")]
    unsafe fn hsum(x: __m256) -> f32 {
        let lo = _mm256_castps256_ps128(x);
        let hi = _mm256_extractf128_ps(x, 1);
        let s = _mm_add_ps(lo, hi);
        let s = _mm_hadd_ps(s, s);
        let s = _mm_hadd_ps(s, s);
        _mm_cvtss_f32(s)
    }

    #[target_feature(enable = "avx,fma")]
    pub(super) unsafe fn dot2(u: &[f32], v: &[f32]) -> f32 {
        debug_assert_eq!(u.len(), v.len());
        let n = u.len();
        let v = &v[..n];
        let bulk = n - n % SIMD_WIDTH;

        let mut acc = _mm256_setzero_ps();
        for i in (0..bulk).step_by(SIMD_WIDTH) {
            let a = _mm256_loadu_ps(u.as_ptr().add(i));
            let b = _mm256_loadu_ps(v.as_ptr().add(i));
            acc = _mm256_fmadd_ps(a, b, acc);
        }
        let mut sum = hsum(acc);

        for i in bulk..n {
            sum += u[i] * v[i];
        }
        sum
    }

    #[target_feature(enable = "avx,fma")]
    pub(super) unsafe fn dot3(u: &[f32], v: &[f32], d: &[f32]) -> f32 {
        debug_assert!(u.len() == v.len() && u.len() == d.len());
        let n = u.len();
        let (v, d) = (&v[..n], &d[..n]);
        let bulk = n - n % SIMD_WIDTH;

        let mut acc = _mm256_setzero_ps();
        for i in (0..bulk).step_by(SIMD_WIDTH) {
            let a = _mm256_loadu_ps(u.as_ptr().add(i));
            let b = _mm256_loadu_ps(v.as_ptr().add(i));
            let c = _mm256_loadu_ps(d.as_ptr().add(i));
            acc = _mm256_fmadd_ps(_mm256_mul_ps(a, b), c, acc);
        }
        let mut sum = hsum(acc);

        for i in bulk..n {
            sum += u[i] * v[i] * d[i];
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{dot2_scalar, dot3_scalar};

    fn ramp(n: usize, scale: f32, shift: f32) -> Vec<f32> {
        (0..n).map(|i| scale * (i as f32) + shift).collect()
    }

    #[test]
    fn test_lanes_cover_every_element() {
        // all-ones input counts the elements, so a dropped or doubled
        // tail element shows up exactly
        for n in 0..=3 * SIMD_WIDTH + 1 {
            let ones = vec![1.0f32; n];
            assert_eq!(dot2_lanes(&ones, &ones), n as f32);
            assert_eq!(dot3_lanes(&ones, &ones, &ones), n as f32);
        }
    }

    #[test]
    fn test_selected_cover_every_element() {
        let (dot2, dot3, _) = select();
        for n in 0..=3 * SIMD_WIDTH + 1 {
            let ones = vec![1.0f32; n];
            assert_eq!(dot2(&ones, &ones), n as f32);
            assert_eq!(dot3(&ones, &ones, &ones), n as f32);
        }
    }

    #[test]
    fn test_lanes_match_scalar() {
        for n in [1, 7, 8, 9, 15, 16, 17, 31, 33, 100] {
            let u = ramp(n, 0.25, -1.0);
            let v = ramp(n, -0.5, 3.0);
            let d = ramp(n, 0.125, 0.5);
            // summation order error is bounded relative to the sum of magnitudes
            let mag: f32 = izip!(&u, &v, &d).map(|(x, y, z)| (x * y).abs() * (1.0 + z.abs())).sum();
            let tol = 1e-5 * mag.max(1.0);
            assert!((dot2_lanes(&u, &v) - dot2_scalar(&u, &v)).abs() <= tol);
            assert!((dot3_lanes(&u, &v, &d) - dot3_scalar(&u, &v, &d)).abs() <= tol);
        }
    }

    #[test]
    fn test_unaligned_start() {
        // row prefixes of a padded matrix start on 16 byte, not 32 byte, boundaries
        let (dot2, _, _) = select();
        let buf = ramp(40, 1.0, 0.0);
        let u = &buf[4..23];
        assert_eq!(dot2(u, u), dot2_scalar(u, u));
    }
}
