#![allow(non_snake_case)]
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdchol::algebra::*;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random symmetric positive definite matrix `MᵀM + n I`, with entries of
/// M uniform in [-1, 1).
pub fn random_pd(n: usize, rng: &mut StdRng) -> Matrix<f32> {
    let src: Vec<f32> = (0..n * n).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
    let M = Matrix::new_from_slice((n, n), &src);

    let mut A = Matrix::identity(n);
    A.mul(&M.transpose(), &M, 1.0, n as f32);
    A
}

/// Lower triangle of the packed factor, upper triangle zeroed.  With
/// `unit_diag` the diagonal is replaced by ones.
pub fn lower(F: &Matrix<f32>, unit_diag: bool) -> Matrix<f32> {
    let n = F.nrows();
    let mut L = Matrix::zeros((n, n));
    for i in 0..n {
        for j in 0..i {
            L[(i, j)] = F[(i, j)];
        }
        L[(i, i)] = if unit_diag { 1.0 } else { F[(i, i)] };
    }
    L
}

/// L Lᵀ
pub fn llt_product(L: &Matrix<f32>) -> Matrix<f32> {
    let n = L.nrows();
    let mut A = Matrix::zeros((n, n));
    A.mul(L, &L.transpose(), 1.0, 0.0);
    A
}

/// L D Lᵀ
pub fn ldlt_product(L: &Matrix<f32>, d: &[f32]) -> Matrix<f32> {
    let n = L.nrows();
    let mut LD = L.clone();
    for i in 0..n {
        for j in 0..n {
            LD[(i, j)] *= d[j];
        }
    }
    let mut A = Matrix::zeros((n, n));
    A.mul(&LD, &L.transpose(), 1.0, 0.0);
    A
}

/// Reconstruction tolerance for single precision work at size `n`,
/// relative to the largest entry of `A`.
pub fn tolerance(A: &Matrix<f32>, n: usize) -> f32 {
    let scale = (0..n)
        .flat_map(|i| A.row(i).iter().copied())
        .fold(1.0f32, |m, x| m.max(x.abs()));
    1e-5 * (n.max(1) as f32) * scale
}
