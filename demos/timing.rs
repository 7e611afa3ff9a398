#![allow(non_snake_case)]
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simdchol::algebra::*;
use simdchol::cholesky::*;
use simdchol::kernels::*;
use std::time::Instant;

const NUM_RUNS: u32 = 2;
const START_SIZE: usize = 4;
const END_SIZE: usize = 1024;

#[derive(Clone, Copy)]
enum Method {
    LLt,
    LDLt,
}

fn random_pos_def(n: usize, rng: &mut StdRng) -> Matrix<f32> {
    let src: Vec<f32> = (0..n * n).map(|_| rng.gen::<f32>()).collect();
    let M = Matrix::new_from_slice((n, n), &src);

    let mut A = Matrix::identity(n);
    A.mul(&M.transpose(), &M, 1.0, n as f32);
    A
}

fn accuracy_check() -> Result<bool, CholeskyError> {
    #[rustfmt::skip]
    let A = Matrix::<f32>::from(&[
        [  4.,  12., -16.],
        [ 12.,  37., -43.],
        [-16., -43.,  98.],
    ]);
    #[rustfmt::skip]
    let expected_llt = Matrix::<f32>::from(&[
        [ 2.,  6., -8.],
        [ 6.,  1.,  5.],
        [-8.,  5.,  3.],
    ]);
    #[rustfmt::skip]
    let expected_ldlt = Matrix::<f32>::from(&[
        [ 4.,  3., -4.],
        [ 3.,  1.,  5.],
        [-4.,  5.,  9.],
    ]);

    let mut correct = true;
    for &variant in KernelVariant::available() {
        let mut engine = CholeskyEngine::with_kernel(3, variant)?;

        engine.factorize_llt(&A)?;
        let LLt = engine.extract_symmetric();
        if LLt != expected_llt {
            println!("{} LLt mismatch\nMatrix\n{}\nExpected\n{}\nActual\n{}", variant, A, expected_llt, LLt);
            correct = false;
        }

        engine.factorize_ldlt(&A)?;
        let LDLt = engine.extract_symmetric();
        if LDLt != expected_ldlt {
            println!("{} LDLt mismatch\nMatrix\n{}\nExpected\n{}\nActual\n{}", variant, A, expected_ldlt, LDLt);
            correct = false;
        }
    }
    Ok(correct)
}

// mean wall time per call in milliseconds, including engine construction
fn time_ms(A: &Matrix<f32>, variant: KernelVariant, method: Method) -> Result<f64, CholeskyError> {
    let run = || -> Result<(), CholeskyError> {
        let mut engine = CholeskyEngine::with_kernel(A.nrows(), variant)?;
        match method {
            Method::LLt => engine.factorize_llt(A),
            Method::LDLt => engine.factorize_ldlt(A),
        }
    };

    // warmup
    run()?;

    let start = Instant::now();
    for _ in 0..NUM_RUNS {
        run()?;
    }
    Ok(start.elapsed().as_secs_f64() * 1e3 / f64::from(NUM_RUNS))
}

fn main() -> Result<(), CholeskyError> {
    if !accuracy_check()? {
        eprintln!("accuracy check failed, exiting");
        std::process::exit(1);
    }
    println!("accuracy check passed");

    let simd = KernelVariant::Simd.kernels();
    println!("simd kernel path: {}", simd.path());

    #[allow(unused_mut)]
    let mut columns = vec![
        ("Scalar-LLt", KernelVariant::Scalar, Method::LLt),
        ("Simd-LLt", KernelVariant::Simd, Method::LLt),
        ("Scalar-LDLt", KernelVariant::Scalar, Method::LDLt),
        ("Simd-LDLt", KernelVariant::Simd, Method::LDLt),
    ];
    #[cfg(feature = "blas")]
    columns.push(("Blas-LLt", KernelVariant::Blas, Method::LLt));

    let header: Vec<&str> = columns.iter().map(|c| c.0).collect();
    println!("Size,{}", header.join(","));

    let mut rng = StdRng::seed_from_u64(111970);
    let mut n = START_SIZE;
    while n <= END_SIZE {
        let A = random_pos_def(n, &mut rng);

        let mut line = n.to_string();
        for &(_, variant, method) in &columns {
            line.push_str(&format!(",{:.4}", time_ms(&A, variant, method)?));
        }
        println!("{}", line);

        n *= 2;
    }

    Ok(())
}
