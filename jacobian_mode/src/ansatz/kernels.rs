//! Concrete kernels for model nodes.
//!
//! Every kernel first asks the matching transfer function for the result's
//! abstract value, computes in `Complex<f64>`, and stores the result with the
//! predicted dtype. Dense contractions go through `nalgebra::DMatrix`.

use nalgebra::{Complex, DMatrix};
use num_traits::Zero;

use super::graph::{BinaryOp, UnaryOp};
use super::tfuncs;
use crate::array::Array;
use crate::dtype::DType;
use crate::error::EvalError;
use crate::lattice::{checked_size, ShapeDtype};

/// Elementwise unary kernel.
pub fn unary(op: UnaryOp, x: &Array) -> Result<Array, EvalError> {
    let out = tfuncs::tfunc_unary(op, &x.aval())?;
    let real_input = x.dtype().is_real();
    let values: Vec<Complex<f64>> = x
        .to_complex_vec()
        .into_iter()
        .map(|z| apply_unary(op, z, real_input))
        .collect();
    Array::from_complex_as(out.shape, &values, out.dtype)
}

fn apply_unary(op: UnaryOp, z: Complex<f64>, real_input: bool) -> Complex<f64> {
    match op {
        UnaryOp::Neg => -z,
        UnaryOp::Exp => z.exp(),
        UnaryOp::Tanh => z.tanh(),
        UnaryOp::LogCosh if real_input => Complex::new(log_cosh_real(z.re), 0.0),
        UnaryOp::LogCosh => z.cosh().ln(),
        UnaryOp::Conj => z.conj(),
        UnaryOp::Real => Complex::new(z.re, 0.0),
        UnaryOp::Imag => Complex::new(z.im, 0.0),
        UnaryOp::Abs => Complex::new(z.norm(), 0.0),
        UnaryOp::MulI => Complex::new(-z.im, z.re),
    }
}

/// `log(cosh(x))` without overflow for large `|x|`.
fn log_cosh_real(x: f64) -> f64 {
    let a = x.abs();
    a + (-2.0 * a).exp().ln_1p() - std::f64::consts::LN_2
}

/// Elementwise binary kernel with numpy broadcasting.
pub fn binary(op: BinaryOp, a: &Array, b: &Array) -> Result<Array, EvalError> {
    let out = tfuncs::tfunc_binary(op, &a.aval(), &b.aval())?;
    let a_values = a.to_complex_vec();
    let b_values = b.to_complex_vec();
    let a_index = broadcast_indices(a.shape(), &out.shape)?;
    let b_index = broadcast_indices(b.shape(), &out.shape)?;

    let values: Vec<Complex<f64>> = a_index
        .iter()
        .zip(&b_index)
        .map(|(&i, &j)| match op {
            BinaryOp::Add => a_values[i] + b_values[j],
            BinaryOp::Mul => a_values[i] * b_values[j],
        })
        .collect();
    Array::from_complex_as(out.shape, &values, out.dtype)
}

/// For every element of `out_shape` (row-major), the flat index of the
/// broadcast source element in an array of `in_shape`.
fn broadcast_indices(in_shape: &[usize], out_shape: &[usize]) -> Result<Vec<usize>, EvalError> {
    let out_len = checked_size(out_shape)?;
    if out_len == 0 {
        return Ok(Vec::new());
    }

    let offset = out_shape.len() - in_shape.len();
    let mut strides = vec![0; out_shape.len()];
    let mut stride = 1;
    for (i, &extent) in in_shape.iter().enumerate().rev() {
        strides[i + offset] = if extent == 1 { 0 } else { stride };
        stride *= extent;
    }

    Ok((0..out_len)
        .map(|flat| {
            let mut rem = flat;
            let mut index = 0;
            for (d, &extent) in out_shape.iter().enumerate().rev() {
                index += (rem % extent) * strides[d];
                rem /= extent;
            }
            index
        })
        .collect())
}

/// `input @ kernel` over the last axis of `input`.
pub fn dense(x: &Array, kernel: &Array) -> Result<Array, EvalError> {
    let out = tfuncs::tfunc_dense(&x.aval(), &kernel.aval())?;
    let (n, m) = (kernel.shape()[0], kernel.shape()[1]);
    let rows = checked_size(&x.shape()[..x.shape().len() - 1])?;

    let lhs = DMatrix::from_row_slice(rows, n, &x.to_complex_vec());
    let rhs = DMatrix::from_row_slice(n, m, &kernel.to_complex_vec());
    let product = lhs * rhs;

    // nalgebra is column-major; the transpose's storage is row-major order.
    let values = product.transpose().as_slice().to_vec();
    Array::from_complex_as(out.shape, &values, out.dtype)
}

/// Sum over the last axis.
pub fn sum_last(x: &Array) -> Result<Array, EvalError> {
    let out = tfuncs::tfunc_sum_last(&x.aval())?;
    let n = x.shape()[x.shape().len() - 1];
    let values: Vec<Complex<f64>> = if n == 0 {
        vec![Complex::zero(); out.size()?]
    } else {
        x.to_complex_vec()
            .chunks(n)
            .map(|row| row.iter().fold(Complex::zero(), |acc, z| acc + z))
            .collect()
    };
    Array::from_complex_as(out.shape, &values, out.dtype)
}

/// Convert to another dtype; complex to real conversion keeps the real part.
pub fn cast(x: &Array, dtype: DType) -> Result<Array, EvalError> {
    let out = tfuncs::tfunc_cast(&x.aval(), dtype);
    Array::from_complex_as(out.shape, &x.to_complex_vec(), out.dtype)
}
