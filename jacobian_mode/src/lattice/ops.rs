//! Shape operations on abstract values.
//!
//! These operations compute result shapes the same way concrete kernels lay
//! out their outputs:
//! - `checked_size`: overflow-checked element count
//! - `broadcast_shapes`: numpy broadcasting for elementwise binary operations
//! - `contract_last`: `[..., n] @ [n, m] -> [..., m]`
//! - `reduce_last`: `[..., n] -> [...]`
//! - `flatten_batch`: `[d0, ..., dk, n] -> [d0 * ... * dk, n]`

use super::types::{AbstractArray, Shape};
use crate::error::EvalError;

/// Broadcast two shapes following numpy rules.
///
/// Dimensions are aligned from the right; each pair must be equal or contain a 1.
///
/// # Examples
/// ```text
/// [4, 3] and [3]    -> [4, 3]
/// [4, 1] and [1, 5] -> [4, 5]
/// [2] and [3]       -> error
/// ```
pub fn broadcast_shapes(op: &'static str, lhs: &[usize], rhs: &[usize]) -> Result<Shape, EvalError> {
    let ndim = lhs.len().max(rhs.len());
    let mut out = vec![0; ndim];

    for i in 0..ndim {
        let l = dim_from_right(lhs, ndim - 1 - i);
        let r = dim_from_right(rhs, ndim - 1 - i);
        out[i] = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(EvalError::ShapeMismatch {
                    op,
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
    }

    Ok(out)
}

/// Extent of the dimension `offset` places from the right, 1 when missing.
fn dim_from_right(shape: &[usize], offset: usize) -> usize {
    if offset < shape.len() {
        shape[shape.len() - 1 - offset]
    } else {
        1
    }
}

/// Shape of `x @ kernel` where `kernel` is a matrix.
pub fn contract_last(op: &'static str, x: &[usize], kernel: &[usize]) -> Result<Shape, EvalError> {
    let (Some(&n), [rows, cols]) = (x.last(), kernel) else {
        return Err(EvalError::ShapeMismatch {
            op,
            lhs: x.to_vec(),
            rhs: kernel.to_vec(),
        });
    };
    if n != *rows {
        return Err(EvalError::ShapeMismatch {
            op,
            lhs: x.to_vec(),
            rhs: kernel.to_vec(),
        });
    }

    let mut out = x[..x.len() - 1].to_vec();
    out.push(*cols);
    Ok(out)
}

/// Shape after summing over the last axis.
pub fn reduce_last(op: &'static str, x: &[usize]) -> Result<Shape, EvalError> {
    match x.split_last() {
        Some((_, rest)) => Ok(rest.to_vec()),
        None => Err(EvalError::ReduceScalar { op }),
    }
}

/// Number of elements of an array of this shape.
///
/// A zero extent anywhere makes the count zero; otherwise the product must
/// fit in `usize`.
pub fn checked_size(shape: &[usize]) -> Result<usize, EvalError> {
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .ok_or_else(|| EvalError::ShapeOverflow {
            shape: shape.to_vec(),
        })
}

/// Collapse all leading dimensions of a sample batch into one.
///
/// A one-dimensional batch `[n]` becomes `[1, n]`; a scalar is rejected, and
/// so is a batch whose leading extents overflow `usize`.
pub fn flatten_batch(samples: &AbstractArray) -> Result<AbstractArray, EvalError> {
    let Some((&features, batch)) = samples.shape.split_last() else {
        return Err(EvalError::ScalarSamples);
    };
    let rows = checked_size(batch).map_err(|_| EvalError::ShapeOverflow {
        shape: samples.shape.clone(),
    })?;
    Ok(AbstractArray::new(vec![rows, features], samples.dtype))
}
