//! Transfer functions for abstract evaluation.
//!
//! Each transfer function predicts the shape and dtype of a model node from
//! the shapes and dtypes of its operands. Concrete kernels call the same
//! functions to decide the storage of their results, so a concrete result
//! always has the abstract value predicted here.
//!
//! # Type rules
//!
//! - `neg`, `conj`: dtype preserved (`neg` rejects `Bool`)
//! - `exp`, `tanh`, `log_cosh`: floats and complex preserved, integers and
//!   `Bool` become `Float64`
//! - `real`, `imag`, `abs`: the real counterpart (`Complex64 → Float32`)
//! - `mul_i`: the complex counterpart of the inexact dtype (`Int8 → Complex128`)
//! - `add`, `mul`: broadcast shapes, promote dtypes
//! - `dense`: `[..., n] @ [n, m] → [..., m]`, promote dtypes, rejects `Bool`
//! - `sum_last`: drop the last axis; `Bool` and signed integers sum to
//!   `Int64`, unsigned integers to `UInt64`
//! - `cast`: shape preserved, dtype replaced

use super::graph::{BinaryOp, UnaryOp};
use crate::dtype::{DType, DTypeClass};
use crate::error::EvalError;
use crate::lattice::{broadcast_shapes, contract_last, reduce_last, AbstractArray};

/// Transfer function for elementwise unary operations.
///
/// # Examples
/// ```text
/// exp(int64[8])        → float64[8]
/// log_cosh(complex64)  → complex64
/// abs(complex128[4,2]) → float64[4,2]
/// ```
pub fn tfunc_unary(op: UnaryOp, x: &AbstractArray) -> Result<AbstractArray, EvalError> {
    let dtype = match op {
        UnaryOp::Neg if x.dtype == DType::Bool => {
            return Err(EvalError::UnsupportedDType {
                op: op.name(),
                dtype: x.dtype,
            })
        }
        UnaryOp::Neg | UnaryOp::Conj => x.dtype,
        UnaryOp::Exp | UnaryOp::Tanh | UnaryOp::LogCosh => x.dtype.to_inexact(),
        UnaryOp::Real | UnaryOp::Imag | UnaryOp::Abs => x.dtype.to_real(),
        UnaryOp::MulI => x.dtype.to_inexact().to_complex(),
    };
    Ok(x.with_dtype(dtype))
}

/// Transfer function for elementwise binary operations.
///
/// # Examples
/// ```text
/// add(float32[8,4], complex64[4]) → complex64[8,4]
/// mul(int8[3], float64[])         → float64[3]
/// ```
pub fn tfunc_binary(
    op: BinaryOp,
    a: &AbstractArray,
    b: &AbstractArray,
) -> Result<AbstractArray, EvalError> {
    let shape = broadcast_shapes(op.name(), &a.shape, &b.shape)?;
    Ok(AbstractArray::new(shape, a.dtype.promote(b.dtype)))
}

/// Transfer function for `dense` (`input @ kernel`).
///
/// # Examples
/// ```text
/// dense(float64[16,10], complex128[10,20]) → complex128[16,20]
/// ```
pub fn tfunc_dense(x: &AbstractArray, kernel: &AbstractArray) -> Result<AbstractArray, EvalError> {
    for operand in [x, kernel] {
        if operand.dtype == DType::Bool {
            return Err(EvalError::UnsupportedDType {
                op: "dense",
                dtype: operand.dtype,
            });
        }
    }
    let shape = contract_last("dense", &x.shape, &kernel.shape)?;
    Ok(AbstractArray::new(shape, x.dtype.promote(kernel.dtype)))
}

/// Transfer function for `sum_last`.
///
/// # Examples
/// ```text
/// sum_last(complex128[16,20]) → complex128[16]
/// sum_last(bool[16,20])       → int64[16]
/// ```
pub fn tfunc_sum_last(x: &AbstractArray) -> Result<AbstractArray, EvalError> {
    let shape = reduce_last("sum_last", &x.shape)?;
    let dtype = match x.dtype.class() {
        DTypeClass::Bool => DType::Int64,
        DTypeClass::Integer if x.dtype.is_unsigned_integer() => DType::UInt64,
        DTypeClass::Integer => DType::Int64,
        DTypeClass::Float | DTypeClass::Complex => x.dtype,
    };
    Ok(AbstractArray::new(shape, dtype))
}

/// Transfer function for `cast`.
pub fn tfunc_cast(x: &AbstractArray, dtype: DType) -> AbstractArray {
    x.with_dtype(dtype)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aval(shape: &[usize], dtype: DType) -> AbstractArray {
        AbstractArray::new(shape.to_vec(), dtype)
    }

    #[test]
    fn test_unary_inexact() {
        assert_eq!(
            tfunc_unary(UnaryOp::Exp, &aval(&[8], DType::Int64)),
            Ok(aval(&[8], DType::Float64))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::LogCosh, &aval(&[], DType::Complex64)),
            Ok(aval(&[], DType::Complex64))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::Tanh, &aval(&[2], DType::Float32)),
            Ok(aval(&[2], DType::Float32))
        );
    }

    #[test]
    fn test_unary_real_part() {
        assert_eq!(
            tfunc_unary(UnaryOp::Abs, &aval(&[4, 2], DType::Complex128)),
            Ok(aval(&[4, 2], DType::Float64))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::Imag, &aval(&[4], DType::Complex64)),
            Ok(aval(&[4], DType::Float32))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::Real, &aval(&[4], DType::Int32)),
            Ok(aval(&[4], DType::Int32))
        );
    }

    #[test]
    fn test_unary_mul_i_is_complex() {
        assert_eq!(
            tfunc_unary(UnaryOp::MulI, &aval(&[2], DType::Float32)),
            Ok(aval(&[2], DType::Complex64))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::MulI, &aval(&[2], DType::Int8)),
            Ok(aval(&[2], DType::Complex128))
        );
    }

    #[test]
    fn test_unary_preserving() {
        assert_eq!(
            tfunc_unary(UnaryOp::Conj, &aval(&[3], DType::Complex64)),
            Ok(aval(&[3], DType::Complex64))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::Neg, &aval(&[3], DType::Int8)),
            Ok(aval(&[3], DType::Int8))
        );
        assert_eq!(
            tfunc_unary(UnaryOp::Neg, &aval(&[3], DType::Bool)),
            Err(EvalError::UnsupportedDType {
                op: "neg",
                dtype: DType::Bool
            })
        );
    }

    #[test]
    fn test_binary_promotes_and_broadcasts() {
        assert_eq!(
            tfunc_binary(
                BinaryOp::Add,
                &aval(&[8, 4], DType::Float32),
                &aval(&[4], DType::Complex64)
            ),
            Ok(aval(&[8, 4], DType::Complex64))
        );
        assert_eq!(
            tfunc_binary(
                BinaryOp::Mul,
                &aval(&[3], DType::Int8),
                &aval(&[], DType::Float64)
            ),
            Ok(aval(&[3], DType::Float64))
        );
        assert!(tfunc_binary(
            BinaryOp::Mul,
            &aval(&[3], DType::Float64),
            &aval(&[4], DType::Float64)
        )
        .is_err());
    }

    #[test]
    fn test_dense() {
        assert_eq!(
            tfunc_dense(
                &aval(&[16, 10], DType::Float64),
                &aval(&[10, 20], DType::Complex128)
            ),
            Ok(aval(&[16, 20], DType::Complex128))
        );
        assert_eq!(
            tfunc_dense(&aval(&[16, 10], DType::Bool), &aval(&[10, 20], DType::Float64)),
            Err(EvalError::UnsupportedDType {
                op: "dense",
                dtype: DType::Bool
            })
        );
        assert!(tfunc_dense(&aval(&[16, 10], DType::Float64), &aval(&[9, 20], DType::Float64))
            .is_err());
    }

    #[test]
    fn test_sum_last() {
        assert_eq!(
            tfunc_sum_last(&aval(&[16, 20], DType::Complex128)),
            Ok(aval(&[16], DType::Complex128))
        );
        assert_eq!(
            tfunc_sum_last(&aval(&[16, 20], DType::Bool)),
            Ok(aval(&[16], DType::Int64))
        );
        assert_eq!(
            tfunc_sum_last(&aval(&[5], DType::UInt8)),
            Ok(aval(&[], DType::UInt64))
        );
        assert!(tfunc_sum_last(&aval(&[], DType::Float64)).is_err());
    }

    #[test]
    fn test_cast() {
        assert_eq!(
            tfunc_cast(&aval(&[4], DType::Float64), DType::Complex128),
            aval(&[4], DType::Complex128)
        );
    }
}
