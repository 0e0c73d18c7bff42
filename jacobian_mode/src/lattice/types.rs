//! Abstract array values.
//!
//! `AbstractArray` is the abstract counterpart of `array::Array`: it describes
//! every array with a given shape and dtype. Two abstract arrays are equal
//! exactly when they have the same shape and dtype, which makes them usable
//! as cache keys for decisions that only depend on type signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ops::checked_size;
use crate::dtype::DType;
use crate::error::EvalError;

/// Array shape: one extent per dimension. The empty shape is a scalar.
pub type Shape = Vec<usize>;

/// A shaped array with unknown contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbstractArray {
    pub shape: Shape,
    pub dtype: DType,
}

impl AbstractArray {
    pub fn new(shape: impl Into<Shape>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
        }
    }

    /// A rank-0 abstract value.
    pub fn scalar(dtype: DType) -> Self {
        Self::new(Vec::new(), dtype)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements; `ShapeOverflow` when it exceeds `usize`.
    pub fn size(&self) -> Result<usize, EvalError> {
        checked_size(&self.shape)
    }

    pub fn is_complex(&self) -> bool {
        self.dtype.is_complex()
    }

    /// Same shape, different dtype.
    pub fn with_dtype(&self, dtype: DType) -> Self {
        Self::new(self.shape.clone(), dtype)
    }
}

impl fmt::Display for AbstractArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.shape.iter().map(|d| d.to_string()).collect();
        write!(f, "{}[{}]", self.dtype, dims.join(","))
    }
}

/// Anything that has a shape and a dtype.
///
/// Implemented by concrete arrays and by abstract arrays, so the mode decision
/// can accept either and only ever looks at the signature.
pub trait ShapeDtype {
    fn shape(&self) -> &[usize];

    fn dtype(&self) -> DType;

    /// The abstract value describing `self`.
    fn aval(&self) -> AbstractArray {
        AbstractArray::new(self.shape().to_vec(), self.dtype())
    }
}

impl ShapeDtype for AbstractArray {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn dtype(&self) -> DType {
        self.dtype
    }

    fn aval(&self) -> AbstractArray {
        self.clone()
    }
}

impl<T: ShapeDtype + ?Sized> ShapeDtype for &T {
    fn shape(&self) -> &[usize] {
        (**self).shape()
    }

    fn dtype(&self) -> DType {
        (**self).dtype()
    }
}
