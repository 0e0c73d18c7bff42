//! Concrete arrays with type-segregated storage.
//!
//! `Array` holds an N-dimensional row-major array whose elements live in one
//! homogeneous vector per supported element type (`ArrayData`). Complex
//! storage uses `nalgebra::Complex`.
//!
//! Kernels in `ansatz::kernels` compute in `f64` or `Complex<f64>` and store
//! results back with `Array::from_complex_as`, which narrows to the dtype the
//! transfer functions predicted.

use half::f16;
use nalgebra::Complex;
use num_traits::Zero;

use crate::dtype::DType;
use crate::error::EvalError;
use crate::lattice::{checked_size, Shape, ShapeDtype};

/// Type-segregated array storage.
/// Each variant holds a homogeneous vector of the corresponding type, one
/// variant per `DType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex<f32>>),
    C128(Vec<Complex<f64>>),
}

impl ArrayData {
    /// Get the dtype of the stored elements
    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::Bool(_) => DType::Bool,
            ArrayData::I8(_) => DType::Int8,
            ArrayData::I16(_) => DType::Int16,
            ArrayData::I32(_) => DType::Int32,
            ArrayData::I64(_) => DType::Int64,
            ArrayData::U8(_) => DType::UInt8,
            ArrayData::U16(_) => DType::UInt16,
            ArrayData::U32(_) => DType::UInt32,
            ArrayData::U64(_) => DType::UInt64,
            ArrayData::F16(_) => DType::Float16,
            ArrayData::F32(_) => DType::Float32,
            ArrayData::F64(_) => DType::Float64,
            ArrayData::C64(_) => DType::Complex64,
            ArrayData::C128(_) => DType::Complex128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::I8(v) => v.len(),
            ArrayData::I16(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::U8(v) => v.len(),
            ArrayData::U16(v) => v.len(),
            ArrayData::U32(v) => v.len(),
            ArrayData::U64(v) => v.len(),
            ArrayData::F16(v) => v.len(),
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
            ArrayData::C64(v) => v.len(),
            ArrayData::C128(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-filled storage for a dtype.
    pub fn zeros(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::Bool => ArrayData::Bool(vec![false; len]),
            DType::Int8 => ArrayData::I8(vec![0; len]),
            DType::Int16 => ArrayData::I16(vec![0; len]),
            DType::Int32 => ArrayData::I32(vec![0; len]),
            DType::Int64 => ArrayData::I64(vec![0; len]),
            DType::UInt8 => ArrayData::U8(vec![0; len]),
            DType::UInt16 => ArrayData::U16(vec![0; len]),
            DType::UInt32 => ArrayData::U32(vec![0; len]),
            DType::UInt64 => ArrayData::U64(vec![0; len]),
            DType::Float16 => ArrayData::F16(vec![f16::ZERO; len]),
            DType::Float32 => ArrayData::F32(vec![0.0; len]),
            DType::Float64 => ArrayData::F64(vec![0.0; len]),
            DType::Complex64 => ArrayData::C64(vec![Complex::zero(); len]),
            DType::Complex128 => ArrayData::C128(vec![Complex::zero(); len]),
        }
    }

    /// Widen every element to `Complex<f64>`.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_complex_vec(&self) -> Vec<Complex<f64>> {
        fn widen<T: Copy>(v: &[T], f: impl Fn(T) -> f64) -> Vec<Complex<f64>> {
            v.iter().map(|&x| Complex::new(f(x), 0.0)).collect()
        }
        match self {
            ArrayData::Bool(v) => widen(v, |x| if x { 1.0 } else { 0.0 }),
            ArrayData::I8(v) => widen(v, f64::from),
            ArrayData::I16(v) => widen(v, f64::from),
            ArrayData::I32(v) => widen(v, f64::from),
            ArrayData::I64(v) => widen(v, |x| x as f64),
            ArrayData::U8(v) => widen(v, f64::from),
            ArrayData::U16(v) => widen(v, f64::from),
            ArrayData::U32(v) => widen(v, f64::from),
            ArrayData::U64(v) => widen(v, |x| x as f64),
            ArrayData::F16(v) => widen(v, f16::to_f64),
            ArrayData::F32(v) => widen(v, f64::from),
            ArrayData::F64(v) => widen(v, |x| x),
            ArrayData::C64(v) => v
                .iter()
                .map(|z| Complex::new(f64::from(z.re), f64::from(z.im)))
                .collect(),
            ArrayData::C128(v) => v.clone(),
        }
    }

    /// Narrow `Complex<f64>` values to the storage of `dtype`.
    ///
    /// Real dtypes keep the real part. Integer dtypes truncate toward zero and
    /// saturate at their bounds (negative values store as 0 in unsigned
    /// dtypes); `Bool` stores `re != 0`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_complex_as(values: &[Complex<f64>], dtype: DType) -> Self {
        fn narrow<T>(values: &[Complex<f64>], f: impl Fn(f64) -> T) -> Vec<T> {
            values.iter().map(|z| f(z.re)).collect()
        }
        match dtype {
            DType::Bool => ArrayData::Bool(narrow(values, |x| x != 0.0)),
            DType::Int8 => ArrayData::I8(narrow(values, |x| x as i8)),
            DType::Int16 => ArrayData::I16(narrow(values, |x| x as i16)),
            DType::Int32 => ArrayData::I32(narrow(values, |x| x as i32)),
            DType::Int64 => ArrayData::I64(narrow(values, |x| x as i64)),
            DType::UInt8 => ArrayData::U8(narrow(values, |x| x as u8)),
            DType::UInt16 => ArrayData::U16(narrow(values, |x| x as u16)),
            DType::UInt32 => ArrayData::U32(narrow(values, |x| x as u32)),
            DType::UInt64 => ArrayData::U64(narrow(values, |x| x as u64)),
            DType::Float16 => ArrayData::F16(narrow(values, f16::from_f64)),
            DType::Float32 => ArrayData::F32(narrow(values, |x| x as f32)),
            DType::Float64 => ArrayData::F64(narrow(values, |x| x)),
            DType::Complex64 => ArrayData::C64(
                values
                    .iter()
                    .map(|z| Complex::new(z.re as f32, z.im as f32))
                    .collect(),
            ),
            DType::Complex128 => ArrayData::C128(values.to_vec()),
        }
    }
}

/// N-dimensional array with type-segregated storage (row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    data: ArrayData,
    shape: Shape,
}

impl Array {
    /// Create an array, checking that `data` fills `shape` exactly.
    pub fn new(shape: impl Into<Shape>, data: ArrayData) -> Result<Self, EvalError> {
        let shape = shape.into();
        let expected = checked_size(&shape)?;
        if data.len() != expected {
            return Err(EvalError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    pub fn from_f64(shape: impl Into<Shape>, values: Vec<f64>) -> Result<Self, EvalError> {
        Self::new(shape, ArrayData::F64(values))
    }

    pub fn from_f32(shape: impl Into<Shape>, values: Vec<f32>) -> Result<Self, EvalError> {
        Self::new(shape, ArrayData::F32(values))
    }

    pub fn from_c128(shape: impl Into<Shape>, values: Vec<Complex<f64>>) -> Result<Self, EvalError> {
        Self::new(shape, ArrayData::C128(values))
    }

    pub fn from_i64(shape: impl Into<Shape>, values: Vec<i64>) -> Result<Self, EvalError> {
        Self::new(shape, ArrayData::I64(values))
    }

    /// Zero-filled array.
    pub fn zeros(shape: impl Into<Shape>, dtype: DType) -> Result<Self, EvalError> {
        let shape = shape.into();
        let data = ArrayData::zeros(dtype, checked_size(&shape)?);
        Ok(Self { data, shape })
    }

    /// Store `Complex<f64>` values as `dtype`.
    pub fn from_complex_as(
        shape: impl Into<Shape>,
        values: &[Complex<f64>],
        dtype: DType,
    ) -> Result<Self, EvalError> {
        Self::new(shape, ArrayData::from_complex_as(values, dtype))
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Same elements, new shape with the same element count.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Self, EvalError> {
        Self::new(shape, self.data.clone())
    }

    pub fn to_complex_vec(&self) -> Vec<Complex<f64>> {
        self.data.to_complex_vec()
    }
}

impl ShapeDtype for Array {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn dtype(&self) -> DType {
        self.data.dtype()
    }
}
