//! Element types for arrays and abstract values.
//!
//! `DType` tags the element type of a parameter leaf, a sample batch or an
//! ansatz output. The only distinction the mode decision cares about is the
//! real/complex class, but transfer functions need the full promotion lattice
//! to predict output dtypes without running the ansatz.
//!
//! # Promotion
//!
//! Promotion follows numpy-style rules:
//! - `Bool` promotes to any other type.
//! - Integers of the same signedness promote to the wider one; mixed
//!   signedness promotes to a signed type wide enough for both, and
//!   `UInt64` mixed with any signed integer promotes to `Float64`.
//! - Integer with float promotes to a float wide enough for the integer.
//! - Anything with a complex type promotes to a complex type whose real
//!   part is the promotion of both real parts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric class of a dtype, ordered from narrowest to widest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DTypeClass {
    Bool,
    Integer,
    Float,
    Complex,
}

/// Element type of an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    // Signed integers
    Int8,
    Int16,
    Int32,
    Int64,
    // Unsigned integers
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    // Floating point
    Float16,
    Float32,
    Float64,
    // Complex: Complex64 stores two f32, Complex128 stores two f64
    Complex64,
    Complex128,
}

impl DType {
    /// Every dtype, in declaration order.
    pub const ALL: [DType; 14] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float16,
        DType::Float32,
        DType::Float64,
        DType::Complex64,
        DType::Complex128,
    ];

    /// The numpy-style name of this dtype (`"float64"`, `"complex128"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        }
    }

    pub fn class(self) -> DTypeClass {
        match self {
            DType::Bool => DTypeClass::Bool,
            DType::Int8
            | DType::Int16
            | DType::Int32
            | DType::Int64
            | DType::UInt8
            | DType::UInt16
            | DType::UInt32
            | DType::UInt64 => DTypeClass::Integer,
            DType::Float16 | DType::Float32 | DType::Float64 => DTypeClass::Float,
            DType::Complex64 | DType::Complex128 => DTypeClass::Complex,
        }
    }

    /// Returns true for `Complex64` and `Complex128`.
    pub fn is_complex(self) -> bool {
        self.class() == DTypeClass::Complex
    }

    /// Returns true for every non-complex dtype, including integers and `Bool`.
    pub fn is_real(self) -> bool {
        !self.is_complex()
    }

    pub fn is_float(self) -> bool {
        self.class() == DTypeClass::Float
    }

    pub fn is_integer(self) -> bool {
        self.class() == DTypeClass::Integer
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(self, DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64)
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64
        )
    }

    /// Size of one element in bits.
    pub fn bits(self) -> u32 {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 8,
            DType::Int16 | DType::UInt16 | DType::Float16 => 16,
            DType::Int32 | DType::UInt32 | DType::Float32 => 32,
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Complex64 => 64,
            DType::Complex128 => 128,
        }
    }

    /// The real counterpart of a dtype.
    ///
    /// `Complex64 → Float32`, `Complex128 → Float64`; real dtypes map to themselves.
    pub fn to_real(self) -> DType {
        match self {
            DType::Complex64 => DType::Float32,
            DType::Complex128 => DType::Float64,
            other => other,
        }
    }

    /// The complex counterpart of a dtype.
    ///
    /// Floats of at most 32 bits map to `Complex64`, everything else
    /// (including integers and `Bool`) maps to `Complex128`.
    pub fn to_complex(self) -> DType {
        match self {
            DType::Float16 | DType::Float32 | DType::Complex64 => DType::Complex64,
            _ => DType::Complex128,
        }
    }

    /// The result dtype of transcendental functions (`exp`, `tanh`, ...).
    ///
    /// Floats and complex dtypes are preserved, integers and `Bool` become `Float64`.
    pub fn to_inexact(self) -> DType {
        match self.class() {
            DTypeClass::Float | DTypeClass::Complex => self,
            DTypeClass::Bool | DTypeClass::Integer => DType::Float64,
        }
    }

    /// Promote two dtypes to their common type.
    pub fn promote(self, other: DType) -> DType {
        if self == other {
            return self;
        }

        match (self.class(), other.class()) {
            (DTypeClass::Bool, _) => other,
            (_, DTypeClass::Bool) => self,
            (DTypeClass::Complex, _) | (_, DTypeClass::Complex) => {
                let real = self.to_real().promote(other.to_real());
                real.to_inexact().to_complex()
            }
            (DTypeClass::Integer, DTypeClass::Integer) => promote_integers(self, other),
            (DTypeClass::Float, DTypeClass::Float) => wider(self, other),
            (DTypeClass::Integer, DTypeClass::Float) => wider(other, float_for_integer(self)),
            (DTypeClass::Float, DTypeClass::Integer) => wider(self, float_for_integer(other)),
        }
    }

    /// Promote an iterator of dtypes; `None` when the iterator is empty.
    pub fn promote_all(dtypes: impl IntoIterator<Item = DType>) -> Option<DType> {
        dtypes.into_iter().reduce(DType::promote)
    }
}

fn wider(a: DType, b: DType) -> DType {
    if b.bits() > a.bits() {
        b
    } else {
        a
    }
}

fn signed_with_bits(bits: u32) -> DType {
    match bits {
        0..=8 => DType::Int8,
        9..=16 => DType::Int16,
        17..=32 => DType::Int32,
        _ => DType::Int64,
    }
}

fn promote_integers(a: DType, b: DType) -> DType {
    if a.is_signed_integer() == b.is_signed_integer() {
        return wider(a, b);
    }

    let (signed, unsigned) = if a.is_signed_integer() { (a, b) } else { (b, a) };
    if unsigned.bits() < signed.bits() {
        signed
    } else if unsigned == DType::UInt64 {
        DType::Float64
    } else {
        signed_with_bits(unsigned.bits() * 2)
    }
}

/// Smallest float that represents every value of an integer dtype closely enough.
fn float_for_integer(int: DType) -> DType {
    match int.bits() {
        8 => DType::Float16,
        16 => DType::Float32,
        _ => DType::Float64,
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown dtype name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dtype '{0}'")]
pub struct ParseDTypeError(pub String);

impl FromStr for DType {
    type Err = ParseDTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.name() == s)
            .ok_or_else(|| ParseDTypeError(s.to_string()))
    }
}
