use crate::dtype::DType;
use crate::lattice::Shape;

/// Errors raised while evaluating an ansatz, abstractly or concretely.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A parameter path referenced by the ansatz is not in the variables tree.
    #[error("variable '{path}' not found in the variables tree")]
    MissingVariable { path: String },

    /// A tree path points at a container where an array leaf was expected.
    #[error("variable '{path}' is not an array leaf")]
    LeafKind { path: String },

    /// Operand shapes are incompatible for an operation.
    #[error("{op}: incompatible shapes {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// The element count of a shape does not fit in `usize`.
    #[error("shape {shape:?} has more elements than fit in usize")]
    ShapeOverflow { shape: Shape },

    /// The sample batch is a scalar and has no trailing feature dimension.
    #[error("samples must have at least one dimension")]
    ScalarSamples,

    /// A reduction or contraction was applied to a rank-0 value.
    #[error("{op}: cannot reduce a scalar")]
    ReduceScalar { op: &'static str },

    /// An operation does not accept operands of this dtype.
    #[error("{op}: unsupported dtype {dtype}")]
    UnsupportedDType { op: &'static str, dtype: DType },

    /// A model node refers to a node that was not evaluated before it.
    #[error("node %{index} is referenced before it is defined")]
    DanglingNode { index: usize },

    /// Array data does not match the element count of its shape.
    #[error("array data has {actual} elements but shape requires {expected}")]
    DataLength { expected: usize, actual: usize },
}
