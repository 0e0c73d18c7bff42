//! Expression-graph models.
//!
//! A `Model` is a straight-line program over arrays: every node reads the
//! sample batch, a variable leaf, or the results of earlier nodes. Nodes are
//! only created through `ModelBuilder`, which hands out `NodeId`s in creation
//! order, so the node list is always topologically sorted.
//!
//! The same graph is evaluated by two interpreters:
//! - abstract: every value is an `AbstractArray`, nodes run transfer functions
//! - concrete: every value is an `Array`, nodes run kernels
//!
//! Both interpreters share `Model::evaluate`, so abstract and concrete
//! evaluation cannot disagree on graph traversal.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{kernels, tfuncs, Ansatz, ApplyAnsatz};
use crate::array::Array;
use crate::dtype::DType;
use crate::error::EvalError;
use crate::lattice::AbstractArray;
use crate::tree::Tree;

/// Elementwise unary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Exp,
    Tanh,
    /// `log(cosh(x))`
    LogCosh,
    Conj,
    Real,
    Imag,
    Abs,
    /// Multiply by the imaginary unit.
    MulI,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Exp => "exp",
            UnaryOp::Tanh => "tanh",
            UnaryOp::LogCosh => "log_cosh",
            UnaryOp::Conj => "conj",
            UnaryOp::Real => "real",
            UnaryOp::Imag => "imag",
            UnaryOp::Abs => "abs",
            UnaryOp::MulI => "mul_i",
        }
    }
}

/// Elementwise binary operations with broadcasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Mul,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Mul => "mul",
        }
    }
}

/// Index of a node inside its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One operation in a model graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// The sample batch.
    Samples,
    /// A leaf of the variables tree, by `/`-separated path.
    Param(String),
    Unary(UnaryOp, NodeId),
    Binary(BinaryOp, NodeId, NodeId),
    /// `input @ kernel`, contracting the last axis of `input` with a matrix.
    Dense { input: NodeId, kernel: NodeId },
    /// Sum over the last axis.
    SumLast(NodeId),
    /// Convert to another dtype.
    Cast(NodeId, DType),
}

/// Operations an interpreter provides for each node kind.
pub(crate) trait Interpreter {
    type Value;

    fn samples(&self) -> Result<Self::Value, EvalError>;
    fn param(&self, path: &str) -> Result<Self::Value, EvalError>;
    fn unary(&self, op: UnaryOp, x: &Self::Value) -> Result<Self::Value, EvalError>;
    fn binary(&self, op: BinaryOp, a: &Self::Value, b: &Self::Value)
        -> Result<Self::Value, EvalError>;
    fn dense(&self, x: &Self::Value, kernel: &Self::Value) -> Result<Self::Value, EvalError>;
    fn sum_last(&self, x: &Self::Value) -> Result<Self::Value, EvalError>;
    fn cast(&self, x: &Self::Value, dtype: DType) -> Result<Self::Value, EvalError>;
}

/// A straight-line model graph with a designated output node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    nodes: Vec<Node>,
    output: NodeId,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Paths of every variable leaf the model reads, in node order.
    pub fn param_paths(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Param(path) => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn evaluate<I: Interpreter>(&self, interp: &I) -> Result<I::Value, EvalError> {
        let mut values: Vec<I::Value> = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let value = match node {
                Node::Samples => interp.samples()?,
                Node::Param(path) => interp.param(path)?,
                Node::Unary(op, x) => interp.unary(*op, operand(&values, *x)?)?,
                Node::Binary(op, a, b) => {
                    interp.binary(*op, operand(&values, *a)?, operand(&values, *b)?)?
                }
                Node::Dense { input, kernel } => {
                    interp.dense(operand(&values, *input)?, operand(&values, *kernel)?)?
                }
                Node::SumLast(x) => interp.sum_last(operand(&values, *x)?)?,
                Node::Cast(x, dtype) => interp.cast(operand(&values, *x)?, *dtype)?,
            };
            values.push(value);
        }

        operand(&values, self.output)?;
        Ok(values.swap_remove(self.output.0))
    }
}

/// Value of an already evaluated node.
fn operand<V>(values: &[V], id: NodeId) -> Result<&V, EvalError> {
    values
        .get(id.0)
        .ok_or(EvalError::DanglingNode { index: id.0 })
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model {}:", self.name)?;
        for (i, node) in self.nodes.iter().enumerate() {
            let text = match node {
                Node::Samples => "samples".to_string(),
                Node::Param(path) => format!("param {}", path),
                Node::Unary(op, x) => format!("{} %{}", op.name(), x.0),
                Node::Binary(op, a, b) => format!("{} %{}, %{}", op.name(), a.0, b.0),
                Node::Dense { input, kernel } => format!("dense %{}, %{}", input.0, kernel.0),
                Node::SumLast(x) => format!("sum_last %{}", x.0),
                Node::Cast(x, dtype) => format!("cast %{} to {}", x.0, dtype),
            };
            writeln!(f, "  %{} = {}", i, text)?;
        }
        write!(f, "  return %{}", self.output.0)
    }
}

struct AbstractInterpreter<'a> {
    variables: &'a Tree<AbstractArray>,
    samples: &'a AbstractArray,
}

impl Interpreter for AbstractInterpreter<'_> {
    type Value = AbstractArray;

    fn samples(&self) -> Result<AbstractArray, EvalError> {
        Ok(self.samples.clone())
    }

    fn param(&self, path: &str) -> Result<AbstractArray, EvalError> {
        self.variables.get_leaf(path).cloned()
    }

    fn unary(&self, op: UnaryOp, x: &AbstractArray) -> Result<AbstractArray, EvalError> {
        tfuncs::tfunc_unary(op, x)
    }

    fn binary(
        &self,
        op: BinaryOp,
        a: &AbstractArray,
        b: &AbstractArray,
    ) -> Result<AbstractArray, EvalError> {
        tfuncs::tfunc_binary(op, a, b)
    }

    fn dense(&self, x: &AbstractArray, kernel: &AbstractArray) -> Result<AbstractArray, EvalError> {
        tfuncs::tfunc_dense(x, kernel)
    }

    fn sum_last(&self, x: &AbstractArray) -> Result<AbstractArray, EvalError> {
        tfuncs::tfunc_sum_last(x)
    }

    fn cast(&self, x: &AbstractArray, dtype: DType) -> Result<AbstractArray, EvalError> {
        Ok(tfuncs::tfunc_cast(x, dtype))
    }
}

struct ConcreteInterpreter<'a> {
    variables: &'a Tree<Array>,
    samples: &'a Array,
}

impl Interpreter for ConcreteInterpreter<'_> {
    type Value = Array;

    fn samples(&self) -> Result<Array, EvalError> {
        Ok(self.samples.clone())
    }

    fn param(&self, path: &str) -> Result<Array, EvalError> {
        self.variables.get_leaf(path).cloned()
    }

    fn unary(&self, op: UnaryOp, x: &Array) -> Result<Array, EvalError> {
        kernels::unary(op, x)
    }

    fn binary(&self, op: BinaryOp, a: &Array, b: &Array) -> Result<Array, EvalError> {
        kernels::binary(op, a, b)
    }

    fn dense(&self, x: &Array, kernel: &Array) -> Result<Array, EvalError> {
        kernels::dense(x, kernel)
    }

    fn sum_last(&self, x: &Array) -> Result<Array, EvalError> {
        kernels::sum_last(x)
    }

    fn cast(&self, x: &Array, dtype: DType) -> Result<Array, EvalError> {
        kernels::cast(x, dtype)
    }
}

impl Ansatz for Model {
    fn eval_shape(
        &self,
        variables: &Tree<AbstractArray>,
        samples: &AbstractArray,
    ) -> Result<AbstractArray, EvalError> {
        self.evaluate(&AbstractInterpreter { variables, samples })
    }
}

impl ApplyAnsatz for Model {
    fn apply(&self, variables: &Tree<Array>, samples: &Array) -> Result<Array, EvalError> {
        self.evaluate(&ConcreteInterpreter { variables, samples })
    }
}

/// Builds a `Model` node by node.
///
/// # Example
/// ```
/// use jacobian_mode::ansatz::ModelBuilder;
///
/// // log psi(x) = sum(x * w)
/// let mut b = ModelBuilder::new("linear");
/// let x = b.samples();
/// let w = b.param("params/w");
/// let xw = b.mul(x, w);
/// let out = b.sum_last(xw);
/// let model = b.build(out);
/// assert_eq!(model.param_paths(), vec!["params/w"]);
/// ```
#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    nodes: Vec<Node>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn samples(&mut self) -> NodeId {
        self.push(Node::Samples)
    }

    pub fn param(&mut self, path: impl Into<String>) -> NodeId {
        self.push(Node::Param(path.into()))
    }

    pub fn unary(&mut self, op: UnaryOp, x: NodeId) -> NodeId {
        self.push(Node::Unary(op, x))
    }

    pub fn binary(&mut self, op: BinaryOp, a: NodeId, b: NodeId) -> NodeId {
        self.push(Node::Binary(op, a, b))
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Add, a, b)
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.binary(BinaryOp::Mul, a, b)
    }

    pub fn dense(&mut self, input: NodeId, kernel: NodeId) -> NodeId {
        self.push(Node::Dense { input, kernel })
    }

    pub fn sum_last(&mut self, x: NodeId) -> NodeId {
        self.push(Node::SumLast(x))
    }

    pub fn cast(&mut self, x: NodeId, dtype: DType) -> NodeId {
        self.push(Node::Cast(x, dtype))
    }

    /// Finish the graph with `output` as the result node.
    pub fn build(self, output: NodeId) -> Model {
        Model {
            name: self.name,
            nodes: self.nodes,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_model() -> Model {
        let mut b = ModelBuilder::new("linear");
        let x = b.samples();
        let w = b.param("params/w");
        let xw = b.mul(x, w);
        let out = b.sum_last(xw);
        b.build(out)
    }

    #[test]
    fn test_eval_shape_linear() {
        let model = linear_model();
        let vars = Tree::dict([(
            "params",
            Tree::dict([("w", Tree::leaf(AbstractArray::new(vec![3], DType::Float32)))]),
        )]);
        let out = model
            .eval_shape(&vars, &AbstractArray::new(vec![8, 3], DType::Int8))
            .unwrap();
        assert_eq!(out, AbstractArray::new(vec![8], DType::Float32));
    }

    #[test]
    fn test_eval_shape_missing_param() {
        let model = linear_model();
        let err = model
            .eval_shape(&Tree::Empty, &AbstractArray::new(vec![8, 3], DType::Float64))
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::MissingVariable {
                path: "params/w".to_string()
            }
        );
    }

    #[test]
    fn test_apply_linear() {
        let model = linear_model();
        let vars = Tree::dict([(
            "params",
            Tree::dict([(
                "w",
                Tree::leaf(Array::from_f64(vec![3], vec![1.0, 2.0, 3.0]).unwrap()),
            )]),
        )]);
        let x = Array::from_f64(vec![2, 3], vec![1.0, 1.0, 1.0, 0.0, 1.0, 0.0]).unwrap();
        let out = model.apply(&vars, &x).unwrap();
        assert_eq!(out, Array::from_f64(vec![2], vec![6.0, 2.0]).unwrap());
    }

    #[test]
    fn test_display() {
        let text = linear_model().to_string();
        assert_eq!(
            text,
            "model linear:\n  %0 = samples\n  %1 = param params/w\n  %2 = mul %0, %1\n  %3 = sum_last %2\n  return %3"
        );
    }
}
