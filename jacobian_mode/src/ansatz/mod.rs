//! Wavefunction ansatze and their evaluation.
//!
//! An ansatz maps a variables tree (parameters plus model state) and a batch
//! of samples to one output per sample. The mode decision only ever needs the
//! output *dtype*, so the core trait is `Ansatz::eval_shape`, which evaluates
//! on shapes and dtypes alone. `ApplyAnsatz` adds concrete evaluation.
//!
//! # Module structure
//!
//! - `graph`: expression-graph models (`Model`, `ModelBuilder`) evaluated by
//!   either interpreter below
//! - `tfuncs`: transfer functions used by abstract evaluation
//! - `kernels`: concrete kernels used by `ApplyAnsatz::apply`
//! - `models`: ready-made models (RBM, Jastrow, amplitude/phase network)
//!
//! # Usage
//!
//! ```
//! use jacobian_mode::ansatz::{models, Ansatz};
//! use jacobian_mode::dtype::DType;
//! use jacobian_mode::lattice::AbstractArray;
//! use jacobian_mode::tree::Tree;
//!
//! let model = models::rbm();
//! let params = models::init_rbm_avals(10, 2, DType::Complex128);
//! let variables = Tree::variables(&params, None);
//! let samples = AbstractArray::new(vec![16, 10], DType::Float64);
//!
//! let out = model.eval_shape(&variables, &samples).unwrap();
//! assert_eq!(out, AbstractArray::new(vec![16], DType::Complex128));
//! ```

pub mod graph;
pub mod kernels;
pub mod models;
pub mod tfuncs;

pub use graph::{BinaryOp, Model, ModelBuilder, Node, NodeId, UnaryOp};

use std::fmt;

use crate::array::Array;
use crate::error::EvalError;
use crate::lattice::AbstractArray;
use crate::tree::Tree;

/// An ansatz that can be evaluated on shapes and dtypes only.
pub trait Ansatz {
    /// Infer the output shape and dtype without touching any data.
    fn eval_shape(
        &self,
        variables: &Tree<AbstractArray>,
        samples: &AbstractArray,
    ) -> Result<AbstractArray, EvalError>;
}

/// An ansatz that can also be evaluated on concrete arrays.
pub trait ApplyAnsatz: Ansatz {
    fn apply(&self, variables: &Tree<Array>, samples: &Array) -> Result<Array, EvalError>;
}

impl<A: Ansatz + ?Sized> Ansatz for &A {
    fn eval_shape(
        &self,
        variables: &Tree<AbstractArray>,
        samples: &AbstractArray,
    ) -> Result<AbstractArray, EvalError> {
        (**self).eval_shape(variables, samples)
    }
}

impl<A: Ansatz + ?Sized> Ansatz for Box<A> {
    fn eval_shape(
        &self,
        variables: &Tree<AbstractArray>,
        samples: &AbstractArray,
    ) -> Result<AbstractArray, EvalError> {
        (**self).eval_shape(variables, samples)
    }
}

/// Adapter turning a closure over abstract values into an `Ansatz`.
///
/// Useful when an ansatz is implemented outside this crate and only its
/// output signature rule is known.
pub struct FnAnsatz<F> {
    name: String,
    f: F,
}

impl<F> FnAnsatz<F>
where
    F: Fn(&Tree<AbstractArray>, &AbstractArray) -> Result<AbstractArray, EvalError>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F> Ansatz for FnAnsatz<F>
where
    F: Fn(&Tree<AbstractArray>, &AbstractArray) -> Result<AbstractArray, EvalError>,
{
    fn eval_shape(
        &self,
        variables: &Tree<AbstractArray>,
        samples: &AbstractArray,
    ) -> Result<AbstractArray, EvalError> {
        (self.f)(variables, samples)
    }
}

impl<F> fmt::Debug for FnAnsatz<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnsatz").field("name", &self.name).finish()
    }
}
