//! Ready-made models and parameter initializers.
//!
//! Every model reads its parameters under `params/`. The `*_avals` helpers
//! build abstract parameter trees (shapes and dtypes only), which is all the
//! mode decision needs; the other helpers build concrete trees with small
//! deterministic values.

use nalgebra::Complex;

use super::graph::{Model, ModelBuilder, UnaryOp};
use crate::array::Array;
use crate::dtype::DType;
use crate::error::EvalError;
use crate::lattice::{checked_size, AbstractArray, Shape};
use crate::tree::Tree;

/// Restricted Boltzmann machine.
///
/// ```text
/// log psi(x) = sum_j log_cosh(x @ kernel + hidden_bias)_j + sum_i x_i * visible_bias_i
/// ```
pub fn rbm() -> Model {
    let mut b = ModelBuilder::new("rbm");
    let x = b.samples();
    let kernel = b.param("params/kernel");
    let hidden_bias = b.param("params/hidden_bias");
    let visible_bias = b.param("params/visible_bias");

    let theta = b.dense(x, kernel);
    let theta = b.add(theta, hidden_bias);
    let activations = b.unary(UnaryOp::LogCosh, theta);
    let hidden = b.sum_last(activations);

    let weighted = b.mul(x, visible_bias);
    let visible = b.sum_last(weighted);

    let out = b.add(hidden, visible);
    b.build(out)
}

/// Two-body Jastrow factor.
///
/// ```text
/// log psi(x) = sum_i x_i * (x @ kernel)_i
/// ```
pub fn jastrow() -> Model {
    let mut b = ModelBuilder::new("jastrow");
    let x = b.samples();
    let kernel = b.param("params/kernel");
    let xk = b.dense(x, kernel);
    let pairs = b.mul(x, xk);
    let out = b.sum_last(pairs);
    b.build(out)
}

/// Two real RBM-like networks for the modulus and the phase.
///
/// ```text
/// log psi(x) = A(x) + i * Phi(x)
/// A(x)   = sum_j log_cosh(x @ amplitude/kernel + amplitude/bias)_j
/// Phi(x) = sum_j log_cosh(x @ phase/kernel + phase/bias)_j
/// ```
///
/// With real parameters the output is complex while the ansatz is a
/// real-to-complex function.
pub fn log_amplitude_phase() -> Model {
    let mut b = ModelBuilder::new("log_amplitude_phase");
    let x = b.samples();

    let branch = |b: &mut ModelBuilder, prefix: &str| {
        let kernel = b.param(format!("params/{prefix}/kernel"));
        let bias = b.param(format!("params/{prefix}/bias"));
        let theta = b.dense(x, kernel);
        let theta = b.add(theta, bias);
        let activations = b.unary(UnaryOp::LogCosh, theta);
        b.sum_last(activations)
    };
    let amplitude = branch(&mut b, "amplitude");
    let phase = branch(&mut b, "phase");

    let phase = b.unary(UnaryOp::MulI, phase);
    let out = b.add(amplitude, phase);
    b.build(out)
}

fn rbm_shapes(n_visible: usize, alpha: usize) -> Vec<(&'static str, Shape)> {
    let n_hidden = alpha * n_visible;
    vec![
        ("visible_bias", vec![n_visible]),
        ("hidden_bias", vec![n_hidden]),
        ("kernel", vec![n_visible, n_hidden]),
    ]
}

fn jastrow_shapes(n_visible: usize) -> Vec<(&'static str, Shape)> {
    vec![("kernel", vec![n_visible, n_visible])]
}

fn log_amplitude_phase_shapes(n_visible: usize, alpha: usize) -> Vec<(&'static str, Shape)> {
    let n_hidden = alpha * n_visible;
    vec![
        ("amplitude/kernel", vec![n_visible, n_hidden]),
        ("amplitude/bias", vec![n_hidden]),
        ("phase/kernel", vec![n_visible, n_hidden]),
        ("phase/bias", vec![n_hidden]),
    ]
}

fn abstract_params(shapes: Vec<(&'static str, Shape)>, dtype: DType) -> Tree<AbstractArray> {
    let mut tree = Tree::Dict(Default::default());
    for (path, shape) in shapes {
        tree.insert(path, Tree::leaf(AbstractArray::new(shape, dtype)));
    }
    tree
}

fn concrete_params(
    shapes: Vec<(&'static str, Shape)>,
    dtype: DType,
) -> Result<Tree<Array>, EvalError> {
    let mut tree = Tree::Dict(Default::default());
    for (seed, (path, shape)) in shapes.into_iter().enumerate() {
        tree.insert(path, Tree::leaf(deterministic_array(shape, dtype, seed)?));
    }
    Ok(tree)
}

/// Small values in `[-0.08, 0.08]`, different per leaf.
fn deterministic_array(shape: Shape, dtype: DType, seed: usize) -> Result<Array, EvalError> {
    let len = checked_size(&shape)?;
    let values: Vec<Complex<f64>> = (0..len)
        .map(|k| {
            let re = ((k * 7 + seed * 13) % 17) as f64 * 0.01 - 0.08;
            let im = ((k * 5 + seed * 3) % 17) as f64 * 0.01 - 0.08;
            Complex::new(re, im)
        })
        .collect();
    Array::from_complex_as(shape, &values, dtype)
}

/// Abstract parameters for `rbm()` with `alpha * n_visible` hidden units.
pub fn init_rbm_avals(n_visible: usize, alpha: usize, dtype: DType) -> Tree<AbstractArray> {
    abstract_params(rbm_shapes(n_visible, alpha), dtype)
}

pub fn init_rbm(n_visible: usize, alpha: usize, dtype: DType) -> Result<Tree<Array>, EvalError> {
    concrete_params(rbm_shapes(n_visible, alpha), dtype)
}

/// Abstract parameters for `jastrow()`.
pub fn init_jastrow_avals(n_visible: usize, dtype: DType) -> Tree<AbstractArray> {
    abstract_params(jastrow_shapes(n_visible), dtype)
}

pub fn init_jastrow(n_visible: usize, dtype: DType) -> Result<Tree<Array>, EvalError> {
    concrete_params(jastrow_shapes(n_visible), dtype)
}

/// Abstract parameters for `log_amplitude_phase()`.
pub fn init_log_amplitude_phase_avals(
    n_visible: usize,
    alpha: usize,
    dtype: DType,
) -> Tree<AbstractArray> {
    abstract_params(log_amplitude_phase_shapes(n_visible, alpha), dtype)
}

pub fn init_log_amplitude_phase(
    n_visible: usize,
    alpha: usize,
    dtype: DType,
) -> Result<Tree<Array>, EvalError> {
    concrete_params(log_amplitude_phase_shapes(n_visible, alpha), dtype)
}
