//! Default Jacobian mode selection.
//!
//! `jacobian_default_mode` decides which Jacobian algorithm suits an ansatz
//! from two facts:
//!
//! 1. whether the parameters are real, complex, or a mix of both, and
//! 2. whether the ansatz output is real or complex.
//!
//! The second fact is obtained by abstract evaluation: the ansatz only ever
//! sees shapes and dtypes, never parameter or sample values. Two calls whose
//! inputs agree in structure, shapes and dtypes therefore always agree in
//! their result.
//!
//! # Decision table
//!
//! | `holomorphic` | parameters | output  | mode                    |
//! |---------------|------------|---------|-------------------------|
//! | `Some(true)`  | complex    | any     | `Holomorphic`           |
//! | `Some(true)`  | real/empty | any     | error                   |
//! | `Some(true)`  | mixed      | any     | `Holomorphic` + warning |
//! | any other     | any        | real    | `Real`                  |
//! | `None`        | has complex| complex | `Complex` + warning     |
//! | any other     | any        | complex | `Complex`               |

use crate::ansatz::Ansatz;
use crate::diagnostics::{self, ModeWarning};
use crate::error::{EvalError, ModeError};
use crate::lattice::{flatten_batch, AbstractArray, ShapeDtype};
use crate::mode::JacobianMode;
use crate::tree::{has_complex_leaf, is_homogeneous, Tree};

/// Abstract sample batch as the ansatz sees it during mode selection:
/// every leading axis collapsed into one batch axis.
///
/// `[d0, ..., dk, n]` becomes `[d0 * ... * dk, n]` and `[n]` becomes `[1, n]`.
/// Scalars are rejected with `EvalError::ScalarSamples`.
pub fn flatten_samples<S: ShapeDtype>(samples: &S) -> Result<AbstractArray, EvalError> {
    flatten_batch(&samples.aval())
}

/// Choose the default Jacobian mode for `apply_fun` evaluated at `pars`.
///
/// `holomorphic` is the caller's assertion about the ansatz: `Some(true)`
/// asserts it is holomorphic, `Some(false)` that it is not, `None` leaves it
/// unspecified. Only shapes and dtypes of `pars`, `model_state` and `samples`
/// are used.
///
/// # Errors
///
/// - `ModeError::RealParametersHolomorphic` when `holomorphic == Some(true)`
///   and every parameter is real (or there are none)
/// - `ModeError::Eval` when abstract evaluation of the ansatz fails
///
/// # Example
/// ```
/// use jacobian_mode::ansatz::models;
/// use jacobian_mode::default_mode::jacobian_default_mode;
/// use jacobian_mode::dtype::DType;
/// use jacobian_mode::lattice::AbstractArray;
/// use jacobian_mode::mode::JacobianMode;
///
/// let params = models::init_rbm_avals(8, 1, DType::Float64);
/// let samples = AbstractArray::new(vec![4, 16, 8], DType::Float64);
///
/// let mode = jacobian_default_mode(&models::rbm(), &params, None, &samples, None).unwrap();
/// assert_eq!(mode, JacobianMode::Real);
/// ```
pub fn jacobian_default_mode<A, P, S>(
    apply_fun: &A,
    pars: &Tree<P>,
    model_state: Option<&Tree<P>>,
    samples: &S,
    holomorphic: Option<bool>,
) -> Result<JacobianMode, ModeError>
where
    A: Ansatz + ?Sized,
    P: ShapeDtype,
    S: ShapeDtype,
{
    let homogeneous = is_homogeneous(pars);
    let complex_leaf = has_complex_leaf(pars);

    if holomorphic == Some(true) {
        return match (homogeneous, complex_leaf) {
            (true, true) => Ok(JacobianMode::Holomorphic),
            (true, false) => Err(ModeError::RealParametersHolomorphic),
            (false, _) => {
                diagnostics::emit(
                    ModeWarning::NonHomogeneousHolomorphic,
                    JacobianMode::Holomorphic,
                );
                Ok(JacobianMode::Holomorphic)
            }
        };
    }

    let output = eval_output(apply_fun, pars, model_state, samples)?;
    if !output.is_complex() {
        return Ok(JacobianMode::Real);
    }

    if complex_leaf && holomorphic.is_none() {
        diagnostics::emit(ModeWarning::ComplexToComplexDefault, JacobianMode::Complex);
    }
    Ok(JacobianMode::Complex)
}

/// Abstract output of the ansatz on the flattened sample batch.
fn eval_output<A, P, S>(
    apply_fun: &A,
    pars: &Tree<P>,
    model_state: Option<&Tree<P>>,
    samples: &S,
) -> Result<AbstractArray, EvalError>
where
    A: Ansatz + ?Sized,
    P: ShapeDtype,
    S: ShapeDtype,
{
    let state = model_state.map(Tree::avals);
    let variables = Tree::variables(&pars.avals(), state.as_ref());
    let batch = flatten_samples(samples)?;
    apply_fun.eval_shape(&variables, &batch)
}

/// Resolve the Jacobian mode from optional explicit settings.
///
/// An explicit `mode` is returned unchanged, except that `Holomorphic` is
/// rejected for all-real parameters. Without an explicit mode the decision is
/// left to `jacobian_default_mode`.
///
/// # Errors
///
/// - `ModeError::ConflictingOptions` when both `mode` and `holomorphic` are set
/// - everything `jacobian_default_mode` returns
pub fn select_mode<A, P, S>(
    apply_fun: &A,
    pars: &Tree<P>,
    model_state: Option<&Tree<P>>,
    samples: &S,
    mode: Option<JacobianMode>,
    holomorphic: Option<bool>,
) -> Result<JacobianMode, ModeError>
where
    A: Ansatz + ?Sized,
    P: ShapeDtype,
    S: ShapeDtype,
{
    match (mode, holomorphic) {
        (Some(mode), Some(_)) => Err(ModeError::ConflictingOptions { mode }),
        (Some(JacobianMode::Holomorphic), None) if !has_complex_leaf(pars) => {
            Err(ModeError::RealParametersHolomorphic)
        }
        (Some(mode), None) => Ok(mode),
        (None, holomorphic) => {
            jacobian_default_mode(apply_fun, pars, model_state, samples, holomorphic)
        }
    }
}
