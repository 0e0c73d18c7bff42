use super::EvalError;
use crate::mode::JacobianMode;

/// Errors raised while choosing a Jacobian mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    /// `holomorphic = true` was asserted for an ansatz whose parameters are all real.
    #[error(
        "a function with real parameters cannot be holomorphic; remove `holomorphic = true`"
    )]
    RealParametersHolomorphic,

    /// An explicit mode and a holomorphic flag were both given.
    #[error("cannot specify both `mode` ({mode}) and `holomorphic`")]
    ConflictingOptions { mode: JacobianMode },

    /// Abstract evaluation of the ansatz failed.
    #[error("abstract evaluation failed: {0}")]
    Eval(#[from] EvalError),
}
