//! Shared helpers for integration tests
// Each integration test target uses a different subset of these helpers.
#![allow(dead_code)]

use jacobian_mode::ansatz::models;
use jacobian_mode::*;

/// Run `f` with the diagnostics collector enabled and return its result
/// together with every warning it emitted.
pub fn with_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<ModeWarning>) {
    DiagnosticsCollector::enable();
    DiagnosticsCollector::clear();
    let out = f();
    let warnings = DiagnosticsCollector::take()
        .into_iter()
        .map(|diag| diag.warning)
        .collect();
    DiagnosticsCollector::disable();
    (out, warnings)
}

/// Spin configurations in `{-1, +1}` with a batch of `n_samples`.
pub fn spin_samples(n_samples: usize, n_sites: usize) -> Array {
    let values = (0..n_samples * n_sites)
        .map(|k| if (k * 7 + k / n_sites) % 3 == 0 { -1.0 } else { 1.0 })
        .collect();
    Array::from_f64(vec![n_samples, n_sites], values).expect("sample shape")
}

/// RBM parameters whose visible bias is real while the rest is complex.
pub fn mixed_rbm_params(n_sites: usize) -> Tree<AbstractArray> {
    let mut params = models::init_rbm_avals(n_sites, 1, DType::Complex128);
    params.insert(
        "visible_bias",
        Tree::leaf(AbstractArray::new(vec![n_sites], DType::Float64)),
    );
    params
}

/// Decide with default (automatic) settings and collect warnings.
pub fn decide<A: Ansatz + ?Sized>(
    ansatz: &A,
    params: &Tree<AbstractArray>,
    samples: &AbstractArray,
    holomorphic: Option<bool>,
) -> (Result<JacobianMode, ModeError>, Vec<ModeWarning>) {
    with_warnings(|| jacobian_default_mode(ansatz, params, None, samples, holomorphic))
}
