//! Integration tests: default Jacobian mode selection

mod common;
use common::*;

use jacobian_mode::ansatz::models;
use jacobian_mode::*;
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};

fn batch(n_sites: usize) -> AbstractArray {
    AbstractArray::new(vec![4, 32, n_sites], DType::Float64)
}

// ==================== Decision Table ====================

#[test]
fn test_real_params_real_output_is_real() {
    for dtype in [DType::Float32, DType::Float64] {
        let params = models::init_rbm_avals(8, 2, dtype);
        let (mode, warnings) = decide(&models::rbm(), &params, &batch(8), None);
        assert_eq!(mode, Ok(JacobianMode::Real), "params {dtype}");
        assert!(warnings.is_empty());
    }
}

#[test]
fn test_real_params_holomorphic_fails() {
    let params = models::init_jastrow_avals(8, DType::Float64);
    let (mode, warnings) = decide(&models::jastrow(), &params, &batch(8), Some(true));
    assert_eq!(mode, Err(ModeError::RealParametersHolomorphic));
    assert!(warnings.is_empty());
    assert!(ModeError::RealParametersHolomorphic
        .to_string()
        .contains("cannot be holomorphic"));
}

#[test]
fn test_complex_params_holomorphic_no_warning() {
    for dtype in [DType::Complex64, DType::Complex128] {
        let params = models::init_rbm_avals(8, 1, dtype);
        let (mode, warnings) = decide(&models::rbm(), &params, &batch(8), Some(true));
        assert_eq!(mode, Ok(JacobianMode::Holomorphic));
        assert!(warnings.is_empty(), "{warnings:?}");
    }
}

#[test]
fn test_complex_params_unspecified_warns_once() {
    let params = models::init_rbm_avals(8, 1, DType::Complex128);
    let (mode, warnings) = decide(&models::rbm(), &params, &batch(8), None);
    assert_eq!(mode, Ok(JacobianMode::Complex));
    assert_eq!(warnings, vec![ModeWarning::ComplexToComplexDefault]);
}

#[test]
fn test_mixed_params_holomorphic_warns_once() {
    let params = mixed_rbm_params(8);
    let (mode, warnings) = decide(&models::rbm(), &params, &batch(8), Some(true));
    assert_eq!(mode, Ok(JacobianMode::Holomorphic));
    assert_eq!(warnings, vec![ModeWarning::NonHomogeneousHolomorphic]);
}

#[test]
fn test_complex_params_not_holomorphic_is_silent() {
    let params = models::init_rbm_avals(8, 1, DType::Complex128);
    let (mode, warnings) = decide(&models::rbm(), &params, &batch(8), Some(false));
    assert_eq!(mode, Ok(JacobianMode::Complex));
    assert!(warnings.is_empty());
}

#[test]
fn test_real_params_complex_output_is_silent() {
    let params = models::init_log_amplitude_phase_avals(8, 1, DType::Float32);
    for holomorphic in [None, Some(false)] {
        let (mode, warnings) =
            decide(&models::log_amplitude_phase(), &params, &batch(8), holomorphic);
        assert_eq!(mode, Ok(JacobianMode::Complex));
        assert!(warnings.is_empty());
    }
}

#[test]
fn test_real_params_holomorphic_fails_even_with_complex_output() {
    let params = models::init_log_amplitude_phase_avals(8, 1, DType::Float64);
    let (mode, _) = decide(&models::log_amplitude_phase(), &params, &batch(8), Some(true));
    assert_eq!(mode, Err(ModeError::RealParametersHolomorphic));
}

// ==================== Mode Tag ====================

#[test]
fn test_mode_equality_and_hashing() {
    let a: JacobianMode = "holomorphic".parse().unwrap();
    let b = JacobianMode::Holomorphic;
    assert_eq!(a, b);
    assert!(a == "holomorphic");
    assert!("holomorphic" == b);
    assert!(b != "complex");

    let set: HashSet<JacobianMode> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);

    let counts: HashMap<JacobianMode, usize> =
        JacobianMode::ALL.iter().map(|&mode| (mode, mode.name().len())).collect();
    assert_eq!(counts.get("real"), Some(&4));
    assert_eq!(counts.get("holomorphic"), Some(&11));
    assert_eq!(JacobianMode::Complex.to_string(), "complex");
}

// ==================== Determinism ====================

#[test]
fn test_decision_ignores_concrete_values() {
    let model = models::rbm();
    let samples = spin_samples(16, 6);

    let first = models::init_rbm(6, 1, DType::Complex128).unwrap();
    let second = first.map(&mut |leaf: &Array| {
        let doubled: Vec<_> = leaf.to_complex_vec().into_iter().map(|z| z * 2.0).collect();
        Array::from_complex_as(leaf.shape().to_vec(), &doubled, leaf.dtype()).unwrap()
    });
    assert_ne!(first, second);

    let (a, _) = with_warnings(|| jacobian_default_mode(&model, &first, None, &samples, None));
    let (b, _) = with_warnings(|| jacobian_default_mode(&model, &second, None, &samples, None));
    assert_eq!(a, Ok(JacobianMode::Complex));
    assert_eq!(a, b);
}

#[test]
fn test_concrete_and_abstract_inputs_agree() {
    let model = models::jastrow();
    let params = models::init_jastrow(6, DType::Float64).unwrap();
    let samples = spin_samples(16, 6);

    let concrete = jacobian_default_mode(&model, &params, None, &samples, None);
    let abstract_ = jacobian_default_mode(&model, &params.avals(), None, &samples.aval(), None);
    assert_eq!(concrete, Ok(JacobianMode::Real));
    assert_eq!(concrete, abstract_);
}

#[test]
fn test_model_output_matches_its_abstract_evaluation() {
    let model = models::rbm();
    let params = models::init_rbm(6, 2, DType::Complex64).unwrap();
    let samples = spin_samples(5, 6);
    let variables = Tree::variables(&params, None);

    let out = model.apply(&variables, &samples).unwrap();
    let predicted = model.eval_shape(&variables.avals(), &samples.aval()).unwrap();
    assert_eq!(out.aval(), predicted);
    assert_eq!(predicted, AbstractArray::new(vec![5], DType::Complex128));
}

// ==================== Model State ====================

#[test]
fn test_model_state_reaches_the_ansatz() {
    let mut b = ModelBuilder::new("shifted_jastrow");
    let x = b.samples();
    let shift = b.param("batch_stats/shift");
    let shifted = b.add(x, shift);
    let kernel = b.param("params/kernel");
    let xk = b.dense(shifted, kernel);
    let out = b.sum_last(xk);
    let model = b.build(out);

    let params = models::init_jastrow_avals(6, DType::Float64);
    let state = Tree::dict([(
        "batch_stats",
        Tree::dict([("shift", Tree::leaf(AbstractArray::new(vec![6], DType::Complex64)))]),
    )]);

    let (mode, warnings) =
        with_warnings(|| jacobian_default_mode(&model, &params, Some(&state), &batch(6), None));
    assert_eq!(mode, Ok(JacobianMode::Complex));
    assert!(warnings.is_empty());

    let (missing, _) = decide(&model, &params, &batch(6), None);
    assert_eq!(
        missing,
        Err(ModeError::Eval(EvalError::MissingVariable {
            path: "batch_stats/shift".to_string()
        }))
    );
}

// ==================== Cache and Selector ====================

#[test]
fn test_selector_warns_only_on_first_decision() {
    let mut selector = ModeSelector::new(ModeConfig::default());
    let model = models::rbm();
    let params = models::init_rbm_avals(8, 1, DType::Complex64);

    let (modes, warnings) = with_warnings(|| {
        (0..3)
            .map(|_| selector.select(&model, &params, None, &batch(8)))
            .collect::<Vec<_>>()
    });
    assert_eq!(modes, vec![Ok(JacobianMode::Complex); 3]);
    assert_eq!(warnings, vec![ModeWarning::ComplexToComplexDefault]);
    assert_eq!(selector.cache_stats(), CacheStats { hits: 2, misses: 1 });
}
