//! Default Jacobian mode selection for variational wavefunction ansatze.
//!
//! Given an ansatz, its parameters and a batch of samples, decide whether the
//! Jacobian of the log-amplitude should be computed as a real, complex, or
//! holomorphic Jacobian. The decision only inspects shapes and dtypes: the
//! ansatz is evaluated abstractly and never sees concrete values.
//!
//! # Module structure
//!
//! - `dtype`: element types and promotion
//! - `lattice`: abstract values (shape + dtype) and shape rules
//! - `array`: concrete arrays
//! - `tree`: parameter trees and their real/complex predicates
//! - `ansatz`: the `Ansatz` trait, expression-graph models, ready-made models
//! - `mode`: the `JacobianMode` tag
//! - `default_mode`: the decision (`jacobian_default_mode`, `select_mode`)
//! - `cache`, `selector`, `config`: memoized and configured selection
//! - `diagnostics`: advisory warnings
//! - `error`: error types

// Library code reports through `diagnostics`, never with eprintln!().
#![deny(clippy::print_stderr)]

pub mod ansatz;
pub mod array;
pub mod cache;
pub mod config;
pub mod default_mode;
pub mod diagnostics;
pub mod dtype;
pub mod error;
pub mod lattice;
pub mod mode;
pub mod selector;
pub mod tree;

pub use ansatz::{Ansatz, ApplyAnsatz, FnAnsatz, Model, ModelBuilder};
pub use array::{Array, ArrayData};
pub use cache::{CacheStats, ModeCache, ModeSignature};
pub use config::ModeConfig;
pub use default_mode::{flatten_samples, jacobian_default_mode, select_mode};
pub use diagnostics::{DiagnosticsCollector, ModeDiagnostic, ModeWarning};
pub use dtype::DType;
pub use error::{ConfigError, EvalError, ModeError};
pub use lattice::{AbstractArray, ShapeDtype};
pub use mode::{JacobianMode, ParseModeError};
pub use selector::ModeSelector;
pub use tree::Tree;
