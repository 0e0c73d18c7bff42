//! Error types.
//!
//! - `EvalError`: abstract or concrete evaluation of an ansatz failed
//! - `ModeError`: a Jacobian mode cannot be chosen
//! - `ConfigError`: a `ModeConfig` cannot be loaded
//!
//! Advisory conditions are not errors; see `diagnostics::ModeWarning`.

pub mod config;
pub mod eval;
pub mod mode;

pub use config::ConfigError;
pub use eval::EvalError;
pub use mode::ModeError;
