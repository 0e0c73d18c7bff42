//! Advisory warnings emitted while choosing a Jacobian mode.
//!
//! Some ansatz configurations are ambiguous but not wrong: the decision picks
//! a conservative default and reports why. Those reports are `ModeDiagnostic`
//! values carrying a `ModeWarning`.
//!
//! # Delivery
//!
//! - When the `DiagnosticsCollector` is enabled on the current thread, warnings
//!   are recorded there and nothing is printed. Tests and embedding code use
//!   this to inspect exactly which warnings a decision produced.
//! - Otherwise each warning is written as one line to stderr, unless the
//!   `JACOBIAN_MODE_QUIET` environment variable is set.

use std::cell::RefCell;
use std::env;
use std::fmt;
use std::io::{self, Write};

use crate::mode::JacobianMode;

/// Environment variable that silences stderr warnings.
pub const QUIET_ENV_VAR: &str = "JACOBIAN_MODE_QUIET";

/// Why a decision fell back to a default with a warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeWarning {
    /// `holomorphic = true` was asserted for parameters mixing real and
    /// complex leaves. The holomorphic mode is used anyway; the complex mode
    /// would be more accurate but slower.
    NonHomogeneousHolomorphic,

    /// Complex parameters produce a complex output and holomorphicity was not
    /// specified. The complex mode is used; asserting holomorphicity would
    /// allow the faster holomorphic mode.
    ComplexToComplexDefault,
}

impl ModeWarning {
    /// Short hint on how to act on (or silence) this warning.
    pub fn hint(&self) -> &'static str {
        match self {
            ModeWarning::NonHomogeneousHolomorphic => {
                "use `holomorphic = false` or mode `complex` for more accurate results at lower performance"
            }
            ModeWarning::ComplexToComplexDefault => {
                "specify `holomorphic = true` if the ansatz is holomorphic to use a faster implementation; specify `holomorphic` to silence this warning"
            }
        }
    }
}

impl fmt::Display for ModeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeWarning::NonHomogeneousHolomorphic => write!(
                f,
                "the ansatz mixes real and complex parameters, which might not behave well with the holomorphic implementation"
            ),
            ModeWarning::ComplexToComplexDefault => write!(
                f,
                "complex-to-complex ansatz detected, defaulting to `holomorphic = false` for its jacobian"
            ),
        }
    }
}

/// A single advisory warning together with the mode that was chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeDiagnostic {
    pub warning: ModeWarning,
    /// The mode returned despite the warning.
    pub chosen: JacobianMode,
}

impl ModeDiagnostic {
    pub fn new(warning: ModeWarning, chosen: JacobianMode) -> Self {
        Self { warning, chosen }
    }
}

impl fmt::Display for ModeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "jacobian mode warning: {} -> {} (hint: {})",
            self.warning,
            self.chosen,
            self.warning.hint()
        )
    }
}

// Thread-local storage for diagnostics collector state
thread_local! {
    static DIAGNOSTICS_ENABLED: RefCell<bool> = const { RefCell::new(false) };
    static DIAGNOSTICS: RefCell<Vec<ModeDiagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Collector for mode warnings.
///
/// Uses thread-local storage. Disabled by default, in which case warnings go
/// to stderr instead.
#[derive(Debug)]
pub struct DiagnosticsCollector;

impl DiagnosticsCollector {
    /// Enable diagnostics collection.
    pub fn enable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = true;
        });
    }

    /// Disable diagnostics collection.
    pub fn disable() {
        DIAGNOSTICS_ENABLED.with(|enabled| {
            *enabled.borrow_mut() = false;
        });
    }

    pub fn is_enabled() -> bool {
        DIAGNOSTICS_ENABLED.with(|enabled| *enabled.borrow())
    }

    /// Record a diagnostic; no-op when disabled.
    pub fn record(diagnostic: ModeDiagnostic) {
        if Self::is_enabled() {
            DIAGNOSTICS.with(|diags| {
                diags.borrow_mut().push(diagnostic);
            });
        }
    }

    /// Take all collected diagnostics, clearing the collection.
    pub fn take() -> Vec<ModeDiagnostic> {
        DIAGNOSTICS.with(|diags| std::mem::take(&mut *diags.borrow_mut()))
    }

    pub fn clear() {
        DIAGNOSTICS.with(|diags| {
            diags.borrow_mut().clear();
        });
    }

    pub fn count() -> usize {
        DIAGNOSTICS.with(|diags| diags.borrow().len())
    }
}

/// Whether stderr warnings are silenced, reading variables through `lookup`.
pub fn is_quiet_with(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup(QUIET_ENV_VAR).is_some()
}

fn is_quiet() -> bool {
    is_quiet_with(|name| env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
}

/// Report an advisory warning.
pub fn emit(warning: ModeWarning, chosen: JacobianMode) {
    emit_to(&mut io::stderr(), warning, chosen, is_quiet());
}

/// Deliver a warning to the collector when enabled, otherwise to `out`
/// unless `quiet`.
fn emit_to(out: &mut impl Write, warning: ModeWarning, chosen: JacobianMode, quiet: bool) {
    let diagnostic = ModeDiagnostic::new(warning, chosen);
    if DiagnosticsCollector::is_enabled() {
        DiagnosticsCollector::record(diagnostic);
    } else if !quiet {
        let _ = writeln!(out, "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_disabled_is_noop() {
        DiagnosticsCollector::disable();
        DiagnosticsCollector::clear();

        DiagnosticsCollector::record(ModeDiagnostic::new(
            ModeWarning::ComplexToComplexDefault,
            JacobianMode::Complex,
        ));
        assert_eq!(DiagnosticsCollector::count(), 0);
    }

    #[test]
    fn test_emit_collects_when_enabled() {
        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();

        emit(
            ModeWarning::NonHomogeneousHolomorphic,
            JacobianMode::Holomorphic,
        );
        emit(ModeWarning::ComplexToComplexDefault, JacobianMode::Complex);
        assert_eq!(DiagnosticsCollector::count(), 2);

        let diags = DiagnosticsCollector::take();
        assert_eq!(DiagnosticsCollector::count(), 0);
        assert_eq!(diags[0].warning, ModeWarning::NonHomogeneousHolomorphic);
        assert_eq!(diags[0].chosen, JacobianMode::Holomorphic);
        assert_eq!(diags[1].warning, ModeWarning::ComplexToComplexDefault);

        DiagnosticsCollector::disable();
    }

    #[test]
    fn test_emit_writes_line_when_disabled() {
        DiagnosticsCollector::disable();
        DiagnosticsCollector::clear();

        let mut out = Vec::new();
        emit_to(
            &mut out,
            ModeWarning::ComplexToComplexDefault,
            JacobianMode::Complex,
            false,
        );
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("jacobian mode warning: complex-to-complex"));
        assert!(text.ends_with('\n'));
        assert_eq!(DiagnosticsCollector::count(), 0);
    }

    #[test]
    fn test_emit_quiet_writes_nothing() {
        DiagnosticsCollector::disable();
        DiagnosticsCollector::clear();

        let mut out = Vec::new();
        emit_to(
            &mut out,
            ModeWarning::NonHomogeneousHolomorphic,
            JacobianMode::Holomorphic,
            true,
        );
        assert!(out.is_empty());
        assert_eq!(DiagnosticsCollector::count(), 0);
    }

    #[test]
    fn test_emit_collector_takes_precedence() {
        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();

        let mut out = Vec::new();
        emit_to(
            &mut out,
            ModeWarning::ComplexToComplexDefault,
            JacobianMode::Complex,
            false,
        );
        assert!(out.is_empty());
        assert_eq!(DiagnosticsCollector::count(), 1);

        DiagnosticsCollector::clear();
        DiagnosticsCollector::disable();
    }

    #[test]
    fn test_is_quiet_with() {
        assert!(!is_quiet_with(|_| None));
        assert!(is_quiet_with(|name| {
            (name == QUIET_ENV_VAR).then(|| "1".to_string())
        }));
        assert!(is_quiet_with(|name| {
            (name == QUIET_ENV_VAR).then(String::new)
        }));
        assert!(!is_quiet_with(|name| {
            (name == "OTHER_VAR").then(|| "1".to_string())
        }));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = ModeDiagnostic::new(ModeWarning::ComplexToComplexDefault, JacobianMode::Complex);
        let display = diag.to_string();
        assert!(display.starts_with("jacobian mode warning: complex-to-complex ansatz detected"));
        assert!(display.contains("-> complex"));
        assert!(display.contains("specify `holomorphic = true`"));
    }

    #[test]
    fn test_warning_display() {
        insta::assert_snapshot!(
            ModeWarning::NonHomogeneousHolomorphic.to_string(),
            @"the ansatz mixes real and complex parameters, which might not behave well with the holomorphic implementation"
        );
    }
}
