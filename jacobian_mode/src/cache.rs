//! Memoization of mode decisions.
//!
//! A decision depends only on the abstract signature of its inputs, so a
//! `ModeCache` keyed on `ModeSignature` can answer repeated queries without
//! re-evaluating the ansatz. Each cache belongs to exactly one ansatz; the
//! signature does not identify the function.
//!
//! Only successful decisions are stored. Advisory warnings are emitted while
//! deciding, so they fire once per signature and are not repeated on hits.
//!
//! Set `JACOBIAN_MODE_CACHE_DEBUG` to log hits and misses to stderr.

use std::collections::HashMap;
use std::env;

use crate::ansatz::Ansatz;
use crate::default_mode::select_mode;
use crate::error::ModeError;
use crate::lattice::{AbstractArray, ShapeDtype};
use crate::mode::JacobianMode;
use crate::tree::Tree;

/// Environment variable enabling cache debug logging.
pub const CACHE_DEBUG_ENV_VAR: &str = "JACOBIAN_MODE_CACHE_DEBUG";

fn should_log_cache() -> bool {
    env::var_os(CACHE_DEBUG_ENV_VAR).is_some()
}

#[inline]
fn log_cache(msg: &str) {
    if should_log_cache() {
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "{msg}");
    }
}

/// Everything a mode decision depends on, in abstract form.
///
/// Samples are kept unflattened: `[4, 16, n]` and `[64, n]` are different
/// signatures even though they flatten to the same batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModeSignature {
    pub params: Tree<AbstractArray>,
    pub model_state: Option<Tree<AbstractArray>>,
    pub samples: AbstractArray,
    pub holomorphic: Option<bool>,
    pub mode: Option<JacobianMode>,
}

impl ModeSignature {
    pub fn new<P: ShapeDtype, S: ShapeDtype>(
        pars: &Tree<P>,
        model_state: Option<&Tree<P>>,
        samples: &S,
        mode: Option<JacobianMode>,
        holomorphic: Option<bool>,
    ) -> Self {
        Self {
            params: pars.avals(),
            model_state: model_state.map(Tree::avals),
            samples: samples.aval(),
            holomorphic,
            mode,
        }
    }
}

/// Hit and miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Cache of mode decisions for a single ansatz.
#[derive(Debug, Default)]
pub struct ModeCache {
    entries: HashMap<ModeSignature, JacobianMode>,
    stats: CacheStats,
}

impl ModeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached decision for this signature, or decide with
    /// `select_mode` and remember a successful result.
    pub fn get_or_select<A, P, S>(
        &mut self,
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
        let signature = ModeSignature::new(pars, model_state, samples, mode, holomorphic);
        if let Some(&cached) = self.entries.get(&signature) {
            self.stats.hits += 1;
            log_cache(&format!(
                "[Mode Cache] hit: samples {} -> {}",
                signature.samples, cached
            ));
            return Ok(cached);
        }

        self.stats.misses += 1;
        let selected = select_mode(apply_fun, pars, model_state, samples, mode, holomorphic)?;
        log_cache(&format!(
            "[Mode Cache] miss: samples {} -> {} ({} entries)",
            signature.samples,
            selected,
            self.entries.len() + 1
        ));
        self.entries.insert(signature, selected);
        Ok(selected)
    }

    /// Cached decision for a signature, without deciding.
    pub fn get(&self, signature: &ModeSignature) -> Option<JacobianMode> {
        self.entries.get(signature).copied()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
        log_cache("[Mode Cache] cleared");
    }
}
