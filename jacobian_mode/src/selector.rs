//! Configured mode selection for one ansatz.

use crate::ansatz::Ansatz;
use crate::cache::{CacheStats, ModeCache};
use crate::config::ModeConfig;
use crate::default_mode::select_mode;
use crate::error::ModeError;
use crate::lattice::ShapeDtype;
use crate::mode::JacobianMode;
use crate::tree::Tree;

/// Picks Jacobian modes for a single ansatz according to a `ModeConfig`.
///
/// The selector owns a `ModeCache`, so it must not be shared between
/// different ansatze. Create one selector per ansatz.
///
/// # Example
/// ```
/// use jacobian_mode::ansatz::models;
/// use jacobian_mode::config::ModeConfig;
/// use jacobian_mode::dtype::DType;
/// use jacobian_mode::lattice::AbstractArray;
/// use jacobian_mode::mode::JacobianMode;
/// use jacobian_mode::selector::ModeSelector;
///
/// let config = ModeConfig { holomorphic: Some(true), ..ModeConfig::default() };
/// let mut selector = ModeSelector::new(config);
///
/// let params = models::init_rbm_avals(6, 1, DType::Complex128);
/// let samples = AbstractArray::new(vec![32, 6], DType::Float64);
/// let mode = selector.select(&models::rbm(), &params, None, &samples).unwrap();
/// assert_eq!(mode, JacobianMode::Holomorphic);
/// ```
#[derive(Debug, Default)]
pub struct ModeSelector {
    config: ModeConfig,
    cache: ModeCache,
}

impl ModeSelector {
    pub fn new(config: ModeConfig) -> Self {
        Self {
            config,
            cache: ModeCache::new(),
        }
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    /// Choose the mode for `ansatz` at these inputs.
    pub fn select<A, P, S>(
        &mut self,
        ansatz: &A,
        pars: &Tree<P>,
        model_state: Option<&Tree<P>>,
        samples: &S,
    ) -> Result<JacobianMode, ModeError>
    where
        A: Ansatz + ?Sized,
        P: ShapeDtype,
        S: ShapeDtype,
    {
        let ModeConfig {
            mode,
            holomorphic,
            cache,
        } = self.config;
        if cache {
            self.cache
                .get_or_select(ansatz, pars, model_state, samples, mode, holomorphic)
        } else {
            select_mode(ansatz, pars, model_state, samples, mode, holomorphic)
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forget every cached decision, e.g. after swapping the ansatz.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
