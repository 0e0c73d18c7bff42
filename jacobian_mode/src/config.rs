//! Mode selection configuration.
//!
//! Settings come from a `[jacobian]` table in a TOML file, from environment
//! variables, or both (environment on top of the file):
//!
//! ```toml
//! [jacobian]
//! mode = "complex"      # "real" | "complex" | "holomorphic"; omit to auto-detect
//! holomorphic = false   # omit when unknown
//! cache = true
//! ```
//!
//! | Variable                      | Effect                           |
//! |-------------------------------|----------------------------------|
//! | `JACOBIAN_MODE`               | sets `mode`                      |
//! | `JACOBIAN_HOLOMORPHIC`        | sets `holomorphic` (`true`/`false`) |
//! | `JACOBIAN_MODE_DISABLE_CACHE` | sets `cache = false` when present |

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::mode::JacobianMode;

pub const MODE_ENV_VAR: &str = "JACOBIAN_MODE";
pub const HOLOMORPHIC_ENV_VAR: &str = "JACOBIAN_HOLOMORPHIC";
pub const DISABLE_CACHE_ENV_VAR: &str = "JACOBIAN_MODE_DISABLE_CACHE";

/// How a `ModeSelector` picks a Jacobian mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeConfig {
    /// Explicit mode; `None` selects automatically.
    pub mode: Option<JacobianMode>,
    /// Holomorphicity assertion passed to the automatic selection.
    pub holomorphic: Option<bool>,
    /// Memoize decisions per abstract input signature.
    pub cache: bool,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            mode: None,
            holomorphic: None,
            cache: true,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    jacobian: ModeConfig,
}

impl ModeConfig {
    /// Parse the `[jacobian]` table of a TOML document.
    ///
    /// A document without the table yields the defaults; other tables are
    /// ignored. Unknown keys inside `[jacobian]` are rejected.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        Ok(file.jacobian)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Override fields from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(|name| env::var(name).ok())
    }

    /// Override fields from a variable lookup.
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(MODE_ENV_VAR) {
            let parsed = value.trim().to_ascii_lowercase().parse::<JacobianMode>();
            self.mode = Some(parsed.map_err(|_| ConfigError::Env {
                var: MODE_ENV_VAR,
                value: value.clone(),
            })?);
        }
        if let Some(value) = lookup(HOLOMORPHIC_ENV_VAR) {
            self.holomorphic = Some(parse_bool(value.trim()).ok_or_else(|| ConfigError::Env {
                var: HOLOMORPHIC_ENV_VAR,
                value: value.clone(),
            })?);
        }
        if lookup(DISABLE_CACHE_ENV_VAR).is_some() {
            self.cache = false;
        }
        Ok(self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
