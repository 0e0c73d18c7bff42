//! The Jacobian mode tag.
//!
//! A `JacobianMode` names which Jacobian algorithm a caller should run:
//!
//! - `real`: the ansatz output is real; a single real Jacobian suffices.
//! - `complex`: the output is complex and no holomorphicity is assumed; both
//!   the Jacobian of the real and of the imaginary part are needed.
//! - `holomorphic`: the output is a holomorphic function of complex
//!   parameters; the complex Jacobian alone suffices.
//!
//! Modes compare and hash by name, so a mode can be looked up in a map with
//! its bare name and compared against strings directly.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Which Jacobian algorithm to use for an ansatz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JacobianMode {
    Real,
    Complex,
    Holomorphic,
}

impl JacobianMode {
    /// All three modes.
    pub const ALL: [JacobianMode; 3] = [
        JacobianMode::Real,
        JacobianMode::Complex,
        JacobianMode::Holomorphic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            JacobianMode::Real => "real",
            JacobianMode::Complex => "complex",
            JacobianMode::Holomorphic => "holomorphic",
        }
    }

    /// True for modes that produce a complex-valued Jacobian.
    pub fn is_complex(self) -> bool {
        !matches!(self, JacobianMode::Real)
    }
}

impl Hash for JacobianMode {
    // Hash the name so `Borrow<str>` lookups agree with `str` hashing.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl Borrow<str> for JacobianMode {
    fn borrow(&self) -> &str {
        self.name()
    }
}

impl AsRef<str> for JacobianMode {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for JacobianMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq<str> for JacobianMode {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}

impl PartialEq<&str> for JacobianMode {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}

impl PartialEq<String> for JacobianMode {
    fn eq(&self, other: &String) -> bool {
        self.name() == other
    }
}

impl PartialEq<JacobianMode> for str {
    fn eq(&self, other: &JacobianMode) -> bool {
        self == other.name()
    }
}

impl PartialEq<JacobianMode> for &str {
    fn eq(&self, other: &JacobianMode) -> bool {
        *self == other.name()
    }
}

impl PartialEq<JacobianMode> for String {
    fn eq(&self, other: &JacobianMode) -> bool {
        self == other.name()
    }
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown jacobian mode '{0}' (expected one of: real, complex, holomorphic)")]
pub struct ParseModeError(pub String);

impl FromStr for JacobianMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JacobianMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
