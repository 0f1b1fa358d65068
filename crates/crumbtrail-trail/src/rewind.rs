//! Rewind policy
//!
//! Governs what happens when a navigation step matches an entry deeper in the
//! trail than the top:
//! ```text
//! Auto    -> truncate back to just before the match, then append
//! Manual  -> append, leave the earlier match in place
//! Default -> inherit the trail/process default at apply time
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TrailError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewindMode {
    /// Collapse history back to a revisited step
    Auto,
    /// Never truncate
    Manual,
    /// Sentinel: use whatever default applies
    #[default]
    Default,
}

impl RewindMode {
    /// Substitute `fallback` for the `Default` sentinel.
    ///
    /// A `Default` fallback is treated as `Auto` so the resolved mode is
    /// always concrete.
    pub fn resolve(self, fallback: RewindMode) -> RewindMode {
        match (self, fallback) {
            (RewindMode::Default, RewindMode::Default) => RewindMode::Auto,
            (RewindMode::Default, fallback) => fallback,
            (mode, _) => mode,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, RewindMode::Default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewindMode::Auto => "auto",
            RewindMode::Manual => "manual",
            RewindMode::Default => "default",
        }
    }
}

impl std::fmt::Display for RewindMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RewindMode {
    type Err = TrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(RewindMode::Auto),
            "manual" | "never" | "off" => Ok(RewindMode::Manual),
            "default" => Ok(RewindMode::Default),
            _ => Err(TrailError::InvalidRewindMode(s.to_string())),
        }
    }
}
