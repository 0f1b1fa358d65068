//! Per-handler tracking options

use serde::{Deserialize, Serialize};

use crumbtrail_trail::{NameSpec, RewindMode};

/// How one tracked handler contributes to the trail.
///
/// Anything left unset falls back to the tracker's `Config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadCrumbOptions {
    /// Literal name or `%{expression}`
    pub name: String,
    pub rewind: RewindMode,
    /// Comparator id overriding the configured default
    pub comparator: Option<String>,
    /// Regular expressions for parameter names to leave out
    pub drop_params: Vec<String>,
    /// Track after the handler ran rather than before
    pub after_action: bool,
}

impl BreadCrumbOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_rewind(mut self, rewind: RewindMode) -> Self {
        self.rewind = rewind;
        self
    }

    pub fn with_comparator(mut self, id: impl Into<String>) -> Self {
        self.comparator = Some(id.into());
        self
    }

    pub fn drop_param(mut self, pattern: impl Into<String>) -> Self {
        self.drop_params.push(pattern.into());
        self
    }

    pub fn after_action(mut self) -> Self {
        self.after_action = true;
        self
    }

    pub fn name_spec(&self) -> NameSpec {
        NameSpec::parse(&self.name)
    }
}
