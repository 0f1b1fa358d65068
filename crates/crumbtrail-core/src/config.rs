//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crumbtrail_trail::{RewindMode, DEFAULT_MAX_CRUMBS, NAME};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size bound for newly created trails
    pub max_crumbs: usize,
    /// Rewind mode for events that do not pick one
    pub rewind_mode: RewindMode,
    /// Comparator id for events that do not pick one
    pub comparator: String,
    /// Log and swallow failures of the trail update instead of failing the request
    pub catch_internal_errors: bool,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rewind_mode.is_default() {
            return Err(CoreError::Config(
                "rewind_mode must be auto or manual".to_string(),
            ));
        }

        if self.comparator.trim().is_empty() {
            return Err(CoreError::Config("comparator cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_crumbs: DEFAULT_MAX_CRUMBS,
            rewind_mode: RewindMode::Auto,
            comparator: NAME.to_string(),
            catch_internal_errors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_crumbs, 10);
        assert_eq!(config.rewind_mode, RewindMode::Auto);
        assert_eq!(config.comparator, "name");
        assert!(config.catch_internal_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json_str(r#"{"max_crumbs": 4, "rewind_mode": "manual"}"#).unwrap();
        assert_eq!(config.max_crumbs, 4);
        assert_eq!(config.rewind_mode, RewindMode::Manual);
        assert_eq!(config.comparator, "name");
    }

    #[test]
    fn test_rejects_default_rewind_mode() {
        let err = Config::from_json_str(r#"{"rewind_mode": "default"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Config::from_json_str(r#"{"max_crumbs": "lots"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
