//! Navigation event descriptor
//!
//! What the host knows about the step being taken at the moment the trail is
//! updated: where it is (namespace/action/method) and the raw parameters.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TrailError;
use crate::params::ParameterSource;
use crate::Result;

/// Method used when the request names none
pub const DEFAULT_METHOD: &str = "execute";

#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub location: Location,
    pub parameters: ParameterSource,
}

/// Namespace / action / method triple identifying a handler
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub namespace: String,
    pub action: String,
    pub method: String,
}

impl Location {
    pub fn new(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
            method: DEFAULT_METHOD.to_string(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }
}

impl NavigationEvent {
    pub fn new(location: Location, parameters: ParameterSource) -> Self {
        Self {
            location,
            parameters,
        }
    }

    /// Parse a request path like `/shop/cart!edit.do?item=3&item=4`.
    ///
    /// Namespace is everything before the last `/` (`/` at the root), the
    /// extension is dropped from the action and `!method` selects the method.
    pub fn from_url(input: &str) -> Result<Self> {
        let base = Url::parse("http://localhost/")
            .map_err(|e| TrailError::InvalidUrl(format!("{}: {}", input, e)))?;
        let url = base
            .join(input)
            .map_err(|e| TrailError::InvalidUrl(format!("{}: {}", input, e)))?;

        let (namespace, file) = url.path().rsplit_once('/').unwrap_or(("", url.path()));
        let namespace = if namespace.is_empty() { "/" } else { namespace };

        let stem = match file.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => file,
        };
        if stem.is_empty() {
            return Err(TrailError::InvalidUrl(format!("{}: no action", input)));
        }

        let location = match stem.split_once('!') {
            Some((action, method)) if !method.is_empty() => {
                Location::new(namespace, action).with_method(method)
            }
            Some((action, _)) => Location::new(namespace, action),
            None => Location::new(namespace, stem),
        };

        let parameters = ParameterSource::Query(url.query().unwrap_or_default().to_string());

        Ok(Self {
            location,
            parameters,
        })
    }
}
