//! Crumb data structure
//!
//! A crumb is one recorded navigation step. Everything about it, including the
//! display name, is fixed when it is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::event::{Location, NavigationEvent};
use crate::params::{DropPatterns, ParamSnapshot};

/// Rendered in place of an expression that evaluates to nothing
pub const MISSING_VALUE: &str = "null";

/// Host-side lookup used to evaluate `%{...}` crumb names
pub trait ValueStack {
    fn find_value(&self, expr: &str) -> Option<String>;
}

impl ValueStack for HashMap<String, String> {
    fn find_value(&self, expr: &str) -> Option<String> {
        self.get(expr).cloned()
    }
}

impl ValueStack for BTreeMap<String, String> {
    fn find_value(&self, expr: &str) -> Option<String> {
        self.get(expr).cloned()
    }
}

/// A value stack with nothing on it
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValues;

impl ValueStack for EmptyValues {
    fn find_value(&self, _expr: &str) -> Option<String> {
        None
    }
}

/// How a crumb gets its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum NameSpec {
    Literal(String),
    /// Inner text of a `%{...}` marker
    Expression(String),
}

impl NameSpec {
    pub fn parse(spec: &str) -> Self {
        match spec
            .strip_prefix("%{")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(expr) => NameSpec::Expression(expr.to_string()),
            None => NameSpec::Literal(spec.to_string()),
        }
    }

    pub fn resolve(&self, values: &dyn ValueStack) -> String {
        match self {
            NameSpec::Literal(name) => name.clone(),
            NameSpec::Expression(expr) => values.find_value(expr).unwrap_or_else(|| {
                tracing::warn!(expression = %expr, "Crumb name expression has no value");
                MISSING_VALUE.to_string()
            }),
        }
    }
}

impl From<&str> for NameSpec {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl From<String> for NameSpec {
    fn from(spec: String) -> Self {
        Self::parse(&spec)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    timestamp: DateTime<Utc>,
    namespace: String,
    action: String,
    method: String,
    name: String,
    /// `None` when the request parameters could not be read
    params: Option<ParamSnapshot>,
}

impl Crumb {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            timestamp: Utc::now(),
            namespace: location.namespace,
            action: location.action,
            method: location.method,
            name: name.into(),
            params: Some(ParamSnapshot::new()),
        }
    }

    pub fn with_params(mut self, params: Option<ParamSnapshot>) -> Self {
        self.params = params;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the crumb for a navigation event.
    ///
    /// An unreadable parameter source is logged and leaves the snapshot
    /// empty; the crumb is still produced.
    pub fn capture(
        event: &NavigationEvent,
        name: &NameSpec,
        drops: &DropPatterns,
        values: &dyn ValueStack,
    ) -> Self {
        let params = match event.parameters.snapshot(drops) {
            Ok(params) => Some(params),
            Err(e) => {
                tracing::error!(
                    namespace = %event.location.namespace,
                    action = %event.location.action,
                    error = %e,
                    "Cannot handle parameters for action"
                );
                None
            }
        };

        Self::new(name.resolve(values), event.location.clone()).with_params(params)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> Option<&ParamSnapshot> {
        self.params.as_ref()
    }

    /// Request path that navigates back to this step, for "jump to here" links
    pub fn link(&self) -> String {
        let namespace = self.namespace.trim_end_matches('/');
        let mut link = format!("{}/{}", namespace, self.action);
        if self.method != crate::event::DEFAULT_METHOD {
            link.push('!');
            link.push_str(&self.method);
        }

        if let Some(params) = self.params.as_ref().filter(|p| !p.is_empty()) {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            for (name, values) in params {
                for value in values {
                    query.append_pair(name, value);
                }
            }
            link.push('?');
            link.push_str(&query.finish());
        }

        link
    }
}

impl std::fmt::Display for Crumb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
