//! Crumb comparators
//!
//! A comparator decides whether two crumbs are "the same step". The trail
//! uses it both to refresh the top entry and to find revisits deeper down.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::crumb::Crumb;
use crate::error::TrailError;
use crate::Result;

pub const NAME: &str = "name";
pub const NAME_NAMESPACE: &str = "name-namespace";
pub const NAME_NAMESPACE_PARAMS: &str = "name-namespace-params";

pub trait CrumbComparator: Send + Sync + Debug {
    /// Identifier the comparator is registered under
    fn id(&self) -> &str;

    fn same_step(&self, a: &Crumb, b: &Crumb) -> bool;
}

/// Compare against a possibly absent crumb. Absent is never equal.
pub fn same_step(comparator: &dyn CrumbComparator, current: &Crumb, other: Option<&Crumb>) -> bool {
    other.is_some_and(|other| comparator.same_step(current, other))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameComparator;

impl CrumbComparator for NameComparator {
    fn id(&self) -> &str {
        NAME
    }

    fn same_step(&self, a: &Crumb, b: &Crumb) -> bool {
        a.name() == b.name()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameNamespaceComparator;

impl CrumbComparator for NameNamespaceComparator {
    fn id(&self) -> &str {
        NAME_NAMESPACE
    }

    fn same_step(&self, a: &Crumb, b: &Crumb) -> bool {
        a.name() == b.name() && a.namespace() == b.namespace()
    }
}

/// Name, namespace and identical parameter snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct NameNamespaceParamsComparator;

impl CrumbComparator for NameNamespaceParamsComparator {
    fn id(&self) -> &str {
        NAME_NAMESPACE_PARAMS
    }

    fn same_step(&self, a: &Crumb, b: &Crumb) -> bool {
        NameNamespaceComparator.same_step(a, b) && a.params() == b.params()
    }
}

/// Comparators by identifier, populated at startup
#[derive(Debug, Clone, Default)]
pub struct ComparatorRegistry {
    comparators: HashMap<String, Arc<dyn CrumbComparator>>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the three built-in comparators
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NameComparator));
        registry.register(Arc::new(NameNamespaceComparator));
        registry.register(Arc::new(NameNamespaceParamsComparator));
        registry
    }

    /// Register under the comparator's own id, replacing any previous entry.
    pub fn register(&mut self, comparator: Arc<dyn CrumbComparator>) {
        let id = comparator.id().to_string();
        if self.comparators.insert(id.clone(), comparator).is_some() {
            tracing::debug!(comparator = %id, "Replaced registered comparator");
        }
    }

    pub fn resolve(&self, id: &str) -> Result<Arc<dyn CrumbComparator>> {
        self.comparators
            .get(id)
            .cloned()
            .ok_or_else(|| TrailError::ComparatorNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.comparators.contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.comparators.keys().cloned().collect();
        ids.sort();
        ids
    }
}
