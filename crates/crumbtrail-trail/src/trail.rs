//! Breadcrumb trail
//!
//! Ordered, bounded history of crumbs for one session. Oldest entry first,
//! newest on top. All access goes through the trail's own lock so trails of
//! different sessions never contend.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::comparator::{same_step, CrumbComparator};
use crate::crumb::Crumb;
use crate::rewind::RewindMode;

pub const DEFAULT_TRAIL_NAME: &str = "$default-trail";
pub const DEFAULT_MAX_CRUMBS: usize = 10;

/// What an update did to the trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailUpdate {
    /// The top entry was the same step and got refreshed
    Replaced,
    /// The crumb was pushed on top
    Appended {
        /// Entries discarded by a rewind, including the matched one
        rewound: usize,
        /// Oldest entry dropped to stay within bounds
        evicted: Option<Crumb>,
    },
}

/// Read-only copy of a trail for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSnapshot {
    pub name: String,
    pub max_crumbs: usize,
    pub crumbs: Vec<Crumb>,
}

#[derive(Debug)]
pub struct BreadCrumbTrail {
    name: String,
    max_crumbs: usize,
    crumbs: Mutex<VecDeque<Crumb>>,
}

impl BreadCrumbTrail {
    pub fn new(name: impl Into<String>, max_crumbs: usize) -> Self {
        Self {
            name: name.into(),
            max_crumbs,
            crumbs: Mutex::new(VecDeque::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_crumbs(&self) -> usize {
        self.max_crumbs
    }

    /// Integrate a new navigation step.
    ///
    /// Every comparison runs before the stack is touched, so a comparator
    /// that panics leaves the trail as it was.
    pub fn update(
        &self,
        current: Crumb,
        comparator: &dyn CrumbComparator,
        mode: RewindMode,
    ) -> TrailUpdate {
        let mode = mode.resolve(RewindMode::Auto);

        let mut crumbs = self.crumbs.lock();
        tracing::trace!(trail = %self.name, "Acquired lock on crumbs");

        let outcome = apply(&mut crumbs, self.max_crumbs, current, comparator, mode);

        tracing::debug!(
            trail = %self.name,
            size = crumbs.len(),
            outcome = ?outcome,
            "Updated breadcrumb trail"
        );

        outcome
    }

    /// Oldest-first copy of the crumbs
    pub fn crumbs(&self) -> Vec<Crumb> {
        self.crumbs.lock().iter().cloned().collect()
    }

    pub fn snapshot(&self) -> TrailSnapshot {
        TrailSnapshot {
            name: self.name.clone(),
            max_crumbs: self.max_crumbs,
            crumbs: self.crumbs(),
        }
    }

    pub fn len(&self) -> usize {
        self.crumbs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.lock().is_empty()
    }

    pub fn last(&self) -> Option<Crumb> {
        self.crumbs.lock().back().cloned()
    }

    pub fn get(&self, index: usize) -> Option<Crumb> {
        self.crumbs.lock().get(index).cloned()
    }

    /// Position of the oldest crumb matching `crumb`
    pub fn index_of(&self, crumb: &Crumb, comparator: &dyn CrumbComparator) -> Option<usize> {
        self.crumbs
            .lock()
            .iter()
            .position(|c| comparator.same_step(crumb, c))
    }

    /// Discard the crumb at `index` and everything newer. Returns what was removed.
    pub fn rewind_at(&self, index: usize) -> Vec<Crumb> {
        let mut crumbs = self.crumbs.lock();
        if index >= crumbs.len() {
            return Vec::new();
        }
        crumbs.drain(index..).collect()
    }

    pub fn clear(&self) {
        self.crumbs.lock().clear();
    }
}

fn apply(
    crumbs: &mut VecDeque<Crumb>,
    max_crumbs: usize,
    current: Crumb,
    comparator: &dyn CrumbComparator,
    mode: RewindMode,
) -> TrailUpdate {
    if same_step(comparator, &current, crumbs.back()) {
        crumbs.pop_back();
        crumbs.push_back(current);
        return TrailUpdate::Replaced;
    }

    // The top was just compared, search below it
    let below_top = crumbs.len().saturating_sub(1);
    let dup_index = crumbs
        .iter()
        .take(below_top)
        .position(|c| comparator.same_step(&current, c));

    let rewound = match dup_index {
        Some(index) if mode == RewindMode::Auto => {
            let removed = crumbs.len() - index;
            crumbs.truncate(index);
            removed
        }
        _ => 0,
    };

    crumbs.push_back(current);

    let evicted = if crumbs.len() > max_crumbs {
        crumbs.pop_front()
    } else {
        None
    };

    TrailUpdate::Appended { rewound, evicted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{NameComparator, NameNamespaceComparator};
    use crate::event::Location;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn crumb(name: &str) -> Crumb {
        Crumb::new(name, Location::new("/", name.to_lowercase()))
    }

    fn names(trail: &BreadCrumbTrail) -> Vec<String> {
        trail.crumbs().iter().map(|c| c.name().to_string()).collect()
    }

    fn trail_of(max: usize, steps: &[&str], mode: RewindMode) -> BreadCrumbTrail {
        let trail = BreadCrumbTrail::new(DEFAULT_TRAIL_NAME, max);
        for step in steps {
            trail.update(crumb(step), &NameComparator, mode);
        }
        trail
    }

    #[test]
    fn test_first_crumb() {
        let trail = BreadCrumbTrail::new("t", 3);
        let outcome = trail.update(crumb("A"), &NameComparator, RewindMode::Auto);

        assert_eq!(
            outcome,
            TrailUpdate::Appended {
                rewound: 0,
                evicted: None
            }
        );
        assert_eq!(names(&trail), vec!["A"]);
    }

    #[test]
    fn test_same_as_last_replaces() {
        let trail = trail_of(5, &["A", "B"], RewindMode::Auto);
        let refreshed = Crumb::new("B", Location::new("/", "b").with_method("save"));

        assert_eq!(
            trail.update(refreshed.clone(), &NameComparator, RewindMode::Auto),
            TrailUpdate::Replaced
        );
        assert_eq!(
            trail.update(refreshed, &NameComparator, RewindMode::Auto),
            TrailUpdate::Replaced
        );

        assert_eq!(trail.len(), 2);
        assert_eq!(trail.last().unwrap().method(), "save");
    }

    #[test]
    fn test_auto_rewind_collapses_history() {
        let trail = trail_of(10, &["A", "B", "C"], RewindMode::Auto);
        let revisit = Crumb::new("B", Location::new("/", "b").with_method("again"));

        let outcome = trail.update(revisit, &NameComparator, RewindMode::Auto);
        assert_eq!(
            outcome,
            TrailUpdate::Appended {
                rewound: 2,
                evicted: None
            }
        );
        assert_eq!(names(&trail), vec!["A", "B"]);
        assert_eq!(trail.last().unwrap().method(), "again");
    }

    #[test]
    fn test_manual_mode_preserves_depth() {
        let trail = trail_of(10, &["A", "B", "C"], RewindMode::Manual);
        trail.update(crumb("B"), &NameComparator, RewindMode::Manual);

        assert_eq!(names(&trail), vec!["A", "B", "C", "B"]);
    }

    #[test]
    fn test_default_mode_behaves_as_auto() {
        let trail = trail_of(10, &["A", "B", "C"], RewindMode::Default);
        trail.update(crumb("A"), &NameComparator, RewindMode::Default);

        assert_eq!(names(&trail), vec!["A"]);
    }

    #[test]
    fn test_eviction_order() {
        let trail = trail_of(3, &["A", "B", "C"], RewindMode::Auto);
        let outcome = trail.update(crumb("D"), &NameComparator, RewindMode::Auto);

        match outcome {
            TrailUpdate::Appended {
                evicted: Some(evicted),
                ..
            } => assert_eq!(evicted.name(), "A"),
            other => panic!("Expected eviction, got {:?}", other),
        }
        assert_eq!(names(&trail), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_zero_capacity() {
        let trail = BreadCrumbTrail::new("t", 0);
        trail.update(crumb("A"), &NameComparator, RewindMode::Auto);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_comparator_changes_behavior() {
        let orders = Crumb::new("Details", Location::new("/orders", "view"));
        let customers = Crumb::new("Details", Location::new("/customers", "view"));

        let by_name = BreadCrumbTrail::new("t", 10);
        by_name.update(orders.clone(), &NameComparator, RewindMode::Auto);
        by_name.update(customers.clone(), &NameComparator, RewindMode::Auto);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name.last().unwrap().namespace(), "/customers");

        let by_namespace = BreadCrumbTrail::new("t", 10);
        by_namespace.update(orders, &NameNamespaceComparator, RewindMode::Auto);
        by_namespace.update(customers, &NameNamespaceComparator, RewindMode::Auto);
        assert_eq!(by_namespace.len(), 2);
    }

    #[test]
    fn test_panicking_comparator_leaves_trail_intact() {
        #[derive(Debug)]
        struct Faulty;

        impl CrumbComparator for Faulty {
            fn id(&self) -> &str {
                "faulty"
            }

            fn same_step(&self, _a: &Crumb, b: &Crumb) -> bool {
                if b.name() == "B" {
                    panic!("comparator blew up");
                }
                false
            }
        }

        let trail = trail_of(10, &["A", "B", "C"], RewindMode::Auto);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            trail.update(crumb("D"), &Faulty, RewindMode::Auto)
        }));

        assert!(result.is_err());
        assert_eq!(names(&trail), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_index_of_and_rewind_at() {
        let trail = trail_of(10, &["A", "B", "C"], RewindMode::Auto);
        assert_eq!(trail.index_of(&crumb("B"), &NameComparator), Some(1));
        assert_eq!(trail.index_of(&crumb("Z"), &NameComparator), None);

        let removed = trail.rewind_at(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(names(&trail), vec!["A"]);
        assert!(trail.rewind_at(5).is_empty());
    }

    #[test]
    fn test_concurrent_updates() {
        let trail = Arc::new(BreadCrumbTrail::new(DEFAULT_TRAIL_NAME, 8));

        std::thread::scope(|scope| {
            for i in 0..32 {
                let trail = Arc::clone(&trail);
                scope.spawn(move || {
                    trail.update(crumb(&format!("step-{}", i)), &NameComparator, RewindMode::Auto);
                });
            }
        });

        let crumbs = trail.crumbs();
        assert_eq!(crumbs.len(), 8);

        let mut seen: Vec<&str> = crumbs.iter().map(|c| c.name()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_concurrent_updates_under_capacity() {
        let trail = Arc::new(BreadCrumbTrail::new(DEFAULT_TRAIL_NAME, 50));

        std::thread::scope(|scope| {
            for i in 0..20 {
                let trail = Arc::clone(&trail);
                scope.spawn(move || {
                    trail.update(crumb(&format!("step-{}", i)), &NameComparator, RewindMode::Manual);
                });
            }
        });

        assert_eq!(trail.len(), 20);
    }

    proptest! {
        #[test]
        fn prop_size_never_exceeds_max(
            max in 0usize..6,
            steps in proptest::collection::vec((0u8..5, any::<bool>()), 0..60),
        ) {
            let trail = BreadCrumbTrail::new("prop", max);
            for (step, auto) in steps {
                let mode = if auto { RewindMode::Auto } else { RewindMode::Manual };
                trail.update(crumb(&format!("S{}", step)), &NameComparator, mode);
                prop_assert!(trail.len() <= max);
            }
        }
    }
}
