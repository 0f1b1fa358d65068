//! Navigation tracker
//!
//! Entry point for the host: called once per tracked navigation event.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crumbtrail_session::{stored_trail, trail_for, SessionContext};
use crumbtrail_trail::{
    BreadCrumbTrail, ComparatorRegistry, Crumb, CrumbComparator, DropPatterns, NavigationEvent,
    RewindMode, TrailError, TrailUpdate, ValueStack,
};

use crate::config::Config;
use crate::error::CoreError;
use crate::options::BreadCrumbOptions;
use crate::Result;

pub struct Tracker {
    config: Config,
    registry: ComparatorRegistry,
    default_comparator: Arc<dyn CrumbComparator>,
}

impl Tracker {
    /// Tracker using the built-in comparators
    pub fn new(config: Config) -> Result<Self> {
        Self::with_registry(config, ComparatorRegistry::with_builtins())
    }

    /// Tracker resolving comparator ids against `registry`
    pub fn with_registry(config: Config, registry: ComparatorRegistry) -> Result<Self> {
        config.validate()?;
        let default_comparator = registry.resolve(&config.comparator)?;

        tracing::debug!(
            max_crumbs = config.max_crumbs,
            rewind_mode = %config.rewind_mode,
            comparator = %config.comparator,
            catch_internal_errors = config.catch_internal_errors,
            "Initialized breadcrumb tracker"
        );

        Ok(Self {
            config,
            registry,
            default_comparator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    /// Record a navigation event in the session's trail.
    ///
    /// Unknown comparators and invalid drop patterns are configuration errors
    /// and always returned. Failures of the update itself are logged and
    /// swallowed (`Ok(None)`) when `catch_internal_errors` is set.
    pub fn track(
        &self,
        session: &dyn SessionContext,
        event: &NavigationEvent,
        options: &BreadCrumbOptions,
        values: &dyn ValueStack,
    ) -> Result<Option<TrailUpdate>> {
        let comparator = self.resolve_comparator(options)?;
        let mode = options.rewind.resolve(self.config.rewind_mode);
        let drops = DropPatterns::new(&options.drop_params)?;

        let current = Crumb::capture(event, &options.name_spec(), &drops, values);

        match self.update_trail(session, current, comparator.as_ref(), mode) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) if self.config.catch_internal_errors => {
                tracing::error!(
                    session_id = %session.id(),
                    action = %event.location.action,
                    error = %e,
                    "Breadcrumb tracking failed"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Run `action`, tracking the event before or after it as the options ask.
    pub fn intercept<F, T>(
        &self,
        session: &dyn SessionContext,
        event: &NavigationEvent,
        options: &BreadCrumbOptions,
        values: &dyn ValueStack,
        action: F,
    ) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        if options.after_action {
            let result = action();
            self.track(session, event, options, values)?;
            Ok(result)
        } else {
            self.track(session, event, options, values)?;
            Ok(action())
        }
    }

    /// The session's trail, if anything was tracked yet
    pub fn trail(&self, session: &dyn SessionContext) -> Result<Option<Arc<BreadCrumbTrail>>> {
        Ok(stored_trail(session)?)
    }

    /// Oldest-first crumbs of the session's trail
    pub fn crumbs(&self, session: &dyn SessionContext) -> Result<Vec<Crumb>> {
        Ok(self
            .trail(session)?
            .map(|trail| trail.crumbs())
            .unwrap_or_default())
    }

    fn resolve_comparator(&self, options: &BreadCrumbOptions) -> Result<Arc<dyn CrumbComparator>> {
        match options.comparator.as_deref() {
            Some(id) => Ok(self.registry.resolve(id)?),
            None => Ok(Arc::clone(&self.default_comparator)),
        }
    }

    fn update_trail(
        &self,
        session: &dyn SessionContext,
        current: Crumb,
        comparator: &dyn CrumbComparator,
        mode: RewindMode,
    ) -> Result<TrailUpdate> {
        let trail = trail_for(session, self.config.max_crumbs)?;

        panic::catch_unwind(AssertUnwindSafe(|| trail.update(current, comparator, mode))).map_err(
            |payload| CoreError::Trail(TrailError::InternalUpdateFailure(panic_message(payload))),
        )
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message.to_string();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| "unknown panic".to_string())
}
