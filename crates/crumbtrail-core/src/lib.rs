//! Crumbtrail Core
//!
//! Coordination layer between a web host and the breadcrumb trail. The host
//! decides which requests are tracked; the `Tracker` turns each one into a
//! crumb and folds it into the session's trail.

mod config;
mod error;
mod options;
mod tracker;

pub use config::Config;
pub use error::CoreError;
pub use options::BreadCrumbOptions;
pub use tracker::Tracker;

// Re-export core components
pub use crumbtrail_session::{
    stored_trail, trail_for, Attribute, Session, SessionContext, SessionError, SessionManager,
    TRAIL_KEY,
};
pub use crumbtrail_trail::{
    BreadCrumbTrail, ComparatorRegistry, Crumb, CrumbComparator, DropPatterns, EmptyValues,
    Location, NameSpec, NavigationEvent, ParamSnapshot, ParameterSource, RewindMode,
    TrailError, TrailSnapshot, TrailUpdate, ValueStack,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
