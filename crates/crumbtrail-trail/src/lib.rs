//! Crumbtrail Trail
//!
//! The breadcrumb trail and its update algorithm:
//! - Same step as the top entry → replace the top
//! - Revisit of a deeper entry → rewind back to it (in `Auto` mode)
//! - Otherwise → push, evicting the oldest entry past the size bound

mod comparator;
mod crumb;
mod error;
mod event;
mod params;
mod rewind;
mod trail;

pub use comparator::{
    same_step, ComparatorRegistry, CrumbComparator, NameComparator, NameNamespaceComparator,
    NameNamespaceParamsComparator, NAME, NAME_NAMESPACE, NAME_NAMESPACE_PARAMS,
};
pub use crumb::{Crumb, EmptyValues, NameSpec, ValueStack, MISSING_VALUE};
pub use error::TrailError;
pub use event::{Location, NavigationEvent, DEFAULT_METHOD};
pub use params::{DropPatterns, ParamSnapshot, ParameterSource};
pub use rewind::RewindMode;
pub use trail::{
    BreadCrumbTrail, TrailSnapshot, TrailUpdate, DEFAULT_MAX_CRUMBS, DEFAULT_TRAIL_NAME,
};

pub type Result<T> = std::result::Result<T, TrailError>;
