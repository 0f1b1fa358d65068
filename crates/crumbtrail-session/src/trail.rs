//! Per-session trail storage

use std::sync::Arc;

use crumbtrail_trail::{BreadCrumbTrail, DEFAULT_TRAIL_NAME};

use crate::error::SessionError;
use crate::session::{Attribute, SessionContext};
use crate::Result;

/// Session key the trail is stored under
pub const TRAIL_KEY: &str = "crumbtrail::session::CRUMBS";

/// Return the session's trail, creating it on first access.
///
/// Creation is exclusive per session: racing requests all get the same trail.
pub fn trail_for(session: &dyn SessionContext, max_crumbs: usize) -> Result<Arc<BreadCrumbTrail>> {
    let value = session.get_or_insert_attribute(TRAIL_KEY, &|| {
        tracing::info!(
            session_id = %session.id(),
            trail = DEFAULT_TRAIL_NAME,
            max_crumbs,
            key = TRAIL_KEY,
            "Stored new breadcrumb trail"
        );
        Arc::new(BreadCrumbTrail::new(DEFAULT_TRAIL_NAME, max_crumbs)) as Attribute
    });

    downcast(value)
}

/// The session's trail if one was created
pub fn stored_trail(session: &dyn SessionContext) -> Result<Option<Arc<BreadCrumbTrail>>> {
    session.attribute(TRAIL_KEY).map(downcast).transpose()
}

fn downcast(value: Attribute) -> Result<Arc<BreadCrumbTrail>> {
    value
        .downcast::<BreadCrumbTrail>()
        .map_err(|_| SessionError::AttributeTypeMismatch {
            key: TRAIL_KEY.to_string(),
        })
}
