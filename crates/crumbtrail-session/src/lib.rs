//! Crumbtrail Session Management
//!
//! - A session is a key-value context owned by the host
//! - Each session holds at most one breadcrumb trail, under a fixed key
//! - The trail is created lazily, exactly once, on first navigation

mod error;
mod manager;
mod session;
mod trail;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Attribute, Session, SessionContext};
pub use trail::{stored_trail, trail_for, TRAIL_KEY};

pub type Result<T> = std::result::Result<T, SessionError>;
