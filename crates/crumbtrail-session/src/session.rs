//! Session data structure

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Value stored in a session
pub type Attribute = Arc<dyn Any + Send + Sync>;

/// Key-value context the host keeps per user session
pub trait SessionContext: Send + Sync {
    fn id(&self) -> &str;

    fn attribute(&self, key: &str) -> Option<Attribute>;

    fn set_attribute(&self, key: &str, value: Attribute);

    fn remove_attribute(&self, key: &str) -> Option<Attribute>;

    /// Return the value under `key`, storing `init()` first if there is none.
    ///
    /// Must be atomic for the session: concurrent callers all receive the
    /// same stored value and `init` runs at most once.
    fn get_or_insert_attribute(&self, key: &str, init: &dyn Fn() -> Attribute) -> Attribute;
}

/// In-memory session
pub struct Session {
    /// Unique identifier
    id: String,
    /// When the session was created
    created_at: DateTime<Utc>,
    attributes: RwLock<HashMap<String, Attribute>>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Session for an id issued by the host (cookie, token, ...)
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            attributes: RwLock::new(HashMap::new()),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn attribute_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.attributes.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.attributes.write().clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("attributes", &self.attribute_keys())
            .finish()
    }
}

impl SessionContext for Session {
    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, key: &str) -> Option<Attribute> {
        self.attributes.read().get(key).cloned()
    }

    fn set_attribute(&self, key: &str, value: Attribute) {
        self.attributes.write().insert(key.to_string(), value);
    }

    fn remove_attribute(&self, key: &str) -> Option<Attribute> {
        self.attributes.write().remove(key)
    }

    fn get_or_insert_attribute(&self, key: &str, init: &dyn Fn() -> Attribute) -> Attribute {
        if let Some(value) = self.attributes.read().get(key) {
            return Arc::clone(value);
        }

        // Re-check under the write lock, another request may have won
        let mut attributes = self.attributes.write();
        Arc::clone(attributes.entry(key.to_string()).or_insert_with(init))
    }
}
