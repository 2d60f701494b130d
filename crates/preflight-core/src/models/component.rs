use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A preloadable UI unit registered by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Unique id across the registry.
    pub id: String,
    /// Application-defined component kind, e.g. `"page"` or `"modal"`.
    pub kind: String,
    /// Free-form metadata the application attaches at registration time.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            metadata: HashMap::new(),
        }
    }
}
