use serde::{Deserialize, Serialize};

/// A single user interaction, in plaintext. This form only ever lives in
/// process memory; at rest both string fields are encrypted per-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Id of the component the action resolved to.
    pub component_id: String,
    /// Application-defined action name, e.g. `"click-login"`.
    pub action_type: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl InteractionRecord {
    pub fn new(component_id: impl Into<String>, action_type: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            component_id: component_id.into(),
            action_type: action_type.into(),
            timestamp_ms,
        }
    }
}

/// The persisted shape of an interaction: base64 ciphertext plus the
/// per-field IV for each encrypted column. The storage-assigned row id is
/// not part of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedInteraction {
    pub action_type: String,
    pub action_type_iv: String,
    pub component_id: String,
    pub component_id_iv: String,
    pub timestamp_ms: i64,
}
