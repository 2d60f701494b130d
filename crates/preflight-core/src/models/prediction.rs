use serde::{Deserialize, Serialize};

/// A best-effort hint about the next interaction. Either field may be
/// absent: `action` when the model has nothing to say, `component_id` when
/// the predicted action is not bound to a tracked component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub action: Option<String>,
    pub component_id: Option<String>,
}

impl Prediction {
    /// The empty prediction.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.action.is_none() && self.component_id.is_none()
    }
}
