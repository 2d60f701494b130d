//! # preflight-registry
//!
//! The authoritative mapping from component ids to descriptors and from
//! action types to component ids. This is what turns a predicted action
//! into something the preloader can act on.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use preflight_core::errors::{PreflightResult, RegistryError};
use preflight_core::models::ComponentDescriptor;

#[derive(Default)]
struct RegistryInner {
    // Insertion order of descriptor ids, for `list`.
    order: Vec<String>,
    descriptors: HashMap<String, ComponentDescriptor>,
    bindings: HashMap<String, String>,
}

/// Process-wide component registry. Shared by the tracker, the prediction
/// model, and the preloader; all mutation goes through one lock.
#[derive(Default)]
pub struct ComponentRegistry {
    inner: Mutex<RegistryInner>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. Re-registering an existing id is a no-op
    /// with a warning; the original descriptor wins.
    pub fn track_component(
        &self,
        id: &str,
        kind: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) {
        let mut inner = self.lock();
        if inner.descriptors.contains_key(id) {
            tracing::warn!("registry: component {id} already tracked, ignoring");
            return;
        }
        inner.order.push(id.to_string());
        inner.descriptors.insert(
            id.to_string(),
            ComponentDescriptor {
                id: id.to_string(),
                kind: kind.to_string(),
                metadata: metadata.unwrap_or_default(),
            },
        );
    }

    /// Bind an action type to a tracked component. Later bindings for the
    /// same action replace earlier ones.
    pub fn associate_action(&self, action_type: &str, component_id: &str) -> PreflightResult<()> {
        let mut inner = self.lock();
        if !inner.descriptors.contains_key(component_id) {
            return Err(RegistryError::UnknownComponent {
                component_id: component_id.to_string(),
            }
            .into());
        }
        inner
            .bindings
            .insert(action_type.to_string(), component_id.to_string());
        Ok(())
    }

    /// Resolve an action to its component id. Unknown actions are `None`.
    pub fn component_for_action(&self, action_type: &str) -> Option<String> {
        self.lock().bindings.get(action_type).cloned()
    }

    pub fn get(&self, id: &str) -> Option<ComponentDescriptor> {
        self.lock().descriptors.get(id).cloned()
    }

    /// All descriptors in registration order.
    pub fn list(&self) -> Vec<ComponentDescriptor> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.descriptors.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_keeps_the_original() {
        let registry = ComponentRegistry::new();
        registry.track_component("c1", "page", None);
        registry.track_component("c1", "modal", None);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("c1").unwrap().kind, "page");
    }

    #[test]
    fn binding_requires_a_tracked_component() {
        let registry = ComponentRegistry::new();
        assert!(registry.associate_action("go", "ghost").is_err());

        registry.track_component("c1", "page", None);
        registry.associate_action("go", "c1").unwrap();
        assert_eq!(registry.component_for_action("go").as_deref(), Some("c1"));
    }

    #[test]
    fn unknown_action_resolves_softly() {
        let registry = ComponentRegistry::new();
        assert!(registry.component_for_action("nope").is_none());
    }

    #[test]
    fn list_preserves_registration_order() {
        let registry = ComponentRegistry::new();
        for id in ["b", "a", "c"] {
            registry.track_component(id, "page", None);
        }
        let ids: Vec<_> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn rebinding_replaces_the_target() {
        let registry = ComponentRegistry::new();
        registry.track_component("c1", "page", None);
        registry.track_component("c2", "page", None);
        registry.associate_action("go", "c1").unwrap();
        registry.associate_action("go", "c2").unwrap();
        assert_eq!(registry.component_for_action("go").as_deref(), Some("c2"));
    }
}
