//! Capability registry for managing available capabilities.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use deskhand_protocols::{ActionError, Capability};

/// Registry mapping capability names to handler instances.
///
/// Provides:
/// - Thread-safe storage using DashMap
/// - Overwrite-on-register (the last binding for a name wins)
/// - Snapshot enumeration that never borrows the live map
///
/// Registration normally happens once at startup; afterwards the registry is
/// read-only apart from [`CapabilityRegistry::clear`] on teardown.
pub struct CapabilityRegistry {
    items: DashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Bind `name` to `capability`, returning the binding it replaced.
    pub fn register(
        &self,
        name: impl Into<String>,
        capability: Arc<dyn Capability>,
    ) -> Option<Arc<dyn Capability>> {
        let name = name.into();
        let previous = self.items.insert(name.clone(), capability);
        if previous.is_some() {
            info!("Capability '{}' re-registered, previous binding replaced", name);
        } else {
            debug!("Capability '{}' registered", name);
        }
        previous
    }

    /// Register a capability under its own descriptor name.
    pub fn register_capability(&self, capability: Arc<dyn Capability>) -> Option<Arc<dyn Capability>> {
        let name = capability.name().to_string();
        self.register(name, capability)
    }

    /// Resolve a capability by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Capability>, ActionError> {
        self.items
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ActionError::not_found("Capability", name))
    }

    /// Check if a capability with the given name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Snapshot of every binding, sorted by name.
    pub fn all(&self) -> Vec<(String, Arc<dyn Capability>)> {
        let mut items: Vec<_> = self
            .items
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.all().into_iter().map(|(name, _)| name).collect()
    }

    /// Remove every binding.
    pub fn clear(&self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
