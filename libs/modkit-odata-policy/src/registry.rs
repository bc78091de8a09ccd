//! Configuration-phase registry and the frozen, shareable policy it produces.
//!
//! Typical flow:
//! - During startup, route registration code receives `&mut QueryOptionsRegistry`
//!   and configures resources and operations through the fluent builders.
//! - Once every module has registered, the registry is frozen into a
//!   [`QueryOptionsPolicy`], which is immutable and cheap to clone.
//! - The request path holds the policy (usually in router state) and resolves
//!   settings per `(resource, operation)` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::resource::ResourceQueryOptionsBuilder;
use crate::settings::ValidationSettings;

/// Mutable registry of resource builders, keyed by resource name.
#[derive(Debug, Default)]
pub struct QueryOptionsRegistry {
    resources: HashMap<String, ResourceQueryOptionsBuilder>,
}

impl QueryOptionsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the builder for resource `name`, creating it on first use.
    pub fn resource(&mut self, name: &str) -> &mut ResourceQueryOptionsBuilder {
        self.resources
            .entry(name.to_owned())
            .or_insert_with(|| ResourceQueryOptionsBuilder::new(name))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResourceQueryOptionsBuilder> {
        self.resources.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// End the configuration phase.
    #[must_use]
    pub fn freeze(self) -> QueryOptionsPolicy {
        let operations: usize = self
            .resources
            .values()
            .map(ResourceQueryOptionsBuilder::len)
            .sum();
        tracing::info!(
            resources = self.resources.len(),
            operations,
            "Query options policy frozen"
        );
        QueryOptionsPolicy {
            resources: Arc::new(self.resources),
        }
    }
}

/// Read-only query-option policy shared with the request path.
#[derive(Debug, Clone, Default)]
pub struct QueryOptionsPolicy {
    resources: Arc<HashMap<String, ResourceQueryOptionsBuilder>>,
}

impl QueryOptionsPolicy {
    /// Effective settings for `operation` of `resource`.
    ///
    /// See [`ResourceQueryOptionsBuilder::settings_for`] for the resolution order.
    #[must_use]
    pub fn settings_for(&self, resource: &str, operation: &str) -> Option<&ValidationSettings> {
        self.resources
            .get(resource)
            .and_then(|r| r.settings_for(operation))
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceQueryOptionsBuilder> {
        self.resources.get(name)
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}
