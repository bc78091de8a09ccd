//! Resource-level builder: one [`OperationQueryOptionsBuilder`] per operation.
//!
//! Lookup is get-or-create, so every call site asking for the same
//! [`OperationId`] configures the same builder and the configuration is
//! cumulative.
//!
//! Resolution for an operation:
//! 1. the operation's own settings, if it has a builder (these *override*
//!    the resource defaults, they are not merged with them);
//! 2. otherwise the resource defaults, if any were configured;
//! 3. otherwise nothing, and the caller decides what an unconfigured
//!    operation means.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::operation::OperationQueryOptionsBuilder;
use crate::settings::ValidationSettings;

/// Opaque, stable identity of one operation (typically its `operationId`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(Arc<str>);

impl OperationId {
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        OperationId(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for OperationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OperationId {
    fn from(id: &str) -> Self {
        OperationId::new(id)
    }
}

impl From<String> for OperationId {
    fn from(id: String) -> Self {
        OperationId::new(id)
    }
}

/// Query-option policy for all operations of one API resource.
#[derive(Debug, Clone)]
pub struct ResourceQueryOptionsBuilder {
    name: Arc<str>,
    defaults: Option<OperationQueryOptionsBuilder>,
    operations: HashMap<OperationId, OperationQueryOptionsBuilder>,
}

impl ResourceQueryOptionsBuilder {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            defaults: None,
            operations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the builder for `id`, creating it on first use.
    pub fn operation(&mut self, id: impl Into<OperationId>) -> &mut OperationQueryOptionsBuilder {
        let resource = &self.name;
        self.operations.entry(id.into()).or_insert_with_key(|id| {
            tracing::debug!(%resource, operation = %id, "Created operation query options builder");
            OperationQueryOptionsBuilder::new()
        })
    }

    /// Builder for the settings applied to operations without a builder of their own.
    pub fn defaults(&mut self) -> &mut OperationQueryOptionsBuilder {
        self.defaults
            .get_or_insert_with(OperationQueryOptionsBuilder::new)
    }

    /// Resolve the effective settings for `id`.
    #[must_use]
    pub fn settings_for(&self, id: &str) -> Option<&ValidationSettings> {
        self.operations
            .get(id)
            .or(self.defaults.as_ref())
            .map(OperationQueryOptionsBuilder::settings)
    }

    /// Whether `id` has a builder of its own.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.operations.contains_key(id)
    }

    #[must_use]
    pub fn has_defaults(&self) -> bool {
        self.defaults.is_some()
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationId> {
        self.operations.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
