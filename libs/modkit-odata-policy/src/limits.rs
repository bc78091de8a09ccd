//! System-wide default limits for `OData` query options
//!
//! An operation's [`ValidationSettings`](crate::ValidationSettings) leaves a
//! limit unset when the builder was called with zero. At request time the
//! validator falls back to these defaults:
//! - Maximum `$top` value
//! - Maximum `$skip` value (unbounded unless configured)
//! - Maximum `$expand` depth
//! - Maximum nesting of `any`/`all` lambdas
//! - Maximum `$filter` and `$orderby` node counts

use serde::Deserialize;

/// Default configuration for `OData` query limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultLimits {
    /// Maximum value for $top (default: 1000)
    pub max_top: u32,
    /// Maximum value for $skip (default: unbounded)
    pub max_skip: Option<u32>,
    /// Maximum $expand depth (default: 2)
    pub max_expansion_depth: u32,
    /// Maximum nesting depth of any/all lambdas (default: 1)
    pub max_any_all_expression_depth: u32,
    /// Maximum number of nodes in a $filter expression (default: 100)
    pub max_node_count: u32,
    /// Maximum number of nodes in $orderby (default: 5)
    pub max_order_by_node_count: u32,
}

impl Default for DefaultLimits {
    fn default() -> Self {
        Self {
            max_top: 1000,
            max_skip: None,
            max_expansion_depth: 2,
            max_any_all_expression_depth: 1,
            max_node_count: 100,
            max_order_by_node_count: 5,
        }
    }
}

impl DefaultLimits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum $top value
    #[must_use]
    pub fn with_max_top(mut self, max_top: u32) -> Self {
        self.max_top = max_top;
        self
    }

    /// Cap $skip (unbounded by default)
    #[must_use]
    pub fn with_max_skip(mut self, max_skip: u32) -> Self {
        self.max_skip = Some(max_skip);
        self
    }

    #[must_use]
    pub fn with_max_expansion_depth(mut self, max: u32) -> Self {
        self.max_expansion_depth = max;
        self
    }

    #[must_use]
    pub fn with_max_any_all_expression_depth(mut self, max: u32) -> Self {
        self.max_any_all_expression_depth = max;
        self
    }

    /// Set maximum $filter node count
    #[must_use]
    pub fn with_max_node_count(mut self, max: u32) -> Self {
        self.max_node_count = max;
        self
    }

    /// Set maximum $orderby node count
    #[must_use]
    pub fn with_max_order_by_node_count(mut self, max: u32) -> Self {
        self.max_order_by_node_count = max;
        self
    }
}
