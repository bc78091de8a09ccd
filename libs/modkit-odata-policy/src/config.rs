//! Declarative query-options configuration.
//!
//! The `query_options` section of the application config describes the same
//! policy the fluent builders do. It is replayed through those builders, so
//! config-driven setup obeys the same rules (OR accumulation, zero means
//! default, negative limits rejected).
//!
//! ```yaml
//! query_options:
//!   defaults:
//!     max_top: 500
//!   resources:
//!     orders:
//!       defaults:
//!         filter: 50
//!       operations:
//!         list:
//!           query_options: "SELECT | COUNT"
//!           top: 100
//!           order_by: { max_node_count: 5, properties: ["Name", "Id"] }
//!           functions: "CONTAINS | STARTS_WITH"
//! ```

use std::collections::BTreeMap;

use figment::Figment;
use serde::Deserialize;

use crate::error::PolicyError;
use crate::flags::{
    AllowedArithmeticOperators, AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions,
};
use crate::limits::DefaultLimits;
use crate::operation::OperationQueryOptionsBuilder;
use crate::registry::QueryOptionsRegistry;
use crate::settings::ValidationSettings;

/// Key of the configuration section read by [`QueryOptionsConfig::from_figment`].
pub const CONFIG_KEY: &str = "query_options";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid query options config: {0}")]
    Invalid(#[source] Box<figment::Error>),
    #[error("invalid query options for '{resource}/{operation}': {source}")]
    Policy {
        resource: String,
        operation: String,
        #[source]
        source: PolicyError,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Invalid(Box::new(err))
    }
}

/// Root of the `query_options` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryOptionsConfig {
    /// System defaults for unset limits
    pub defaults: DefaultLimits,
    pub resources: BTreeMap<String, ResourceConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceConfig {
    /// Applied to operations of this resource that are not listed below
    pub defaults: Option<OperationConfig>,
    pub operations: BTreeMap<String, OperationConfig>,
}

/// One operation's policy. Limit fields mirror the builder arguments:
/// `0` grants the option without a cap, negative values are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationConfig {
    /// Full overwrite applied before every other entry
    pub use_settings: Option<ValidationSettings>,
    pub query_options: AllowedQueryOptions,
    pub functions: AllowedFunctions,
    pub arithmetic_operators: AllowedArithmeticOperators,
    pub logical_operators: AllowedLogicalOperators,
    pub top: Option<i32>,
    pub skip: Option<i32>,
    pub expand: Option<i32>,
    pub any_all: Option<i32>,
    pub filter: Option<i32>,
    pub order_by: Option<OrderByConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderByConfig {
    pub max_node_count: i32,
    pub properties: Vec<String>,
}

impl QueryOptionsConfig {
    /// Extract the `query_options` section. A missing section yields the default config.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the section exists but cannot be deserialized.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.focus(CONFIG_KEY).extract()?)
    }

    /// Replay this configuration into `registry`.
    ///
    /// # Errors
    /// Returns `ConfigError::Policy` naming the first operation whose entries
    /// the builder rejects.
    pub fn apply_to(&self, registry: &mut QueryOptionsRegistry) -> Result<(), ConfigError> {
        for (resource_name, resource) in &self.resources {
            let builder = registry.resource(resource_name);

            if let Some(defaults) = &resource.defaults {
                defaults
                    .apply(builder.defaults())
                    .map_err(|source| ConfigError::Policy {
                        resource: resource_name.clone(),
                        operation: "*".to_owned(),
                        source,
                    })?;
            }

            for (operation_name, operation) in &resource.operations {
                operation
                    .apply(builder.operation(operation_name.as_str()))
                    .map_err(|source| ConfigError::Policy {
                        resource: resource_name.clone(),
                        operation: operation_name.clone(),
                        source,
                    })?;
            }

            tracing::debug!(
                resource = %resource_name,
                operations = resource.operations.len(),
                "Applied query options config"
            );
        }
        Ok(())
    }

    /// Build a fresh registry from this configuration.
    ///
    /// # Errors
    /// See [`QueryOptionsConfig::apply_to`].
    pub fn build_registry(&self) -> Result<QueryOptionsRegistry, ConfigError> {
        let mut registry = QueryOptionsRegistry::new();
        self.apply_to(&mut registry)?;
        Ok(registry)
    }
}

impl OperationConfig {
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` for negative limits.
    pub fn apply(&self, builder: &mut OperationQueryOptionsBuilder) -> Result<(), PolicyError> {
        if let Some(settings) = &self.use_settings {
            builder.use_settings(settings);
        }

        builder
            .allow_query_options(self.query_options)
            .allow_functions(self.functions)
            .allow_arithmetic_operators(self.arithmetic_operators)
            .allow_logical_operators(self.logical_operators);

        if let Some(max) = self.top {
            builder.allow_top(max)?;
        }
        if let Some(max) = self.skip {
            builder.allow_skip(max)?;
        }
        if let Some(max) = self.expand {
            builder.allow_expand(max)?;
        }
        if let Some(max) = self.any_all {
            builder.allow_any_all(max)?;
        }
        if let Some(max) = self.filter {
            builder.allow_filter(max)?;
        }
        if let Some(order_by) = &self.order_by {
            builder.allow_order_by(order_by.max_node_count, order_by.properties.iter().cloned())?;
        }
        Ok(())
    }
}
