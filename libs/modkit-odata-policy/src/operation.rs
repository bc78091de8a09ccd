//! Fluent builder for a single operation's query-option policy.
//!
//! Every `allow_*` method ORs capabilities into the owned
//! [`ValidationSettings`] and returns the same builder so calls chain:
//!
//! ```rust,ignore
//! registry
//!     .resource("orders")
//!     .operation("list")
//!     .allow_top(100)?
//!     .allow_skip(0)?
//!     .allow_order_by(5, ["Name", "Id"])?
//!     .allow_functions(AllowedFunctions::CONTAINS);
//! ```
//!
//! Numeric arguments follow the "zero means default" convention: `0` grants
//! the capability without touching the stored limit, a positive value sets
//! the limit, and a negative value is rejected before anything is mutated.

use crate::error::{PolicyError, optional_limit};
use crate::flags::{
    AllowedArithmeticOperators, AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions,
};
use crate::settings::ValidationSettings;

/// Accumulates the query-option policy of one operation.
///
/// Instances are handed out by [`crate::ResourceQueryOptionsBuilder::operation`],
/// which memoizes them per operation identity; there is no public constructor.
///
/// ```compile_fail
/// use modkit_odata_policy::OperationQueryOptionsBuilder;
///
/// let mut detached = OperationQueryOptionsBuilder::default();
/// detached.allow_top(5);
/// ```
///
/// ```compile_fail
/// use modkit_odata_policy::OperationQueryOptionsBuilder;
///
/// let mut detached = OperationQueryOptionsBuilder::new();
/// detached.allow_top(5);
/// ```
#[derive(Debug, Clone)]
pub struct OperationQueryOptionsBuilder {
    settings: ValidationSettings,
}

impl OperationQueryOptionsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            settings: ValidationSettings::default(),
        }
    }

    /// Current settings; these are what the request-time validator reads.
    #[must_use]
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    #[must_use]
    pub fn into_settings(self) -> ValidationSettings {
        self.settings
    }

    /// Replace the accumulated settings wholesale with a copy of `settings`.
    ///
    /// This is the only non-accumulating path: capabilities granted earlier
    /// and missing from `settings` are dropped.
    pub fn use_settings(&mut self, settings: &ValidationSettings) -> &mut Self {
        tracing::debug!("replacing operation query options with explicit settings");
        self.settings.copy_from(settings);
        self
    }

    pub fn allow_arithmetic_operators(
        &mut self,
        operators: AllowedArithmeticOperators,
    ) -> &mut Self {
        self.settings.allowed_arithmetic_operators |= operators;
        self
    }

    pub fn allow_functions(&mut self, functions: AllowedFunctions) -> &mut Self {
        self.settings.allowed_functions |= functions;
        self
    }

    pub fn allow_logical_operators(&mut self, operators: AllowedLogicalOperators) -> &mut Self {
        self.settings.allowed_logical_operators |= operators;
        self
    }

    pub fn allow_query_options(&mut self, options: AllowedQueryOptions) -> &mut Self {
        self.settings.allowed_query_options |= options;
        self
    }

    /// Allow `$skip`, optionally capping it at `max`.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max` is negative.
    pub fn allow_skip(&mut self, max: i32) -> Result<&mut Self, PolicyError> {
        let limit = optional_limit("max", max)?;
        self.settings.allowed_query_options |= AllowedQueryOptions::SKIP;
        set_if_some(&mut self.settings.max_skip, limit);
        Ok(self)
    }

    /// Allow `$top`, optionally capping it at `max`.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max` is negative.
    pub fn allow_top(&mut self, max: i32) -> Result<&mut Self, PolicyError> {
        let limit = optional_limit("max", max)?;
        self.settings.allowed_query_options |= AllowedQueryOptions::TOP;
        set_if_some(&mut self.settings.max_top, limit);
        Ok(self)
    }

    /// Allow `$expand`, optionally capping the expansion depth.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max_depth` is negative.
    pub fn allow_expand(&mut self, max_depth: i32) -> Result<&mut Self, PolicyError> {
        let limit = optional_limit("max_depth", max_depth)?;
        self.settings.allowed_query_options |= AllowedQueryOptions::EXPAND;
        set_if_some(&mut self.settings.max_expansion_depth, limit);
        Ok(self)
    }

    /// Allow the `any`/`all` lambda functions. Lambdas only appear inside
    /// `$filter`, so `$filter` is allowed as well.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max_expression_depth` is negative.
    pub fn allow_any_all(&mut self, max_expression_depth: i32) -> Result<&mut Self, PolicyError> {
        let limit = optional_limit("max_expression_depth", max_expression_depth)?;
        self.settings.allowed_functions |= AllowedFunctions::ANY | AllowedFunctions::ALL;
        self.settings.allowed_query_options |= AllowedQueryOptions::FILTER;
        set_if_some(&mut self.settings.max_any_all_expression_depth, limit);
        Ok(self)
    }

    /// Allow `$filter`, optionally capping the expression node count.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max_node_count` is negative.
    pub fn allow_filter(&mut self, max_node_count: i32) -> Result<&mut Self, PolicyError> {
        let limit = optional_limit("max_node_count", max_node_count)?;
        self.settings.allowed_query_options |= AllowedQueryOptions::FILTER;
        set_if_some(&mut self.settings.max_node_count, limit);
        Ok(self)
    }

    /// Allow `$orderby`, optionally capping its node count, and append
    /// `properties` to the allowed property list in the order given.
    ///
    /// Names are appended as-is; repeating a name across calls keeps both
    /// entries.
    ///
    /// # Errors
    /// Returns `PolicyError::InvalidArgument` if `max_node_count` is negative.
    pub fn allow_order_by<I, S>(
        &mut self,
        max_node_count: i32,
        properties: I,
    ) -> Result<&mut Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let limit = optional_limit("max_node_count", max_node_count)?;
        self.settings.allowed_query_options |= AllowedQueryOptions::ORDER_BY;
        set_if_some(&mut self.settings.max_order_by_node_count, limit);
        self.settings
            .allowed_order_by_properties
            .extend(properties.into_iter().map(Into::into));
        Ok(self)
    }

    /// Allow `$orderby` over `properties` without changing its node-count limit.
    pub fn allow_order_by_properties<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.allowed_query_options |= AllowedQueryOptions::ORDER_BY;
        self.settings
            .allowed_order_by_properties
            .extend(properties.into_iter().map(Into::into));
        self
    }
}

#[inline]
fn set_if_some(slot: &mut Option<u32>, value: Option<u32>) {
    if value.is_some() {
        *slot = value;
    }
}
