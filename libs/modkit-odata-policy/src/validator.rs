//! Request-time enforcement of a [`ValidationSettings`] policy.
//!
//! The validator does not parse query strings. The HTTP layer parses the
//! query and describes what it uses in a [`QueryRequest`]: which options are
//! present, which functions and operators the `$filter` contains, and the
//! numeric shape of the request. The validator then checks that description
//! against the operation's settings, falling back to [`DefaultLimits`] for
//! any limit the settings leave unset.

use crate::flags::{
    AllowedArithmeticOperators, AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions,
    flag_names,
};
use crate::limits::DefaultLimits;
use crate::settings::ValidationSettings;

/// Description of an already-parsed query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct QueryRequest {
    pub query_options: AllowedQueryOptions,
    pub functions: AllowedFunctions,
    pub arithmetic_operators: AllowedArithmeticOperators,
    pub logical_operators: AllowedLogicalOperators,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub expansion_depth: Option<u32>,
    pub any_all_depth: Option<u32>,
    pub filter_node_count: Option<u32>,
    pub order_by: Vec<String>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.query_options |= AllowedQueryOptions::TOP;
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.query_options |= AllowedQueryOptions::SKIP;
        self.skip = Some(skip);
        self
    }

    pub fn with_expand(mut self, depth: u32) -> Self {
        self.query_options |= AllowedQueryOptions::EXPAND;
        self.expansion_depth = Some(depth);
        self
    }

    /// `$filter` with the given AST node count.
    pub fn with_filter(mut self, node_count: u32) -> Self {
        self.query_options |= AllowedQueryOptions::FILTER;
        self.filter_node_count = Some(node_count);
        self
    }

    /// Record `any`/`all` usage with the deepest lambda nesting seen.
    pub fn with_any_all(mut self, depth: u32) -> Self {
        self.any_all_depth = Some(depth);
        self
    }

    pub fn with_functions(mut self, functions: AllowedFunctions) -> Self {
        self.functions |= functions;
        self
    }

    pub fn with_arithmetic_operators(mut self, operators: AllowedArithmeticOperators) -> Self {
        self.arithmetic_operators |= operators;
        self
    }

    pub fn with_logical_operators(mut self, operators: AllowedLogicalOperators) -> Self {
        self.logical_operators |= operators;
        self
    }

    pub fn with_order_by<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_options |= AllowedQueryOptions::ORDER_BY;
        self.order_by.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn with_query_options(mut self, options: AllowedQueryOptions) -> Self {
        self.query_options |= options;
        self
    }

    fn order_by_node_count(&self) -> Option<u32> {
        if self.order_by.is_empty() {
            None
        } else {
            Some(u32::try_from(self.order_by.len()).unwrap_or(u32::MAX))
        }
    }
}

/// Reasons a request is rejected by its operation's policy.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query option(s) not allowed: {0}")]
    QueryOptionNotAllowed(String),

    #[error("function(s) not allowed: {0}")]
    FunctionNotAllowed(String),

    #[error("arithmetic operator(s) not allowed: {0}")]
    ArithmeticOperatorNotAllowed(String),

    #[error("logical operator(s) not allowed: {0}")]
    LogicalOperatorNotAllowed(String),

    #[error("{limit} of {value} exceeds the maximum of {max}")]
    LimitExceeded {
        limit: &'static str,
        value: u32,
        max: u32,
    },

    #[error("$orderby property not allowed: {0}")]
    OrderByPropertyNotAllowed(String),
}

/// Checks [`QueryRequest`]s against operation settings.
#[derive(Debug, Clone, Default)]
pub struct QueryValidator {
    defaults: DefaultLimits,
}

impl QueryValidator {
    #[must_use]
    pub fn new(defaults: DefaultLimits) -> Self {
        Self { defaults }
    }

    #[must_use]
    pub fn defaults(&self) -> &DefaultLimits {
        &self.defaults
    }

    /// Validate `request` against `settings`.
    ///
    /// Capability checks run before limit checks, so a disallowed option is
    /// reported even if its value would also exceed a limit.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] found.
    pub fn validate(
        &self,
        settings: &ValidationSettings,
        request: &QueryRequest,
    ) -> Result<(), ValidationError> {
        let result = Self::check_capabilities(settings, request)
            .and_then(|()| self.check_limits(settings, request))
            .and_then(|()| Self::check_order_by(settings, request));

        if let Err(err) = &result {
            tracing::debug!(error = %err, "Query rejected by query options policy");
        }
        result
    }

    fn check_capabilities(
        settings: &ValidationSettings,
        request: &QueryRequest,
    ) -> Result<(), ValidationError> {
        let options = request.query_options - settings.allowed_query_options;
        if !options.is_empty() {
            return Err(ValidationError::QueryOptionNotAllowed(flag_names(&options)));
        }

        let functions = request.functions - settings.allowed_functions;
        if !functions.is_empty() {
            return Err(ValidationError::FunctionNotAllowed(flag_names(&functions)));
        }

        let arithmetic = request.arithmetic_operators - settings.allowed_arithmetic_operators;
        if !arithmetic.is_empty() {
            return Err(ValidationError::ArithmeticOperatorNotAllowed(flag_names(
                &arithmetic,
            )));
        }

        let logical = request.logical_operators - settings.allowed_logical_operators;
        if !logical.is_empty() {
            return Err(ValidationError::LogicalOperatorNotAllowed(flag_names(
                &logical,
            )));
        }

        Ok(())
    }

    fn check_limits(
        &self,
        settings: &ValidationSettings,
        request: &QueryRequest,
    ) -> Result<(), ValidationError> {
        let d = &self.defaults;
        check_limit("$top", request.top, settings.max_top.or(Some(d.max_top)))?;
        check_limit("$skip", request.skip, settings.max_skip.or(d.max_skip))?;
        check_limit(
            "$expand depth",
            request.expansion_depth,
            settings.max_expansion_depth.or(Some(d.max_expansion_depth)),
        )?;
        check_limit(
            "any/all depth",
            request.any_all_depth,
            settings
                .max_any_all_expression_depth
                .or(Some(d.max_any_all_expression_depth)),
        )?;
        check_limit(
            "$filter node count",
            request.filter_node_count,
            settings.max_node_count.or(Some(d.max_node_count)),
        )?;
        check_limit(
            "$orderby node count",
            request.order_by_node_count(),
            settings
                .max_order_by_node_count
                .or(Some(d.max_order_by_node_count)),
        )
    }

    fn check_order_by(
        settings: &ValidationSettings,
        request: &QueryRequest,
    ) -> Result<(), ValidationError> {
        match request
            .order_by
            .iter()
            .find(|p| !settings.is_order_by_property_allowed(p))
        {
            Some(property) => Err(ValidationError::OrderByPropertyNotAllowed(property.clone())),
            None => Ok(()),
        }
    }
}

fn check_limit(
    limit: &'static str,
    value: Option<u32>,
    max: Option<u32>,
) -> Result<(), ValidationError> {
    match (value, max) {
        (Some(value), Some(max)) if value > max => {
            Err(ValidationError::LimitExceeded { limit, value, max })
        }
        _ => Ok(()),
    }
}
