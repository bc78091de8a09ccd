//! Accumulated query-option policy for a single operation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::flags::{
    AllowedArithmeticOperators, AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions,
};

/// Allowed capabilities and limits for one operation.
///
/// Limits are `None` when unset, meaning the system default applies
/// (see [`crate::DefaultLimits`]). An empty `allowed_order_by_properties`
/// means any property may be used in `$orderby`.
///
/// When deserialized, a limit of `0` reads as unset, matching the builder
/// arguments. [`ValidationSettings::copy_from`] copies values as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub allowed_arithmetic_operators: AllowedArithmeticOperators,
    pub allowed_functions: AllowedFunctions,
    pub allowed_logical_operators: AllowedLogicalOperators,
    pub allowed_query_options: AllowedQueryOptions,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_skip: Option<u32>,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_top: Option<u32>,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_expansion_depth: Option<u32>,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_any_all_expression_depth: Option<u32>,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_node_count: Option<u32>,
    #[serde(deserialize_with = "zero_as_unset")]
    pub max_order_by_node_count: Option<u32>,
    pub allowed_order_by_properties: Vec<String>,
}

impl ValidationSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every field with the values from `other`.
    ///
    /// Unlike the builder's `allow_*` methods this replaces rather than ORs:
    /// flags set here but absent from `other` are cleared.
    pub fn copy_from(&mut self, other: &ValidationSettings) {
        self.allowed_arithmetic_operators = other.allowed_arithmetic_operators;
        self.allowed_functions = other.allowed_functions;
        self.allowed_logical_operators = other.allowed_logical_operators;
        self.allowed_query_options = other.allowed_query_options;
        self.max_skip = other.max_skip;
        self.max_top = other.max_top;
        self.max_expansion_depth = other.max_expansion_depth;
        self.max_any_all_expression_depth = other.max_any_all_expression_depth;
        self.max_node_count = other.max_node_count;
        self.max_order_by_node_count = other.max_order_by_node_count;
        self.allowed_order_by_properties
            .clone_from(&other.allowed_order_by_properties);
    }

    #[must_use]
    pub fn is_allowed_query_option(&self, options: AllowedQueryOptions) -> bool {
        self.allowed_query_options.contains(options)
    }

    #[must_use]
    pub fn is_allowed_function(&self, functions: AllowedFunctions) -> bool {
        self.allowed_functions.contains(functions)
    }

    #[must_use]
    pub fn is_allowed_arithmetic_operator(&self, operators: AllowedArithmeticOperators) -> bool {
        self.allowed_arithmetic_operators.contains(operators)
    }

    #[must_use]
    pub fn is_allowed_logical_operator(&self, operators: AllowedLogicalOperators) -> bool {
        self.allowed_logical_operators.contains(operators)
    }

    /// Property names are compared case-sensitively, as `OData` does.
    #[must_use]
    pub fn is_order_by_property_allowed(&self, property: &str) -> bool {
        self.allowed_order_by_properties.is_empty()
            || self
                .allowed_order_by_properties
                .iter()
                .any(|p| p == property)
    }
}

fn zero_as_unset<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.filter(|limit| *limit != 0))
}
