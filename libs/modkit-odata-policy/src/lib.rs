#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Per-operation `OData` query-option policy.
//!
//! API owners declare, per resource and operation, which query options
//! (`$filter`, `$orderby`, `$top`, ...) an operation accepts, which functions
//! and operators a `$filter` may use, and at what limits. The policy is built
//! during startup through fluent builders and read at request time by the
//! [`QueryValidator`].
//!
//! ```rust,ignore
//! use modkit_odata_policy::{AllowedFunctions, QueryOptionsRegistry, QueryRequest, QueryValidator};
//!
//! let mut registry = QueryOptionsRegistry::new();
//! registry
//!     .resource("orders")
//!     .operation("list_orders")
//!     .allow_top(100)?
//!     .allow_filter(0)?
//!     .allow_order_by(2, ["Name", "Id"])?
//!     .allow_functions(AllowedFunctions::CONTAINS);
//! let policy = registry.freeze();
//!
//! if let Some(settings) = policy.settings_for("orders", "list_orders") {
//!     QueryValidator::default().validate(settings, &QueryRequest::new().with_top(50))?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod limits;
pub mod operation;
pub mod registry;
pub mod resource;
pub mod settings;
pub mod validator;

pub use config::{ConfigError, OperationConfig, QueryOptionsConfig};
pub use error::PolicyError;
pub use flags::{
    AllowedArithmeticOperators, AllowedFunctions, AllowedLogicalOperators, AllowedQueryOptions,
};
pub use limits::DefaultLimits;
pub use operation::OperationQueryOptionsBuilder;
pub use registry::{QueryOptionsPolicy, QueryOptionsRegistry};
pub use resource::{OperationId, ResourceQueryOptionsBuilder};
pub use settings::ValidationSettings;
pub use validator::{QueryRequest, QueryValidator, ValidationError};
