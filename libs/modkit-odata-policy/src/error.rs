//! Configuration-time errors raised by the policy builders.

/// Error raised when a builder method receives an argument it cannot accept.
///
/// These are programming errors in the configuration code, detected while the
/// application starts. They are never retried; startup should abort with the
/// message, which names the offending parameter and value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid argument '{param}': {reason}")]
    InvalidArgument { param: &'static str, reason: String },
}

impl PolicyError {
    pub(crate) fn negative(param: &'static str, value: i32) -> Self {
        PolicyError::InvalidArgument {
            param,
            reason: format!("must be non-negative, got {value}"),
        }
    }
}

/// Interpret a caller-supplied limit: negative is rejected, zero means
/// "leave the current limit alone", anything else is the new cap.
pub(crate) fn optional_limit(param: &'static str, value: i32) -> Result<Option<u32>, PolicyError> {
    match u32::try_from(value) {
        Ok(0) => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(PolicyError::negative(param, value)),
    }
}
