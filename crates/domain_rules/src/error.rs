//! Rule validator errors
//!
//! Rules themselves never fail. Errors only arise at the string-tagged
//! boundary, when a payload cannot be read as the named rule's input.

use thiserror::Error;

/// Errors from the tagged rule entry point
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Malformed input for '{operation}': {reason}")]
    MalformedInput { operation: String, reason: String },
}

impl RuleError {
    pub fn malformed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        RuleError::MalformedInput {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
