//! Validation result shared by every rule

use serde::{Deserialize, Serialize};

/// Result of a rule check
///
/// Serialized as `{isValid, errors, warnings}` for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the checked operation may proceed
    pub is_valid: bool,
    /// Hard failures that block the operation
    pub errors: Vec<String>,
    /// Advisory issues that require explicit confirmation
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed validation result with errors
    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds the error raised when a figure leaves the decimal range
    pub fn add_range_error(&mut self, figure: &str) {
        self.add_error(format!("{figure} exceeds supported range"));
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Returns true if any warning was raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Builds the confirm/cancel prompt listing every warning
    ///
    /// Returns `None` when there is nothing to confirm.
    pub fn confirmation_prompt(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        let mut prompt = String::from("Please review the following warnings:\n");
        for warning in &self.warnings {
            prompt.push_str("- ");
            prompt.push_str(warning);
            prompt.push('\n');
        }
        prompt.push_str("Do you want to proceed?");
        Some(prompt)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error_invalidates() {
        let mut result = ValidationResult::ok();
        result.add_warning("advisory");
        assert!(result.is_valid);
        result.add_error("blocking");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_merge_keeps_both_lists() {
        let mut first = ValidationResult::ok();
        first.add_warning("w1");
        let second = ValidationResult::fail(vec!["e1".to_string()]);
        first.merge(second);
        assert!(!first.is_valid);
        assert_eq!(first.errors, vec!["e1"]);
        assert_eq!(first.warnings, vec!["w1"]);
    }

    #[test]
    fn test_confirmation_prompt_lists_every_warning() {
        let mut result = ValidationResult::ok();
        assert!(result.confirmation_prompt().is_none());
        result.add_warning("first");
        result.add_warning("second");
        let prompt = result.confirmation_prompt().unwrap();
        assert!(prompt.contains("- first"));
        assert!(prompt.contains("- second"));
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let json = serde_json::to_value(ValidationResult::ok()).unwrap();
        assert_eq!(json["isValid"], true);
    }
}
