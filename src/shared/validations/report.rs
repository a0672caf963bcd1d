use std::fmt;

use serde::Serialize;

use crate::shared::types::ContractError;

/// Outcome of a format check: `valid` plus every violation found, in the
/// order the checks ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    valid: bool,
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn single(error: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push(error);
        report
    }

    pub fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.valid = false;
    }

    /// Appends the other report's errors, skipping ones already recorded.
    pub fn merge(&mut self, other: ValidationReport) {
        for error in other.errors {
            if !self.errors.contains(&error) {
                self.push(error);
            }
        }
    }

    /// Prefixes every error with `context`, e.g. the path of the checked object.
    pub fn with_context(mut self, context: &str) -> Self {
        for error in &mut self.errors {
            *error = format!("{context}: {error}");
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// All accumulated errors in one [`ContractError::InvalidFormat`].
    pub fn into_result(self) -> Result<(), ContractError> {
        if self.valid {
            Ok(())
        } else {
            Err(ContractError::InvalidFormat(self.errors.join("; ")))
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return f.write_str("valid");
        }
        write!(
            f,
            "{} error{}: {}",
            self.errors.len(),
            if self.errors.len() == 1 { "" } else { "s" },
            self.errors.join("; ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_invalidates() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());
        report.push("`success` is missing");
        assert!(!report.is_valid());
        assert_eq!(report.to_string(), "1 error: `success` is missing");
    }

    #[test]
    fn merge_skips_duplicates() {
        let mut a = ValidationReport::single("one");
        let mut b = ValidationReport::single("one");
        b.push("two");
        a.merge(b);
        assert_eq!(a.errors(), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn merge_of_valid_reports_stays_valid() {
        let mut a = ValidationReport::new();
        a.merge(ValidationReport::new());
        assert!(a.is_valid());
        assert!(a.into_result().is_ok());
    }

    #[test]
    fn context_prefixes_errors() {
        let report = ValidationReport::single("missing required field `id`").with_context("`data.user`");
        assert_eq!(report.errors(), &["`data.user`: missing required field `id`".to_string()]);
        assert!(ValidationReport::new().with_context("`data`").is_valid());
    }

    #[test]
    fn into_result_joins_errors() {
        let mut report = ValidationReport::single("a");
        report.push("b");
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Response format invalid: a; b");
    }

    #[test]
    fn serializes_as_valid_and_errors() {
        let report = ValidationReport::single("bad");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"valid": false, "errors": ["bad"]})
        );
    }
}
