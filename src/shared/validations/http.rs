//! Transport-level checks used next to the body validators

use std::time::Duration;

use serde_json::Value;

use super::{validate_standard_api_format, ValidationReport};

pub fn validate_http_status_code(status: u16, allowed: &[u16]) -> ValidationReport {
    if allowed.contains(&status) {
        return ValidationReport::new();
    }
    let allowed: Vec<String> = allowed.iter().map(u16::to_string).collect();
    ValidationReport::single(format!(
        "unexpected HTTP status {status}, expected one of [{}]",
        allowed.join(", ")
    ))
}

pub fn validate_response_time(elapsed: Duration, max: Duration) -> ValidationReport {
    if elapsed <= max {
        return ValidationReport::new();
    }
    ValidationReport::single(format!(
        "response took {}ms, limit is {}ms",
        elapsed.as_millis(),
        max.as_millis()
    ))
}

/// Standard envelope check followed by `validator`, merged into one report.
pub fn create_api_validation_report<F>(body: &Value, validator: F) -> ValidationReport
where
    F: FnOnce(&Value) -> ValidationReport,
{
    let mut report = validate_standard_api_format(body);
    report.merge(validator(body));
    report
}
