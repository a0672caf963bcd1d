//! Standard envelope checks

use serde_json::{Map, Value};

use super::{JsonType, ValidationReport};

fn check_error_object(error: &Value, report: &mut ValidationReport) {
    let Some(error) = error.as_object() else {
        report.push(format!("`error` must be an object, got {}", JsonType::of(error)));
        return;
    };
    for field in ["code", "message"] {
        match error.get(field) {
            None => report.push(format!("`error.{field}` is missing")),
            Some(Value::String(_)) => {}
            Some(other) => report.push(format!(
                "`error.{field}` must be a string, got {}",
                JsonType::of(other)
            )),
        }
    }
}

fn check_envelope(obj: &Map<String, Value>, report: &mut ValidationReport) {
    match obj.get("success") {
        None => report.push("missing required field `success`"),
        Some(Value::Bool(true)) => match obj.get("data") {
            None => report.push("success response must include `data`"),
            Some(Value::Null) => report.push("`data` must not be null in a success response"),
            Some(_) => {}
        },
        Some(Value::Bool(false)) => match obj.get("error") {
            None => report.push("failure response must include `error`"),
            Some(error) => check_error_object(error, report),
        },
        Some(other) => report.push(format!(
            "`success` must be a boolean, got {}",
            JsonType::of(other)
        )),
    }

    if let Some(message) = obj.get("message") {
        if !message.is_string() {
            report.push(format!(
                "`message` must be a string, got {}",
                JsonType::of(message)
            ));
        }
    }
}

/// Checks `body` against `{success, data | error, message?}`.
///
/// Never panics; a non-object body yields a single error.
pub fn validate_standard_api_format(body: &Value) -> ValidationReport {
    let Some(obj) = body.as_object() else {
        return ValidationReport::single(format!(
            "response body must be a JSON object, got {}",
            JsonType::of(body)
        ));
    };

    let mut report = ValidationReport::new();
    check_envelope(obj, &mut report);
    report
}

/// Checks that `body` is a well-formed failure envelope, optionally carrying
/// `expected_code`.
pub fn validate_error_response(body: &Value, expected_code: Option<&str>) -> ValidationReport {
    let mut report = validate_standard_api_format(body);

    if body.get("success").and_then(Value::as_bool) == Some(true) {
        report.push("expected a failure response (`success: false`), got `success: true`");
    }

    if let (Some(expected), Some(actual)) = (
        expected_code,
        body.pointer("/error/code").and_then(Value::as_str),
    ) {
        if expected != actual {
            report.push(format!(
                "expected error code `{expected}`, got `{actual}`"
            ));
        }
    }
    report
}
