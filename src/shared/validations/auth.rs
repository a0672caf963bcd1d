use serde_json::Value;

use super::{
    validate_required_fields, validate_standard_api_format, validate_typed_fields, JsonType,
    ValidationReport,
};

/// Checks a login/refresh response: a success envelope whose `data` holds a
/// non-empty `token` and a `user` with `id` plus `username` or `email`.
pub fn validate_auth_response(body: &Value) -> ValidationReport {
    let mut report = validate_standard_api_format(body);

    if body.get("success").and_then(Value::as_bool) != Some(true) {
        report.push("authentication response must have `success: true`");
        return report;
    }
    let Some(data) = body.get("data") else {
        return report;
    };
    if !data.is_object() {
        report.push(format!("`data` must be an object, got {}", JsonType::of(data)));
        return report;
    }

    report.merge(
        validate_typed_fields(data, &[("token", JsonType::String), ("user", JsonType::Object)])
            .with_context("`data`"),
    );

    if data
        .get("token")
        .and_then(Value::as_str)
        .is_some_and(|token| token.trim().is_empty())
    {
        report.push("`data.token` must not be empty");
    }

    if let Some(user) = data.get("user").filter(|user| user.is_object()) {
        report.merge(validate_required_fields(user, &["id"]).with_context("`data.user`"));

        let has_identity = ["username", "email"]
            .iter()
            .any(|field| user.get(*field).is_some_and(|v| !v.is_null()));
        if !has_identity {
            report.push("`data.user` must include `username` or `email`");
        }
    }

    report
}
