//! Paginated list checks
//!
//! Presence and type checks run first and all of them are reported.
//! Cross-field checks only run for fields whose types were valid, so one
//! malformed field does not cascade into arithmetic noise.

use serde_json::{Map, Value};

use super::{is_integer, JsonType, ValidationReport};

fn count_field(data: &Map<String, Value>, name: &str, report: &mut ValidationReport) -> Option<u64> {
    match data.get(name) {
        None => {
            report.push(format!("`data.{name}` is missing"));
            None
        }
        Some(value @ Value::Number(n)) => {
            let count = n
                .as_u64()
                .or_else(|| is_integer(value).then(|| n.as_f64()).flatten().filter(|f| *f >= 0.0).map(|f| f as u64));
            if count.is_none() {
                report.push(format!(
                    "`data.{name}` must be a non-negative integer, got {value}"
                ));
            }
            count
        }
        Some(other) => {
            report.push(format!(
                "`data.{name}` must be a number, got {}",
                JsonType::of(other)
            ));
            None
        }
    }
}

fn flag_field(data: &Map<String, Value>, name: &str, report: &mut ValidationReport) -> Option<bool> {
    match data.get(name) {
        None => {
            report.push(format!("`data.{name}` is missing"));
            None
        }
        Some(Value::Bool(flag)) => Some(*flag),
        Some(other) => {
            report.push(format!(
                "`data.{name}` must be a boolean, got {}",
                JsonType::of(other)
            ));
            None
        }
    }
}

/// Checks a paginated success body:
/// `{success: true, data: {items, total, page, pageSize, totalPages, hasNext, hasPrev}}`.
pub fn validate_pagination_response(body: &Value) -> ValidationReport {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return ValidationReport::single("paginated response must have `success: true`");
    }
    let Some(data) = body.get("data").and_then(Value::as_object) else {
        let found = body.get("data").map_or("nothing", |d| JsonType::of(d).as_str());
        return ValidationReport::single(format!(
            "paginated response `data` must be an object, got {found}"
        ));
    };

    let mut report = ValidationReport::new();

    let items = match data.get("items") {
        None => {
            report.push("`data.items` is missing");
            None
        }
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            report.push(format!(
                "`data.items` must be an array, got {}",
                JsonType::of(other)
            ));
            None
        }
    };
    let total = count_field(data, "total", &mut report);
    let page = count_field(data, "page", &mut report);
    let page_size = count_field(data, "pageSize", &mut report);
    let total_pages = count_field(data, "totalPages", &mut report);
    let has_next = flag_field(data, "hasNext", &mut report);
    let has_prev = flag_field(data, "hasPrev", &mut report);

    if let (Some(total), Some(page_size), Some(total_pages)) = (total, page_size, total_pages) {
        if page_size == 0 {
            report.push("`data.pageSize` must be at least 1 to derive `totalPages`");
        } else {
            let expected = total.div_ceil(page_size);
            if total_pages != expected {
                report.push(format!(
                    "`data.totalPages` should be ceil(total / pageSize) = ceil({total} / {page_size}) = {expected}, got {total_pages}"
                ));
            }
        }
    }

    if let (Some(page), Some(total_pages), Some(has_next)) = (page, total_pages, has_next) {
        let expected = page < total_pages;
        if has_next != expected {
            report.push(format!(
                "`data.hasNext` should be (page < totalPages) = ({page} < {total_pages}) = {expected}, got {has_next}"
            ));
        }
    }

    if let (Some(page), Some(has_prev)) = (page, has_prev) {
        let expected = page > 1;
        if has_prev != expected {
            report.push(format!(
                "`data.hasPrev` should be (page > 1) = ({page} > 1) = {expected}, got {has_prev}"
            ));
        }
    }

    if let (Some(items), Some(page_size)) = (items, page_size) {
        if items.len() as u64 > page_size {
            report.push(format!(
                "`data.items` has {} entries, more than pageSize {page_size}",
                items.len()
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(data: Value) -> Value {
        json!({"success": true, "data": data})
    }

    #[test]
    fn consistent_page_is_valid() {
        let report = validate_pagination_response(&body(json!({
            "items": [{"id": 1}, {"id": 2}],
            "total": 50,
            "page": 2,
            "pageSize": 10,
            "totalPages": 5,
            "hasNext": true,
            "hasPrev": true
        })));
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn empty_result_is_valid() {
        let report = validate_pagination_response(&body(json!({
            "items": [], "total": 0, "page": 1, "pageSize": 10,
            "totalPages": 0, "hasNext": false, "hasPrev": false
        })));
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn preconditions_short_circuit() {
        let report = validate_pagination_response(&json!({"success": false, "error": {}}));
        assert_eq!(report.errors().len(), 1);

        let report = validate_pagination_response(&json!({"success": true, "data": [1, 2]}));
        assert_eq!(
            report.errors(),
            &["paginated response `data` must be an object, got array".to_string()]
        );

        let report = validate_pagination_response(&json!(null));
        assert_eq!(report.errors().len(), 1);
    }

    #[test]
    fn reports_every_type_problem() {
        let report = validate_pagination_response(&body(json!({
            "items": "not an array",
            "total": "x"
        })));
        let errors = report.errors();
        assert!(errors.iter().any(|e| e.contains("`data.items` must be an array")));
        assert!(errors.iter().any(|e| e.contains("`data.total` must be a number")));
        assert!(errors.iter().any(|e| e == "`data.page` is missing"));
        assert!(errors.iter().any(|e| e == "`data.hasPrev` is missing"));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn consistency_checks_are_gated_on_types() {
        let report = validate_pagination_response(&body(json!({
            "items": [],
            "total": "50",
            "page": 2,
            "pageSize": 10,
            "totalPages": 5,
            "hasNext": true,
            "hasPrev": true
        })));
        assert_eq!(
            report.errors(),
            &["`data.total` must be a number, got string".to_string()]
        );
    }

    #[test]
    fn detects_inconsistent_fields() {
        let report = validate_pagination_response(&body(json!({
            "items": [1, 2, 3],
            "total": 21,
            "page": 1,
            "pageSize": 2,
            "totalPages": 10,
            "hasNext": false,
            "hasPrev": true
        })));
        let errors = report.errors();
        assert_eq!(errors.len(), 4, "{report}");
        assert!(errors[0].contains("= 11, got 10"));
        assert!(errors[1].contains("`data.hasNext`"));
        assert!(errors[2].contains("`data.hasPrev`"));
        assert!(errors[3].contains("more than pageSize 2"));
    }

    #[test]
    fn rejects_negative_and_fractional_counts() {
        let report = validate_pagination_response(&body(json!({
            "items": [], "total": -1, "page": 1.5, "pageSize": 10,
            "totalPages": 0, "hasNext": false, "hasPrev": false
        })));
        assert_eq!(report.errors().len(), 2, "{report}");
        assert!(report.errors()[0].contains("non-negative integer, got -1"));
    }

    #[test]
    fn zero_page_size_does_not_divide() {
        let report = validate_pagination_response(&body(json!({
            "items": [], "total": 5, "page": 1, "pageSize": 0,
            "totalPages": 1, "hasNext": false, "hasPrev": false
        })));
        assert!(report
            .errors()
            .iter()
            .any(|e| e.contains("`data.pageSize` must be at least 1")));
    }

    #[test]
    fn integral_floats_are_accepted() {
        let report = validate_pagination_response(&body(json!({
            "items": [], "total": 20.0, "page": 1, "pageSize": 10.0,
            "totalPages": 2, "hasNext": true, "hasPrev": false
        })));
        assert!(report.is_valid(), "{report}");
    }
}
