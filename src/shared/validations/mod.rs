//! Response format validators
//!
//! Every validator takes an already-received JSON body and returns a
//! [`ValidationReport`]; none of them panic or return early on the first
//! problem unless later checks would be meaningless.

pub mod auth;
pub mod envelope;
pub mod fields;
pub mod http;
pub mod pagination;
pub mod report;

pub use auth::*;
pub use envelope::*;
pub use fields::*;
pub use http::*;
pub use pagination::*;
pub use report::*;

use serde_json::Value;

/// `true` when `body.data` carries an `items` key, i.e. claims to be a page.
pub fn looks_paginated(body: &Value) -> bool {
    body.get("data")
        .and_then(Value::as_object)
        .is_some_and(|data| data.contains_key("items"))
}

/// Envelope check, plus the pagination checks for bodies that look paginated.
pub fn validate_response(body: &Value) -> ValidationReport {
    if looks_paginated(body) {
        create_api_validation_report(body, validate_pagination_response)
    } else {
        validate_standard_api_format(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_success_skips_pagination_checks() {
        let body = json!({"success": true, "data": {"id": 3, "name": "向日葵班"}});
        assert!(!looks_paginated(&body));
        assert!(validate_response(&body).is_valid());
    }

    #[test]
    fn page_like_data_is_checked_as_page() {
        let body = json!({"success": true, "data": {"items": [1], "total": 1}});
        assert!(looks_paginated(&body));
        let report = validate_response(&body);
        assert!(report.errors().iter().any(|e| e == "`data.page` is missing"));
    }
}
