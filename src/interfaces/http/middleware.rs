//! Response contract middleware for Axum
//!
//! Buffers every `application/json` response, runs the format validators on
//! it and, depending on [`ContractMode`], logs, flags or replaces responses
//! that break the envelope contract.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/teachers", get(list_teachers))
//!     .layer(axum::middleware::from_fn_with_state(
//!         config.contract.clone(),
//!         response_contract_middleware,
//!     ));
//! ```

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{MatchedPath, State},
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use super::common::ApiError;
use crate::config::{ContractConfig, ContractMode};
use crate::shared::types::error_codes;
use crate::shared::validations::{validate_response, ValidationReport};

/// Header carrying the number of violations found in warn mode.
pub const CONTRACT_VIOLATIONS_HEADER: &str = "x-contract-violations";

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn inspect(bytes: &[u8]) -> ValidationReport {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(body) => validate_response(&body),
        Err(e) => ValidationReport::single(format!("response body is not valid JSON: {e}")),
    }
}

pub async fn response_contract_middleware(
    State(contract): State<ContractConfig>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    if contract.mode == ContractMode::Off || !is_json(&response) {
        return response;
    }

    // Unbounded or oversized bodies are never buffered.
    let upper = response.body().size_hint().upper();
    if upper.map_or(true, |len| len > contract.max_body_bytes as u64) {
        if contract.mode == ContractMode::Strict {
            error!(%method, %path, limit = contract.max_body_bytes, "Response too large for contract check");
            return ApiError::internal("Response too large for contract validation")
                .with_code(error_codes::RESPONSE_FORMAT_ERROR)
                .into_response();
        }
        warn!(%method, %path, limit = contract.max_body_bytes, "Response too large for contract check, passing through");
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, contract.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(%method, %path, "Failed to buffer response body for contract check: {}", e);
            return ApiError::internal("Response body could not be read")
                .with_code(error_codes::RESPONSE_FORMAT_ERROR)
                .into_response();
        }
    };

    let report = inspect(&bytes);
    if report.is_valid() {
        return Response::from_parts(parts, Body::from(bytes));
    }

    metrics::counter!(
        "api_contract_violations_total",
        "method" => method.clone(),
        "path" => path.clone()
    )
    .increment(1);

    match contract.mode {
        ContractMode::Strict => {
            error!(%method, %path, status = parts.status.as_u16(), violations = %report, "Response rejected by contract check");
            ApiError::internal("Response failed contract validation")
                .with_code(error_codes::RESPONSE_FORMAT_ERROR)
                .into_response()
        }
        _ => {
            warn!(%method, %path, status = parts.status.as_u16(), violations = %report, "Response violates the API contract");
            parts.headers.insert(
                CONTRACT_VIOLATIONS_HEADER,
                HeaderValue::from(report.errors().len()),
            );
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use crate::interfaces::http::common::created;
    use crate::shared::types::{create_pagination_response, PaginationParams};

    async fn good_page() -> Response {
        create_pagination_response(vec![json!({"id": 1})], 1, &PaginationParams::default(), None)
            .into_response()
    }

    async fn bad_page() -> Json<serde_json::Value> {
        Json(json!({
            "success": true,
            "data": {"items": [], "total": 30, "page": 1, "pageSize": 10,
                     "totalPages": 1, "hasNext": false, "hasPrev": false}
        }))
    }

    async fn legacy() -> Json<serde_json::Value> {
        Json(json!({"code": 200, "list": []}))
    }

    async fn plain_text() -> &'static str {
        "pong"
    }

    async fn large_report() -> Json<serde_json::Value> {
        Json(json!({"success": true, "data": {"blob": "x".repeat(64)}}))
    }

    async fn bad_student() -> Json<serde_json::Value> {
        Json(json!({"success": true}))
    }

    async fn new_class() -> Response {
        created(json!({"id": 5, "name": "向日葵班"}))
    }

    fn app(mode: ContractMode) -> Router {
        app_with(ContractConfig {
            mode,
            ..ContractConfig::default()
        })
    }

    fn app_with(contract: ContractConfig) -> Router {
        Router::new()
            .route("/good", get(good_page))
            .route("/bad", get(bad_page))
            .route("/legacy", get(legacy))
            .route("/ping", get(plain_text))
            .route("/classes", get(new_class))
            .route("/reports/large", get(large_report))
            .route("/students/{id}", get(bad_student))
            .layer(axum::middleware::from_fn_with_state(
                contract,
                response_contract_middleware,
            ))
    }

    async fn send(app: Router, uri: &str) -> Response {
        use tower::Service;
        let mut svc = app.into_service();
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        svc.call(req).await.unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conforming_response_passes_untouched() {
        let resp = send(app(ContractMode::Strict), "/good").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(CONTRACT_VIOLATIONS_HEADER).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["data"]["totalPages"], 1);
    }

    #[tokio::test]
    async fn created_response_passes() {
        let resp = send(app(ContractMode::Strict), "/classes").await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn warn_mode_flags_violations() {
        let resp = send(app(ContractMode::Warn), "/bad").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTRACT_VIOLATIONS_HEADER], "1");
        let body = body_json(resp).await;
        assert_eq!(body["data"]["total"], 30);
    }

    #[tokio::test]
    async fn strict_mode_replaces_violations() {
        let resp = send(app(ContractMode::Strict), "/legacy").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], error_codes::RESPONSE_FORMAT_ERROR);
    }

    #[tokio::test]
    async fn off_mode_ignores_everything() {
        let resp = send(app(ContractMode::Off), "/legacy").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(CONTRACT_VIOLATIONS_HEADER).is_none());
    }

    #[tokio::test]
    async fn non_json_responses_are_skipped() {
        let resp = send(app(ContractMode::Strict), "/ping").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_body_passes_through_in_warn_mode() {
        let app = app_with(ContractConfig {
            mode: ContractMode::Warn,
            max_body_bytes: 16,
        });
        let resp = send(app, "/reports/large").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(CONTRACT_VIOLATIONS_HEADER).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["data"]["blob"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_in_strict_mode() {
        let app = app_with(ContractConfig {
            mode: ContractMode::Strict,
            max_body_bytes: 16,
        });
        let resp = send(app, "/reports/large").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], error_codes::RESPONSE_FORMAT_ERROR);
    }

    mod labels {
        use std::sync::{Arc, Mutex};

        use metrics::{
            Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
        };

        /// Keeps the `path` label of every registered counter.
        #[derive(Default)]
        pub struct PathLabels(pub Arc<Mutex<Vec<String>>>);

        impl Recorder for PathLabels {
            fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
            fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

            fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
                let mut seen = self.0.lock().unwrap();
                seen.extend(
                    key.labels()
                        .filter(|label| label.key() == "path")
                        .map(|label| label.value().to_string()),
                );
                Counter::noop()
            }

            fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
                Gauge::noop()
            }

            fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
                Histogram::noop()
            }
        }
    }

    #[tokio::test]
    async fn violation_counter_uses_route_template() {
        let recorder = labels::PathLabels::default();
        let seen = recorder.0.clone();
        let _guard = metrics::set_default_local_recorder(&recorder);

        send(app(ContractMode::Warn), "/students/123").await;
        send(app(ContractMode::Warn), "/students/456").await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &["/students/{id}", "/students/{id}"]);
    }
}
