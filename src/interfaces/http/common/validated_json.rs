//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! Unparseable bodies are answered with 400 `INVALID_JSON`, failed
//! validation with 422 `VALIDATION_ERROR`, both as failure envelopes.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiError;
use crate::shared::types::error_codes;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateParent {
///     #[validate(length(min = 1, max = 50))]
///     name: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateParent>) {
///     // `body` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(validator::ValidationErrors),
}

/// `field: message` pairs, sorted by field so responses are stable.
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                ApiError::bad_request(format!("Invalid JSON: {}", rejection.body_text()))
                    .with_code(error_codes::INVALID_JSON)
                    .into_response()
            }
            Self::ValidationError(errors) => ApiError::validation(describe(&errors)).into_response(),
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    use crate::shared::validations::validate_error_response;

    #[derive(Debug, Deserialize, Validate)]
    struct EnrollmentBody {
        #[validate(length(min = 1, max = 10))]
        child_name: String,
        #[validate(range(min = 2, max = 7))]
        age: u32,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<EnrollmentBody>) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new().route("/enrollments", post(handler))
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    fn json_request(body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/enrollments")
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    async fn body_json(resp: axum::http::Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let body = serde_json::json!({"child_name": "小明", "age": 4});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400_envelope() {
        let resp = send(json_request(Body::from("not json"))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert!(validate_error_response(&body, Some(error_codes::INVALID_JSON)).is_valid());
    }

    #[tokio::test]
    async fn validation_failure_returns_422_envelope() {
        let body = serde_json::json!({"child_name": "", "age": 12});
        let resp = send(json_request(Body::from(serde_json::to_vec(&body).unwrap()))).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(resp).await;
        assert!(validate_error_response(&body, Some(error_codes::VALIDATION_ERROR)).is_valid());
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("age: "));
        assert!(message.contains("child_name: "));
    }
}
