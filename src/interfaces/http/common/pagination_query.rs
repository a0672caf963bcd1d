//! Pagination extractor for Axum
//!
//! `Pagination` reads `page`, `pageSize`, `sortBy` and `sortOrder` from the
//! query string. It never rejects a request: malformed values, and even a
//! malformed query string, fall back to defaults.

use std::collections::HashMap;
use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use tracing::debug;

use crate::config::PaginationConfig;
use crate::shared::types::{parse_pagination_params_with, PaginationParams};

/// Parsed pagination of the current request.
///
/// Bounds come from a [`PaginationConfig`] request extension when one is
/// installed (`.layer(Extension(config))`), otherwise from the defaults.
///
/// ```ignore
/// async fn list_teachers(Pagination(params): Pagination) -> ApiResponse<PaginatedResponse<Teacher>> {
///     let (rows, total) = repo.page(params.offset(), params.limit()).await?;
///     create_pagination_response(rows, total, &params, Some("获取教师列表成功"))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination(pub PaginationParams);

impl Deref for Pagination {
    type Target = PaginationParams;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
            Ok(Query(raw)) => raw,
            Err(e) => {
                debug!("Unparseable query string, using pagination defaults: {}", e);
                HashMap::new()
            }
        };

        let params = match parts.extensions.get::<PaginationConfig>() {
            Some(config) => parse_pagination_params_with(&raw, config),
            None => parse_pagination_params_with(&raw, &PaginationConfig::default()),
        };
        Ok(Pagination(params))
    }
}
