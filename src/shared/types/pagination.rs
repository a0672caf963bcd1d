//! Pagination contract
//!
//! Turns raw query values into bounded [`PaginationParams`] and result pages
//! into [`PaginatedResponse`] envelopes whose derived fields always agree with
//! `total`, `page` and `pageSize`.

use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::envelope::ApiResponse;
use super::errors::NormalizationError;
use crate::config::PaginationConfig;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
pub const SORT_BY_PARAM: &str = "sortBy";
pub const SORT_ORDER_PARAM: &str = "sortOrder";

/// Sort direction. Parsed case-insensitively, always emitted upper-case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[default]
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortOrder {
    /// Matches `asc` / `desc` in any case; anything else is `None`.
    pub fn from_query(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded pagination request.
///
/// `page >= 1` and `1 <= page_size <= max_page_size` hold for every value of
/// this type, whatever the raw input was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    page: u64,
    page_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
    sort_order: SortOrder,
}

impl PaginationParams {
    /// Builds params from already-numeric values, applying the default bounds.
    pub fn new(page: u64, page_size: u64) -> Self {
        let config = PaginationConfig::default();
        Self {
            page: page.max(DEFAULT_PAGE),
            page_size: bounded_page_size(Some(page_size).filter(|s| *s >= 1), &config),
            sort_by: None,
            sort_order: config.default_sort_order,
        }
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = sort_order;
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Row offset for `LIMIT/OFFSET` queries.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

enum ParsedCount {
    Value(u64),
    TooLarge,
    Invalid,
}

fn parse_count(raw: &str) -> ParsedCount {
    match raw.trim().parse::<u64>() {
        Ok(n) => ParsedCount::Value(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => ParsedCount::TooLarge,
        // negative numbers land here too
        Err(_) => ParsedCount::Invalid,
    }
}

fn bounded_page_size(requested: Option<u64>, config: &PaginationConfig) -> u64 {
    let max = config.max_page_size.max(1);
    let default = config.default_page_size.clamp(1, max);
    requested.map_or(default, |size| size.min(max))
}

fn resolve_page(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return DEFAULT_PAGE;
    };
    match parse_count(raw) {
        ParsedCount::Value(n) if n >= 1 => n,
        ParsedCount::TooLarge => u64::MAX,
        _ => {
            debug!(param = PAGE_PARAM, raw, "Invalid page, using default");
            DEFAULT_PAGE
        }
    }
}

fn resolve_page_size(raw: Option<&str>, config: &PaginationConfig) -> u64 {
    let Some(raw) = raw else {
        return bounded_page_size(None, config);
    };
    let requested = match parse_count(raw) {
        ParsedCount::Value(n) if n >= 1 => Some(n),
        ParsedCount::Value(_) | ParsedCount::Invalid => {
            debug!(param = PAGE_SIZE_PARAM, raw, "Invalid page size, using default");
            None
        }
        ParsedCount::TooLarge => Some(u64::MAX),
    };
    let size = bounded_page_size(requested, config);
    if requested.is_some_and(|r| r != size) {
        debug!(param = PAGE_SIZE_PARAM, raw, clamped = size, "Page size clamped");
    }
    size
}

/// Parses raw query values with the default bounds (10 per page, at most 100).
///
/// Never fails: anything unusable silently becomes a safe default.
pub fn parse_pagination_params(raw: &HashMap<String, String>) -> PaginationParams {
    parse_pagination_params_with(raw, &PaginationConfig::default())
}

/// Same as [`parse_pagination_params`] with configurable bounds.
pub fn parse_pagination_params_with(
    raw: &HashMap<String, String>,
    config: &PaginationConfig,
) -> PaginationParams {
    let page = resolve_page(raw.get(PAGE_PARAM).map(String::as_str));
    let page_size = resolve_page_size(raw.get(PAGE_SIZE_PARAM).map(String::as_str), config);

    let sort_by = raw
        .get(SORT_BY_PARAM)
        .filter(|s| !s.trim().is_empty())
        .cloned();

    let sort_order = match raw.get(SORT_ORDER_PARAM) {
        Some(value) => SortOrder::from_query(value).unwrap_or_else(|| {
            debug!(param = SORT_ORDER_PARAM, raw = %value, "Unrecognized sort order, using default");
            config.default_sort_order
        }),
        None => config.default_sort_order,
    };

    PaginationParams {
        page,
        page_size,
        sort_by,
        sort_order,
    }
}

/// Page coordinates used to produce a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page: u64,
    pub page_size: u64,
}

impl From<&PaginationParams> for PageOptions {
    fn from(params: &PaginationParams) -> Self {
        Self {
            page: params.page,
            page_size: params.page_size,
        }
    }
}

impl From<PaginationParams> for PageOptions {
    fn from(params: PaginationParams) -> Self {
        Self::from(&params)
    }
}

/// Paginated list payload.
///
/// Immutable once built; `totalPages`, `hasNext` and `hasPrev` are always
/// derived from `total`, `page` and `pageSize`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    items: Vec<T>,
    /// Matching records across all pages
    total: u64,
    /// Current page (1-based)
    page: u64,
    /// Page size
    page_size: u64,
    /// `ceil(total / pageSize)`
    total_pages: u64,
    has_next: bool,
    has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    /// `page` and `page_size` below 1 are raised to 1. Items beyond
    /// `page_size` are dropped so the envelope stays consistent.
    pub fn new(mut items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);

        if items.len() as u64 > page_size {
            warn!(
                items = items.len(),
                page_size, "Result page larger than page size, truncating"
            );
            items.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));
        }

        let total_pages = total.div_ceil(page_size);
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_prev(&self) -> bool {
        self.has_prev
    }

    /// Converts the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Wraps an already-sliced page of results in a success envelope.
pub fn create_pagination_response<T>(
    items: Vec<T>,
    total: u64,
    options: impl Into<PageOptions>,
    message: Option<&str>,
) -> ApiResponse<PaginatedResponse<T>> {
    let options = options.into();
    let page = PaginatedResponse::new(items, total, options.page, options.page_size);
    let response = ApiResponse::success(page);
    match message {
        Some(message) => response.with_message(message),
        None => response,
    }
}

/// Paginates an in-memory collection. Pages past the end come back empty.
pub fn paginate_slice<T: Clone>(all: &[T], params: &PaginationParams) -> PaginatedResponse<T> {
    let start = usize::try_from(params.offset())
        .unwrap_or(usize::MAX)
        .min(all.len());
    let len = usize::try_from(params.page_size()).unwrap_or(usize::MAX);
    let end = start.saturating_add(len).min(all.len());

    PaginatedResponse::new(
        all[start..end].to_vec(),
        all.len() as u64,
        params.page(),
        params.page_size(),
    )
}

const ITEM_KEYS: &[&str] = &["items", "list", "rows", "data"];
const TOTAL_KEYS: &[&str] = &["total", "count"];
const PAGE_KEYS: &[&str] = &["page", "currentPage"];
const PAGE_SIZE_KEYS: &[&str] = &["pageSize", "limit", "size"];

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_object(obj: &Map<String, Value>) -> PaginatedResponse<Value> {
    let nested = obj.get("pagination").and_then(Value::as_object);
    let lookup = |keys: &[&str]| -> Option<u64> {
        let find = |map: &Map<String, Value>| keys.iter().find_map(|k| map.get(*k).and_then(as_count));
        find(obj).or_else(|| nested.and_then(find))
    };

    let items = ITEM_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default();
    let len = items.len() as u64;

    let total = lookup(TOTAL_KEYS).unwrap_or(len);
    let page = lookup(PAGE_KEYS).filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
    let page_size = match lookup(PAGE_SIZE_KEYS).filter(|s| *s >= 1) {
        Some(size) if size < len => {
            debug!(page_size = size, items = len, "Legacy page larger than its page size, widening");
            len
        }
        Some(size) => size,
        None => len.max(1),
    };

    PaginatedResponse::new(items, total, page, page_size)
}

/// Converts a legacy list payload into the canonical envelope.
///
/// Accepts a bare array or an object using any of the known field aliases
/// (`list`/`rows`/`data` for items, `count` for total, `currentPage` for page,
/// `limit`/`size` for page size, optionally nested under `pagination`).
/// Derived fields are always recomputed. Items are never dropped: a page size
/// smaller than the item list is widened to the item count.
pub fn normalize_pagination_response(
    data: &Value,
) -> Result<PaginatedResponse<Value>, NormalizationError> {
    match data {
        Value::Array(items) => {
            let len = items.len() as u64;
            Ok(PaginatedResponse::new(items.clone(), len, DEFAULT_PAGE, len))
        }
        Value::Object(obj) => Ok(normalize_object(obj)),
        other => Err(NormalizationError::Uninterpretable {
            kind: value_kind(other),
        }),
    }
}
