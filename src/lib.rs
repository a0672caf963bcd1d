//! # Kindergarten API response contract
//!
//! Shared response-shape rules for the kindergarten management REST API.
//!
//! ## Architecture
//!
//! - **shared::types**: pagination contract (`parse_pagination_params`,
//!   `create_pagination_response`, `normalize_pagination_response`), the
//!   standard `ApiResponse` envelope and sort allow-lists
//! - **shared::validations**: response format validators returning
//!   `ValidationReport`s, for tests and middleware
//! - **interfaces::http**: Axum extractors, error responses and the
//!   response contract middleware
//! - **config**: TOML configuration
//! - **telemetry**: tracing setup

pub mod config;
pub mod interfaces;
pub mod shared;
pub mod telemetry;

pub use config::{default_config_path, AppConfig, ContractConfig, ContractMode, PaginationConfig};

pub use shared::types::{
    create_pagination_response, error_codes, normalize_pagination_response, paginate_slice,
    parse_pagination_params, parse_pagination_params_with, ApiErrorBody, ApiResponse, ConfigError,
    ContractError, EmptyData, NormalizationError, PageOptions, PaginatedResponse,
    PaginationParams, SortAllowList, SortClause, SortOrder,
};

pub use shared::validations::{
    create_api_validation_report, validate_auth_response, validate_error_response,
    validate_field_types, validate_http_status_code, validate_pagination_response,
    validate_required_fields, validate_response, validate_response_time,
    validate_standard_api_format, validate_typed_fields, JsonType, ValidationReport,
};

pub use interfaces::http::{response_contract_middleware, ApiError, Pagination, ValidatedJson};
pub use telemetry::init_tracing;
