//! HTTP integration for Axum
//!
//! - `common`: envelope responses, `ApiError`, `Pagination` and `ValidatedJson` extractors
//! - `middleware`: response contract enforcement

pub mod common;
pub mod middleware;

pub use common::{created, ApiError, Pagination, ValidatedJson};
pub use middleware::{response_contract_middleware, CONTRACT_VIOLATIONS_HEADER};
