//! Building blocks shared by all HTTP handlers

pub mod api_error;
pub mod pagination_query;
pub mod response;
pub mod validated_json;

pub use api_error::ApiError;
pub use pagination_query::Pagination;
pub use response::created;
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
