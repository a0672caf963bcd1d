//! Sort field allow-lists
//!
//! `sortBy` arrives as an opaque string; each list endpoint decides which
//! fields are sortable and which column they map to.

use std::fmt;

use super::errors::ContractError;
use super::pagination::{PaginationParams, SortOrder};

/// Sortable fields of one endpoint: API field name -> column expression.
#[derive(Debug, Clone)]
pub struct SortAllowList {
    fields: Vec<(String, String)>,
    default_column: String,
}

impl SortAllowList {
    pub fn new(default_column: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            default_column: default_column.into(),
        }
    }

    /// Registers `field` (as sent by clients) sorting on `column`.
    pub fn field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.push((field.into(), column.into()));
        self
    }

    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_str())
    }

    fn column_for(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, column)| column.as_str())
    }

    /// Resolves the requested sort into a column.
    ///
    /// No `sortBy` means the default column; an unknown one is an error the
    /// endpoint should answer with 400.
    pub fn resolve(&self, params: &PaginationParams) -> Result<SortClause, ContractError> {
        let column = match params.sort_by() {
            None => self.default_column.clone(),
            Some(field) => self
                .column_for(field)
                .map(String::from)
                .ok_or_else(|| ContractError::InvalidSortField {
                    field: field.to_string(),
                    allowed: self.allowed().map(String::from).collect(),
                })?,
        };

        Ok(SortClause {
            column,
            order: params.sort_order(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub column: String,
    pub order: SortOrder,
}

impl SortClause {
    /// `ORDER BY <column> <ASC|DESC>`
    pub fn to_order_by(&self) -> String {
        format!("ORDER BY {} {}", self.column, self.order)
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teachers() -> SortAllowList {
        SortAllowList::new("t.created_at")
            .field("createdAt", "t.created_at")
            .field("name", "u.real_name")
            .field("hireDate", "t.hire_date")
    }

    #[test]
    fn missing_sort_uses_default_column() {
        let clause = teachers().resolve(&PaginationParams::default()).unwrap();
        assert_eq!(clause.to_order_by(), "ORDER BY t.created_at DESC");
    }

    #[test]
    fn known_field_maps_to_column() {
        let params = PaginationParams::default().with_sort("name", SortOrder::Asc);
        let clause = teachers().resolve(&params).unwrap();
        assert_eq!(clause.column, "u.real_name");
        assert_eq!(clause.to_string(), "u.real_name ASC");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let params = PaginationParams::default().with_sort("password; DROP TABLE", SortOrder::Asc);
        let err = teachers().resolve(&params).unwrap_err();
        match err {
            ContractError::InvalidSortField { field, allowed } => {
                assert_eq!(field, "password; DROP TABLE");
                assert_eq!(allowed, vec!["createdAt", "name", "hireDate"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
