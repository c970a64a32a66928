//! Sorting types for list operations.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort specification consisting of a field name and direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortField {
    /// Field name to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create an ascending sort on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create a descending sort on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse an order key of the form `"title"` or `"modified desc"`.
    ///
    /// The first whitespace-separated token is the field name; a trailing
    /// `desc` marker anywhere in the key flips the direction.
    pub fn parse(order_key: &str) -> AppResult<Self> {
        let field = order_key
            .split_whitespace()
            .next()
            .ok_or_else(|| AppError::invalid_argument("Empty order key"))?;

        let direction = if order_key.trim_end().ends_with("desc") && field != "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };

        Ok(Self::new(field, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_field_is_ascending() {
        let sort = SortField::parse("title").unwrap();
        assert_eq!(sort.field, "title");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_parse_trailing_desc_marker() {
        let sort = SortField::parse("modified desc").unwrap();
        assert_eq!(sort.field, "modified");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_parse_empty_key_rejected() {
        assert!(SortField::parse("   ").is_err());
    }
}
