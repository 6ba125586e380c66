//! Shared list plumbing: the paged response envelope and query parsing

use serde::Serialize;

use crate::domain::entities::{PageRequest, Paged, PaginationInfo};
use crate::error::AppError;

/// Envelope for every list endpoint
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> ListResponse<T> {
    pub fn new(paged: Paged<T>, page: &PageRequest) -> Self {
        Self {
            pagination: PaginationInfo::new(page, paged.total),
            items: paged.items,
        }
    }
}

/// Parse an optional enum-valued query parameter; blank means absent
pub fn parse_param<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map(Some).map_err(AppError::BadRequest),
        None => Ok(None),
    }
}

/// Parse a required enum-valued body field
pub fn parse_field<T>(value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    value.trim().parse().map_err(AppError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OrderStatus;

    #[test]
    fn blank_param_is_none() {
        let parsed: Option<OrderStatus> = parse_param(Some("  ")).unwrap();
        assert!(parsed.is_none());
        let parsed: Option<OrderStatus> = parse_param(None).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn unknown_param_is_bad_request() {
        let err = parse_param::<OrderStatus>(Some("shipped")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn list_response_carries_pagination() {
        let page = PageRequest::new(Some(2), Some(2), 100);
        let paged = Paged {
            items: vec![3, 4],
            total: 5,
        };

        let json = serde_json::to_value(ListResponse::new(paged, &page)).unwrap();

        assert_eq!(json["items"], serde_json::json!([3, 4]));
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["pages"], 3);
        assert_eq!(json["pagination"]["total"], 5);
    }
}
