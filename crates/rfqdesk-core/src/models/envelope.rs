//! Response envelopes shared by every endpoint.
//!
//! Plain endpoints wrap their payload in `ApiEnvelope`; the catalog list
//! endpoint returns `PaginatedResponse` with a page descriptor instead.

use serde::{Deserialize, Serialize};

/// Standard `{success, data, message, error}` wrapper.
///
/// `message` is human-readable; `error` is a machine-readable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// One page of a listing plus its pagination descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Page-based cursor. The client increments `page` while `has_next_page`
/// holds; the server decides ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(rename = "hasNextPage", alias = "hasMore", default)]
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_with_missing_optionals() {
        let json = r#"{"success": true, "data": 42}"#;
        let envelope: ApiEnvelope<i32> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(42));
        assert!(envelope.message.is_none());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_pagination_accepts_has_more_alias() {
        let json = r#"{"page": 2, "limit": 12, "total": 40, "totalPages": 4, "hasMore": true}"#;
        let page: Pagination = serde_json::from_str(json).unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 4);

        let json = r#"{"page": 4, "limit": 12, "hasNextPage": false}"#;
        let page: Pagination = serde_json::from_str(json).unwrap();
        assert!(!page.has_next_page);
        assert_eq!(page.total, 0);
    }
}
