use serde::Serialize;

/// Uniform response envelope: `{success, message?, data?, errors?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}
