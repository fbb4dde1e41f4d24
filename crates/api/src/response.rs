//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper. Errors are rendered by `AppError` itself.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response payload.
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a `200 OK` response.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Create a `201 Created` response.
    pub const fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Body of the count endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Number of matching rows.
    pub count: u64,
}

/// Empty success response.
#[must_use]
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_not_serialized() {
        let json = serde_json::to_value(ApiResponse::created(CountResponse { count: 3 })).unwrap();
        assert_eq!(json, serde_json::json!({ "data": { "count": 3 } }));
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created(CountResponse { count: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
