// HTTP API Error Types
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::DatabaseError;
use crate::search::SearchError;
use crate::services::AccountError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity (validation but semantically valid JSON)
    UnprocessableEntity {
        message: String,
        field_errors: HashMap<String, String>
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 501 Not Implemented
    NotImplemented(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    /// Client-safe message; internal details are logged, never stored here
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::NotImplemented(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
        }
    }

    /// Stable machine-readable code, e.g. `NOT_FOUND`
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::NotImplemented(_) => "NOT_IMPLEMENTED",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Error body: `{ success: false, error: true, message, code, field_errors? }`
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        if let ApiError::UnprocessableEntity { field_errors, .. } = self {
            body["field_errors"] = json!(field_errors);
        }
        body
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(
        message: impl Into<String>,
        field_errors: HashMap<String, String>
    ) -> Self {
        ApiError::UnprocessableEntity {
            message: message.into(),
            field_errors
        }
    }

    /// 422 with a single field error, the common case for request validation
    pub fn unprocessable_field(
        message: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), reason.into());
        ApiError::unprocessable_entity(message, field_errors)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        ApiError::NotImplemented(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Database configuration missing: {}", name);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("DATABASE_URL is not a valid connection string");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx::Error::Io(io_err)) => {
                tracing::error!("Database connection error: {}", io_err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

// Extractor rejections keep the error envelope instead of axum's plain text
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::unprocessable_entity(
                "Request body has the wrong shape",
                HashMap::new(),
            ),
            JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Request body is not valid JSON"),
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::bad_request("Request must include 'Content-Type: application/json'")
            }
            _ => ApiError::bad_request("Failed to read request body"),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {}", rejection.body_text());
        ApiError::bad_request("Invalid identifier in path")
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::QueryTooShort { min_length } => ApiError::unprocessable_field(
                "Search query too short",
                "query",
                format!("The query must be at least {} characters", min_length),
            ),
            SearchError::DataAccess(db_err) => db_err.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UserNotFound(_) => ApiError::not_found("User not found"),
            AccountError::EmailNotVerified => ApiError::unprocessable_field(
                "Login preference not available",
                "login_preference",
                "A verified email address is required to sign in by email",
            ),
            AccountError::PhoneNotVerified => ApiError::unprocessable_field(
                "Login preference not available",
                "login_preference",
                "A verified phone number is required to sign in by phone",
            ),
            AccountError::Database(db_err) => db_err.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_query_maps_to_422_with_field_error() {
        let err: ApiError = SearchError::QueryTooShort { min_length: 2 }.into();
        assert_eq!(err.status_code(), 422);
        let body = err.to_json();
        assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(body["success"], false);
        assert!(body["field_errors"]["query"].as_str().unwrap().contains("2 characters"));
    }

    #[test]
    fn query_errors_are_not_echoed() {
        let err: ApiError = DatabaseError::QueryError("syntax error at or near \"FROM\"".into()).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("syntax"));
    }

    #[test]
    fn missing_database_url_is_unavailable() {
        let err: ApiError = DatabaseError::ConfigMissing("DATABASE_URL").into();
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn plain_errors_omit_field_errors() {
        let body = ApiError::not_implemented("POST /api/requests is not available").to_json();
        assert_eq!(body["code"], "NOT_IMPLEMENTED");
        assert!(body.get("field_errors").is_none());
    }

    #[test]
    fn unverified_channel_is_a_field_error() {
        let err: ApiError = AccountError::PhoneNotVerified.into();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_json()["field_errors"]["login_preference"].is_string());

        let err: ApiError = AccountError::UserNotFound(uuid::Uuid::nil()).into();
        assert_eq!(err.status_code(), 404);
    }
}
