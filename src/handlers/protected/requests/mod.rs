// handlers/protected/requests/mod.rs - Placeholder for the requests resource
//
// The listing answers with an empty page so clients can wire up their views;
// every other operation reports 501 until the resource exists.

use axum::extract::{rejection::QueryRejection, Path, Query};
use serde_json::Value;

use crate::config::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{Page, PageQuery, PageRequest};

pub async fn request_list(query: Result<Query<PageQuery>, QueryRejection>) -> ApiResult<Page<Value>> {
    let Query(query) = query?;
    let page = PageRequest::resolve(query, &config().pagination)?;
    Ok(ApiResponse::success(Page::empty(page)))
}

pub async fn request_create() -> ApiResult<Value> {
    Err(not_available("POST /api/requests"))
}

pub async fn request_show(Path(id): Path<String>) -> ApiResult<Value> {
    Err(not_available(&format!("GET /api/requests/{}", id)))
}

pub async fn request_update(Path(id): Path<String>) -> ApiResult<Value> {
    Err(not_available(&format!("PUT /api/requests/{}", id)))
}

pub async fn request_delete(Path(id): Path<String>) -> ApiResult<Value> {
    Err(not_available(&format!("DELETE /api/requests/{}", id)))
}

fn not_available(route: &str) -> ApiError {
    ApiError::not_implemented(format!("{} is not available yet", route))
}
