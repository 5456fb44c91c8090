// handlers/protected/notifications/mod.rs - Notification inbox of the caller
//
// GET  /api/notifications               ?page=&per_page=&unread_only=
// GET  /api/notifications/unread-count
// POST /api/notifications/:id/read
// POST /api/notifications/read-all

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config;
use crate::database::models::Notification;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::types::{Page, PageQuery, PageRequest};

#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

pub async fn notification_list(
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<NotificationListQuery>, QueryRejection>,
) -> ApiResult<Page<Notification>> {
    let Query(query) = query?;
    let page = PageRequest::resolve(
        PageQuery { page: query.page, per_page: query.per_page },
        &config().pagination,
    )?;

    let notifications = NotificationService::new()
        .await?
        .list(auth_user.user_id, query.unread_only, page)
        .await?;
    Ok(ApiResponse::success(notifications))
}

pub async fn unread_count(Extension(auth_user): Extension<AuthUser>) -> ApiResult<UnreadCount> {
    let unread = NotificationService::new().await?.unread_count(auth_user.user_id).await?;
    Ok(ApiResponse::success(UnreadCount { unread }))
}

pub async fn mark_read(
    Extension(auth_user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Notification> {
    let Path(id) = id?;
    let notification = NotificationService::new().await?.mark_read(auth_user.user_id, id).await?;
    Ok(ApiResponse::success(notification))
}

pub async fn mark_all_read(Extension(auth_user): Extension<AuthUser>) -> ApiResult<MarkedRead> {
    let updated = NotificationService::new().await?.mark_all_read(auth_user.user_id).await?;
    Ok(ApiResponse::success(MarkedRead { updated }))
}
