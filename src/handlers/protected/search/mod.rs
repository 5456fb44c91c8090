// handlers/protected/search/mod.rs - Global admin search
//
// GET  /api/search?query=...
// POST /api/search           body { "query": "..." } (query string as fallback)

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use serde::Deserialize;

use crate::config::config;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::search::{PgSearchSource, SearchAggregator, SearchResponse};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

pub async fn search_get(
    Extension(auth_user): Extension<AuthUser>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchResponse> {
    let Query(params) = params?;
    run_search(&auth_user, params.query.as_deref().unwrap_or_default()).await
}

pub async fn search_post(
    Extension(auth_user): Extension<AuthUser>,
    params: Result<Query<SearchParams>, QueryRejection>,
    body: Option<Json<SearchParams>>,
) -> ApiResult<SearchResponse> {
    let Query(params) = params?;
    let query = body
        .and_then(|Json(body)| body.query)
        .or(params.query)
        .unwrap_or_default();
    run_search(&auth_user, &query).await
}

async fn run_search(auth_user: &AuthUser, query: &str) -> ApiResult<SearchResponse> {
    let aggregator = SearchAggregator::new(PgSearchSource::default(), config().search.clone());
    let response = aggregator.search(auth_user, query).await?;

    tracing::debug!(
        "User {} searched {:?}: {} hit(s)",
        auth_user.user_id,
        response.query,
        response.total_count
    );
    Ok(ApiResponse::success(response))
}
