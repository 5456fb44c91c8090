// handlers/protected/categories/mod.rs - Category browsing
//
// GET /api/categories      ?page=&per_page=&parent_id=&roots=&sort=name|popular
// GET /api/categories/:id  category with its direct children
//
// Both require the `categories.view` capability.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::config;
use crate::database::models::CategoryWithPopularity;
use crate::error::ApiError;
use crate::middleware::{require_capability, ApiResponse, ApiResult, AuthUser};
use crate::services::{CategoryDetail, CategoryFilter, CategoryService, CategorySort};
use crate::types::{Page, PageQuery, PageRequest};

const VIEW_CAPABILITY: &str = "categories.view";

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub roots: bool,
    pub sort: Option<String>,
}

impl CategoryListQuery {
    fn into_parts(self) -> Result<(CategoryFilter, PageRequest), ApiError> {
        let sort = match self.sort.as_deref() {
            None => CategorySort::default(),
            Some(value) => CategorySort::parse(value)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown sort '{}'; use name or popular", value)))?,
        };
        if self.roots && self.parent_id.is_some() {
            return Err(ApiError::bad_request("roots and parent_id cannot be combined"));
        }

        let page = PageRequest::resolve(
            PageQuery { page: self.page, per_page: self.per_page },
            &config().pagination,
        )?;
        let filter = CategoryFilter {
            parent_id: self.parent_id,
            roots_only: self.roots,
            sort,
        };
        Ok((filter, page))
    }
}

pub async fn category_list(
    Extension(auth_user): Extension<AuthUser>,
    query: Result<Query<CategoryListQuery>, QueryRejection>,
) -> ApiResult<Page<CategoryWithPopularity>> {
    require_capability(&auth_user, VIEW_CAPABILITY)?;
    let Query(query) = query?;
    let (filter, page) = query.into_parts()?;

    let categories = CategoryService::new().await?.list(filter, page).await?;
    Ok(ApiResponse::success(categories))
}

pub async fn category_show(
    Extension(auth_user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<CategoryDetail> {
    require_capability(&auth_user, VIEW_CAPABILITY)?;
    let Path(id) = id?;

    let category = CategoryService::new().await?.show(id).await?;
    Ok(ApiResponse::success(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popular_sort_and_defaults() {
        let query = CategoryListQuery { sort: Some("popular".into()), ..Default::default() };
        let (filter, page) = query.into_parts().unwrap();
        assert_eq!(filter.sort, CategorySort::Popular);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, config().pagination.default_per_page);
    }

    #[test]
    fn rejects_unknown_sort_and_zero_page() {
        let query = CategoryListQuery { sort: Some("price".into()), ..Default::default() };
        assert_eq!(query.into_parts().unwrap_err().status_code(), 400);

        let query = CategoryListQuery { page: Some(0), ..Default::default() };
        assert_eq!(query.into_parts().unwrap_err().status_code(), 400);
    }

    #[test]
    fn roots_excludes_parent_filter() {
        let query = CategoryListQuery { roots: true, parent_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(query.into_parts().is_err());
    }
}
