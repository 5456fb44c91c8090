/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::ApiError;

/// `?page=&per_page=` as sent by clients
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Apply defaults and the configured ceiling; zero is rejected rather than clamped
    pub fn resolve(query: PageQuery, settings: &PaginationConfig) -> Result<Self, ApiError> {
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::bad_request("page must be at least 1"));
        }

        let per_page = query.per_page.unwrap_or(settings.default_per_page);
        if per_page == 0 {
            return Err(ApiError::bad_request("per_page must be at least 1"));
        }

        Ok(Self {
            page,
            per_page: per_page.min(settings.max_per_page),
        })
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

/// One page of a listing plus the numbers a client needs to page through it
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let per_page = request.per_page.max(1) as i64;
        let last_page = ((total.max(0) + per_page - 1) / per_page).max(1) as u32;
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            last_page,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> PaginationConfig {
        PaginationConfig { default_per_page: 15, max_per_page: 100 }
    }

    #[test]
    fn defaults_and_ceiling() {
        let request = PageRequest::resolve(PageQuery::default(), &settings()).unwrap();
        assert_eq!(request, PageRequest { page: 1, per_page: 15 });
        assert_eq!(request.offset(), 0);

        let request = PageRequest::resolve(PageQuery { page: Some(3), per_page: Some(500) }, &settings()).unwrap();
        assert_eq!(request.per_page, 100);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn zero_is_a_bad_request() {
        let err = PageRequest::resolve(PageQuery { page: Some(0), per_page: None }, &settings()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(PageRequest::resolve(PageQuery { page: None, per_page: Some(0) }, &settings()).is_err());
    }

    #[test]
    fn last_page_rounds_up() {
        let request = PageRequest { page: 1, per_page: 15 };
        assert_eq!(Page::new(vec![(); 15], request, 31).last_page, 3);
        assert_eq!(Page::<()>::empty(request).last_page, 1);
    }
}
