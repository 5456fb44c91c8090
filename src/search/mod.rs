//! Cross-entity admin search.
//!
//! A query is matched against every entity type in the catalog that the
//! principal may see. Each type contributes at most `per_type_limit` summarised
//! hits; types the principal cannot see and types without hits are left out of
//! the response entirely, so their existence is never disclosed.

pub mod catalog;
pub mod source;

use futures::future::try_join_all;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::auth::Principal;
use crate::config::SearchConfig;
use crate::database::DatabaseError;

pub use catalog::{SearchableEntity, DEFAULT_CATALOG};
pub use source::{PgSearchSource, SearchSource};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query too short: at least {min_length} characters required")]
    QueryTooShort { min_length: usize },

    #[error(transparent)]
    DataAccess(#[from] DatabaseError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: Value,
    pub title: String,
    pub subtitle: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub name: String,
    /// Number of returned items, so never above the per-type limit
    pub count: usize,
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Keyed by entity type, in catalog order
    pub results: IndexMap<String, ResultGroup>,
    pub total_count: usize,
}

pub struct SearchAggregator<S> {
    source: S,
    catalog: &'static [SearchableEntity],
    settings: SearchConfig,
}

impl<S: SearchSource> SearchAggregator<S> {
    pub fn new(source: S, settings: SearchConfig) -> Self {
        Self::with_catalog(source, DEFAULT_CATALOG, settings)
    }

    pub fn with_catalog(source: S, catalog: &'static [SearchableEntity], settings: SearchConfig) -> Self {
        Self { source, catalog, settings }
    }

    pub async fn search<P>(&self, principal: &P, raw_query: &str) -> Result<SearchResponse, SearchError>
    where
        P: Principal + ?Sized,
    {
        let query = raw_query.trim();
        if query.chars().count() < self.settings.min_query_length {
            return Err(SearchError::QueryTooShort { min_length: self.settings.min_query_length });
        }

        let visible: Vec<&SearchableEntity> = self
            .catalog
            .iter()
            .filter(|entity| principal.has_capability(entity.capability))
            .collect();

        // Lookups are independent reads; results come back in `visible` order
        let limit = self.settings.per_type_limit;
        let found = try_join_all(visible.iter().map(|entity| self.source.find(entity, query, limit))).await?;

        let mut results = IndexMap::new();
        for (entity, rows) in visible.into_iter().zip(found) {
            let items: Vec<SearchItem> = rows
                .iter()
                .take(limit)
                .map(|row| entity.project(row, self.settings.subtitle_length))
                .collect();

            if items.is_empty() {
                continue;
            }

            results.insert(
                entity.key.to_string(),
                ResultGroup {
                    name: entity.label.to_string(),
                    count: items.len(),
                    items,
                },
            );
        }

        let total_count = results.values().map(|group| group.count).sum();
        Ok(SearchResponse {
            query: query.to_string(),
            results,
            total_count,
        })
    }
}
