use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{DatabaseError, DatabaseManager, DynamicRepository, JsonRow};
use crate::filter::{substring_match, FilterData, FilterWhereOptions};

use super::catalog::SearchableEntity;

/// Query-by-substring access to the records of one entity type
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Rows where any of `entity.fields` contains `term` case-insensitively,
    /// in the store's default order, at most `limit` of them.
    async fn find(
        &self,
        entity: &SearchableEntity,
        term: &str,
        limit: usize,
    ) -> Result<Vec<JsonRow>, DatabaseError>;
}

/// Postgres-backed source using `ILIKE` across the configured fields.
///
/// Without an explicit pool it connects through the shared pool on the first
/// lookup, so a search that never reaches the store never needs a connection.
#[derive(Default)]
pub struct PgSearchSource {
    pool: Option<PgPool>,
}

impl PgSearchSource {
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    async fn pool(&self) -> Result<PgPool, DatabaseError> {
        match &self.pool {
            Some(pool) => Ok(pool.clone()),
            None => DatabaseManager::pool().await,
        }
    }
}

#[async_trait]
impl SearchSource for PgSearchSource {
    async fn find(
        &self,
        entity: &SearchableEntity,
        term: &str,
        limit: usize,
    ) -> Result<Vec<JsonRow>, DatabaseError> {
        let filter_data = FilterData {
            select: Some(entity.columns()),
            where_clause: Some(substring_match(entity.fields, term)),
            limit: Some(limit as i64),
            ..Default::default()
        };
        let options = FilterWhereOptions { exclude_deleted: entity.soft_delete };

        let rows = DynamicRepository::new(entity.table, self.pool().await?)
            .select_any(filter_data, options)
            .await?;

        tracing::debug!("search {}: {} match(es) for {:?}", entity.key, rows.len(), term);
        Ok(rows)
    }
}
