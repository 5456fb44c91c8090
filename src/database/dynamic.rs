//! Untyped reads for tables only known through configuration

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterWhereOptions};

pub type JsonRow = Map<String, Value>;

pub struct DynamicRepository {
    table_name: String,
    pool: PgPool,
}

impl DynamicRepository {
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self { table_name: table_name.into(), pool }
    }

    /// Select records using the filter language, returning JSON maps.
    pub async fn select_any(
        &self,
        filter_data: FilterData,
        options: FilterWhereOptions,
    ) -> Result<Vec<JsonRow>, DatabaseError> {
        QueryBuilder::<JsonRow>::new(&self.table_name)?
            .options(options)
            .filter(filter_data)?
            .select_json(&self.pool)
            .await
    }
}
