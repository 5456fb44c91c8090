use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category joined with the number of products filed under it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryWithPopularity {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub product_count: i64,
}
