use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use crate::database::models::CategoryWithPopularity;
use crate::database::{DatabaseError, DatabaseManager};
use crate::types::{Page, PageRequest};

/// Active categories joined with the number of live products in each
const POPULARITY_SELECT: &str = r#"
    SELECT c.id, c.parent_id, c.name, c.slug, c.description,
           COALESCE(p.product_count, 0)::BIGINT AS product_count
    FROM categories c
    LEFT JOIN (
        SELECT category_id, COUNT(*) AS product_count
        FROM products
        WHERE deleted_at IS NULL
        GROUP BY category_id
    ) p ON p.category_id = c.id
"#;

/// `$1` parent id (nullable), `$2` roots only
const LISTING_WHERE: &str = r#"
    WHERE c.is_active = true
      AND ($1::uuid IS NULL OR c.parent_id = $1)
      AND (NOT $2 OR c.parent_id IS NULL)
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategorySort {
    #[default]
    Name,
    Popular,
}

impl CategorySort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(CategorySort::Name),
            "popular" => Some(CategorySort::Popular),
            _ => None,
        }
    }

    fn to_sql(self) -> &'static str {
        match self {
            CategorySort::Name => "ORDER BY c.name ASC, c.id ASC",
            CategorySort::Popular => "ORDER BY product_count DESC, c.name ASC, c.id ASC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryFilter {
    pub parent_id: Option<Uuid>,
    pub roots_only: bool,
    pub sort: CategorySort,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: CategoryWithPopularity,
    pub children: Vec<CategoryWithPopularity>,
}

pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::pool().await?))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: CategoryFilter,
        page: PageRequest,
    ) -> Result<Page<CategoryWithPopularity>, DatabaseError> {
        let started = Instant::now();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM categories c {}", LISTING_WHERE))
            .bind(filter.parent_id)
            .bind(filter.roots_only)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!("{} {} {} LIMIT $3 OFFSET $4", POPULARITY_SELECT, LISTING_WHERE, filter.sort.to_sql());
        let items = sqlx::query_as::<_, CategoryWithPopularity>(&sql)
            .bind(filter.parent_id)
            .bind(filter.roots_only)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        DatabaseManager::observe_query("categories", started.elapsed());
        Ok(Page::new(items, page, total))
    }

    pub async fn show(&self, id: Uuid) -> Result<CategoryDetail, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1 AND c.is_active = true", POPULARITY_SELECT);
        let category = sqlx::query_as::<_, CategoryWithPopularity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))?;

        let sql = format!(
            "{} {} {}",
            POPULARITY_SELECT,
            LISTING_WHERE,
            CategorySort::Name.to_sql()
        );
        let children = sqlx::query_as::<_, CategoryWithPopularity>(&sql)
            .bind(Some(id))
            .bind(false)
            .fetch_all(&self.pool)
            .await?;

        Ok(CategoryDetail { category, children })
    }
}
