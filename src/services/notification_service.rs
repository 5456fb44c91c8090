use serde_json::{json, Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Notification;
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;
use crate::types::{Page, PageRequest};

/// Notifications are only ever read or changed by the user they belong to
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::pool().await?))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> Repository<Notification> {
        Repository::new("notifications", self.pool.clone())
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, DatabaseError> {
        let where_clause = owner_clause(user_id, unread_only);
        let repository = self.repository();

        let total = repository
            .count(FilterData { where_clause: Some(where_clause.clone()), ..Default::default() })
            .await?;

        let items = repository
            .select_any(FilterData {
                where_clause: Some(where_clause),
                order: Some(json!("created_at desc, id desc")),
                limit: Some(page.limit()),
                offset: Some(page.offset()),
                ..Default::default()
            })
            .await?;

        Ok(Page::new(items, page, total))
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, DatabaseError> {
        self.repository()
            .count(FilterData { where_clause: Some(owner_clause(user_id, true)), ..Default::default() })
            .await
    }

    /// Already-read notifications keep their original `read_at`
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification, DatabaseError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET read_at = COALESCE(read_at, now())
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Notification {} not found", id)))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = now()
             WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Marked {} notification(s) read for user {}", result.rows_affected(), user_id);
        Ok(result.rows_affected())
    }
}

fn owner_clause(user_id: Uuid, unread_only: bool) -> Value {
    let mut clause = Map::new();
    clause.insert("user_id".to_string(), json!(user_id));
    if unread_only {
        clause.insert("read_at".to_string(), Value::Null);
    }
    Value::Object(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Filter, FilterWhereOptions};

    #[test]
    fn unread_filter_adds_null_check() {
        let user_id = Uuid::new_v4();

        let all = owner_clause(user_id, false);
        assert_eq!(all.as_object().unwrap().len(), 1);

        let mut filter = Filter::new("notifications").unwrap();
        filter.options(FilterWhereOptions::default());
        filter.where_clause(owner_clause(user_id, true)).unwrap();
        let sql = filter.to_count_sql().unwrap();

        assert!(sql.query.contains("\"user_id\" = $1"));
        assert!(sql.query.contains("\"read_at\" IS NULL"));
        assert_eq!(sql.params, vec![json!(user_id)]);
    }
}
