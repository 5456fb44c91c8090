use serde_json::{Map, Value};
use sqlx::{self, postgres::{PgArguments, PgRow}, FromRow, PgPool, Row};
use std::time::Instant;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::filter::{Filter, FilterData, FilterWhereOptions, SqlResult};

pub struct QueryBuilder<T> {
    table_name: String,
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T> {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        let filter = Filter::new(&table_name)?;
        Ok(Self {
            table_name,
            filter,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub fn options(mut self, options: FilterWhereOptions) -> Self {
        self.filter.options(options);
        self
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql()?;
        let started = Instant::now();

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        DatabaseManager::observe_query(&self.table_name, started.elapsed());

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Rows as JSON objects keyed by column name
    pub async fn select_json(self, pool: &PgPool) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let query = format!("SELECT row_to_json(t) AS row FROM ({}) t", sql_result.query);
        let started = Instant::now();

        let mut q = sqlx::query(&query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        DatabaseManager::observe_query(&self.table_name, started.elapsed());

        rows.into_iter()
            .map(|row| match row.try_get::<Value, _>("row")? {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::QueryError(format!("unexpected row shape: {}", other))),
            })
            .collect()
    }
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let started = Instant::now();
        let rows = query_as::<T>(&sql_result).fetch_all(pool).await?;
        DatabaseManager::observe_query(&self.table_name, started.elapsed());
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let started = Instant::now();
        let row = query_as::<T>(&sql_result).fetch_optional(pool).await?;
        DatabaseManager::observe_query(&self.table_name, started.elapsed());
        Ok(row)
    }
}

fn query_as<'q, T>(sql_result: &'q SqlResult) -> sqlx::query::QueryAs<'q, sqlx::Postgres, T, PgArguments>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    let mut q = sqlx::query_as::<_, T>(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query_as(q, p);
    }
    q
}

/// Filter parameters arrive as JSON; this picks the Postgres type to bind them as
enum Param<'q> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Uuid(Uuid),
    Text(&'q str),
    Json(Value),
}

impl<'q> Param<'q> {
    fn classify(v: &'q Value) -> Self {
        match v {
            Value::Null => Param::Null,
            Value::Bool(b) => Param::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Param::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Param::Float(f)
                } else {
                    Param::Json(v.clone())
                }
            }
            // Id columns are uuid; a text parameter would fail `uuid = text`
            Value::String(s) => match Uuid::parse_str(s) {
                Ok(id) => Param::Uuid(id),
                Err(_) => Param::Text(s),
            },
            Value::Array(_) | Value::Object(_) => Param::Json(v.clone()),
        }
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match Param::classify(v) {
        Param::Null => q.bind(None::<String>),
        Param::Bool(b) => q.bind(b),
        Param::Int(i) => q.bind(i),
        Param::Float(f) => q.bind(f),
        Param::Uuid(id) => q.bind(id),
        Param::Text(s) => q.bind(s),
        Param::Json(json) => q.bind(json),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match Param::classify(v) {
        Param::Null => q.bind(None::<String>),
        Param::Bool(b) => q.bind(b),
        Param::Int(i) => q.bind(i),
        Param::Float(f) => q.bind(f),
        Param::Uuid(id) => q.bind(id),
        Param::Text(s) => q.bind(s),
        Param::Json(json) => q.bind(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uuid_strings_bind_as_uuid() {
        let id = Uuid::new_v4();
        let value = json!(id.to_string());
        assert!(matches!(Param::classify(&value), Param::Uuid(parsed) if parsed == id));

        let pattern = json!("%chair%");
        assert!(matches!(Param::classify(&pattern), Param::Text("%chair%")));
    }

    #[test]
    fn numbers_prefer_integers() {
        assert!(matches!(Param::classify(&json!(15)), Param::Int(15)));
        assert!(matches!(Param::classify(&json!(1.5)), Param::Float(_)));
        assert!(matches!(Param::classify(&json!(null)), Param::Null));
    }
}
