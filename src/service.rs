//! Generic CRUD execution against PostgreSQL.
//!
//! One statement per call. Connections come from the bounded pool and are
//! returned on every exit path by sqlx's guard semantics, including errors.
//! Results are classified here: a row set for reads, the generated id for
//! inserts, an affected-row count for updates and deletes.

use crate::error::ApiError;
use crate::registry::TableSchema;
use crate::sql;
use crate::validate::{FieldValue, ValidatedRecord};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

pub struct CrudService;

impl CrudService {
    /// Fetch the full row set. Zero rows is data; the endpoint decides
    /// what it means.
    pub async fn read_all(pool: &PgPool, schema: &TableSchema) -> Result<Vec<Value>, ApiError> {
        let sql = sql::select_all(schema);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Insert one validated record and return the generated id.
    pub async fn insert(
        pool: &PgPool,
        schema: &TableSchema,
        record: &ValidatedRecord,
    ) -> Result<i64, ApiError> {
        let q = sql::insert(schema, record)?;
        tracing::info!(table = schema.table_name, values = ?q.params, "inserting row");
        tracing::debug!(sql = %q.sql, "query");
        let row = bind_params(&q.sql, &q.params).fetch_optional(pool).await?;
        let row = row.ok_or(ApiError::Storage(sqlx::Error::RowNotFound))?;
        pk_from_row(&row)
    }

    /// Update one row by id; returns the affected-row count. Zero means the
    /// id was not found or the submitted values were identical to the
    /// current row; row counts cannot tell those apart.
    pub async fn update(
        pool: &PgPool,
        schema: &TableSchema,
        id: i64,
        record: &ValidatedRecord,
    ) -> Result<u64, ApiError> {
        let q = sql::update(schema, id, record)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_params(&q.sql, &q.params).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete one row by id; returns the affected-row count. Zero means the
    /// id was not found.
    pub async fn delete(pool: &PgPool, schema: &TableSchema, id: i64) -> Result<u64, ApiError> {
        let q = sql::delete(schema, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_params(&q.sql, &q.params).execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [FieldValue]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = match p {
            FieldValue::Text(s) => query.bind(s.as_str()),
            FieldValue::Int(n) => query.bind(*n),
            FieldValue::Float(f) => query.bind(*f),
        };
    }
    query
}

/// Generated keys come back from RETURNING as whatever width the serial
/// column has; accept both and widen.
fn pk_from_row(row: &PgRow) -> Result<i64, ApiError> {
    use sqlx::Row;
    if let Ok(id) = row.try_get::<i64, _>(0) {
        return Ok(id);
    }
    let id: i32 = row.try_get(0)?;
    Ok(i64::from(id))
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(f64::from(n)) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
