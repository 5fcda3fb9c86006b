//! Generic CRUD handlers. Every request runs the same fixed sequence:
//! policy gate, then (for writes) body validation, then exactly one
//! statement, then response shaping. Client-input failures are reported
//! before any storage call happens.

use crate::error::ApiError;
use crate::response::{Affected, Inserted};
use crate::service::CrudService;
use crate::state::AppState;
use crate::validate::{validate, validate_partial};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

/// GET /api/get/{table_name}: full row set for a readable table.
/// Zero rows is a 404, not an empty 200 (one convention, kept everywhere).
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    if !state.policy.can_read(&table_name) {
        return Err(ApiError::ReadNotAllowed(table_name));
    }
    let schema = state.registry.resolve(&table_name)?;
    let rows = CrudService::read_all(&state.pool, schema).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no rows found in table '{}'",
            schema.table_name
        )));
    }
    Ok(Json(rows))
}

/// POST /api/insert/{table_name}: insert one row into a writable table.
pub async fn insert_table(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Inserted>, ApiError> {
    if !state.policy.can_write(&table_name) {
        return Err(ApiError::WriteNotAllowed(table_name));
    }
    let schema = state.registry.resolve(&table_name)?;
    let record = validate(schema, &body)?;
    let new_id = CrudService::insert(&state.pool, schema, &record).await?;
    Ok(Json(Inserted::new(schema.table_name, new_id)))
}

/// PUT /api/update/{table_name}/{item_id}: partial or full update by id.
/// Zero affected rows reads as "id not found, or values identical to the
/// current row"; affected-row counts cannot distinguish the two.
pub async fn update_table(
    State(state): State<AppState>,
    Path((table_name, item_id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<Json<Affected>, ApiError> {
    if !state.policy.can_write(&table_name) {
        return Err(ApiError::WriteNotAllowed(table_name));
    }
    let schema = state.registry.resolve(&table_name)?;
    let record = validate_partial(schema, &body)?;
    if record.is_empty() {
        return Err(ApiError::BadRequest(
            "request body contains no updatable fields".into(),
        ));
    }
    let affected = CrudService::update(&state.pool, schema, item_id, &record).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!(
            "item {} not found in table '{}', or submitted values identical",
            item_id, schema.table_name
        )));
    }
    Ok(Json(Affected::updated(schema.table_name, item_id, affected)))
}

/// DELETE /api/delete/{table_name}/{item_id}: delete one row by id.
/// Deleting the same id twice returns 404 the second time.
pub async fn delete_table(
    State(state): State<AppState>,
    Path((table_name, item_id)): Path<(String, i64)>,
) -> Result<Json<Affected>, ApiError> {
    if !state.policy.can_write(&table_name) {
        return Err(ApiError::WriteNotAllowed(table_name));
    }
    let schema = state.registry.resolve(&table_name)?;
    let affected = CrudService::delete(&state.pool, schema, item_id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound(format!(
            "item {} not found in table '{}'",
            item_id, schema.table_name
        )));
    }
    Ok(Json(Affected::deleted(schema.table_name, item_id, affected)))
}

/// GET /api/models/{table_name}/example: sample JSON body for a readable
/// table, so clients can discover the expected shape without OpenAPI.
pub async fn model_example(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.policy.can_read(&table_name) {
        return Err(ApiError::ReadNotAllowed(table_name));
    }
    let schema = state.registry.resolve(&table_name)?;
    Ok(Json(schema.example_body()))
}
