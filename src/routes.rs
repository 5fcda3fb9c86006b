//! Route tables. The generic CRUD routes use parameterized paths so the
//! handlers resolve the table by name; common routes carry liveness and
//! build info.

use crate::handlers::{delete_table, get_table, insert_table, model_example, update_table};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

/// Generic CRUD + documentation routes; mount under `/api`.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/get/:table_name", get(get_table))
        .route("/insert/:table_name", post(insert_table))
        .route("/update/:table_name/:item_id", put(update_table))
        .route("/delete/:table_name/:item_id", delete(delete_table))
        .route("/models/:table_name/example", get(model_example))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if sqlx::query("SELECT 1").fetch_optional(&state.pool).await.is_err() {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody { status: "degraded", database: "unavailable" }),
        ));
    }
    Ok(Json(ReadyBody { status: "ok", database: "ok" }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, /ready (with DB ping), /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
