//! Server binary: env config, pool, routes, serve.

use axum::Router;
use metastats_api::{api_routes, common_routes, AppState};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("metastats_api=info".parse()?),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/metastats".into());
    // Statement timeout bounds every query; the pool is small and a stuck
    // statement would otherwise pin a connection.
    let connect_opts = PgConnectOptions::from_str(&database_url)?
        .options([("statement_timeout", "5000")]);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_opts)
        .await?;

    let state = AppState::new(pool)?;

    // Open CORS, cap request bodies at 64 KiB.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
