//! Purchase Order API Library
//!
//! Core functionality for the purchase-order service: the entity layer with
//! its validation/normalization rules, the JSON-column codec, tolerant due
//! date parsing, order-number generation and the thin HTTP boundary.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

// Core modules
pub mod config;
pub mod dates;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod json_column;
pub mod migrator;
pub mod openapi;
pub mod order_number;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Top-level application routes.
pub fn app_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(|| async { "po-api up" }))
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(serve_openapi))
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_orders_routes(),
        )
}

/// Liveness + database reachability.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = match db::check_connection(&state.db).await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };

    Json(json!({
        "status": if database == "ok" { "healthy" } else { "degraded" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn serve_openapi() -> Json<Value> {
    Json(openapi::openapi_json())
}
