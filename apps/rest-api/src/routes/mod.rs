//! # Route Modules
//!
//! One module per resource, assembled into a single router here.
//!
//! ## Route Map
//! ```text
//! GET    /                                  service banner
//! GET    /health                            liveness + db ping
//!
//! POST   /suppliers                         create supplier
//! GET    /suppliers                         list suppliers
//! GET    /suppliers/{id}                    get supplier
//! PATCH  /suppliers/{id}                    update supplier
//! DELETE /suppliers/{id}                    delete supplier (nullifies refs)
//!
//! POST   /categories ... same CRUD ...
//!
//! POST   /products                          create product (quantity = 0)
//! GET    /products?q=&category_id=&...      filtered listing
//! GET    /products/{id}                     get product
//! PATCH  /products/{id}                     partial update (never quantity)
//! DELETE /products/{id}                     delete (blocked by ledger refs)
//!
//! POST   /movements                         record movement (the ledger)
//! GET    /movements?product_id=&days=&since=
//!
//! GET    /analytics/stock-valuation
//! GET    /analytics/low-stock?threshold=
//! GET    /analytics/top-movers?days=&limit=
//! ```

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

pub mod analytics;
pub mod categories;
pub mod movements;
pub mod products;
pub mod suppliers;

/// Builds the complete application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(suppliers::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(movements::router())
        .merge(analytics::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service banner.
async fn root() -> Json<Value> {
    Json(json!({ "message": "StockPilot inventory API is running" }))
}

/// Liveness check including a database ping.
async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if !state.db.health_check().await {
        return Err(ApiError::new(
            ErrorCode::DatabaseError,
            "Database is unavailable",
        ));
    }

    Ok(Json(json!({ "status": "ok" })))
}
