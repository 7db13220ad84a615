//! Product CRUD handlers.
//!
//! ## No Quantity Through This Door
//! Create and update payloads have no quantity field (unknown keys are
//! rejected at deserialization), so the only way stock changes is
//! `POST /movements`. That keeps the cached quantity equal to the ledger
//! sum at all times.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockpilot_core::validation::{validate_new_product, validate_product_update};
use stockpilot_core::{NewProduct, Product, ProductFilter, ProductUpdate};

/// Routes under `/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route(
            "/products/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
}

/// Query parameters for product listing.
#[derive(Debug, Deserialize)]
struct ListParams {
    /// Substring match on name or SKU.
    q: Option<String>,
    category_id: Option<i64>,
    supplier_id: Option<i64>,
    /// Defaults to true: retired products are hidden unless asked for.
    only_active: Option<bool>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    debug!(sku = %payload.sku, "create_product");
    validate_new_product(&payload)?;

    let product = state.db.products().insert(&payload).await?;
    Ok(Json(product))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = ProductFilter {
        search: params.q,
        category_id: params.category_id,
        supplier_id: params.supplier_id,
        only_active: params.only_active.unwrap_or(true),
    };

    let products = state.db.products().list(&filter).await?;
    Ok(Json(products))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    Ok(Json(product))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    debug!(id = %id, "update_product");
    validate_product_update(&payload)?;

    let product = state.db.products().update(id, &payload).await?;
    Ok(Json(product))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.db.products().delete(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
