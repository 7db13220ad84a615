//! Supplier CRUD handlers.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockpilot_core::validation::validate_name;
use stockpilot_core::{NewSupplier, Supplier};

/// Routes under `/suppliers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list).post(create))
        .route(
            "/suppliers/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewSupplier>,
) -> Result<Json<Supplier>, ApiError> {
    debug!(name = %payload.name, "create_supplier");
    validate_name("name", &payload.name)?;

    let supplier = state.db.suppliers().insert(&payload).await?;
    Ok(Json(supplier))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = state.db.suppliers().list().await?;
    Ok(Json(suppliers))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = state
        .db
        .suppliers()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier", id))?;
    Ok(Json(supplier))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewSupplier>,
) -> Result<Json<Supplier>, ApiError> {
    validate_name("name", &payload.name)?;

    let supplier = state.db.suppliers().update(id, &payload).await?;
    Ok(Json(supplier))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.db.suppliers().delete(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
