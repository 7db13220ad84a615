//! Category CRUD handlers. Names are unique; a duplicate maps to 409.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockpilot_core::validation::validate_category_name;
use stockpilot_core::{Category, NewCategory};

/// Routes under `/categories`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route(
            "/categories/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    debug!(name = %payload.name, "create_category");
    validate_category_name(&payload.name)?;

    let category = state.db.categories().insert(&payload).await?;
    Ok(Json(category))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))?;
    Ok(Json(category))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    validate_category_name(&payload.name)?;

    let category = state.db.categories().update(id, &payload).await?;
    Ok(Json(category))
}

async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.db.categories().delete(id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
