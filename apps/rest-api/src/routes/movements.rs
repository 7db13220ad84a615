//! Movement ledger handlers.
//!
//! `POST /movements` is the single write path for stock levels. The handler
//! validates shape, then hands the unit of work to the ledger repository;
//! atomicity and the non-negative guarantee live down there, in the
//! transaction.

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockpilot_core::validation::validate_new_movement;
use stockpilot_core::{Movement, MovementFilter, NewMovement};

/// Routes under `/movements`.
pub fn router() -> Router<AppState> {
    Router::new().route("/movements", post(create).get(list))
}

/// Query parameters for movement listing.
///
/// `since` is an exact RFC 3339 instant; `days` is a trailing-window
/// shorthand for it. When both are present, `since` wins.
#[derive(Debug, Deserialize)]
struct ListParams {
    product_id: Option<i64>,
    days: Option<i64>,
    since: Option<DateTime<Utc>>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewMovement>,
) -> Result<Json<Movement>, ApiError> {
    debug!(
        product_id = %payload.product_id,
        change = %payload.change,
        "create_movement"
    );
    validate_new_movement(&payload)?;

    let movement = state.db.ledger().record(&payload).await?;
    Ok(Json(movement))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Movement>>, ApiError> {
    let since = match (params.since, params.days) {
        (Some(since), _) => Some(since),
        (None, Some(days)) => {
            if days <= 0 {
                return Err(ApiError::validation("days must be a positive integer"));
            }
            Some(Utc::now() - Duration::days(days))
        }
        (None, None) => None,
    };

    let filter = MovementFilter {
        product_id: params.product_id,
        since,
    };

    let movements = state.db.ledger().list(&filter).await?;
    Ok(Json(movements))
}
