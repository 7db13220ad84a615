//! Analytics handlers: read-only derived views over catalog + ledger.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use stockpilot_core::{Product, StockValuation, TopMover};

/// Routes under `/analytics`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/stock-valuation", get(stock_valuation))
        .route("/analytics/low-stock", get(low_stock))
        .route("/analytics/top-movers", get(top_movers))
}

async fn stock_valuation(
    State(state): State<AppState>,
) -> Result<Json<StockValuation>, ApiError> {
    let valuation = state.db.analytics().stock_valuation().await?;
    Ok(Json(valuation))
}

/// Query parameters for the low-stock report.
#[derive(Debug, Deserialize)]
struct LowStockParams {
    /// Override threshold. If not set, each product's own reorder_level
    /// is used.
    threshold: Option<i64>,
}

async fn low_stock(
    State(state): State<AppState>,
    Query(params): Query<LowStockParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.analytics().low_stock(params.threshold).await?;
    Ok(Json(products))
}

/// Query parameters for the top-movers ranking.
#[derive(Debug, Deserialize)]
struct TopMoversParams {
    days: Option<i64>,
    limit: Option<i64>,
}

async fn top_movers(
    State(state): State<AppState>,
    Query(params): Query<TopMoversParams>,
) -> Result<Json<Vec<TopMover>>, ApiError> {
    let days = params.days.unwrap_or(30);
    // Cap the response size; clients wanting more can page through
    // /movements instead.
    let limit = params.limit.unwrap_or(10).min(100);

    let movers = state.db.analytics().top_movers(days, limit).await?;
    Ok(Json(movers))
}
