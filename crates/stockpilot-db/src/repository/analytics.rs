//! # Analytics Repository
//!
//! Read-only aggregations over the catalog and the movement ledger.
//!
//! ## Derived Views Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Analytics Queries                                   │
//! │                                                                         │
//! │  products ──────────┬──► stock_valuation()   SUM(qty), SUM(qty*cost),  │
//! │                     │                        SUM(qty*price)            │
//! │                     │                                                   │
//! │                     ├──► low_stock()         active AND qty <=         │
//! │                     │                        threshold|reorder_level   │
//! │                     │                                                   │
//! │  stock_movements ───┴──► top_movers()        SUM(ABS(change)) per      │
//! │                                              product, trailing window  │
//! │                                                                         │
//! │  No state of their own, no writes, and empty inputs degrade to         │
//! │  zeros/empty lists rather than errors.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockpilot_core::{Product, StockValuation, TopMover};

/// Repository for read-only analytics queries.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Values the whole inventory, active and inactive products alike.
    ///
    /// An empty products table yields all zeros, not an error.
    pub async fn stock_valuation(&self) -> DbResult<StockValuation> {
        let (total_quantity, cost_value, retail_value): (i64, f64, f64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(quantity), 0),
                COALESCE(SUM(quantity * cost), 0.0),
                COALESCE(SUM(quantity * price), 0.0)
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StockValuation {
            total_quantity,
            cost_value,
            retail_value,
        })
    }

    /// Lists active products at or below a stock threshold, emptiest first.
    ///
    /// With an explicit `threshold` every active product is compared against
    /// it; without one, each product is compared against its own
    /// `reorder_level`. Inactive products never show up - there is nothing
    /// to reorder for a retired SKU.
    pub async fn low_stock(&self, threshold: Option<i64>) -> DbResult<Vec<Product>> {
        debug!(?threshold, "Computing low-stock list");

        let products = match threshold {
            Some(threshold) => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, sku, name, description, price, cost,
                           quantity, reorder_level, is_active, category_id, supplier_id
                    FROM products
                    WHERE is_active = 1 AND quantity <= ?1
                    ORDER BY quantity ASC, id ASC
                    "#,
                )
                .bind(threshold)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, sku, name, description, price, cost,
                           quantity, reorder_level, is_active, category_id, supplier_id
                    FROM products
                    WHERE is_active = 1 AND quantity <= reorder_level
                    ORDER BY quantity ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Ranks products by absolute movement volume over a trailing window.
    ///
    /// ## Arguments
    /// * `days` - Trailing window size, counted back from now. Must be >= 1.
    /// * `limit` - Maximum rows returned. Must be >= 1.
    ///
    /// Products with no movements in the window are excluded, not
    /// zero-filled.
    pub async fn top_movers(&self, days: i64, limit: i64) -> DbResult<Vec<TopMover>> {
        if days <= 0 {
            return Err(DbError::invalid_argument("days must be a positive integer"));
        }
        if limit <= 0 {
            return Err(DbError::invalid_argument(
                "limit must be a positive integer",
            ));
        }

        let since = Utc::now() - Duration::days(days);
        debug!(days, limit, %since, "Computing top movers");

        let movers = sqlx::query_as::<_, TopMover>(
            r#"
            SELECT m.product_id, p.sku, p.name, SUM(ABS(m.change)) AS moved
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.created_at >= ?1
            GROUP BY m.product_id, p.sku, p.name
            ORDER BY moved DESC
            LIMIT ?2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movers)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockpilot_core::{NewMovement, NewProduct};

    async fn insert_product(
        db: &Database,
        sku: &str,
        price: f64,
        cost: f64,
        reorder_level: i64,
        is_active: bool,
    ) -> i64 {
        db.products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: format!("Product {sku}"),
                description: None,
                price,
                cost,
                reorder_level,
                is_active,
                category_id: None,
                supplier_id: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn stock(db: &Database, product_id: i64, change: i64) {
        db.ledger()
            .record(&NewMovement {
                product_id,
                change,
                reason: if change >= 0 { "purchase" } else { "sale" }.to_string(),
                reference: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_valuation_of_empty_inventory_is_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let v = db.analytics().stock_valuation().await.unwrap();
        assert_eq!(
            v,
            StockValuation {
                total_quantity: 0,
                cost_value: 0.0,
                retail_value: 0.0,
            }
        );
    }

    #[tokio::test]
    async fn test_valuation_includes_inactive_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let active = insert_product(&db, "A-1", 10.0, 4.0, 0, true).await;
        let retired = insert_product(&db, "B-1", 20.0, 8.0, 0, false).await;
        stock(&db, active, 3).await;
        stock(&db, retired, 2).await;

        let v = db.analytics().stock_valuation().await.unwrap();
        assert_eq!(v.total_quantity, 5);
        assert_eq!(v.cost_value, 3.0 * 4.0 + 2.0 * 8.0);
        assert_eq!(v.retail_value, 3.0 * 10.0 + 2.0 * 20.0);
    }

    #[tokio::test]
    async fn test_low_stock_uses_reorder_level_and_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // A: qty 2 <= reorder 5, active  → listed
        // B: qty 10 > reorder 5, active  → not listed
        // C: qty 1 <= reorder 5, retired → not listed
        let a = insert_product(&db, "A-1", 1.0, 1.0, 5, true).await;
        let b = insert_product(&db, "B-1", 1.0, 1.0, 5, true).await;
        let c = insert_product(&db, "C-1", 1.0, 1.0, 5, false).await;
        stock(&db, a, 2).await;
        stock(&db, b, 10).await;
        stock(&db, c, 1).await;

        let low = db.analytics().low_stock(None).await.unwrap();
        assert_eq!(low.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a]);
    }

    #[tokio::test]
    async fn test_low_stock_with_explicit_threshold_ascending() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let a = insert_product(&db, "A-1", 1.0, 1.0, 0, true).await;
        let b = insert_product(&db, "B-1", 1.0, 1.0, 0, true).await;
        let c = insert_product(&db, "C-1", 1.0, 1.0, 0, true).await;
        stock(&db, a, 7).await;
        stock(&db, b, 3).await;
        stock(&db, c, 12).await;

        let low = db.analytics().low_stock(Some(8)).await.unwrap();
        // Ascending by quantity: b (3) before a (7); c (12) over threshold.
        assert_eq!(low.iter().map(|p| p.id).collect::<Vec<_>>(), vec![b, a]);
    }

    #[tokio::test]
    async fn test_top_movers_ranks_by_absolute_volume() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let p1 = insert_product(&db, "P-1", 1.0, 1.0, 0, true).await;
        let p2 = insert_product(&db, "P-2", 1.0, 1.0, 0, true).await;
        let idle = insert_product(&db, "P-3", 1.0, 1.0, 0, true).await;

        // P1 moves 3 in and 3 out (moved = 6); P2 moves 1 in (moved = 1);
        // the idle product never moves at all.
        stock(&db, p1, 3).await;
        stock(&db, p1, -3).await;
        stock(&db, p2, 1).await;

        let movers = db.analytics().top_movers(30, 10).await.unwrap();
        assert_eq!(movers.len(), 2);
        assert_eq!(movers[0].product_id, p1);
        assert_eq!(movers[0].moved, 6);
        assert_eq!(movers[1].product_id, p2);
        assert_eq!(movers[1].moved, 1);
        assert!(movers.iter().all(|m| m.product_id != idle));
    }

    #[tokio::test]
    async fn test_top_movers_respects_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let p1 = insert_product(&db, "P-1", 1.0, 1.0, 0, true).await;
        let p2 = insert_product(&db, "P-2", 1.0, 1.0, 0, true).await;
        stock(&db, p1, 5).await;
        stock(&db, p2, 2).await;

        let movers = db.analytics().top_movers(30, 1).await.unwrap();
        assert_eq!(movers.len(), 1);
        assert_eq!(movers[0].product_id, p1);
    }

    #[tokio::test]
    async fn test_top_movers_rejects_bad_window() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(matches!(
            db.analytics().top_movers(0, 10).await.unwrap_err(),
            DbError::InvalidArgument { .. }
        ));
        assert!(matches!(
            db.analytics().top_movers(30, 0).await.unwrap_err(),
            DbError::InvalidArgument { .. }
        ));
    }
}
