//! # Ledger Repository
//!
//! The append-only stock-movement ledger, and the ONLY code path allowed to
//! write `products.quantity`.
//!
//! ## One Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record() transaction                                 │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE products                                                        │
//! │     SET quantity = quantity + :change                                   │
//! │   WHERE id = :product_id AND quantity + :change >= 0                    │
//! │    │                                                                    │
//! │    ├── 1 row:  the delta applied and the guard held. The write lock    │
//! │    │           taken here serializes every concurrent mover on this    │
//! │    │           database, so no two callers can act on the same stale   │
//! │    │           quantity.                                               │
//! │    │                                                                    │
//! │    └── 0 rows: either the product doesn't exist (NotFound) or the      │
//! │                guard failed (InsufficientStock). One SELECT tells      │
//! │                them apart. Transaction drops → rollback → nothing     │
//! │                was written.                                            │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  INSERT INTO stock_movements (..., created_at = now)                    │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT   ← both writes become visible together, or neither does       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Folding the non-negative guard into the UPDATE's WHERE clause is what
//! makes the check race-free: the read of the current quantity and the
//! decision happen inside one locked statement, not across a read-then-write
//! gap.
//!
//! Movements are never updated or deleted. There is deliberately no method
//! for either.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockpilot_core::{Movement, MovementFilter, NewMovement};

/// Repository for the stock-movement ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Records a movement and updates the product's cached quantity, as one
    /// atomic unit of work.
    ///
    /// ## Preconditions
    /// * the product must exist
    /// * `change` must be non-zero
    ///
    /// ## Returns
    /// * `Ok(Movement)` - The created ledger row
    /// * `Err(DbError::NotFound)` - No such product
    /// * `Err(DbError::InsufficientStock)` - The change would drive quantity
    ///   below zero; nothing was written
    /// * `Err(DbError::InvalidArgument)` - Zero change
    pub async fn record(&self, new: &NewMovement) -> DbResult<Movement> {
        debug!(
            product_id = %new.product_id,
            change = %new.change,
            reason = %new.reason,
            "Recording movement"
        );

        // A zero-change row would pad the audit trail without meaning.
        if new.change == 0 {
            return Err(DbError::invalid_argument(
                "movement change must be non-zero",
            ));
        }

        let mut tx = self.pool.begin().await?;

        // Guarded delta update. The guard rides inside the statement that
        // takes the write lock, so a concurrent mover can't sneak between
        // the balance check and the write.
        let updated = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?1
            WHERE id = ?2 AND quantity + ?1 >= 0
            "#,
        )
        .bind(new.change)
        .bind(new.product_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Zero rows means missing product or failed guard; look once to
            // tell them apart. Dropping `tx` rolls back either way.
            let on_hand: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                    .bind(new.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match on_hand {
                None => DbError::not_found("Product", new.product_id.to_string()),
                Some(available) => DbError::InsufficientStock {
                    product_id: new.product_id,
                    available,
                    requested: new.change.abs(),
                },
            });
        }

        let created_at = Utc::now();
        let inserted = sqlx::query(
            r#"
            INSERT INTO stock_movements (product_id, change, reason, reference, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new.product_id)
        .bind(new.change)
        .bind(&new.reason)
        .bind(&new.reference)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Movement {
            id: inserted.last_insert_rowid(),
            product_id: new.product_id,
            change: new.change,
            reason: new.reason.clone(),
            reference: new.reference.clone(),
            created_at,
        })
    }

    /// Lists movements matching a filter, newest first.
    ///
    /// ## Filters
    /// - `product_id`: only that product's movements
    /// - `since`: only movements created at or after the instant
    pub async fn list(&self, filter: &MovementFilter) -> DbResult<Vec<Movement>> {
        debug!(?filter, "Listing movements");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, product_id, change, reason, reference, created_at \
             FROM stock_movements WHERE 1=1",
        );

        if let Some(product_id) = filter.product_id {
            qb.push(" AND product_id = ");
            qb.push_bind(product_id);
        }
        if let Some(since) = filter.since {
            qb.push(" AND created_at >= ");
            qb.push_bind(since);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let movements = qb
            .build_query_as::<Movement>()
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Counts ledger rows (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Re-derives a product's quantity straight from the ledger.
    ///
    /// The result must always equal `products.quantity`; exposed so tests
    /// and consistency checks can assert the invariant instead of trusting
    /// the cache.
    pub async fn derived_quantity(&self, product_id: i64) -> DbResult<i64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(change), 0) FROM stock_movements WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockpilot_core::NewProduct;

    async fn db_with_product(sku: &str) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: "Widget".to_string(),
                description: None,
                price: 9.99,
                cost: 4.50,
                reorder_level: 5,
                is_active: true,
                category_id: None,
                supplier_id: None,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn movement(product_id: i64, change: i64, reason: &str) -> NewMovement {
        NewMovement {
            product_id,
            change,
            reason: reason.to_string(),
            reference: None,
        }
    }

    async fn quantity_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_record_updates_cache_and_appends_row() {
        let (db, pid) = db_with_product("WID-001").await;
        let ledger = db.ledger();

        let m = ledger.record(&movement(pid, 10, "purchase")).await.unwrap();
        assert_eq!(m.change, 10);
        assert_eq!(m.product_id, pid);

        assert_eq!(quantity_of(&db, pid).await, 10);
        assert_eq!(ledger.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sale_then_oversell_scenario() {
        let (db, pid) = db_with_product("WID-001").await;
        let ledger = db.ledger();

        ledger.record(&movement(pid, 10, "purchase")).await.unwrap();

        // Sell 3: succeeds, quantity drops to 7.
        let sale = ledger.record(&movement(pid, -3, "sale")).await.unwrap();
        assert_eq!(sale.change, -3);
        assert_eq!(quantity_of(&db, pid).await, 7);

        // Sell 10: rejected, quantity still 7, no ledger row added.
        let rows_before = ledger.count().await.unwrap();
        let err = ledger.record(&movement(pid, -10, "sale")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 7,
                requested: 10,
                ..
            }
        ));
        assert_eq!(quantity_of(&db, pid).await, 7);
        assert_eq!(ledger.count().await.unwrap(), rows_before);
    }

    #[tokio::test]
    async fn test_quantity_always_equals_ledger_sum() {
        let (db, pid) = db_with_product("WID-001").await;
        let ledger = db.ledger();

        for (change, reason) in [
            (10, "purchase"),
            (-3, "sale"),
            (-2, "sale"),
            (7, "purchase"),
            (-1, "adjustment"),
        ] {
            ledger.record(&movement(pid, change, reason)).await.unwrap();
            let cached = quantity_of(&db, pid).await;
            let derived = ledger.derived_quantity(pid).await.unwrap();
            assert_eq!(cached, derived);
        }

        assert_eq!(quantity_of(&db, pid).await, 11);
    }

    #[tokio::test]
    async fn test_zero_change_rejected() {
        let (db, pid) = db_with_product("WID-001").await;

        let err = db
            .ledger()
            .record(&movement(pid, 0, "adjustment"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument { .. }));
        assert_eq!(db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .ledger()
            .record(&movement(999, 5, "purchase"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_withdraw_from_empty_product_rejected() {
        let (db, pid) = db_with_product("WID-001").await;

        let err = db
            .ledger()
            .record(&movement(pid, -1, "sale"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let (db, pid) = db_with_product("WID-001").await;
        let other = db
            .products()
            .insert(&NewProduct {
                sku: "WID-002".to_string(),
                name: "Other".to_string(),
                description: None,
                price: 1.0,
                cost: 0.5,
                reorder_level: 0,
                is_active: true,
                category_id: None,
                supplier_id: None,
            })
            .await
            .unwrap();
        let ledger = db.ledger();

        let first = ledger.record(&movement(pid, 5, "purchase")).await.unwrap();
        let second = ledger.record(&movement(pid, -1, "sale")).await.unwrap();
        ledger.record(&movement(other.id, 2, "purchase")).await.unwrap();

        // Newest first, all products.
        let all = ledger.list(&MovementFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].created_at >= all[2].created_at);

        // Per-product filter.
        let one = ledger
            .list(&MovementFilter {
                product_id: Some(pid),
                since: None,
            })
            .await
            .unwrap();
        assert_eq!(one.iter().map(|m| m.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        // Since filter: everything is recent, nothing is older than now+1h.
        let recent = ledger
            .list(&MovementFilter {
                product_id: None,
                since: Some(Utc::now() - chrono::Duration::hours(1)),
            })
            .await
            .unwrap();
        assert_eq!(recent.len(), 3);

        let none = ledger
            .list(&MovementFilter {
                product_id: None,
                since: Some(Utc::now() + chrono::Duration::hours(1)),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    // The concurrency property needs real parallel connections, which an
    // in-memory database (single connection) can't provide; use a throwaway
    // file-backed database instead.
    mod concurrent {
        use super::*;
        use std::path::PathBuf;

        fn temp_db_path() -> PathBuf {
            std::env::temp_dir().join(format!("stockpilot-test-{}.db", uuid::Uuid::new_v4()))
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        async fn test_concurrent_withdrawals_never_oversell() {
            const N: usize = 8;

            let path = temp_db_path();
            let config = DbConfig::new(&path).max_connections(N as u32);
            let db = Database::new(config).await.unwrap();

            let product = db
                .products()
                .insert(&NewProduct {
                    sku: "WID-001".to_string(),
                    name: "Widget".to_string(),
                    description: None,
                    price: 9.99,
                    cost: 4.50,
                    reorder_level: 0,
                    is_active: true,
                    category_id: None,
                    supplier_id: None,
                })
                .await
                .unwrap();
            let pid = product.id;

            db.ledger()
                .record(&movement(pid, N as i64, "purchase"))
                .await
                .unwrap();

            // N+1 concurrent single-unit withdrawals against a stock of N:
            // exactly N succeed, exactly one finds nothing left to take, and
            // the balance lands exactly on 0. No interleaving may let two
            // callers both spend the same unit.
            let mut handles = Vec::new();
            for _ in 0..N + 1 {
                let ledger = db.ledger();
                handles.push(tokio::spawn(async move {
                    ledger.record(&movement(pid, -1, "sale")).await
                }));
            }

            let mut ok = 0;
            let mut insufficient = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => ok += 1,
                    Err(DbError::InsufficientStock { .. }) => insufficient += 1,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }

            assert_eq!(ok, N);
            assert_eq!(insufficient, 1);
            assert_eq!(quantity_of(&db, pid).await, 0);
            // Initial purchase + N sales; the rejected call left no row.
            assert_eq!(db.ledger().count().await.unwrap(), (N + 1) as i64);

            db.close().await;
            let _ = std::fs::remove_file(&path);
            let _ = std::fs::remove_file(format!("{}-wal", path.display()));
            let _ = std::fs::remove_file(format!("{}-shm", path.display()));
        }
    }
}
