//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with unique-SKU enforcement
//! - Filtered listing (category, supplier, active flag, substring search)
//!
//! ## What Is NOT Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Why this repository never writes quantity                  │
//! │                                                                         │
//! │  products.quantity is a materialized cache of the movement ledger:     │
//! │                                                                         │
//! │      quantity == SUM(change) over stock_movements of the product       │
//! │                                                                         │
//! │  A catalog update that set quantity directly would desynchronize the   │
//! │  cache from the ledger with no audit trail. So:                        │
//! │                                                                         │
//! │  • insert() always writes quantity = 0                                 │
//! │  • update() has no quantity parameter (ProductUpdate has no field)     │
//! │  • manual corrections are movements with reason "adjustment"           │
//! │                                                                         │
//! │  The only `SET quantity` in this crate lives in ledger.rs.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockpilot_core::{NewProduct, Product, ProductFilter, ProductUpdate};

/// Columns selected for every product read, kept in one place so listings
/// and point lookups can't drift apart.
const PRODUCT_COLUMNS: &str = "id, sku, name, description, price, cost, \
     quantity, reorder_level, is_active, category_id, supplier_id";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Filtered listing
/// let filter = ProductFilter { search: Some("cola".into()), ..ProductFilter::active() };
/// let results = repo.list(&filter).await?;
///
/// // Get by ID
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// The stored row always starts at quantity 0; initial stock arrives
    /// through the ledger so the cache/ledger invariant holds from row one.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    /// * `Err(DbError::ForeignKeyViolation)` - category/supplier doesn't exist
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(sku = %new.sku, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, description, price, cost,
                quantity, reorder_level, is_active, category_id, supplier_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                0, ?6, ?7, ?8, ?9
            )
            "#,
        )
        .bind(&new.sku)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.cost)
        .bind(new.reorder_level)
        .bind(new.is_active)
        .bind(new.category_id)
        .bind(new.supplier_id)
        .execute(&self.pool)
        .await
        .map_err(|e| rewrite_duplicate_sku(e.into(), &new.sku))?;

        Ok(Product {
            id: result.last_insert_rowid(),
            sku: new.sku.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            cost: new.cost,
            quantity: 0,
            reorder_level: new.reorder_level,
            is_active: new.is_active,
            category_id: new.category_id,
            supplier_id: new.supplier_id,
        })
    }

    /// Lists products matching a filter, newest first.
    ///
    /// ## Filters
    /// - `search`: substring match on name OR SKU
    /// - `category_id` / `supplier_id`: exact match
    /// - `only_active`: hide retired products
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1"
        ));

        if filter.only_active {
            qb.push(" AND is_active = 1");
        }
        if let Some(ref search) = filter.search {
            let like = format!("%{}%", search.trim());
            qb.push(" AND (name LIKE ");
            qb.push_bind(like.clone());
            qb.push(" OR sku LIKE ");
            qb.push_bind(like);
            qb.push(")");
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(supplier_id) = filter.supplier_id {
            qb.push(" AND supplier_id = ");
            qb.push_bind(supplier_id);
        }
        qb.push(" ORDER BY id DESC");

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update and returns the stored row.
    ///
    /// Fields left `None` are unchanged. Quantity is not updatable here by
    /// construction - `ProductUpdate` has no such field.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Updated (or unchanged, for an empty patch) row
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::UniqueViolation)` - New SKU already taken
    pub async fn update(&self, id: i64, patch: &ProductUpdate) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        // An empty patch is a read, not a write.
        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", id.to_string()));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET ");
        let mut fields = qb.separated(", ");

        if let Some(ref sku) = patch.sku {
            fields.push("sku = ");
            fields.push_bind_unseparated(sku.clone());
        }
        if let Some(ref name) = patch.name {
            fields.push("name = ");
            fields.push_bind_unseparated(name.clone());
        }
        if let Some(ref description) = patch.description {
            fields.push("description = ");
            fields.push_bind_unseparated(description.clone());
        }
        if let Some(price) = patch.price {
            fields.push("price = ");
            fields.push_bind_unseparated(price);
        }
        if let Some(cost) = patch.cost {
            fields.push("cost = ");
            fields.push_bind_unseparated(cost);
        }
        if let Some(reorder_level) = patch.reorder_level {
            fields.push("reorder_level = ");
            fields.push_bind_unseparated(reorder_level);
        }
        if let Some(is_active) = patch.is_active {
            fields.push("is_active = ");
            fields.push_bind_unseparated(is_active);
        }
        if let Some(category_id) = patch.category_id {
            fields.push("category_id = ");
            fields.push_bind_unseparated(category_id);
        }
        if let Some(supplier_id) = patch.supplier_id {
            fields.push("supplier_id = ");
            fields.push_bind_unseparated(supplier_id);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let sku_for_error = patch.sku.clone().unwrap_or_default();
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| rewrite_duplicate_sku(e.into(), &sku_for_error))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id.to_string()))
    }

    /// Deletes a product.
    ///
    /// Fails with `ForeignKeyViolation` while movements reference the
    /// product: the ledger is append-only and must not lose its subject.
    /// Retiring a product is `update` with `is_active = false`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Replaces the generic parsed-from-SQLite duplicate error with one naming
/// the offending SKU.
fn rewrite_duplicate_sku(err: DbError, sku: &str) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("sku", sku),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use stockpilot_core::NewCategory;

    fn widget(sku: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            cost: 4.50,
            reorder_level: 5,
            is_active: true,
            category_id: None,
            supplier_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_starts_at_zero_quantity() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let created = db.products().insert(&widget("WID-001")).await.unwrap();
        assert_eq!(created.quantity, 0);

        let stored = db.products().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected_first_unaffected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let first = repo.insert(&widget("WID-001")).await.unwrap();

        let err = repo.insert(&widget("WID-001")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value }
                if field == "sku" && value == "WID-001"
        ));

        let stored = repo.get_by_sku("WID-001").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_with_missing_category_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut new = widget("WID-001");
        new.category_id = Some(999);

        let err = db.products().insert(&new).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let beverages = db
            .categories()
            .insert(&NewCategory {
                name: "Beverages".to_string(),
            })
            .await
            .unwrap();

        let mut cola = widget("COLA-330");
        cola.name = "Cola 330ml".to_string();
        cola.category_id = Some(beverages.id);
        repo.insert(&cola).await.unwrap();

        let mut retired = widget("OLD-001");
        retired.is_active = false;
        repo.insert(&retired).await.unwrap();

        repo.insert(&widget("WID-001")).await.unwrap();

        // Active-only hides the retired product.
        let active = repo.list(&ProductFilter::active()).await.unwrap();
        assert_eq!(active.len(), 2);

        // Inactive included when asked.
        let all = repo.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        // Substring search matches name or SKU.
        let filter = ProductFilter {
            search: Some("cola".to_string()),
            ..ProductFilter::active()
        };
        let found = repo.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "COLA-330");

        // Category filter.
        let filter = ProductFilter {
            category_id: Some(beverages.id),
            ..ProductFilter::active()
        };
        assert_eq!(repo.list(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&widget("WID-001")).await.unwrap();

        let patch = ProductUpdate {
            price: Some(12.49),
            ..ProductUpdate::default()
        };
        let updated = repo.update(created.id, &patch).await.unwrap();

        assert_eq!(updated.price, 12.49);
        assert_eq!(updated.sku, created.sku);
        assert_eq!(updated.cost, created.cost);
        assert_eq!(updated.quantity, 0);
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_read() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&widget("WID-001")).await.unwrap();
        let same = repo.update(created.id, &ProductUpdate::default()).await.unwrap();
        assert_eq!(same, created);

        let err = repo.update(999, &ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_ledger_history() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        // No history: delete goes through.
        let fresh = repo.insert(&widget("WID-001")).await.unwrap();
        repo.delete(fresh.id).await.unwrap();

        // With history: the ledger must not lose its subject.
        let stocked = repo.insert(&widget("WID-002")).await.unwrap();
        db.ledger()
            .record(&stockpilot_core::NewMovement {
                product_id: stocked.id,
                change: 5,
                reason: "purchase".to_string(),
                reference: None,
            })
            .await
            .unwrap();

        let err = repo.delete(stocked.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // Retirement is the supported path instead.
        let patch = ProductUpdate {
            is_active: Some(false),
            ..ProductUpdate::default()
        };
        let retired = repo.update(stocked.id, &patch).await.unwrap();
        assert!(!retired.is_active);
    }

    #[tokio::test]
    async fn test_category_delete_nullifies_reference() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let beverages = db
            .categories()
            .insert(&NewCategory {
                name: "Beverages".to_string(),
            })
            .await
            .unwrap();

        let mut new = widget("COLA-330");
        new.category_id = Some(beverages.id);
        let created = db.products().insert(&new).await.unwrap();

        db.categories().delete(beverages.id).await.unwrap();

        let stored = db.products().get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.category_id, None);
    }
}
