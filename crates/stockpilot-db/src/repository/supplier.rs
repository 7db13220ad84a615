//! # Supplier Repository
//!
//! Database operations for suppliers. Plain CRUD: suppliers have no unique
//! constraints and no cascade - deleting one nullifies `products.supplier_id`
//! via the schema's ON DELETE SET NULL.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockpilot_core::{NewSupplier, Supplier};

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Inserts a new supplier and returns the stored row.
    pub async fn insert(&self, new: &NewSupplier) -> DbResult<Supplier> {
        debug!(name = %new.name, "Inserting supplier");

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, email, phone, address)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .execute(&self.pool)
        .await?;

        Ok(Supplier {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
        })
    }

    /// Lists all suppliers, newest first.
    pub async fn list(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, email, phone, address
            FROM suppliers
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Gets a supplier by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Supplier))` - Supplier found
    /// * `Ok(None)` - Supplier not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, email, phone, address
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Replaces a supplier's fields.
    pub async fn update(&self, id: i64, new: &NewSupplier) -> DbResult<Supplier> {
        debug!(id = %id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id.to_string()));
        }

        Ok(Supplier {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
        })
    }

    /// Deletes a supplier. Products referencing it keep existing with
    /// `supplier_id` set to NULL.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id.to_string()));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample() -> NewSupplier {
        NewSupplier {
            name: "Acme Wholesale".to_string(),
            email: Some("orders@acme.example".to_string()),
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let created = db.suppliers().insert(&sample()).await.unwrap();
        assert!(created.id > 0);

        let fetched = db.suppliers().get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let a = repo.insert(&sample()).await.unwrap();
        let b = repo
            .insert(&NewSupplier {
                name: "Baltic Imports".to_string(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.suppliers().update(999, &sample()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let created = repo.insert(&sample()).await.unwrap();
        repo.delete(created.id).await.unwrap();

        assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
