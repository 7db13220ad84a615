//! # Category Repository
//!
//! Database operations for categories. Names are UNIQUE; inserting or
//! renaming to an existing name surfaces as `DbError::UniqueViolation`.
//! Deleting a category nullifies `products.category_id` (ON DELETE SET NULL).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockpilot_core::{Category, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Inserted category
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, new: &NewCategory) -> DbResult<Category> {
        debug!(name = %new.name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(&new.name)
            .execute(&self.pool)
            .await
            .map_err(|e| rewrite_duplicate_name(e.into(), &new.name))?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
        })
    }

    /// Lists all categories, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    /// Renames a category. The new name must still be unique.
    pub async fn update(&self, id: i64, new: &NewCategory) -> DbResult<Category> {
        debug!(id = %id, name = %new.name, "Renaming category");

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(&new.name)
            .execute(&self.pool)
            .await
            .map_err(|e| rewrite_duplicate_name(e.into(), &new.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id.to_string()));
        }

        Ok(Category {
            id,
            name: new.name.clone(),
        })
    }

    /// Deletes a category. Products referencing it keep existing with
    /// `category_id` set to NULL.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id.to_string()));
        }

        Ok(())
    }
}

/// Replaces the generic parsed-from-SQLite duplicate error with one naming
/// the offending value.
fn rewrite_duplicate_name(err: DbError, name: &str) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("name", name),
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

    fn named(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let first = repo.insert(&named("Beverages")).await.unwrap();

        let err = repo.insert(&named("Beverages")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value }
                if field == "name" && value == "Beverages"
        ));

        // The first row is unaffected.
        let fetched = repo.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Beverages");
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert(&named("Snacks")).await.unwrap();
        repo.insert(&named("Beverages")).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Beverages", "Snacks"]);
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert(&named("Beverages")).await.unwrap();
        let snacks = repo.insert(&named("Snacks")).await.unwrap();

        let err = repo.update(snacks.id, &named("Beverages")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let renamed = repo.update(snacks.id, &named("Pantry")).await.unwrap();
        assert_eq!(renamed.name, "Pantry");
    }
}
