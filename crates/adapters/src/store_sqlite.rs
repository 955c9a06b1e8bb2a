//! SQLite inventory store implementation

use async_trait::async_trait;
use pantry_domain::{InventoryItem, InventoryStore, ItemName, StoreError};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

/// SQLite-backed inventory store
///
/// Counter updates run as single-statement upserts inside a transaction, so
/// concurrent writers on the same name do not lose updates.
pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Create a new SQLite store, initializing the database if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("Failed to create directory: {}", e))
            })?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory (
                name TEXT PRIMARY KEY,
                quantity INTEGER NOT NULL CHECK (quantity > 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn row_to_item(name: String, quantity: i64) -> Result<InventoryItem, StoreError> {
    let name = ItemName::parse(&name)
        .map_err(|e| StoreError::Serialization(format!("Bad stored name {:?}: {}", name, e)))?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| StoreError::Serialization(format!("Bad stored quantity {}", quantity)))?;
    Ok(InventoryItem::new(name, quantity))
}

fn quantity_from_db(quantity: i64) -> Result<u32, StoreError> {
    u32::try_from(quantity)
        .map_err(|_| StoreError::Serialization(format!("Quantity {} out of range", quantity)))
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, quantity FROM inventory ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        rows.into_iter()
            .map(|(name, quantity)| row_to_item(name, quantity))
            .collect()
    }

    async fn get_item(&self, name: &ItemName) -> Result<Option<InventoryItem>, StoreError> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, quantity FROM inventory WHERE name = ?")
                .bind(name.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(|(name, quantity)| row_to_item(name, quantity))
            .transpose()
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory (name, quantity)
            VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET
                quantity = excluded.quantity
            "#,
        )
        .bind(item.name.as_str())
        .bind(i64::from(item.quantity))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_item(&self, name: &ItemName) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM inventory WHERE name = ?")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn apply_delta(&self, name: &ItemName, delta: i64) -> Result<Option<u32>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let quantity: Option<i64> = if delta > 0 {
            let (quantity,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO inventory (name, quantity)
                VALUES (?, ?)
                ON CONFLICT(name) DO UPDATE SET
                    quantity = inventory.quantity + excluded.quantity
                RETURNING quantity
                "#,
            )
            .bind(name.as_str())
            .bind(delta)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?;
            Some(quantity)
        } else {
            // Deleting first keeps the CHECK constraint from firing on the update
            let removed = sqlx::query("DELETE FROM inventory WHERE name = ? AND quantity + ? <= 0")
                .bind(name.as_str())
                .bind(delta)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();

            if removed > 0 {
                None
            } else {
                let row: Option<(i64,)> = sqlx::query_as(
                    "UPDATE inventory SET quantity = quantity + ? WHERE name = ? RETURNING quantity",
                )
                .bind(delta)
                .bind(name.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
                row.map(|(quantity,)| quantity)
            }
        };

        // Out-of-range totals return before commit so the transaction rolls back
        let quantity = quantity.map(quantity_from_db).transpose()?;
        tx.commit().await.map_err(db_error)?;

        Ok(quantity)
    }

    fn atomic_deltas(&self) -> bool {
        true
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
