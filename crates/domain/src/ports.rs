//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{InventoryItem, ItemName, Recipe};

/// Error type for inventory store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the document store holding the `inventory` collection
///
/// The four primitives mirror what a document store offers: list-all,
/// get-by-key, upsert-by-key and delete-by-key. `apply_delta` has a
/// read-modify-write default; stores with atomic counters override it.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Fetch every record, in store-defined order
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError>;

    /// Fetch a single record, `None` if absent
    async fn get_item(&self, name: &ItemName) -> Result<Option<InventoryItem>, StoreError>;

    /// Create or fully replace a record
    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError>;

    /// Remove a record; absent records are not an error
    async fn delete_item(&self, name: &ItemName) -> Result<(), StoreError>;

    /// Apply `delta` to the named counter and return the resulting quantity,
    /// or `None` when no record remains.
    ///
    /// The default is get-then-put with no concurrency check: two writers
    /// racing on the same name can lose an update.
    async fn apply_delta(&self, name: &ItemName, delta: i64) -> Result<Option<u32>, StoreError> {
        let current = self.get_item(name).await?.map(|item| item.quantity);
        let next = resolve_delta(current, delta)?;

        match next {
            Some(quantity) => {
                self.put_item(&InventoryItem::new(name.clone(), quantity))
                    .await?
            }
            None if current.is_some() => self.delete_item(name).await?,
            None => {}
        }

        Ok(next)
    }

    /// Whether `apply_delta` is atomic for this store
    fn atomic_deltas(&self) -> bool {
        false
    }

    /// Cheap connectivity probe
    async fn health_check(&self) -> Result<(), StoreError> {
        self.list_items().await.map(|_| ())
    }

    /// Backend name (e.g., "sqlite", "firestore")
    fn backend(&self) -> &'static str;
}

/// Resulting quantity after applying `delta` to `current`
///
/// Absent records are only created by a positive delta, and any result at or
/// below zero means the record must not exist.
pub fn resolve_delta(current: Option<u32>, delta: i64) -> Result<Option<u32>, StoreError> {
    let next = match current {
        Some(quantity) => i64::from(quantity) + delta,
        None if delta > 0 => delta,
        None => return Ok(None),
    };

    if next <= 0 {
        return Ok(None);
    }

    u32::try_from(next)
        .map(Some)
        .map_err(|_| StoreError::Serialization(format!("Quantity {} out of range", next)))
}

/// Error type for recipe generation
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation endpoint unavailable: {0}")]
    Unavailable(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Input for recipe generation
#[derive(Debug, Clone)]
pub struct RecipeRequest {
    /// Current inventory contents
    pub items: Vec<InventoryItem>,
}

/// Port for the text-generation endpoint
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Generate a recipe from the given inventory
    async fn generate(&self, request: RecipeRequest) -> Result<Recipe, GenerationError>;
}
