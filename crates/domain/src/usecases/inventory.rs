//! Inventory use case - mutations followed by a full refresh

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::{
    model::{InvalidName, InventorySnapshot, ItemName},
    ports::{InventoryStore, StoreError},
};

/// Error type for inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),
    #[error("Amount must be at least 1, got {0}")]
    InvalidAmount(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Use case for inventory mutations
///
/// Every operation writes to the store and then re-lists it; the returned
/// snapshot is the store's state after the write, never a locally patched
/// copy.
pub struct InventoryService<S: InventoryStore + ?Sized> {
    store: Arc<S>,
    tickets: AtomicU64,
}

impl<S: InventoryStore + ?Sized> InventoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            tickets: AtomicU64::new(0),
        }
    }

    /// Re-list the store
    pub async fn refresh(&self) -> Result<InventorySnapshot, StoreError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let items = self.store.list_items().await?;

        tracing::debug!(ticket, items = items.len(), "Refreshed inventory");

        Ok(InventorySnapshot { ticket, items })
    }

    /// Add `amount` of an item, creating it if absent
    pub async fn add(&self, name: &str, amount: i64) -> Result<InventorySnapshot, InventoryError> {
        let name = ItemName::parse(name)?;
        if amount < 1 {
            return Err(InventoryError::InvalidAmount(amount));
        }

        let quantity = self.store.apply_delta(&name, amount).await?;
        tracing::info!(item = %name, amount, quantity = ?quantity, "Added item");

        Ok(self.refresh().await?)
    }

    /// Take one unit away; the record is removed when it reaches zero
    pub async fn decrement(&self, name: &str) -> Result<InventorySnapshot, InventoryError> {
        let name = ItemName::parse(name)?;

        match self.store.apply_delta(&name, -1).await? {
            Some(quantity) => tracing::info!(item = %name, quantity, "Decremented item"),
            None => tracing::info!(item = %name, "Item removed or absent"),
        }

        Ok(self.refresh().await?)
    }

    /// Remove an item regardless of its quantity
    pub async fn delete(&self, name: &str) -> Result<InventorySnapshot, InventoryError> {
        let name = ItemName::parse(name)?;

        self.store.delete_item(&name).await?;
        tracing::info!(item = %name, "Deleted item");

        Ok(self.refresh().await?)
    }
}
