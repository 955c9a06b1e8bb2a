//! In-memory inventory store for testing and offline mode

use async_trait::async_trait;
use pantry_domain::{InventoryItem, InventoryStore, ItemName, StoreError, resolve_delta};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory inventory store implementation
///
/// Deltas are applied under a single write lock, so concurrent adds never
/// lose updates.
pub struct InMemoryInventoryStore {
    items: RwLock<BTreeMap<ItemName, u32>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(items
            .iter()
            .map(|(name, quantity)| InventoryItem::new(name.clone(), *quantity))
            .collect())
    }

    async fn get_item(&self, name: &ItemName) -> Result<Option<InventoryItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(items
            .get(name)
            .map(|quantity| InventoryItem::new(name.clone(), *quantity)))
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        if item.quantity == 0 {
            return Err(StoreError::Serialization(format!(
                "Refusing to store zero quantity for {}",
                item.name
            )));
        }
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        items.insert(item.name.clone(), item.quantity);
        Ok(())
    }

    async fn delete_item(&self, name: &ItemName) -> Result<(), StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        items.remove(name);
        Ok(())
    }

    async fn apply_delta(&self, name: &ItemName, delta: i64) -> Result<Option<u32>, StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let next = resolve_delta(items.get(name).copied(), delta)?;
        match next {
            Some(quantity) => {
                items.insert(name.clone(), quantity);
            }
            None => {
                items.remove(name);
            }
        }

        Ok(next)
    }

    fn atomic_deltas(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
