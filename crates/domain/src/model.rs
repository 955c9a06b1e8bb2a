//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected item name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Item name must not be empty")]
pub struct InvalidName;

/// Normalized item name, used as the store key
///
/// Normalization trims surrounding whitespace and lowercases, so `"Eggs"`,
/// `" eggs "` and `"EGGS"` all address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(raw: &str) -> Result<Self, InvalidName> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(InvalidName);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name with its first character uppercased, for row labels
    pub fn display(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = InvalidName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

/// A quantity-tracked inventory record
///
/// A record only exists while `quantity >= 1`; reaching zero removes it from
/// the store instead of storing a zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: ItemName,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn new(name: ItemName, quantity: u32) -> Self {
        Self { name, quantity }
    }

    pub fn display_name(&self) -> String {
        self.name.display()
    }
}

/// Result of one full re-list of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySnapshot {
    /// Ticket issued when the refresh started; later refreshes carry larger tickets
    pub ticket: u64,
    /// Items in store-defined order
    pub items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    pub fn get(&self, name: &ItemName) -> Option<&InventoryItem> {
        self.items.iter().find(|item| &item.name == name)
    }

    pub fn quantity_of(&self, name: &ItemName) -> u32 {
        self.get(name).map(|item| item.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Generated recipe text, returned verbatim from the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Model that produced the text
    pub model: String,
    /// Markdown text as returned by the endpoint
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_normalization() {
        let name = ItemName::parse("  Eggs ").unwrap();
        assert_eq!(name.as_str(), "eggs");
        assert_eq!(name, ItemName::parse("EGGS").unwrap());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(ItemName::parse("   "), Err(InvalidName));
        assert_eq!(ItemName::parse(""), Err(InvalidName));
    }

    #[test]
    fn test_display_name_capitalizes_first_char() {
        let item = InventoryItem::new(ItemName::parse("olive oil").unwrap(), 2);
        assert_eq!(item.display_name(), "Olive oil");
    }

    #[test]
    fn test_item_name_deserialize_normalizes() {
        let item: InventoryItem =
            serde_json::from_str(r#"{"name": "Flour", "quantity": 4}"#).unwrap();
        assert_eq!(item.name.as_str(), "flour");
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_snapshot_quantity_of_missing_is_zero() {
        let snapshot = InventorySnapshot::default();
        assert_eq!(snapshot.quantity_of(&ItemName::parse("salt").unwrap()), 0);
        assert!(snapshot.is_empty());
    }
}
