//! Presentation-side inventory state
//!
//! The view holds the last applied snapshot and only moves forward: a
//! snapshot from a refresh that started before the one already applied is
//! dropped, so a slow in-flight refresh cannot overwrite newer state.
//!
//! Gating only matters for callers that keep one view across several
//! refreshes, such as an interactive front end. The one-shot CLI prints each
//! snapshot directly.

use crate::model::{InventoryItem, InventorySnapshot};

/// Local cache of the store contents, refreshed after every write
#[derive(Debug, Clone, Default)]
pub struct InventoryView {
    snapshot: Option<InventorySnapshot>,
}

impl InventoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a refreshed snapshot, returns `false` if it was stale
    pub fn apply(&mut self, snapshot: InventorySnapshot) -> bool {
        if let Some(current) = &self.snapshot {
            if snapshot.ticket < current.ticket {
                tracing::debug!(
                    stale_ticket = snapshot.ticket,
                    current_ticket = current.ticket,
                    "Dropping stale inventory snapshot"
                );
                return false;
            }
        }

        self.snapshot = Some(snapshot);
        true
    }

    pub fn items(&self) -> &[InventoryItem] {
        self.snapshot
            .as_ref()
            .map(|s| s.items.as_slice())
            .unwrap_or(&[])
    }

    /// Ticket of the applied snapshot, `None` before the first refresh
    pub fn ticket(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemName;

    fn snapshot(ticket: u64, quantity: u32) -> InventorySnapshot {
        InventorySnapshot {
            ticket,
            items: vec![InventoryItem::new(
                ItemName::parse("eggs").unwrap(),
                quantity,
            )],
        }
    }

    #[test]
    fn test_empty_view() {
        let view = InventoryView::new();
        assert!(view.items().is_empty());
        assert_eq!(view.ticket(), None);
    }

    #[test]
    fn test_newer_snapshot_replaces() {
        let mut view = InventoryView::new();
        assert!(view.apply(snapshot(1, 1)));
        assert!(view.apply(snapshot(2, 5)));
        assert_eq!(view.items()[0].quantity, 5);
    }

    #[test]
    fn test_stale_snapshot_dropped() {
        let mut view = InventoryView::new();
        assert!(view.apply(snapshot(3, 7)));
        assert!(!view.apply(snapshot(2, 1)));
        assert_eq!(view.items()[0].quantity, 7);
        assert_eq!(view.ticket(), Some(3));
    }
}
