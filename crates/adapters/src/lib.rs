//! pantry adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `store`: in-memory, SQLite and Firestore inventory stores
//! - `llm`: recipe generators (OpenAI-compatible, stub)

mod firestore;
mod store_memory;
mod store_sqlite;

pub mod llm;

/// Re-exports for inventory store adapters
pub mod store {
    pub use crate::firestore::{FirestoreConfig, FirestoreInventoryStore};
    pub use crate::store_memory::InMemoryInventoryStore;
    pub use crate::store_sqlite::SqliteInventoryStore;
}
