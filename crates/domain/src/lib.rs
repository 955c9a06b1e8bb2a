//! pantry domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Inventory mutations and recipe generation
//! - `view`: Presentation-side inventory state

pub mod model;
pub mod ports;
pub mod usecases;
pub mod view;

pub use model::*;
pub use ports::*;
pub use view::InventoryView;
