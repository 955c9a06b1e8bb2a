//! Application use cases / business logic

pub mod inventory;
pub mod recipe;

pub use inventory::{InventoryError, InventoryService};
pub use recipe::RecipeUseCase;
