//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod inventory;
pub mod recipe;
