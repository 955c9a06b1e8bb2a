//! Inventory commands - list, add, remove, delete

use anyhow::{Context, Result, bail};
use pantry_adapters::store::{
    FirestoreConfig, FirestoreInventoryStore, InMemoryInventoryStore, SqliteInventoryStore,
};
use pantry_domain::usecases::InventoryService;
use pantry_domain::{InventoryItem, InventorySnapshot, InventoryStore};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::{AddArgs, ItemArgs, OutputArgs};
use crate::config::AppConfig;

pub async fn list(args: OutputArgs, config_path: Option<PathBuf>) -> Result<()> {
    let service = load_service(config_path).await?;
    let snapshot = service
        .refresh()
        .await
        .context("Failed to list inventory")?;
    show(snapshot, args.json)
}

pub async fn add(args: AddArgs, config_path: Option<PathBuf>) -> Result<()> {
    let service = load_service(config_path).await?;
    let snapshot = service
        .add(&args.name, args.quantity)
        .await
        .with_context(|| format!("Failed to add {}", args.name))?;
    show(snapshot, args.json)
}

pub async fn remove(args: ItemArgs, config_path: Option<PathBuf>) -> Result<()> {
    let service = load_service(config_path).await?;
    let snapshot = service
        .decrement(&args.name)
        .await
        .with_context(|| format!("Failed to remove {}", args.name))?;
    show(snapshot, args.json)
}

pub async fn delete(args: ItemArgs, config_path: Option<PathBuf>) -> Result<()> {
    let service = load_service(config_path).await?;
    let snapshot = service
        .delete(&args.name)
        .await
        .with_context(|| format!("Failed to delete {}", args.name))?;
    show(snapshot, args.json)
}

async fn load_service(
    config_path: Option<PathBuf>,
) -> Result<InventoryService<dyn InventoryStore>> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = build_store(&config).await?;
    Ok(InventoryService::new(store))
}

pub(crate) async fn build_store(config: &AppConfig) -> Result<Arc<dyn InventoryStore>> {
    let store: Arc<dyn InventoryStore> = match config.store.backend.as_str() {
        "sqlite" => Arc::new(
            SqliteInventoryStore::new(&config.store.sqlite_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open SQLite store at {}",
                        config.store.sqlite_path.display()
                    )
                })?,
        ),
        "firestore" => {
            let firestore = &config.store.firestore;
            let api_key = optional_secret(&firestore.api_key_env);
            Arc::new(
                FirestoreInventoryStore::new(
                    FirestoreConfig {
                        base_url: firestore.base_url.clone(),
                        project_id: firestore.project_id.clone(),
                        database: firestore.database.clone(),
                        collection: firestore.collection.clone(),
                        timeout_secs: firestore.timeout_secs,
                    },
                    api_key,
                )
                .context("Failed to configure Firestore store")?,
            )
        }
        "memory" => Arc::new(InMemoryInventoryStore::new()),
        other => bail!("Unknown store backend: {}", other),
    };

    tracing::debug!(
        backend = store.backend(),
        atomic_deltas = store.atomic_deltas(),
        "Inventory store ready"
    );

    Ok(store)
}

fn optional_secret(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| SecretString::new(value.into()))
}

fn show(snapshot: InventorySnapshot, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "count": snapshot.items.len(),
            "items": snapshot.items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_table(&snapshot.items));
    }

    Ok(())
}

/// Plain-text inventory table
pub(crate) fn render_table(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "Pantry is empty.\n".to_string();
    }

    let width = items
        .iter()
        .map(|item| item.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Item Name".len());

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  {}\n", "Item Name", "Quantity"));
    out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(8)));
    for item in items {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            item.display_name(),
            item.quantity
        ));
    }
    out
}
