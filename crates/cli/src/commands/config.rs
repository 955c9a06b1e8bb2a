//! Config command - write an example configuration

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            write_example(&path, force)?;
            print_next_steps(&path);
            Ok(())
        }
    }
}

fn write_example(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote example config");
    Ok(())
}

fn print_next_steps(path: &Path) {
    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Pick a store backend and set its path or Firestore project");
    println!("  2. Export the API key env var for your LLM provider");
    println!("  3. Run 'pantry doctor' to validate your setup");
    println!("  4. Run 'pantry add eggs --quantity 6' to start tracking");
}
