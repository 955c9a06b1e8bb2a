//! Recipe command - ask the configured LLM for a recipe

use anyhow::{Context, Result, bail};
use pantry_adapters::llm::{LlmConfig as AdapterLlmConfig, OpenAiRecipeGenerator, StubRecipeGenerator};
use pantry_domain::RecipeGenerator;
use pantry_domain::usecases::{InventoryService, RecipeUseCase};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::args::OutputArgs;
use crate::commands::inventory::build_store;
use crate::config::AppConfig;

pub async fn execute(args: OutputArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let store = build_store(&config).await?;
    let snapshot = InventoryService::new(store)
        .refresh()
        .await
        .context("Failed to list inventory")?;

    let generator = build_generator(&config)?;
    let usecase = RecipeUseCase::new(&*generator);

    // Failure leaves nothing printed on stdout and reports on stderr
    let recipe = usecase
        .generate(&snapshot.items)
        .await
        .context("Recipe generation failed")?;

    if args.json {
        let output = serde_json::json!({
            "model": recipe.model,
            "items": snapshot.items,
            "recipe": recipe.text,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", recipe.text);
    }

    Ok(())
}

pub(crate) fn build_generator(config: &AppConfig) -> Result<Box<dyn RecipeGenerator>> {
    let llm_config = adapter_llm_config(&config.llm);

    match config.llm.provider.as_str() {
        "openai" => {
            let api_key = load_api_key(&config.llm.openai.api_key_env, "openai")?;
            Ok(Box::new(
                OpenAiRecipeGenerator::with_base_url(
                    api_key,
                    config.llm.openai.base_url.clone(),
                    llm_config,
                )
                .context("Failed to configure OpenAI provider")?,
            ))
        }
        "openai_compat" => {
            let base_url = config.llm.openai_compat.base_url.trim();
            if base_url.is_empty() {
                bail!("OpenAI-compatible base_url is required");
            }
            let api_key = load_api_key(&config.llm.openai_compat.api_key_env, "openai_compat")?;
            Ok(Box::new(
                OpenAiRecipeGenerator::with_base_url(api_key, base_url.to_string(), llm_config)
                    .context("Failed to configure OpenAI-compatible provider")?,
            ))
        }
        "stub" => Ok(Box::new(StubRecipeGenerator::echo())),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

fn adapter_llm_config(config: &crate::config::LlmConfig) -> AdapterLlmConfig {
    AdapterLlmConfig {
        model: config.model.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.timeout_secs,
        retries: config.retries,
    }
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}
