//! Text-generation adapters for recipes

pub mod openai;
pub mod stub;

pub use openai::OpenAiRecipeGenerator;
pub use stub::StubRecipeGenerator;

use pantry_domain::InventoryItem;
use serde::{Deserialize, Serialize};

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-2.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on failure
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 800,
            timeout_secs: 60,
            retries: 2,
        }
    }
}

/// Render items as `[name (quantity), ...]`
pub fn format_inventory(items: &[InventoryItem]) -> String {
    let listed = items
        .iter()
        .map(|item| format!("{} ({})", item.name, item.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", listed)
}

/// Build the recipe prompt sent as the single system message
pub fn build_recipe_prompt(items: &[InventoryItem]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a helpful home cook. ");
    prompt.push_str(
        "Suggest one recipe that can be made with the following pantry items, \
         listed as name (quantity): ",
    );
    prompt.push_str(&format_inventory(items));
    prompt.push_str(".\n\n");
    prompt.push_str(
        "Respond in markdown with a title, an ingredients list with amounts, \
         and numbered steps. Prefer the listed items; only assume common staples \
         such as salt, pepper, oil and water.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::ItemName;

    fn item(name: &str, quantity: u32) -> InventoryItem {
        InventoryItem::new(ItemName::parse(name).unwrap(), quantity)
    }

    #[test]
    fn test_format_inventory_pairs() {
        let items = vec![item("eggs", 3), item("milk", 1)];
        assert_eq!(format_inventory(&items), "[eggs (3), milk (1)]");
    }

    #[test]
    fn test_format_empty_inventory() {
        assert_eq!(format_inventory(&[]), "[]");
    }

    #[test]
    fn test_prompt_contains_inventory() {
        let prompt = build_recipe_prompt(&[item("Flour", 2)]);
        assert!(prompt.contains("[flour (2)]"));
        assert!(prompt.contains("markdown"));
    }
}
