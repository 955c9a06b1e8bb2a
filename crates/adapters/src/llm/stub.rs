//! Stub recipe generator for testing and offline mode

use async_trait::async_trait;
use pantry_domain::{GenerationError, Recipe, RecipeGenerator, RecipeRequest};

use super::format_inventory;

const STUB_MODEL: &str = "stub";

/// Stub generator that returns configurable responses
pub struct StubRecipeGenerator {
    response: Option<String>,
    error: Option<GenerationError>,
}

impl StubRecipeGenerator {
    /// Create a stub that always returns the given text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerationError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Create a stub that writes a markdown recipe naming the inventory
    pub fn echo() -> Self {
        Self {
            response: None,
            error: None,
        }
    }
}

impl Default for StubRecipeGenerator {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl RecipeGenerator for StubRecipeGenerator {
    async fn generate(&self, request: RecipeRequest) -> Result<Recipe, GenerationError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                GenerationError::Unavailable(msg) => GenerationError::Unavailable(msg.clone()),
                GenerationError::RateLimited => GenerationError::RateLimited,
                GenerationError::Timeout => GenerationError::Timeout,
                GenerationError::InvalidResponse(msg) => {
                    GenerationError::InvalidResponse(msg.clone())
                }
                GenerationError::Config(msg) => GenerationError::Config(msg.clone()),
            });
        }

        if let Some(ref text) = self.response {
            return Ok(Recipe {
                model: STUB_MODEL.to_string(),
                text: text.clone(),
            });
        }

        let text = format!(
            "# Pantry Surprise\n\nIngredients: {}\n\n1. Combine everything.\n",
            format_inventory(&request.items)
        );

        Ok(Recipe {
            model: STUB_MODEL.to_string(),
            text,
        })
    }
}
