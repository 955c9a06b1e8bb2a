//! Recipe use case

use async_trait::async_trait;

use crate::{
    model::{InventoryItem, Recipe},
    ports::{GenerationError, RecipeGenerator, RecipeRequest},
};

/// Use case for generating a recipe from current inventory
///
/// Generation never touches the store; failures come back as a typed result
/// so the caller can tell the user instead of silently showing nothing.
pub struct RecipeUseCase<G> {
    generator: G,
}

impl<G: RecipeGenerator> RecipeUseCase<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, items: &[InventoryItem]) -> Result<Recipe, GenerationError> {
        tracing::info!(items = items.len(), "Requesting recipe");

        let result = self
            .generator
            .generate(RecipeRequest {
                items: items.to_vec(),
            })
            .await;

        if let Err(ref e) = result {
            tracing::warn!(error = %e, "Recipe generation failed");
        }

        result
    }
}

#[async_trait]
impl<G: RecipeGenerator + ?Sized> RecipeGenerator for &G {
    async fn generate(&self, request: RecipeRequest) -> Result<Recipe, GenerationError> {
        (*self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemName;
    use std::sync::Mutex;

    struct FakeGenerator {
        seen: Mutex<Vec<usize>>,
        fail: bool,
    }

    #[async_trait]
    impl RecipeGenerator for FakeGenerator {
        async fn generate(&self, request: RecipeRequest) -> Result<Recipe, GenerationError> {
            self.seen.lock().unwrap().push(request.items.len());
            if self.fail {
                return Err(GenerationError::Unavailable("down".to_string()));
            }
            Ok(Recipe {
                model: "fake".to_string(),
                text: "# Omelette".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_generate_passes_items_through() {
        let usecase = RecipeUseCase::new(FakeGenerator {
            seen: Mutex::new(vec![]),
            fail: false,
        });
        let items = vec![InventoryItem::new(ItemName::parse("eggs").unwrap(), 3)];

        let recipe = usecase.generate(&items).await.unwrap();

        assert_eq!(recipe.text, "# Omelette");
        assert_eq!(*usecase.generator.seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_generate_empty_inventory_still_requests() {
        let usecase = RecipeUseCase::new(FakeGenerator {
            seen: Mutex::new(vec![]),
            fail: false,
        });

        assert!(usecase.generate(&[]).await.is_ok());
        assert_eq!(*usecase.generator.seen.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_generate_failure_is_returned() {
        let usecase = RecipeUseCase::new(FakeGenerator {
            seen: Mutex::new(vec![]),
            fail: true,
        });

        let result = usecase.generate(&[]).await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }
}
