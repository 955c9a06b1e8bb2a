//! OpenAI Chat Completions adapter
//!
//! Also serves any OpenAI-compatible provider through `with_base_url`.

use async_trait::async_trait;
use pantry_domain::{GenerationError, Recipe, RecipeGenerator, RecipeRequest};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LlmConfig, build_recipe_prompt};

/// Recipe generator backed by `/chat/completions`
pub struct OpenAiRecipeGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl OpenAiRecipeGenerator {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Result<Self, GenerationError> {
        Self::with_base_url(api_key, "https://api.openai.com/v1".to_string(), config)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: String,
        config: LlmConfig,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_output_tokens),
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Unavailable(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(GenerationError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Unavailable(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            GenerationError::InvalidResponse("Response has no choices".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl RecipeGenerator for OpenAiRecipeGenerator {
    async fn generate(&self, request: RecipeRequest) -> Result<Recipe, GenerationError> {
        let prompt = build_recipe_prompt(&request.items);

        let mut last_error = None;
        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                tracing::warn!(attempt = attempt, "Retrying recipe generation");
                tokio::time::sleep(Duration::from_millis(500 * 2_u64.pow(attempt))).await;
            }

            match self.call_api(&prompt).await {
                Ok(text) => {
                    return Ok(Recipe {
                        model: self.config.model.clone(),
                        text,
                    });
                }
                Err(GenerationError::RateLimited) => {
                    return Err(GenerationError::RateLimited);
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "Recipe request failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| GenerationError::Unavailable("Unknown error".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::{InventoryItem, ItemName};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer, retries: u32) -> OpenAiRecipeGenerator {
        OpenAiRecipeGenerator::with_base_url(
            SecretString::new("test-key".into()),
            server.uri(),
            LlmConfig {
                retries,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn mock_success_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": text },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_success_returns_text_verbatim() {
        let mock_server = MockServer::start().await;
        let text = "# Omelette\n\n1. Whisk the eggs.\n";

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "system" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response(text)))
            .mount(&mock_server)
            .await;

        let request = RecipeRequest {
            items: vec![InventoryItem::new(ItemName::parse("eggs").unwrap(), 3)],
        };
        let recipe = generator(&mock_server, 0).generate(request).await.unwrap();

        assert_eq!(recipe.text, text);
        assert_eq!(recipe.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_generate_empty_inventory_sends_empty_brackets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response("Toast")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let recipe = generator(&mock_server, 0)
            .generate(RecipeRequest { items: vec![] })
            .await
            .unwrap();
        assert_eq!(recipe.text, "Toast");

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.contains("[]"));
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server, 2)
            .generate(RecipeRequest { items: vec![] })
            .await;

        assert!(matches!(result, Err(GenerationError::RateLimited)));
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server, 0)
            .generate(RecipeRequest { items: vec![] })
            .await;

        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_generate_missing_choices_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let result = generator(&mock_server, 0)
            .generate(RecipeRequest { items: vec![] })
            .await;

        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_returned_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response("")))
            .mount(&mock_server)
            .await;

        let recipe = generator(&mock_server, 0)
            .generate(RecipeRequest { items: vec![] })
            .await
            .unwrap();

        assert_eq!(recipe.text, "");
    }

    #[tokio::test]
    async fn test_generate_retries_then_succeeds() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_success_response("Soup")))
            .mount(&mock_server)
            .await;

        let recipe = generator(&mock_server, 1)
            .generate(RecipeRequest { items: vec![] })
            .await
            .unwrap();

        assert_eq!(recipe.text, "Soup");
    }
}
