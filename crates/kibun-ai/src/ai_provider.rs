use anyhow::{Context, Result};
use async_trait::async_trait;
use kibun_storage::models::{AiConfig, AiProvider};

use crate::providers::{
    huggingface::HuggingFaceProvider, ollama::OllamaProvider, openai::OpenAiProvider,
};

/// Raw top-ranked classifier output, before label normalization
#[derive(Debug, Clone)]
pub struct SentimentPrediction {
    pub label: String,
    pub confidence: f64,
}

/// Trait for AI providers
#[async_trait]
pub trait AiProviderTrait: Send + Sync {
    /// Generate text response for a given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool {
        true
    }

    /// Return the top-ranked sentiment verdict for a text.
    ///
    /// The default implementation prompts the generation model for a strict
    /// JSON verdict and parses it. Providers with a dedicated
    /// text-classification endpoint override this.
    async fn classify(&self, text: &str) -> Result<SentimentPrediction> {
        let prompt = build_classification_prompt(text);
        let response = self.generate(&prompt).await?;
        parse_classification_response(&response)
    }
}

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns an error if the API key is missing for providers that require one
/// (Hugging Face, `OpenAI`).
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn AiProviderTrait>> {
    let model = config.effective_model();
    let api_key = config.effective_api_key();
    let base_url = config.effective_base_url();

    match config.provider {
        AiProvider::HuggingFace => {
            let api_key = api_key.context("API Key required for Hugging Face")?;
            Ok(Box::new(HuggingFaceProvider::new(
                &api_key,
                model,
                config.effective_sentiment_model(),
                Some(base_url),
            )))
        }
        AiProvider::OpenAi => {
            let api_key = api_key.context("API Key required for OpenAI")?;
            Ok(Box::new(OpenAiProvider::new(&api_key, model, Some(base_url))))
        }
        AiProvider::Ollama => Ok(Box::new(OllamaProvider::new(Some(base_url), model))),
    }
}

fn build_classification_prompt(text: &str) -> String {
    format!(
        "Classify the sentiment of the following feedback text.\n\
         Text: {text}\n\
         \n\
         Return a JSON object with this exact format:\n\
         {{\n  \"label\": \"POSITIVE\",\n  \"confidence\": 0.95\n}}\n\
         The label must be POSITIVE, NEGATIVE, or NEUTRAL and the confidence\n\
         a number between 0 and 1.\n\
         Do not include markdown formatting like ```json."
    )
}

/// Parse a JSON sentiment verdict out of a model response
///
/// # Errors
///
/// Returns an error if the response is not JSON or lacks the label or
/// confidence fields.
pub fn parse_classification_response(response: &str) -> Result<SentimentPrediction> {
    // Clean up response if it contains markdown code blocks
    let clean = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```");

    let json: serde_json::Value = serde_json::from_str(clean.trim())
        .context(format!("Failed to parse JSON from AI response: {response}"))?;

    let label = json["label"]
        .as_str()
        .context("JSON missing label field")?
        .to_string();
    let confidence = json["confidence"]
        .as_f64()
        .context("JSON missing confidence field")?;

    Ok(SentimentPrediction { label, confidence })
}
