use anyhow::Result;
use kibun_storage::models::AiConfig;

use crate::ai_provider::{create_provider, AiProviderTrait, SentimentPrediction};

/// Unified AI Service
///
/// Wraps the configured provider behind the two capabilities the
/// application needs: chat replies and sentiment classification.
pub struct AiService {
    provider: Box<dyn AiProviderTrait>,
    config: AiConfig,
}

impl AiService {
    /// Create a new AI service from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured provider cannot be constructed.
    pub fn new(config: AiConfig) -> Result<Self> {
        let provider = create_provider(&config)?;
        Ok(Self { provider, config })
    }

    /// Check if AI service is available/online
    pub async fn is_available(&self) -> bool {
        self.config.enabled && self.provider.is_available().await
    }

    /// Get the model name in use
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Answer a citizen query through the assistant prompt.
    ///
    /// Blocks for the full inference duration; no retry, no timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation capability fails.
    pub async fn chat_reply(&self, user_input: &str) -> Result<String> {
        let prompt = format!("Citizen Query: {user_input}\nAI Response:");
        self.provider.generate(&prompt).await
    }

    /// Top-ranked sentiment verdict for a feedback text.
    ///
    /// The label comes back raw; normalization onto the closed label set
    /// happens once, at the ingestion boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the classification capability fails; the failure
    /// is fatal to the calling request.
    pub async fn classify_sentiment(&self, text: &str) -> Result<SentimentPrediction> {
        log::debug!("Classifying feedback with {}", self.model_name());
        self.provider.classify(text).await
    }
}
