use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::ai_provider::{AiProviderTrait, SentimentPrediction};

/// Hugging Face Inference API Provider
///
/// Chat goes through the hosted text-generation endpoint of the configured
/// generation model; sentiment goes through the hosted text-classification
/// endpoint of the configured sentiment model.
pub struct HuggingFaceProvider {
    client: Client,
    api_key: String,
    model: String,
    sentiment_model: String,
    base_url: String,
}

impl HuggingFaceProvider {
    pub fn new(api_key: &str, model: &str, sentiment_model: &str, base_url: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            sentiment_model: sentiment_model.to_string(),
            base_url: base_url
                .unwrap_or("https://api-inference.huggingface.co")
                .trim_end_matches('/')
                .to_string(),
        }
    }

    async fn post_inference(&self, model: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}/models/{}", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Hugging Face")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Hugging Face API error: {}", error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse Hugging Face response")
    }
}

#[async_trait]
impl AiProviderTrait for HuggingFaceProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 200,
                "return_full_text": false
            }
        });

        let json = self.post_inference(&self.model, body).await?;

        // Extract text from: [0].generated_text
        json[0]["generated_text"]
            .as_str()
            .map(|s| s.to_string())
            .context("Failed to extract text from Hugging Face response")
    }

    async fn classify(&self, text: &str) -> Result<SentimentPrediction> {
        let body = json!({ "inputs": text });

        let json = self.post_inference(&self.sentiment_model, body).await?;

        top_candidate(&json)
            .context("Failed to extract sentiment candidates from Hugging Face response")
    }
}

/// The inference API wraps the candidate list in an outer array; some
/// deployments return it flat. Pick the highest-scoring candidate either way.
fn top_candidate(json: &serde_json::Value) -> Option<SentimentPrediction> {
    let outer = json.as_array()?;
    let candidates = match outer.first()? {
        serde_json::Value::Array(inner) => inner,
        _ => outer,
    };

    let mut best: Option<SentimentPrediction> = None;
    for candidate in candidates {
        let label = candidate["label"].as_str()?;
        let confidence = candidate["score"].as_f64()?;
        let better = match &best {
            Some(current) => confidence > current.confidence,
            None => true,
        };
        if better {
            best = Some(SentimentPrediction {
                label: label.to_string(),
                confidence,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_candidate_nested() {
        let response = json!([[
            {"label": "POSITIVE", "score": 0.95},
            {"label": "NEGATIVE", "score": 0.05}
        ]]);
        let prediction = top_candidate(&response).unwrap();
        assert_eq!(prediction.label, "POSITIVE");
        assert!((prediction.confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_candidate_flat() {
        let response = json!([
            {"label": "NEGATIVE", "score": 0.7},
            {"label": "POSITIVE", "score": 0.3}
        ]);
        let prediction = top_candidate(&response).unwrap();
        assert_eq!(prediction.label, "NEGATIVE");
    }

    #[test]
    fn test_top_candidate_picks_highest_score() {
        let response = json!([[
            {"label": "NEGATIVE", "score": 0.2},
            {"label": "NEUTRAL", "score": 0.5},
            {"label": "POSITIVE", "score": 0.3}
        ]]);
        let prediction = top_candidate(&response).unwrap();
        assert_eq!(prediction.label, "NEUTRAL");
    }

    #[test]
    fn test_top_candidate_rejects_malformed() {
        assert!(top_candidate(&json!({"error": "loading"})).is_none());
        assert!(top_candidate(&json!([])).is_none());
        assert!(top_candidate(&json!([[{"label": "POSITIVE"}]])).is_none());
    }
}
