use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of sentiment labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// All labels in rendering order
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Map a raw classifier label onto the closed set.
    ///
    /// Matching is case-insensitive. Anything that is not POSITIVE or
    /// NEGATIVE falls through to `Neutral` - including a classifier-reported
    /// NEUTRAL, which takes the same path as an unrecognized label.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified feedback interaction, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub sentiment: Sentiment,
    pub score: u8,
}

impl FeedbackEntry {
    #[must_use]
    pub fn new(text: String, sentiment: Sentiment, score: u8) -> Self {
        Self {
            timestamp: Utc::now(),
            text,
            sentiment,
            score,
        }
    }

    /// Convert a classifier confidence in [0,1] to an integer percentage.
    /// Out-of-range confidences are clamped before rounding.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn score_from_confidence(confidence: f64) -> u8 {
        (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Display line shown to the submitting user
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("Sentiment: {} ({}%)", self.sentiment, self.score)
    }
}

/// Running per-label tally since process start, never decremented or reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentCounts {
    /// Increment the counter for an already-normalized label
    pub fn bump(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    #[must_use]
    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }

    /// Label/count pairs in rendering order
    #[must_use]
    pub fn snapshot(&self) -> [(Sentiment, u64); 3] {
        [
            (Sentiment::Positive, self.positive),
            (Sentiment::Negative, self.negative),
            (Sentiment::Neutral, self.neutral),
        ]
    }
}

/// Supported AI providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    HuggingFace,
    OpenAi,
    Ollama,
}

impl AiProvider {
    #[must_use]
    pub fn parse_provider(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Some(Self::HuggingFace),
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::HuggingFace => "huggingface",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

/// AI capability configuration, persisted as TOML in the data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            model: None,
            sentiment_model: None,
            api_key: None,
            base_url: None,
            enabled: true,
        }
    }
}

impl AiConfig {
    /// Generation model, falling back to the provider default
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            AiProvider::HuggingFace => "ibm-granite/granite-3.3-2b-instruct",
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Ollama => "llama3.2",
        })
    }

    /// Sentiment classification model, falling back to the pipeline default
    #[must_use]
    pub fn effective_sentiment_model(&self) -> &str {
        self.sentiment_model
            .as_deref()
            .unwrap_or("distilbert-base-uncased-finetuned-sst-2-english")
    }

    /// Configured key, falling back to the `HF_TOKEN` environment variable
    #[must_use]
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("HF_TOKEN").ok())
    }

    /// Base URL, falling back to the provider default
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(match self.provider {
            AiProvider::HuggingFace => "https://api-inference.huggingface.co",
            AiProvider::OpenAi => "https://api.openai.com/v1",
            AiProvider::Ollama => "http://localhost:11434",
        })
    }
}
