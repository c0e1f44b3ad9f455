pub mod log_store;
pub mod models;

pub use log_store::{ExportError, FeedbackLog};
pub use models::{AiConfig, AiProvider, FeedbackEntry, Sentiment, SentimentCounts};
