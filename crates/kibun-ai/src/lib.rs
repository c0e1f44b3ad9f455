pub mod ai_provider;
pub mod ai_service;
pub mod dashboard;
pub mod providers;

pub use ai_provider::{create_provider, AiProviderTrait, SentimentPrediction};
pub use ai_service::AiService;
pub use dashboard::{DashboardGenerator, TotalsView, TrendBucket, TrendView};
