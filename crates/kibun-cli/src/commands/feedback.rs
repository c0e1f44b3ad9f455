//! Feedback submission command handler
use anyhow::Result;
use kibun_core::{config, FeedbackTracker};
use kibun_storage::FeedbackLog;

use super::helpers::load_service;

pub async fn handle_feedback_command(text: &str) -> Result<()> {
    let data_dir = config::get_data_dir()?;
    let service = load_service(&data_dir)?;

    let log = FeedbackLog::open(Some(data_dir))?;
    let mut tracker = FeedbackTracker::new(log);

    log::debug!("Submitting feedback for classification by {}", service.model_name());
    let entry = tracker.submit(&service, text).await?;
    println!("{}", entry.summary_line());

    let counts = tracker.counts();
    println!(
        "Session totals: POSITIVE={} NEGATIVE={} NEUTRAL={}",
        counts.positive, counts.negative, counts.neutral
    );

    Ok(())
}
