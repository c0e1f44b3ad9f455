//! The single ingestion path: classify, normalize, persist, count.

use anyhow::Result;
use kibun_ai::{AiService, SentimentPrediction};
use kibun_storage::{FeedbackEntry, FeedbackLog, Sentiment, SentimentCounts};

/// Owns the interaction log and the aggregate counters.
///
/// All mutation flows through [`FeedbackTracker::submit`] and the tracker is
/// owned mutably by one request-handling context at a time, so the log
/// append and the counter bump are never interleaved.
pub struct FeedbackTracker {
    log: FeedbackLog,
    counts: SentimentCounts,
}

impl FeedbackTracker {
    /// Wrap an opened log. Counters start at zero for this process
    /// regardless of how many entries the durable log replayed.
    #[must_use]
    pub fn new(log: FeedbackLog) -> Self {
        Self {
            log,
            counts: SentimentCounts::default(),
        }
    }

    /// Classify a feedback text and record the interaction.
    ///
    /// # Errors
    ///
    /// Classification and persistence failures propagate unchanged; neither
    /// is retried.
    pub async fn submit(&mut self, ai: &AiService, text: &str) -> Result<FeedbackEntry> {
        let prediction = ai.classify_sentiment(text).await?;
        self.record_prediction(text, &prediction)
    }

    /// Record a raw classifier verdict.
    ///
    /// The label is normalized onto the closed label set exactly once, here,
    /// before both the log append and the counter bump, so the two always
    /// agree. The counter is bumped only after the entry is durably
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the log store cannot persist the entry; the
    /// counters are then left untouched.
    pub fn record_prediction(
        &mut self,
        text: &str,
        prediction: &SentimentPrediction,
    ) -> Result<FeedbackEntry> {
        let sentiment = Sentiment::normalize(&prediction.label);
        let score = FeedbackEntry::score_from_confidence(prediction.confidence);

        log::debug!(
            "Classifier label {:?} normalized to {sentiment}",
            prediction.label
        );

        let entry = self.log.record(text.to_string(), sentiment, score)?;
        self.counts.bump(sentiment);

        Ok(entry)
    }

    /// Counter snapshot for this process
    #[must_use]
    pub fn counts(&self) -> SentimentCounts {
        self.counts
    }

    /// The underlying interaction log
    #[must_use]
    pub fn log(&self) -> &FeedbackLog {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tracker(dir: &TempDir) -> FeedbackTracker {
        let log = FeedbackLog::open(Some(dir.path().to_path_buf())).unwrap();
        FeedbackTracker::new(log)
    }

    fn prediction(label: &str, confidence: f64) -> SentimentPrediction {
        SentimentPrediction {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_submit_scenario_i_love_this() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        let entry = tracker
            .record_prediction("I love this!", &prediction("POSITIVE", 0.95))
            .unwrap();

        assert_eq!(entry.summary_line(), "Sentiment: POSITIVE (95%)");

        let counts = tracker.counts();
        assert_eq!(counts.get(Sentiment::Positive), 1);
        assert_eq!(counts.get(Sentiment::Negative), 0);
        assert_eq!(counts.get(Sentiment::Neutral), 0);
    }

    #[test]
    fn test_closed_set_labels_stored_exactly() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        tracker
            .record_prediction("bad roads", &prediction("NEGATIVE", 0.88))
            .unwrap();

        let entries = tracker.log().all();
        assert_eq!(entries[0].sentiment, Sentiment::Negative);
        assert_eq!(tracker.counts().get(Sentiment::Negative), 1);
        assert_eq!(tracker.counts().total(), 1);
    }

    #[test]
    fn test_unrecognized_label_stored_and_counted_as_neutral() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        tracker
            .record_prediction("meh", &prediction("LABEL_1", 0.51))
            .unwrap();
        tracker
            .record_prediction("ok", &prediction("NEUTRAL", 0.77))
            .unwrap();

        // Log and counters saw the same normalized value
        for entry in tracker.log().all() {
            assert_eq!(entry.sentiment, Sentiment::Neutral);
        }
        assert_eq!(tracker.counts().get(Sentiment::Neutral), 2);
        assert_eq!(tracker.counts().total(), 2);
    }

    #[test]
    fn test_counter_sum_equals_record_calls() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        for (label, confidence) in [("POSITIVE", 0.9), ("NEGATIVE", 0.8), ("POSITIVE", 0.7)] {
            tracker
                .record_prediction("text", &prediction(label, confidence))
                .unwrap();
        }

        assert_eq!(tracker.counts().total(), 3);
        assert_eq!(tracker.log().len(), 3);
    }

    #[test]
    fn test_counters_start_at_zero_after_replay() {
        let dir = TempDir::new().unwrap();
        {
            let mut tracker = tracker(&dir);
            tracker
                .record_prediction("earlier", &prediction("POSITIVE", 0.9))
                .unwrap();
        }

        let reopened = tracker(&dir);
        assert_eq!(reopened.log().len(), 1);
        assert_eq!(reopened.counts().total(), 0);
    }

    #[test]
    fn test_confidence_clamped_before_scoring() {
        let dir = TempDir::new().unwrap();
        let mut tracker = tracker(&dir);

        let entry = tracker
            .record_prediction("over-confident", &prediction("POSITIVE", 1.4))
            .unwrap();
        assert_eq!(entry.score, 100);
    }
}
