//! Dashboard view derivation.
//!
//! Both views are computed fresh on every call from the full entry slice;
//! there is no incremental caching, so two calls with no intervening record
//! yield identical results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kibun_storage::models::{FeedbackEntry, Sentiment};
use serde::Serialize;

/// Label totals for proportional rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsView {
    /// Label/count pairs in fixed rendering order
    pub counts: [(Sentiment, u64); 3],
    pub total: u64,
}

impl TotalsView {
    /// Share of a label in [0,100]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share(&self, sentiment: Sentiment) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let count = self
            .counts
            .iter()
            .find(|(s, _)| *s == sentiment)
            .map_or(0, |(_, c)| *c);
        (count as f64 / self.total as f64) * 100.0
    }
}

/// One minute-resolution bucket of the trend view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    /// Bucket key, `HH:MM` in UTC
    pub minute: String,
    /// Counts indexed in `Sentiment::ALL` order
    pub counts: [u64; 3],
}

impl TrendBucket {
    #[must_use]
    pub fn count(&self, sentiment: Sentiment) -> u64 {
        self.counts[label_index(sentiment)]
    }
}

/// Minute-bucketed trend plus the label totals drawn beside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendView {
    /// Buckets in chronological order of first appearance
    pub buckets: Vec<TrendBucket>,
    pub totals: TotalsView,
}

/// Derive dashboard views from recorded feedback
pub struct DashboardGenerator;

impl DashboardGenerator {
    /// Group all entries by label. Returns `None` when the log is empty -
    /// nothing to render rather than an empty chart.
    #[must_use]
    pub fn totals(entries: &[FeedbackEntry]) -> Option<TotalsView> {
        if entries.is_empty() {
            return None;
        }

        let mut counts = [0_u64; 3];
        for entry in entries {
            counts[label_index(entry.sentiment)] += 1;
        }

        Some(TotalsView {
            counts: Sentiment::ALL.map(|sentiment| (sentiment, counts[label_index(sentiment)])),
            total: entries.len() as u64,
        })
    }

    /// Bucket entries by their timestamp truncated to minute resolution.
    ///
    /// Rows appear in chronological order of first appearance; entries
    /// sharing a bucket are summed. Returns `None` when the log is empty.
    #[must_use]
    pub fn trend(entries: &[FeedbackEntry]) -> Option<TrendView> {
        if entries.is_empty() {
            return None;
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut buckets: Vec<TrendBucket> = Vec::new();

        for entry in entries {
            let minute = minute_bucket(entry.timestamp);
            let slot = *index.entry(minute.clone()).or_insert_with(|| {
                buckets.push(TrendBucket {
                    minute,
                    counts: [0; 3],
                });
                buckets.len() - 1
            });
            buckets[slot].counts[label_index(entry.sentiment)] += 1;
        }

        let totals = Self::totals(entries)?;
        Some(TrendView { buckets, totals })
    }
}

fn label_index(sentiment: Sentiment) -> usize {
    match sentiment {
        Sentiment::Positive => 0,
        Sentiment::Negative => 1,
        Sentiment::Neutral => 2,
    }
}

fn minute_bucket(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}
