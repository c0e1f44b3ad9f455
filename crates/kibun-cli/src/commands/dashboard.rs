//! Dashboard rendering command handlers
use anyhow::Result;
use kibun_ai::{DashboardGenerator, TrendView};
use kibun_core::config;
use kibun_storage::{FeedbackLog, Sentiment};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Time")]
    minute: String,
    #[tabled(rename = "POSITIVE")]
    positive: u64,
    #[tabled(rename = "NEGATIVE")]
    negative: u64,
    #[tabled(rename = "NEUTRAL")]
    neutral: u64,
}

#[derive(Tabled)]
struct TotalsRow {
    #[tabled(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Percentage")]
    percentage: String,
}

pub fn handle_dashboard_command(format: &str) -> Result<()> {
    let data_dir = config::get_data_dir()?;
    let log = FeedbackLog::open(Some(data_dir))?;

    let Some(trend) = DashboardGenerator::trend(log.all()) else {
        println!("No feedback recorded yet. Submit one with: kibun feedback <text>");
        return Ok(());
    };

    match format {
        "table" => render_tables(&trend),
        "json" => println!("{}", serde_json::to_string_pretty(&trend)?),
        _ => println!("Unknown format: {format}. Use 'table' or 'json'"),
    }

    Ok(())
}

fn render_tables(trend: &TrendView) {
    println!("\nSentiment Trend Over Time");
    println!("{}", "\u{2550}".repeat(28));

    let rows: Vec<TrendRow> = trend
        .buckets
        .iter()
        .map(|bucket| TrendRow {
            minute: bucket.minute.clone(),
            positive: bucket.count(Sentiment::Positive),
            negative: bucket.count(Sentiment::Negative),
            neutral: bucket.count(Sentiment::Neutral),
        })
        .collect();
    println!("\n{}", Table::new(rows));

    println!("\nOverall Sentiment Distribution");
    println!("{}", "\u{2550}".repeat(30));

    let totals: Vec<TotalsRow> = trend
        .totals
        .counts
        .iter()
        .map(|(sentiment, count)| TotalsRow {
            sentiment: sentiment.to_string(),
            count: *count,
            percentage: format!("{:.1}%", trend.totals.share(*sentiment)),
        })
        .collect();
    println!("\n{}", Table::new(totals));

    println!("\nTotal feedback recorded: {}", trend.totals.total);
}
