mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::config::ConfigAction;

#[derive(Parser)]
#[command(name = "kibun")]
#[command(about = "Citizen feedback sentiment tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask the citizen assistant a question
    Chat {
        /// The question to ask
        prompt: String,
    },
    /// Submit feedback for sentiment analysis
    Feedback {
        /// The feedback text
        text: String,
    },
    /// Render the sentiment dashboard
    Dashboard {
        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Export the interaction log
    Export {
        /// Export format: csv, json
        format: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show data location, entry count, and provider availability
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { prompt } => commands::chat::handle_chat_command(&prompt).await,
        Commands::Feedback { text } => commands::feedback::handle_feedback_command(&text).await,
        Commands::Dashboard { format } => commands::dashboard::handle_dashboard_command(&format),
        Commands::Export { format, output } => {
            commands::export::handle_export_command(&format, output)
        }
        Commands::Config { action } => commands::config::handle_config_command(action),
        Commands::Status => commands::status::handle_status_command().await,
    }
}
