//! Configuration command handlers
use anyhow::Result;
use clap::Subcommand;
use kibun_core::config;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Config key: provider, model, sentiment_model, api_key, base_url, enabled
        key: String,
        /// New value
        value: String,
    },
}

pub fn handle_config_command(action: ConfigAction) -> Result<()> {
    let data_dir = config::get_data_dir()?;

    match action {
        ConfigAction::Show => {
            let ai = config::load_ai_config(&data_dir)?;

            println!("AI Configuration");
            println!("{}", "\u{2550}".repeat(16));
            println!("provider:        {}", ai.provider);
            println!("model:           {}", ai.effective_model());
            println!("sentiment_model: {}", ai.effective_sentiment_model());
            println!("base_url:        {}", ai.effective_base_url());
            println!(
                "api_key:         {}",
                if ai.effective_api_key().is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!("enabled:         {}", ai.enabled);
        }
        ConfigAction::Set { key, value } => {
            let mut ai = config::load_ai_config(&data_dir)?;
            config::update_ai_config_field(&mut ai, &key, &value)?;
            config::save_ai_config(&data_dir, &ai)?;
            println!("Updated {key}");
        }
    }

    Ok(())
}
