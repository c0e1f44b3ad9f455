//! Status command handler
use anyhow::Result;
use kibun_core::config;
use kibun_storage::FeedbackLog;

use super::helpers::load_service;

pub async fn handle_status_command() -> Result<()> {
    let data_dir = config::get_data_dir()?;
    let log = FeedbackLog::open(Some(data_dir.clone()))?;

    println!("Data directory: {}", data_dir.display());
    println!("Recorded feedback: {}", log.len());

    match load_service(&data_dir) {
        Ok(service) => {
            let available = service.is_available().await;
            println!(
                "AI model: {} ({})",
                service.model_name(),
                if available { "available" } else { "unreachable" }
            );
        }
        Err(e) => println!("AI model: not configured ({e})"),
    }

    Ok(())
}
