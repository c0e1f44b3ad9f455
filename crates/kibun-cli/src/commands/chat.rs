//! Chat assistant command handler
use anyhow::Result;
use kibun_core::config;

use super::helpers::load_service;

pub async fn handle_chat_command(prompt: &str) -> Result<()> {
    let data_dir = config::get_data_dir()?;
    let service = load_service(&data_dir)?;

    let reply = service.chat_reply(prompt).await?;
    println!("{reply}");

    Ok(())
}
