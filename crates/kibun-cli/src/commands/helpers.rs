//! Helper utility functions for CLI commands

use anyhow::Result;
use kibun_ai::AiService;
use kibun_core::config;
use std::path::Path;

/// Build the AI service from the persisted configuration.
pub fn load_service(data_dir: &Path) -> Result<AiService> {
    let ai_config = config::load_ai_config(data_dir)?;
    if !ai_config.enabled {
        anyhow::bail!("AI is disabled. Run: kibun config set enabled true");
    }
    AiService::new(ai_config)
}
