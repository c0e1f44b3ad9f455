//! Data directory resolution and AI configuration persistence.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use kibun_storage::models::{AiConfig, AiProvider};

const CONFIG_FILE: &str = "config.toml";

/// Get the local data directory for kibun.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_local_dir().ok_or_else(|| anyhow::anyhow!("Failed to get local data dir"))?;
    path.push("kibun");
    Ok(path)
}

/// Load the AI configuration from `config.toml` in the data directory.
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_ai_config(data_dir: &Path) -> Result<AiConfig> {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(AiConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Persist the AI configuration to `config.toml` in the data directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn save_ai_config(data_dir: &Path, config: &AiConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let path = data_dir.join(CONFIG_FILE);
    let raw = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))
}

/// Update a single AI config field by key.
///
/// # Errors
///
/// Returns an error for an unknown key or an unknown provider name.
pub fn update_ai_config_field(config: &mut AiConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "provider" => {
            config.provider = AiProvider::parse_provider(value).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown provider: {value}. Valid providers: huggingface, openai, ollama"
                )
            })?;
        }
        "model" => config.model = Some(value.to_string()),
        "sentiment_model" => config.sentiment_model = Some(value.to_string()),
        "api_key" => config.api_key = Some(value.to_string()),
        "base_url" => config.base_url = Some(value.to_string()),
        "enabled" => config.enabled = value == "true" || value == "1",
        _ => anyhow::bail!(
            "Unknown AI config key: {key}. Valid keys: provider, model, sentiment_model, api_key, base_url, enabled"
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_ai_config(dir.path()).unwrap();
        assert!(config.enabled);
        assert_eq!(config.provider, AiProvider::HuggingFace);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();

        let config = AiConfig {
            provider: AiProvider::Ollama,
            model: Some("llama3.2".to_string()),
            enabled: false,
            ..AiConfig::default()
        };

        save_ai_config(dir.path(), &config).unwrap();
        let loaded = load_ai_config(dir.path()).unwrap();

        assert_eq!(loaded.provider, AiProvider::Ollama);
        assert_eq!(loaded.model.as_deref(), Some("llama3.2"));
        assert!(!loaded.enabled);
    }

    #[test]
    fn test_update_field() {
        let mut config = AiConfig::default();

        update_ai_config_field(&mut config, "provider", "openai").unwrap();
        assert_eq!(config.provider, AiProvider::OpenAi);

        update_ai_config_field(&mut config, "sentiment_model", "my/model").unwrap();
        assert_eq!(config.sentiment_model.as_deref(), Some("my/model"));

        update_ai_config_field(&mut config, "enabled", "1").unwrap();
        assert!(config.enabled);
    }

    #[test]
    fn test_update_rejects_unknown_key() {
        let mut config = AiConfig::default();
        assert!(update_ai_config_field(&mut config, "temperature", "0.7").is_err());
    }

    #[test]
    fn test_update_rejects_unknown_provider() {
        let mut config = AiConfig::default();
        assert!(update_ai_config_field(&mut config, "provider", "bedrock").is_err());
    }
}
