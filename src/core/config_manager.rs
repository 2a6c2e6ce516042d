// src/core/config_manager.rs
//! Configuration loading: config.yaml for storage paths, environment for the rest

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    /// Directory uploaded resume documents are stored in
    pub uploads_root: PathBuf,
    /// Root that stored relative document URLs are resolved against
    pub service_root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub scoring_temperature: f32,
    pub scoring_max_tokens: u32,
    pub interview_temperature: f32,
    pub interview_max_tokens: u32,
    /// Trailing dialogue turns sent as context for the next interview turn
    pub history_window: usize,
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            scoring_temperature: 0.2,
            scoring_max_tokens: 2000,
            interview_temperature: 0.7,
            interview_max_tokens: 500,
            history_window: 4,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: StorageConfig,
    production: StorageConfig,
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self {
            storage: Self::load_storage(&base_dir)?,
            generation: Self::load_generation()?,
            server: Self::load_server()?,
        })
    }

    fn environment() -> String {
        std::env::var("CV_ANALYZER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_storage(base_dir: &Path) -> Result<StorageConfig> {
        let environment = Self::environment();
        info!("Loading storage configuration for environment: {}", environment);

        let config_path = base_dir.join(CONFIG_FILE);
        let storage = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse_storage(&content, &environment)?
        } else {
            info!("{} not found, using default storage paths", CONFIG_FILE);
            StorageConfig {
                database_path: PathBuf::from("data/cv_analyzer.db"),
                uploads_root: PathBuf::from("uploads"),
                service_root: PathBuf::from("."),
            }
        };

        Ok(storage.resolved_against(base_dir))
    }

    fn parse_storage(content: &str, environment: &str) -> Result<StorageConfig> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn load_generation() -> Result<GenerationConfig> {
        let defaults = GenerationConfig::default();

        let timeout_seconds = match std::env::var("GENERATION_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a number of seconds")?,
            Err(_) => defaults.timeout_seconds,
        };

        Ok(GenerationConfig {
            api_base_url: std::env::var("GENERATION_API_URL").unwrap_or(defaults.api_base_url),
            api_key: std::env::var("GENERATION_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: std::env::var("GENERATION_MODEL").unwrap_or(defaults.model),
            timeout_seconds,
            ..defaults
        })
    }

    fn load_server() -> Result<ServerConfig> {
        let port = match std::env::var("CV_ANALYZER_PORT").or_else(|_| std::env::var("ROCKET_PORT")) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("CV_ANALYZER_PORT must be a valid port number"))?,
            Err(_) => 8000,
        };
        Ok(ServerConfig { port })
    }

    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.storage.uploads_root).await?;
        if let Some(db_parent) = self.storage.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }
        Ok(())
    }
}

impl StorageConfig {
    fn resolved_against(self, base_dir: &Path) -> Self {
        use crate::core::FsOps;

        Self {
            database_path: FsOps::normalize_path(base_dir, &self.database_path),
            uploads_root: FsOps::normalize_path(base_dir, &self.uploads_root),
            service_root: FsOps::normalize_path(base_dir, &self.service_root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
local:
  database_path: data/local.db
  uploads_root: uploads
  service_root: .
production:
  database_path: /var/lib/cv/prod.db
  uploads_root: /var/lib/cv/uploads
  service_root: /app
"#;

    #[test]
    fn test_parse_storage_selects_environment() {
        let local = ConfigManager::parse_storage(YAML, "local").unwrap();
        assert_eq!(local.database_path, PathBuf::from("data/local.db"));

        let prod = ConfigManager::parse_storage(YAML, "production").unwrap();
        assert_eq!(prod.service_root, PathBuf::from("/app"));

        // unknown environments fall back to local
        let other = ConfigManager::parse_storage(YAML, "staging").unwrap();
        assert_eq!(other.uploads_root, PathBuf::from("uploads"));
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let storage = ConfigManager::parse_storage(YAML, "local")
            .unwrap()
            .resolved_against(Path::new("/srv/cv"));
        assert_eq!(storage.database_path, PathBuf::from("/srv/cv/data/local.db"));
        assert_eq!(storage.uploads_root, PathBuf::from("/srv/cv/uploads"));

        let prod = ConfigManager::parse_storage(YAML, "production")
            .unwrap()
            .resolved_against(Path::new("/srv/cv"));
        assert_eq!(prod.uploads_root, PathBuf::from("/var/lib/cv/uploads"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ConfigManager::parse_storage("local: [", "local").is_err());
    }

    #[test]
    fn test_generation_defaults_favour_determinism_for_scoring() {
        let config = GenerationConfig::default();
        assert!(config.scoring_temperature < config.interview_temperature);
        assert!(config.history_window > 0);
    }
}
