//! Configuration - environment variables first, then the on-disk config
//!
//! API keys are loaded from `GROQ_API_KEY` or `~/.voicedev/config.json`.
//! Absence of a credential is a supported state: the generator then runs
//! local-only, it does not error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: "llama3-8b-8192".to_string(),
            max_tokens: 1024,
            temperature: 0.1,
            server_port: 5173,
        }
    }
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".voicedev").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("/tmp/.voicedev_config.json"))
}

impl AppConfig {
    /// Load config from environment and file. Env vars win; file fills in
    /// the rest; defaults cover everything else.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                if let Ok(file_config) = serde_json::from_str::<AppConfig>(&contents) {
                    config = file_config;
                }
            }
        }

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                config.groq_api_key = Some(key);
            }
        }

        config
    }

    /// Save config to the on-disk file.
    pub fn save(&self) -> Result<(), String> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(
            &path,
            serde_json::to_string_pretty(self).map_err(|e| e.to_string())?,
        )
        .map_err(|e| e.to_string())
    }

    pub fn has_credential(&self) -> bool {
        self.groq_api_key.as_deref().map(|k| !k.is_empty()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_credential() {
        let config = AppConfig::default();
        assert!(!config.has_credential());
        assert_eq!(config.model, "llama3-8b-8192");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_empty_key_is_no_credential() {
        let config = AppConfig {
            groq_api_key: Some(String::new()),
            ..AppConfig::default()
        };
        assert!(!config.has_credential());
    }
}
