//! Configuration loaded from ~/.config/vita/config.toml.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key for the completion service. Can also come from the
    /// VITA_API_KEY or OPENAI_API_KEY environment variables.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for an OpenAI-compatible endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Default model name.
    #[serde(default)]
    pub model: Option<String>,

    /// Path to the SQLite database (supports $VAR and ~).
    #[serde(default)]
    pub database: Option<String>,
}

/// Expand environment variables in a path string.
/// Supports: $VAR, ${VAR}, ~
pub fn expand_path(path: &str) -> PathBuf {
    let mut result = path.to_string();

    if result.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            result = format!("{}{}", home.display(), &result[1..]);
        }
    } else if result == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    let re = regex::Regex::new(r"\$\{?([A-Za-z_][A-Za-z0-9_]*)\}?").unwrap();
    let expanded = re.replace_all(&result, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    });

    PathBuf::from(expanded.to_string())
}

impl Config {
    /// Load the config file when it exists; an absent file is an empty
    /// config, since every field has an environment or default fallback.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("vita").join("config.toml"))
    }

    /// Database path: the configured value with $VAR/~ expanded, or
    /// vita.db next to the config file.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(expand_path(path)),
            None => {
                let config_dir = dirs::config_dir()
                    .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
                Ok(config_dir.join("vita").join("vita.db"))
            }
        }
    }

    /// API key resolution: flag > config file > environment.
    pub fn resolve_api_key(&self, flag: Option<&str>) -> Result<String> {
        if let Some(key) = flag {
            return Ok(key.to_string());
        }
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        if let Ok(key) = std::env::var("VITA_API_KEY") {
            return Ok(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            return Ok(key);
        }
        anyhow::bail!(
            "No API key found. Pass --api-key, set VITA_API_KEY, or create \
             ~/.config/vita/config.toml with:\n\n\
             api_key = \"sk-...\"\n\
             # base_url = \"https://api.openai.com/v1\"\n\
             # model = \"gpt-4o-mini\"\n\
             # database = \"~/.local/share/vita/vita.db\"\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            api_key = "sk-test"
            base_url = "http://localhost:8080/v1"
            model = "gpt-4o-mini"
            database = "~/.local/share/vita/vita.db"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_key.is_none());
        assert!(config.database.is_none());
    }

    #[test]
    fn test_flag_beats_config() {
        let config = Config {
            api_key: Some("from-config".to_string()),
            ..Config::default()
        };
        let key = config.resolve_api_key(Some("from-flag")).unwrap();
        assert_eq!(key, "from-flag");
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_path("~/data/vita.db");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_expand_env_var() {
        std::env::set_var("VITA_TEST_DIR", "/tmp/vita-test");
        let expanded = expand_path("$VITA_TEST_DIR/vita.db");
        assert_eq!(expanded, PathBuf::from("/tmp/vita-test/vita.db"));
    }
}
