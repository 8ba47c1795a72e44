use neverlost_core::gateway::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration (persistent)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the layout service, e.g. `http://localhost:5000/api`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl AppConfig {
    /// Load config from standard location
    /// Returns default config if file doesn't exist or is malformed
    pub fn load() -> Self {
        match Self::config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}. Using default configuration", e);
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to standard location
    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save atomically (write to temp, then rename)
    fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, path)?;

        Ok(())
    }

    /// Get cross-platform config file path
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        use directories::ProjectDirs;

        let proj_dirs = ProjectDirs::from("", "", "neverlost")
            .ok_or("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Pick the service URL
    ///
    /// `cli` already folds in the `NEVERLOST_API_URL` variable, so the order
    /// is flag, environment, config file, built-in default.
    pub fn resolve_api_url(&self, cli: Option<&str>) -> String {
        cli.or(self.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    pub fn set_api_url(&mut self, url: impl Into<String>) {
        self.api_url = Some(url.into().trim_end_matches('/').to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_url_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(config.resolve_api_url(None), DEFAULT_API_URL);

        config.set_api_url("https://layouts.example.com/api/");
        assert_eq!(config.resolve_api_url(None), "https://layouts.example.com/api");
        assert_eq!(config.resolve_api_url(Some("http://127.0.0.1:5000/api")), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neverlost").join("config.json");

        let mut config = AppConfig::default();
        config.set_api_url("http://example.com/api");
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());

        std::fs::write(&path, "not json").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
