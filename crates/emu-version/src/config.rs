//! Session configuration loading

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BrowserVersion, Feature};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Browser selection for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulated browser
    pub browser: BrowserVersion,
    /// Features to switch on in addition to the browser's row
    pub enable_features: Vec<Feature>,
    /// Features to switch off
    pub disable_features: Vec<Feature>,
    /// `navigator.userAgent` override
    pub user_agent: Option<String>,
}

impl SessionConfig {
    pub fn for_browser(browser: BrowserVersion) -> Self {
        Self { browser, ..Self::default() }
    }

    /// Reject contradictory overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(feature) = self
            .enable_features
            .iter()
            .find(|f| self.disable_features.contains(f))
        {
            return Err(ConfigError::InvalidValue {
                field: "enable_features".to_string(),
                message: format!("{:?} is both enabled and disabled", feature),
            });
        }
        Ok(())
    }
}

/// Loads [`SessionConfig`] from TOML or JSON sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<SessionConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn load_str(content: &str) -> Result<SessionConfig, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn load_json(content: &str) -> Result<SessionConfig, ConfigError> {
        let config: SessionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.browser, BrowserVersion::Chrome);
        assert!(config.enable_features.is_empty());
    }

    #[test]
    fn test_load_toml() {
        let content = r#"
            browser = "firefox"
            disable_features = ["CSS_RT_DISPLAY_RUBY_TEXT_ALWAYS"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser, BrowserVersion::Firefox);
        assert_eq!(config.disable_features, vec![Feature::CssRtDisplayRubyTextAlways]);
    }

    #[test]
    fn test_load_json() {
        let config = ConfigLoader::load_json(r#"{"browser": "edge"}"#).unwrap();
        assert_eq!(config.browser, BrowserVersion::Edge);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let result = ConfigLoader::load_str(r#"enable_features = ["NOT_A_FEATURE"]"#);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/emu.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
