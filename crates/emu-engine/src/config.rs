//! Engine Configuration

use std::fs;
use std::path::Path;

use emu_version::{ConfigError, SessionConfig};
use serde::{Deserialize, Serialize};

/// Engine configuration options
///
/// ```toml
/// enable_javascript = true
///
/// [session]
/// browser = "firefox"
/// disable_features = ["CSS_RP_DISPLAY_NONE_ALWAYS"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated browser and feature overrides
    pub session: SessionConfig,

    /// Enable JavaScript execution
    pub enable_javascript: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            enable_javascript: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.session.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_version::{BrowserVersion, Feature};

    #[test]
    fn test_defaults() {
        let config = EngineConfig::load_str("").unwrap();
        assert!(config.enable_javascript);
        assert_eq!(config.session.browser, BrowserVersion::Chrome);
    }

    #[test]
    fn test_session_table() {
        let content = r#"
            enable_javascript = false

            [session]
            browser = "ie"
            enable_features = ["JS_NAVIGATOR_PDF_VIEWER"]
        "#;
        let config = EngineConfig::load_str(content).unwrap();
        assert!(!config.enable_javascript);
        assert_eq!(config.session.browser, BrowserVersion::InternetExplorer);
        assert_eq!(config.session.enable_features, vec![Feature::JsNavigatorPdfViewer]);
    }

    #[test]
    fn test_contradictory_overrides() {
        let content = r#"
            [session]
            enable_features = ["CSS_RP_DISPLAY_NONE_ALWAYS"]
            disable_features = ["CSS_RP_DISPLAY_NONE_ALWAYS"]
        "#;
        assert!(matches!(
            EngineConfig::load_str(content),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/emu.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
