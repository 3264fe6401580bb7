//! Session profile

use crate::{BrowserVersion, ConfigError, Feature, FeatureSet, SessionConfig};

/// Immutable browser configuration of one session.
///
/// Built once and shared by the capability registry, the style resolver and
/// the host objects; nothing consults global state for version behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    version: BrowserVersion,
    features: FeatureSet,
    user_agent: String,
}

impl BrowserProfile {
    /// Profile with the version's stock feature row
    pub fn new(version: BrowserVersion) -> Self {
        Self {
            version,
            features: version.default_features(),
            user_agent: version.user_agent().to_string(),
        }
    }

    /// Build a profile from session configuration
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut profile = Self::new(config.browser);
        for feature in &config.enable_features {
            profile.features.insert(feature.bit());
        }
        for feature in &config.disable_features {
            profile.features.remove(feature.bit());
        }
        if let Some(ua) = &config.user_agent {
            profile.user_agent = ua.clone();
        }

        tracing::debug!(
            "Browser profile {} with features {:?}",
            profile.version.nickname(),
            profile.features
        );
        Ok(profile)
    }

    /// Replace the feature set
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    pub fn version(&self) -> BrowserVersion {
        self.version
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[inline]
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.has(feature)
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::new(BrowserVersion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let config = SessionConfig {
            browser: BrowserVersion::Chrome,
            enable_features: vec![Feature::CssRtDisplayRubyTextAlways],
            disable_features: vec![Feature::JsNavigatorPdfViewer],
            user_agent: Some("custom".to_string()),
        };
        let profile = BrowserProfile::from_config(&config).unwrap();

        assert!(profile.has_feature(Feature::CssRtDisplayRubyTextAlways));
        assert!(!profile.has_feature(Feature::JsNavigatorPdfViewer));
        assert_eq!(profile.user_agent(), "custom");
    }

    #[test]
    fn test_conflicting_override_rejected() {
        let config = SessionConfig {
            browser: BrowserVersion::Firefox,
            enable_features: vec![Feature::CssRpDisplayNoneAlways],
            disable_features: vec![Feature::CssRpDisplayNoneAlways],
            user_agent: None,
        };
        assert!(BrowserProfile::from_config(&config).is_err());
    }
}
