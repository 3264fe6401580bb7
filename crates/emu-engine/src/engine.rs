//! Engine - Main entry point

use std::sync::{Arc, Mutex};

use emu_html::{HtmlError, HtmlParser};
use emu_js::{CapabilityError, CapabilityRegistry, JsError, Realm, ScriptContext};
use emu_version::{BrowserProfile, ConfigError};

use crate::{EngineConfig, Page};

/// The Emu engine
///
/// Holds the session profile and the capability registry; both are built
/// once and shared by every page.
pub struct Engine {
    config: EngineConfig,
    profile: BrowserProfile,
    registry: Arc<CapabilityRegistry>,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let profile = BrowserProfile::from_config(&config.session)?;
        let registry = Arc::new(CapabilityRegistry::standard()?);

        tracing::info!(
            browser = profile.version().nickname(),
            classes = registry.class_count(),
            members = registry.member_count(),
            "Emu Engine {} initialized",
            crate::VERSION
        );
        Ok(Self {
            config,
            profile,
            registry,
        })
    }

    /// Parse `html` as the document at `url` and run its inline scripts
    pub fn load_html(&self, html: &str, url: &str) -> Result<Page, EngineError> {
        tracing::info!("Loading: {}", url);

        let document = HtmlParser::new().parse_with_url(html, url)?;
        let realm = Arc::new(Mutex::new(Realm::new(
            document,
            self.profile.clone(),
            self.registry.clone(),
        )));

        let script = if self.config.enable_javascript {
            Some(ScriptContext::new(realm.clone())?)
        } else {
            None
        };

        let page = Page::new(url, realm, script);
        page.run_inline_scripts()?;
        Ok(page)
    }

    /// Get engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capability table error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    #[error("JavaScript error: {0}")]
    JavaScript(#[from] JsError),

    #[error("JavaScript is disabled for this page")]
    ScriptingDisabled,

    #[error("Page task queue is closed")]
    PageClosed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_version::{BrowserVersion, SessionConfig};

    #[test]
    fn test_engine_uses_session_browser() {
        let config = EngineConfig {
            session: SessionConfig::for_browser(BrowserVersion::FirefoxEsr),
            ..EngineConfig::default()
        };
        let engine = Engine::new(config).unwrap();
        assert_eq!(engine.profile().version(), BrowserVersion::FirefoxEsr);
        assert!(engine.registry().class_count() > 20);
    }

    #[test]
    fn test_scripting_disabled() {
        let config = EngineConfig {
            enable_javascript: false,
            ..EngineConfig::default()
        };
        let engine = Engine::new(config).unwrap();
        let page = engine
            .load_html("<body><script>document.body.id = 'x'</script></body>", "about:blank")
            .unwrap();
        assert!(matches!(page.eval("1"), Err(EngineError::ScriptingDisabled)));
        let id = page
            .with_realm(|realm| {
                let body = realm.document().body().unwrap();
                realm.document().tree.get(body).and_then(|n| n.as_element()).and_then(|e| e.get_attr("id")).map(str::to_string)
            })
            .unwrap();
        assert_eq!(id, None);
    }
}
