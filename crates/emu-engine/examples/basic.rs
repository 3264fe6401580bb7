//! Load a page under each simulated browser and probe its script surface
//!
//! Run with `RUST_LOG=debug` to see wrapper and registry activity.

use emu_engine::{Engine, EngineConfig};
use emu_version::{BrowserVersion, SessionConfig};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta name="description" content="demo"></head>
<body><p id="greeting">Hello, <b>world</b></p></body>
</html>"#;

const PROBE: &str = r#"
    const sel = getSelection();
    sel.selectAllChildren(document.getElementById('greeting'));
    [
        navigator.userAgent.split(' ')[0],
        'PeriodicSyncManager' in window,
        navigator.mimeTypes.length,
        sel.type,
        JSON.stringify(sel.toString()),
        getComputedStyle(document.createElement('rtc')).display || '(empty)',
    ].join(' | ')
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    for browser in [
        BrowserVersion::Chrome,
        BrowserVersion::Edge,
        BrowserVersion::Firefox,
        BrowserVersion::FirefoxEsr,
        BrowserVersion::InternetExplorer,
    ] {
        let config = EngineConfig {
            session: SessionConfig::for_browser(browser),
            ..EngineConfig::default()
        };
        let engine = Engine::new(config)?;
        let page = engine.load_html(PAGE, "https://example.com/")?;
        let result = page.eval(PROBE)?;
        println!("{:<12} {}", browser.nickname(), result.to_js_string());
    }

    Ok(())
}
