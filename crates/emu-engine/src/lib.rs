//! Emu Engine
//!
//! Headless browser emulation: one engine per simulated browser, one page
//! per loaded document.
//!
//! # Example
//! ```rust,ignore
//! use emu_engine::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let page = engine.load_html("<p id=x>hi</p>", "https://example.com/")?;
//! let text = page.eval("document.getElementById('x').textContent")?;
//! ```

mod config;
mod engine;
mod page;
mod queue;

pub use config::EngineConfig;
pub use engine::{Engine, EngineError};
pub use page::Page;
pub use queue::{PageQueue, PageTask, TaskSender};

// Re-export sub-crates for advanced usage
pub use emu_css as css;
pub use emu_dom as dom;
pub use emu_html as html;
pub use emu_js as js;
pub use emu_version as version;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
