//! Emu Browser Versions
//!
//! Simulated browser versions, the per-version feature matrix and the
//! immutable session profile consulted by every behavior switch.

mod version;
mod features;
mod profile;
mod config;

pub use version::{BrowserVersion, VersionSet};
pub use features::{Feature, FeatureSet};
pub use profile::BrowserProfile;
pub use config::{ConfigError, ConfigLoader, SessionConfig};
