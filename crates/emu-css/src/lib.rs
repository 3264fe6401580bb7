//! Emu CSS
//!
//! Default display styles per element type and the CSS object model
//! (style sheets, rules, media lists) backed by lightningcss.

mod computed;
mod display;
mod media;
mod parser;
mod stylesheet;

pub use computed::ComputedStyle;
pub use display::{DisplayPolicy, DisplayStyle, default_display_style};
pub use media::MediaList;
pub use parser::CssParser;
pub use stylesheet::{CssRule, Declaration, RuleId, RuleKind, StyleSheet};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<StyleSheet, CssError> {
    CssParser::new().parse(css)
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Print(String),
}
