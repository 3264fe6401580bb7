//! Emu HTML Loader
//!
//! Builds an [`emu_dom::Document`] from markup using html5ever.

mod parser;

pub use parser::HtmlParser;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Result<emu_dom::Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML loading error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tree construction failed: {0}")]
    Tree(#[from] emu_dom::DomException),
}
