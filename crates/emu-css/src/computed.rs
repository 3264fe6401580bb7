//! Computed style queries
//!
//! No cascade or layout is modeled: `display` comes from an inline `style`
//! attribute when it declares one, otherwise from the element's default
//! display style.

use emu_dom::{DomTree, NodeId};
use emu_version::BrowserProfile;

use crate::{CssParser, Declaration, DisplayStyle, default_display_style};

/// Snapshot of an element's script-visible style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    display: String,
    inline: Vec<Declaration>,
}

impl ComputedStyle {
    /// Compute for `node`; non-elements get an empty style
    pub fn compute(tree: &DomTree, node: NodeId, profile: &BrowserProfile) -> Self {
        let inline = tree
            .get(node)
            .and_then(|n| n.as_element())
            .and_then(|e| e.get_attr("style"))
            .and_then(|css| CssParser::new().parse_declarations(css).ok())
            .unwrap_or_default();

        let declared = inline
            .iter()
            .rev()
            .find(|d| d.property == "display")
            .map(|d| d.value.clone());
        let display = declared.unwrap_or_else(|| {
            default_display_style(tree, node, profile)
                .unwrap_or(DisplayStyle::Empty)
                .as_str()
                .to_string()
        });

        Self { display, inline }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// `getPropertyValue`; unknown properties yield ""
    pub fn property_value(&self, property: &str) -> String {
        let property = property.trim().to_ascii_lowercase();
        if property == "display" {
            return self.display.clone();
        }
        self.inline
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_dom::Provenance;
    use emu_version::BrowserVersion;

    #[test]
    fn test_default_and_inline_display() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element("div", Provenance::Parser);
        let span = tree.create_element("span", Provenance::Parser);
        tree.append_child(root, div).unwrap();
        tree.append_child(div, span).unwrap();
        tree.get_mut(span)
            .unwrap()
            .as_element_mut()
            .unwrap()
            .set_attr("style", "display: block; color: red");

        let profile = BrowserProfile::new(BrowserVersion::Chrome);
        assert_eq!(ComputedStyle::compute(&tree, div, &profile).display(), "block");

        let style = ComputedStyle::compute(&tree, span, &profile);
        assert_eq!(style.display(), "block");
        assert_eq!(style.property_value("COLOR"), "red");
        assert_eq!(style.property_value("margin"), "");
    }
}
