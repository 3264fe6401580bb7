//! CSS object model: style sheets and rules
//!
//! Rules live in an arena owned by their sheet and are addressed by
//! [`RuleId`]. Ids are not reused after `delete_rule`, so a rule id keeps
//! naming the same rule for the sheet's lifetime.

use emu_dom::{DomException, NodeId};

use crate::{CssError, CssParser, MediaList};

/// Rule identifier (index into the sheet's rule arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    fn css_text(&self) -> String {
        if self.important {
            format!("{}: {} !important;", self.property, self.value)
        } else {
            format!("{}: {};", self.property, self.value)
        }
    }
}

/// Rule payload
#[derive(Debug, Clone)]
pub enum RuleKind {
    Style {
        selector_text: String,
        declarations: Vec<Declaration>,
    },
    Media {
        media: MediaList,
        children: Vec<RuleId>,
    },
    /// Rules kept only as text (`@font-face`, `@keyframes`, ...)
    Other { type_code: u16, css_text: String },
}

/// A rule in a sheet's arena
#[derive(Debug, Clone)]
pub struct CssRule {
    pub kind: RuleKind,
    /// Enclosing grouping rule
    pub parent: Option<RuleId>,
}

impl CssRule {
    pub const STYLE_RULE: u16 = 1;
    pub const CHARSET_RULE: u16 = 2;
    pub const IMPORT_RULE: u16 = 3;
    pub const MEDIA_RULE: u16 = 4;
    pub const FONT_FACE_RULE: u16 = 5;
    pub const PAGE_RULE: u16 = 6;
    pub const KEYFRAMES_RULE: u16 = 7;
    pub const KEYFRAME_RULE: u16 = 8;
    pub const NAMESPACE_RULE: u16 = 10;
    pub const SUPPORTS_RULE: u16 = 12;

    /// `CSSRule.type`
    pub fn type_code(&self) -> u16 {
        match &self.kind {
            RuleKind::Style { .. } => Self::STYLE_RULE,
            RuleKind::Media { .. } => Self::MEDIA_RULE,
            RuleKind::Other { type_code, .. } => *type_code,
        }
    }

    pub fn is_style(&self) -> bool {
        matches!(self.kind, RuleKind::Style { .. })
    }

    pub fn is_media(&self) -> bool {
        matches!(self.kind, RuleKind::Media { .. })
    }

    pub fn selector_text(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Style { selector_text, .. } => Some(selector_text),
            _ => None,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        match &self.kind {
            RuleKind::Style { declarations, .. } => declarations,
            _ => &[],
        }
    }

    /// Value of a declared property, `!important` winning over normal
    pub fn property_value(&self, property: &str) -> Option<&str> {
        let mut found: Option<&Declaration> = None;
        for decl in self.declarations().iter().filter(|d| d.property.eq_ignore_ascii_case(property)) {
            if decl.important || found.is_none_or(|f| !f.important) {
                found = Some(decl);
            }
        }
        found.map(|d| d.value.as_str())
    }

    pub fn media(&self) -> Option<&MediaList> {
        match &self.kind {
            RuleKind::Media { media, .. } => Some(media),
            _ => None,
        }
    }

    pub fn media_mut(&mut self) -> Option<&mut MediaList> {
        match &mut self.kind {
            RuleKind::Media { media, .. } => Some(media),
            _ => None,
        }
    }

    /// Child rules of a grouping rule
    pub fn children(&self) -> &[RuleId] {
        match &self.kind {
            RuleKind::Media { children, .. } => children,
            _ => &[],
        }
    }
}

/// A parsed style sheet (`CSSStyleSheet`)
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<Option<CssRule>>,
    top: Vec<RuleId>,
    media: MediaList,
    owner: Option<NodeId>,
    href: Option<String>,
    pub disabled: bool,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete sheet
    pub fn parse(css: &str) -> Result<Self, CssError> {
        CssParser::new().parse(css)
    }

    /// Record the owning `<style>` element
    pub fn with_owner(mut self, owner: NodeId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn with_media(mut self, media: MediaList) -> Self {
        self.media = media;
        self
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// The sheet's own media list
    pub fn media(&self) -> &MediaList {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut MediaList {
        &mut self.media
    }

    // --- Arena ---

    pub(crate) fn push_rule(&mut self, kind: RuleKind, parent: Option<RuleId>) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.rules.push(Some(CssRule { kind, parent }));
        id
    }

    pub(crate) fn push_top(&mut self, id: RuleId) {
        self.top.push(id);
    }

    pub(crate) fn push_child(&mut self, parent: RuleId, child: RuleId) {
        if let Some(RuleKind::Media { children, .. }) = self.rule_mut(parent).map(|r| &mut r.kind) {
            children.push(child);
        }
    }

    /// Get a live rule
    pub fn rule(&self, id: RuleId) -> Option<&CssRule> {
        self.rules.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn rule_mut(&mut self, id: RuleId) -> Option<&mut CssRule> {
        self.rules.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }

    /// `cssRules` of the sheet
    pub fn css_rules(&self) -> &[RuleId] {
        &self.top
    }

    /// Rules of `parent`, or the sheet's top-level rules for `None`
    pub fn rule_list(&self, parent: Option<RuleId>) -> Option<&[RuleId]> {
        match parent {
            None => Some(&self.top),
            Some(id) => {
                let rule = self.rule(id)?;
                rule.is_media().then(|| rule.children())
            }
        }
    }

    /// Top-level rule count
    pub fn len(&self) -> usize {
        self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    /// Every live style rule in tree order, including nested ones
    pub fn style_rules(&self) -> Vec<RuleId> {
        let mut out = Vec::new();
        let mut stack: Vec<RuleId> = self.top.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(rule) = self.rule(id) else { continue };
            if rule.is_style() {
                out.push(id);
            }
            stack.extend(rule.children().iter().rev().copied());
        }
        out
    }

    // --- Serialization ---

    /// `cssText` of a rule
    pub fn css_text(&self, id: RuleId) -> String {
        let Some(rule) = self.rule(id) else {
            return String::new();
        };
        match &rule.kind {
            RuleKind::Style {
                selector_text,
                declarations,
            } => {
                if declarations.is_empty() {
                    return format!("{} {{ }}", selector_text);
                }
                let body: Vec<String> = declarations.iter().map(|d| d.css_text()).collect();
                format!("{} {{ {} }}", selector_text, body.join(" "))
            }
            RuleKind::Media { media, children } => {
                let mut text = format!("@media {} {{\n", media.media_text());
                for child in children {
                    text.push_str("  ");
                    text.push_str(&self.css_text(*child));
                    text.push('\n');
                }
                text.push('}');
                text
            }
            RuleKind::Other { css_text, .. } => css_text.clone(),
        }
    }

    /// Condition text of a conditional grouping rule
    pub fn condition_text(&self, id: RuleId) -> Option<String> {
        self.rule(id)?.media().map(|m| m.media_text())
    }

    // --- Mutation ---

    /// `insertRule` on the sheet (`parent = None`) or a grouping rule
    pub fn insert_rule(&mut self, parent: Option<RuleId>, rule_text: &str, index: u32) -> Result<u32, DomException> {
        let len = self
            .rule_list(parent)
            .ok_or_else(|| DomException::HierarchyRequest("Rule cannot hold child rules".to_string()))?
            .len();
        if index as usize > len {
            return Err(DomException::IndexSize(format!(
                "The index provided ({}) is larger than the maximum index ({})",
                index, len
            )));
        }

        let fragment = CssParser::new()
            .parse(rule_text)
            .map_err(|e| DomException::Syntax(format!("Failed to parse the rule '{}': {}", rule_text, e)))?;
        let [source] = fragment.css_rules() else {
            return Err(DomException::Syntax(format!("Failed to parse the rule '{}'", rule_text)));
        };
        let id = self.adopt(&fragment, *source, parent);

        let list = match parent {
            None => &mut self.top,
            Some(p) => match self.rule_mut(p).map(|r| &mut r.kind) {
                Some(RuleKind::Media { children, .. }) => children,
                _ => return Err(DomException::HierarchyRequest("Rule cannot hold child rules".to_string())),
            },
        };
        list.insert(index as usize, id);
        tracing::debug!(index, "Inserted CSS rule");
        Ok(index)
    }

    /// `deleteRule` on the sheet (`parent = None`) or a grouping rule
    pub fn delete_rule(&mut self, parent: Option<RuleId>, index: u32) -> Result<(), DomException> {
        let list = match parent {
            None => &mut self.top,
            Some(p) => match self.rule_mut(p).map(|r| &mut r.kind) {
                Some(RuleKind::Media { children, .. }) => children,
                _ => return Err(DomException::HierarchyRequest("Rule cannot hold child rules".to_string())),
            },
        };
        if index as usize >= list.len() {
            return Err(DomException::IndexSize(format!(
                "The index provided ({}) is larger than the maximum index ({})",
                index,
                list.len().saturating_sub(1)
            )));
        }
        let removed = list.remove(index as usize);
        self.tombstone(removed);
        Ok(())
    }

    fn tombstone(&mut self, id: RuleId) {
        let children = self.rule(id).map(|r| r.children().to_vec()).unwrap_or_default();
        for child in children {
            self.tombstone(child);
        }
        if let Some(slot) = self.rules.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    /// Copy `id` (and its subtree) from another sheet into this arena
    fn adopt(&mut self, other: &StyleSheet, id: RuleId, parent: Option<RuleId>) -> RuleId {
        let Some(rule) = other.rule(id) else {
            return self.push_rule(
                RuleKind::Other {
                    type_code: 0,
                    css_text: String::new(),
                },
                parent,
            );
        };
        match &rule.kind {
            RuleKind::Media { media, children } => {
                let new_id = self.push_rule(
                    RuleKind::Media {
                        media: media.clone(),
                        children: Vec::new(),
                    },
                    parent,
                );
                for child in children {
                    let adopted = self.adopt(other, *child, Some(new_id));
                    self.push_child(new_id, adopted);
                }
                new_id
            }
            kind => self.push_rule(kind.clone(), parent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_rule_text() {
        let sheet = StyleSheet::parse("p { color: red; display: block !important }").unwrap();
        let id = sheet.css_rules()[0];
        let rule = sheet.rule(id).unwrap();

        assert_eq!(rule.type_code(), CssRule::STYLE_RULE);
        assert_eq!(rule.selector_text(), Some("p"));
        assert_eq!(rule.property_value("display"), Some("block"));
        assert_eq!(rule.parent, None);
        assert!(sheet.css_text(id).starts_with("p { "));
    }

    #[test]
    fn test_media_rule_children() {
        let sheet = StyleSheet::parse("@media screen { div { color: red } span { color: blue } }").unwrap();
        let media = sheet.css_rules()[0];
        let rule = sheet.rule(media).unwrap();

        assert_eq!(rule.type_code(), CssRule::MEDIA_RULE);
        assert_eq!(rule.media().unwrap().media_text(), "screen");
        assert_eq!(rule.children().len(), 2);
        let child = rule.children()[1];
        assert_eq!(sheet.rule(child).unwrap().parent, Some(media));
        assert_eq!(sheet.condition_text(media).as_deref(), Some("screen"));
        assert_eq!(sheet.style_rules().len(), 2);
    }

    #[test]
    fn test_insert_and_delete_rule() {
        let mut sheet = StyleSheet::parse("a { color: red }").unwrap();
        assert_eq!(sheet.insert_rule(None, "b { color: blue }", 0).unwrap(), 0);
        assert_eq!(sheet.len(), 2);
        let first = sheet.css_rules()[0];
        assert_eq!(sheet.rule(first).unwrap().selector_text(), Some("b"));

        let err = sheet.insert_rule(None, "i { color: blue }", 5).unwrap_err();
        assert_eq!(err.code(), 1);
        let err = sheet.insert_rule(None, "a {} b {}", 0).unwrap_err();
        assert_eq!(err.name(), "SyntaxError");

        sheet.delete_rule(None, 0).unwrap();
        assert!(sheet.rule(first).is_none());
        assert_eq!(sheet.len(), 1);
        assert!(sheet.delete_rule(None, 1).is_err());
    }

    #[test]
    fn test_insert_into_media_rule() {
        let mut sheet = StyleSheet::parse("@media print { p { color: red } }").unwrap();
        let media = sheet.css_rules()[0];
        sheet.insert_rule(Some(media), "h1 { color: blue }", 1).unwrap();

        let children = sheet.rule(media).unwrap().children().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(sheet.rule(children[1]).unwrap().parent, Some(media));

        let style = children[0];
        assert!(sheet.insert_rule(Some(style), "h2 { color: blue }", 0).is_err());
    }
}
