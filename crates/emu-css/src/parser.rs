//! CSS Parser using lightningcss
//!
//! Parses CSS text into the rule arena of a [`StyleSheet`].

use lightningcss::declaration::DeclarationBlock;
use lightningcss::rules::CssRule as LcssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleAttribute};
use lightningcss::traits::ToCss;

use crate::stylesheet::{CssRule, Declaration, RuleId, RuleKind, StyleSheet};
use crate::{CssError, MediaList};

/// CSS Parser
#[derive(Debug, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<StyleSheet, CssError> {
        let parsed = lightningcss::stylesheet::StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| CssError::Parse(e.to_string()))?;

        let mut sheet = StyleSheet::new();
        for rule in parsed.rules.0.iter() {
            if let Some(id) = self.convert_rule(&mut sheet, rule, None)? {
                sheet.push_top(id);
            }
        }
        tracing::debug!(rules = sheet.len(), "Parsed stylesheet");
        Ok(sheet)
    }

    /// Parse the body of a `style` attribute
    pub fn parse_declarations(&self, css: &str) -> Result<Vec<Declaration>, CssError> {
        let attr = StyleAttribute::parse(css, ParserOptions::default()).map_err(|e| CssError::Parse(e.to_string()))?;
        convert_declarations(&attr.declarations)
    }

    fn convert_rule(
        &self,
        sheet: &mut StyleSheet,
        rule: &LcssRule,
        parent: Option<RuleId>,
    ) -> Result<Option<RuleId>, CssError> {
        let kind = match rule {
            LcssRule::Style(style) => RuleKind::Style {
                selector_text: print(&style.selectors)?,
                declarations: convert_declarations(&style.declarations)?,
            },
            LcssRule::Media(media) => {
                let queries = media
                    .query
                    .media_queries
                    .iter()
                    .map(print)
                    .collect::<Result<Vec<_>, _>>()?;
                let id = sheet.push_rule(
                    RuleKind::Media {
                        media: MediaList::from(queries),
                        children: Vec::new(),
                    },
                    parent,
                );
                for child in media.rules.0.iter() {
                    if let Some(child_id) = self.convert_rule(sheet, child, Some(id))? {
                        sheet.push_child(id, child_id);
                    }
                }
                return Ok(Some(id));
            }
            LcssRule::Ignored => return Ok(None),
            other => RuleKind::Other {
                type_code: type_code_of(other),
                css_text: print(other)?,
            },
        };
        Ok(Some(sheet.push_rule(kind, parent)))
    }
}

fn print<T: ToCss>(value: &T) -> Result<String, CssError> {
    value
        .to_css_string(PrinterOptions::default())
        .map_err(|e| CssError::Print(e.to_string()))
}

fn convert_declarations(block: &DeclarationBlock) -> Result<Vec<Declaration>, CssError> {
    let normal = block.declarations.iter().map(|p| (p, false));
    let important = block.important_declarations.iter().map(|p| (p, true));

    normal
        .chain(important)
        .map(|(property, important)| {
            let value = property
                .value_to_css_string(PrinterOptions::default())
                .map_err(|e| CssError::Print(e.to_string()))?;
            Ok(Declaration {
                property: property.property_id().name().to_string(),
                value,
                important,
            })
        })
        .collect()
}

fn type_code_of(rule: &LcssRule) -> u16 {
    match rule {
        LcssRule::Import(_) => CssRule::IMPORT_RULE,
        LcssRule::FontFace(_) => CssRule::FONT_FACE_RULE,
        LcssRule::Page(_) => CssRule::PAGE_RULE,
        LcssRule::Keyframes(_) => CssRule::KEYFRAMES_RULE,
        LcssRule::Namespace(_) => CssRule::NAMESPACE_RULE,
        LcssRule::Supports(_) => CssRule::SUPPORTS_RULE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let sheet = CssParser::new().parse("").unwrap();
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_parse_other_rules() {
        let css = "@font-face { font-family: x; src: url(x.woff) } p { color: red }";
        let sheet = CssParser::new().parse(css).unwrap();
        assert_eq!(sheet.len(), 2);
        let font = sheet.rule(sheet.css_rules()[0]).unwrap();
        assert_eq!(font.type_code(), CssRule::FONT_FACE_RULE);
        assert!(sheet.css_text(sheet.css_rules()[0]).starts_with("@font-face"));
    }

    #[test]
    fn test_parse_declarations() {
        let decls = CssParser::new().parse_declarations("display: none; color: red").unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "display");
        assert_eq!(decls[0].value, "none");
    }
}
