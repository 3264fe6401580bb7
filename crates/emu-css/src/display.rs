//! Default display styles
//!
//! Each element type resolves its default `display` from a [`DisplayPolicy`]
//! in this order:
//!
//! 1. a feature-flag override, when the active profile has the flag
//! 2. [`DisplayStyle::Empty`] for script-created elements that have no parent
//! 3. the type's baseline
//!
//! Nothing is cached; the value is recomputed from the tree on every call.

use emu_dom::{DomTree, NodeId};
use emu_version::{BrowserProfile, Feature};

/// CSS `display` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStyle {
    /// Suppressed style, reported as the empty string
    Empty,
    None,
    Inline,
    Block,
    InlineBlock,
    ListItem,
    Table,
    TableCaption,
    TableCell,
    TableColumn,
    TableColumnGroup,
    TableFooterGroup,
    TableHeaderGroup,
    TableRow,
    TableRowGroup,
    Ruby,
    RubyBase,
    RubyText,
    RubyTextContainer,
}

impl DisplayStyle {
    /// Serialized CSS value
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStyle::Empty => "",
            DisplayStyle::None => "none",
            DisplayStyle::Inline => "inline",
            DisplayStyle::Block => "block",
            DisplayStyle::InlineBlock => "inline-block",
            DisplayStyle::ListItem => "list-item",
            DisplayStyle::Table => "table",
            DisplayStyle::TableCaption => "table-caption",
            DisplayStyle::TableCell => "table-cell",
            DisplayStyle::TableColumn => "table-column",
            DisplayStyle::TableColumnGroup => "table-column-group",
            DisplayStyle::TableFooterGroup => "table-footer-group",
            DisplayStyle::TableHeaderGroup => "table-header-group",
            DisplayStyle::TableRow => "table-row",
            DisplayStyle::TableRowGroup => "table-row-group",
            DisplayStyle::Ruby => "ruby",
            DisplayStyle::RubyBase => "ruby-base",
            DisplayStyle::RubyText => "ruby-text",
            DisplayStyle::RubyTextContainer => "ruby-text-container",
        }
    }
}

impl std::fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-element-type display policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPolicy {
    /// Flag that forces a value unconditionally
    pub override_with: Option<(Feature, DisplayStyle)>,
    /// Script-created elements without a parent resolve to [`DisplayStyle::Empty`]
    pub empty_when_detached_script_created: bool,
    pub baseline: DisplayStyle,
}

impl DisplayPolicy {
    const fn plain(baseline: DisplayStyle) -> Self {
        Self {
            override_with: None,
            empty_when_detached_script_created: false,
            baseline,
        }
    }

    const fn ruby(override_with: Option<(Feature, DisplayStyle)>, baseline: DisplayStyle) -> Self {
        Self {
            override_with,
            empty_when_detached_script_created: true,
            baseline,
        }
    }

    /// Policy for a lowercase tag name
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "rt" => Self::ruby(
                Some((Feature::CssRtDisplayRubyTextAlways, DisplayStyle::RubyText)),
                DisplayStyle::RubyText,
            ),
            "rtc" => Self::ruby(
                Some((Feature::CssRtDisplayRubyTextAlways, DisplayStyle::RubyTextContainer)),
                DisplayStyle::Inline,
            ),
            "rp" => Self::ruby(
                Some((Feature::CssRpDisplayNoneAlways, DisplayStyle::None)),
                DisplayStyle::None,
            ),
            "rb" => Self::ruby(
                Some((Feature::CssRbDisplayRubyBaseAlways, DisplayStyle::RubyBase)),
                DisplayStyle::Inline,
            ),
            "ruby" => Self::plain(DisplayStyle::Ruby),

            "meta" | "head" | "title" | "script" | "style" | "link" | "base" | "template"
            | "noscript" | "area" | "datalist" | "param" => Self::plain(DisplayStyle::None),

            "html" | "body" | "address" | "article" | "aside" | "blockquote" | "center"
            | "dd" | "details" | "dialog" | "dir" | "div" | "dl" | "dt" | "fieldset"
            | "figcaption" | "figure" | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5"
            | "h6" | "header" | "hgroup" | "hr" | "legend" | "listing" | "main" | "menu"
            | "nav" | "ol" | "optgroup" | "p" | "plaintext" | "pre" | "search" | "section"
            | "summary" | "ul" | "xmp" => Self::plain(DisplayStyle::Block),

            "li" => Self::plain(DisplayStyle::ListItem),
            "button" | "select" | "textarea" | "input" | "meter" | "progress" => {
                Self::plain(DisplayStyle::InlineBlock)
            }

            "table" => Self::plain(DisplayStyle::Table),
            "caption" => Self::plain(DisplayStyle::TableCaption),
            "td" | "th" => Self::plain(DisplayStyle::TableCell),
            "col" => Self::plain(DisplayStyle::TableColumn),
            "colgroup" => Self::plain(DisplayStyle::TableColumnGroup),
            "tfoot" => Self::plain(DisplayStyle::TableFooterGroup),
            "thead" => Self::plain(DisplayStyle::TableHeaderGroup),
            "tr" => Self::plain(DisplayStyle::TableRow),
            "tbody" => Self::plain(DisplayStyle::TableRowGroup),

            _ => Self::plain(DisplayStyle::Inline),
        }
    }

    /// Apply the policy
    pub fn resolve(&self, profile: &BrowserProfile, created_by_script: bool, has_parent: bool) -> DisplayStyle {
        if let Some((feature, style)) = self.override_with {
            if profile.has_feature(feature) {
                return style;
            }
        }
        if self.empty_when_detached_script_created && created_by_script && !has_parent {
            return DisplayStyle::Empty;
        }
        self.baseline
    }
}

/// Default display style of `node`; `None` for non-elements
pub fn default_display_style(tree: &DomTree, node: NodeId, profile: &BrowserProfile) -> Option<DisplayStyle> {
    let element = tree.get(node)?.as_element()?;
    let policy = DisplayPolicy::for_tag(&element.tag);
    Some(policy.resolve(profile, element.created_by_script(), tree.parent(node).is_some()))
}
