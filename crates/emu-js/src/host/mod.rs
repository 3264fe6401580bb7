//! Host classes
//!
//! The declaration table below is the single source of truth for what
//! scripts can see: class names, their `extends` chain, the versions each
//! class and member exists on, and the native entry point behind each
//! member. Classes are flat; `extends` only adds the parent's members to the
//! lookup order.

mod cssom;
mod event;
mod node;
mod selection;
mod window;

pub use event::EventRecord;
pub use window::{MimeTypeInfo, PluginInfo, navigator_data};

use emu_dom::NodeId;
use emu_version::VersionSet;

use crate::capability::{ClassDecl, MemberDecl};
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

static UNDEFINED: JsValue = JsValue::Undefined;

// --- Argument helpers ---

/// Native entity of the receiver
pub(crate) fn receiver(realm: &Realm, this: Option<WrapperId>) -> Result<NativeRef, JsError> {
    this.and_then(|id| realm.native_for(id))
        .ok_or_else(JsError::illegal_invocation)
}

/// Argument `index`, `undefined` when missing
pub(crate) fn arg(args: &[JsValue], index: usize) -> &JsValue {
    args.get(index).unwrap_or(&UNDEFINED)
}

pub(crate) fn arg_string(args: &[JsValue], index: usize) -> String {
    arg(args, index).to_js_string()
}

pub(crate) fn arg_u32(args: &[JsValue], index: usize) -> u32 {
    arg(args, index).to_uint32()
}

/// Node argument; `null`/`undefined` is `None`, other non-nodes are a TypeError
pub(crate) fn arg_node(realm: &Realm, args: &[JsValue], index: usize) -> Result<Option<NodeId>, JsError> {
    match arg(args, index) {
        JsValue::Undefined | JsValue::Null => Ok(None),
        JsValue::Object(id) => match realm.native_for(*id) {
            Some(NativeRef::Node(node)) => Ok(Some(node)),
            _ => Err(not_a_node(index)),
        },
        _ => Err(not_a_node(index)),
    }
}

fn not_a_node(index: usize) -> JsError {
    JsError::TypeError(format!("parameter {} is not of type 'Node'", index + 1))
}

// --- Declarations ---

const WINDOW: &[MemberDecl] = &[
    MemberDecl::getter("window", window::window_self),
    MemberDecl::getter("self", window::window_self),
    MemberDecl::getter("document", window::window_document),
    MemberDecl::getter("navigator", window::window_navigator),
    MemberDecl::function("getSelection", window::get_selection),
    MemberDecl::function("getComputedStyle", window::get_computed_style),
];

const NAVIGATOR: &[MemberDecl] = &[
    MemberDecl::getter("userAgent", window::user_agent),
    MemberDecl::getter("cookieEnabled", window::cookie_enabled),
    MemberDecl::getter("mimeTypes", window::mime_types),
    MemberDecl::getter("plugins", window::plugins),
    MemberDecl::getter("pdfViewerEnabled", window::pdf_viewer_enabled).only(VersionSet::MODERN),
    MemberDecl::function("javaEnabled", window::java_enabled),
];

const MIME_TYPE_ARRAY: &[MemberDecl] = &[
    MemberDecl::getter("length", window::mime_type_array_length),
    MemberDecl::function("item", window::mime_type_array_item),
    MemberDecl::function("namedItem", window::mime_type_array_named_item),
];

const MIME_TYPE: &[MemberDecl] = &[
    MemberDecl::constructor(window::mime_type_constructor),
    MemberDecl::getter("description", window::mime_type_description),
    MemberDecl::getter("suffixes", window::mime_type_suffixes),
    MemberDecl::getter("type", window::mime_type_type),
    MemberDecl::getter("enabledPlugin", window::mime_type_enabled_plugin),
];

const PLUGIN_ARRAY: &[MemberDecl] = &[
    MemberDecl::getter("length", window::plugin_array_length),
    MemberDecl::function("item", window::plugin_array_item),
    MemberDecl::function("namedItem", window::plugin_array_named_item),
    MemberDecl::function("refresh", window::plugin_array_refresh),
];

const PLUGIN: &[MemberDecl] = &[
    MemberDecl::getter("name", window::plugin_name),
    MemberDecl::getter("filename", window::plugin_filename),
    MemberDecl::getter("description", window::plugin_description),
    MemberDecl::getter("length", window::plugin_length),
    MemberDecl::function("item", window::plugin_item),
    MemberDecl::function("namedItem", window::plugin_named_item),
];

const NODE: &[MemberDecl] = &[
    MemberDecl::getter("nodeType", node::node_type),
    MemberDecl::getter("nodeName", node::node_name),
    MemberDecl::getter("parentNode", node::parent_node),
    MemberDecl::getter("firstChild", node::first_child),
    MemberDecl::getter("lastChild", node::last_child),
    MemberDecl::getter("previousSibling", node::previous_sibling),
    MemberDecl::getter("nextSibling", node::next_sibling),
    MemberDecl::getter("textContent", node::get_text_content),
    MemberDecl::setter("textContent", node::set_text_content),
    MemberDecl::function("appendChild", node::append_child),
    MemberDecl::function("insertBefore", node::insert_before),
    MemberDecl::function("removeChild", node::remove_child),
    MemberDecl::function("compareDocumentPosition", node::compare_document_position),
    MemberDecl::function("contains", node::contains),
    MemberDecl::function("hasChildNodes", node::has_child_nodes),
];

const ELEMENT: &[MemberDecl] = &[
    MemberDecl::getter("tagName", node::tag_name),
    MemberDecl::getter("id", node::get_id),
    MemberDecl::setter("id", node::set_id),
    MemberDecl::function("getAttribute", node::get_attribute),
    MemberDecl::function("setAttribute", node::set_attribute),
    MemberDecl::function("removeAttribute", node::remove_attribute),
    MemberDecl::function("hasAttribute", node::has_attribute),
];

const HTML_ELEMENT: &[MemberDecl] = &[
    MemberDecl::getter("title", node::get_title),
    MemberDecl::setter("title", node::set_title),
    MemberDecl::getter("lang", node::get_lang),
    MemberDecl::setter("lang", node::set_lang),
];

const HTML_META_ELEMENT: &[MemberDecl] = &[
    MemberDecl::getter("httpEquiv", node::get_http_equiv),
    MemberDecl::setter("httpEquiv", node::set_http_equiv),
    MemberDecl::getter("content", node::get_content),
    MemberDecl::setter("content", node::set_content),
    MemberDecl::getter("name", node::get_name),
    MemberDecl::setter("name", node::set_name),
    MemberDecl::getter("scheme", node::get_scheme).only(VersionSet::IE),
    MemberDecl::setter("scheme", node::set_scheme).only(VersionSet::IE),
];

const TEXT: &[MemberDecl] = &[
    MemberDecl::constructor(node::text_constructor).only(VersionSet::MODERN),
    MemberDecl::getter("data", node::text_data),
    MemberDecl::setter("data", node::set_text_data),
    MemberDecl::getter("length", node::text_length),
];

const DOCUMENT: &[MemberDecl] = &[
    MemberDecl::getter("URL", node::document_url),
    MemberDecl::getter("body", node::document_body),
    MemberDecl::getter("head", node::document_head),
    MemberDecl::getter("documentElement", node::document_element),
    MemberDecl::getter("title", node::document_title),
    MemberDecl::getter("styleSheets", node::style_sheets),
    MemberDecl::function("getElementById", node::get_element_by_id),
    MemberDecl::function("createElement", node::create_element),
    MemberDecl::function("createTextNode", node::create_text_node),
    MemberDecl::function("getSelection", window::get_selection),
];

const SELECTION: &[MemberDecl] = &[
    MemberDecl::getter("anchorNode", selection::anchor_node),
    MemberDecl::getter("anchorOffset", selection::anchor_offset),
    MemberDecl::getter("focusNode", selection::focus_node),
    MemberDecl::getter("focusOffset", selection::focus_offset),
    MemberDecl::getter("isCollapsed", selection::is_collapsed),
    MemberDecl::getter("rangeCount", selection::range_count),
    MemberDecl::getter("type", selection::selection_type).only(VersionSet::MODERN),
    MemberDecl::function("getRangeAt", selection::get_range_at),
    MemberDecl::function("addRange", selection::add_range),
    MemberDecl::function("removeRange", selection::remove_range),
    MemberDecl::function("removeAllRanges", selection::remove_all_ranges),
    MemberDecl::function("empty", selection::empty),
    MemberDecl::function("collapse", selection::collapse),
    MemberDecl::function("collapseToStart", selection::collapse_to_start),
    MemberDecl::function("collapseToEnd", selection::collapse_to_end),
    MemberDecl::function("extend", selection::extend),
    MemberDecl::function("selectAllChildren", selection::select_all_children),
    MemberDecl::function("toString", selection::selection_to_string),
];

const RANGE: &[MemberDecl] = &[
    MemberDecl::constructor(selection::range_constructor).only(VersionSet::MODERN),
    MemberDecl::getter("startContainer", selection::start_container),
    MemberDecl::getter("startOffset", selection::start_offset),
    MemberDecl::getter("endContainer", selection::end_container),
    MemberDecl::getter("endOffset", selection::end_offset),
    MemberDecl::getter("collapsed", selection::range_collapsed),
    MemberDecl::getter("commonAncestorContainer", selection::common_ancestor_container),
    MemberDecl::function("setStart", selection::set_start),
    MemberDecl::function("setEnd", selection::set_end),
    MemberDecl::function("collapse", selection::range_collapse),
    MemberDecl::function("selectNodeContents", selection::select_node_contents),
    MemberDecl::function("cloneRange", selection::clone_range),
    MemberDecl::function("toString", selection::range_to_string),
    MemberDecl::function("detach", selection::range_detach),
];

const STYLE_SHEET_LIST: &[MemberDecl] = &[
    MemberDecl::getter("length", cssom::sheet_list_length),
    MemberDecl::function("item", cssom::sheet_list_item),
];

const CSS_STYLE_SHEET: &[MemberDecl] = &[
    MemberDecl::getter("cssRules", cssom::sheet_css_rules),
    MemberDecl::getter("media", cssom::sheet_media),
    MemberDecl::getter("ownerNode", cssom::sheet_owner_node),
    MemberDecl::getter("href", cssom::sheet_href),
    MemberDecl::getter("type", cssom::sheet_type),
    MemberDecl::getter("disabled", cssom::sheet_disabled),
    MemberDecl::setter("disabled", cssom::set_sheet_disabled),
    MemberDecl::function("insertRule", cssom::sheet_insert_rule),
    MemberDecl::function("deleteRule", cssom::sheet_delete_rule),
];

const CSS_RULE_LIST: &[MemberDecl] = &[
    MemberDecl::getter("length", cssom::rule_list_length),
    MemberDecl::function("item", cssom::rule_list_item),
];

const CSS_RULE: &[MemberDecl] = &[
    MemberDecl::getter("type", cssom::rule_type),
    MemberDecl::getter("cssText", cssom::rule_css_text),
    MemberDecl::getter("parentRule", cssom::rule_parent_rule),
    MemberDecl::getter("parentStyleSheet", cssom::rule_parent_style_sheet),
];

const CSS_STYLE_RULE: &[MemberDecl] = &[MemberDecl::getter("selectorText", cssom::selector_text)];

const CSS_GROUPING_RULE: &[MemberDecl] = &[
    MemberDecl::getter("cssRules", cssom::grouping_css_rules),
    MemberDecl::function("insertRule", cssom::grouping_insert_rule),
    MemberDecl::function("deleteRule", cssom::grouping_delete_rule),
];

const CSS_CONDITION_RULE: &[MemberDecl] = &[
    MemberDecl::getter("conditionText", cssom::condition_text).only(VersionSet::MODERN),
];

const CSS_MEDIA_RULE: &[MemberDecl] = &[MemberDecl::getter("media", cssom::media_rule_media)];

const MEDIA_LIST: &[MemberDecl] = &[
    MemberDecl::getter("mediaText", cssom::media_text),
    MemberDecl::setter("mediaText", cssom::set_media_text),
    MemberDecl::getter("length", cssom::media_length),
    MemberDecl::function("item", cssom::media_item),
    MemberDecl::function("appendMedium", cssom::append_medium),
    MemberDecl::function("deleteMedium", cssom::delete_medium),
    MemberDecl::function("toString", cssom::media_text),
];

const CSS_STYLE_DECLARATION: &[MemberDecl] = &[
    MemberDecl::getter("display", cssom::style_display),
    MemberDecl::function("getPropertyValue", cssom::get_property_value),
];

const EVENT: &[MemberDecl] = &[
    MemberDecl::constructor(event::event_constructor),
    MemberDecl::getter("type", event::event_type),
    MemberDecl::getter("bubbles", event::bubbles),
    MemberDecl::getter("cancelable", event::cancelable),
    MemberDecl::getter("defaultPrevented", event::default_prevented),
    MemberDecl::function("preventDefault", event::prevent_default),
    MemberDecl::function("stopPropagation", event::stop_propagation),
    MemberDecl::function("initEvent", event::init_event),
];

const PRESENTATION_CONNECTION_CLOSE_EVENT: &[MemberDecl] = &[
    MemberDecl::constructor(event::close_event_constructor),
    MemberDecl::getter("reason", event::close_reason),
    MemberDecl::getter("message", event::close_message),
];

const fn class(name: &'static str, extends: Option<&'static str>, exposed: VersionSet, members: &'static [MemberDecl]) -> ClassDecl {
    ClassDecl {
        name,
        extends,
        exposed,
        members,
    }
}

/// Every host class
pub static DECLARATIONS: &[ClassDecl] = &[
    class("Window", None, VersionSet::ALL, WINDOW),
    class("Navigator", None, VersionSet::ALL, NAVIGATOR),
    class("MimeTypeArray", None, VersionSet::ALL, MIME_TYPE_ARRAY),
    class("MimeType", None, VersionSet::ALL, MIME_TYPE),
    class("PluginArray", None, VersionSet::ALL, PLUGIN_ARRAY),
    class("Plugin", None, VersionSet::ALL, PLUGIN),
    class("Node", None, VersionSet::ALL, NODE),
    class("Element", Some("Node"), VersionSet::ALL, ELEMENT),
    class("HTMLElement", Some("Element"), VersionSet::ALL, HTML_ELEMENT),
    class("HTMLMetaElement", Some("HTMLElement"), VersionSet::ALL, HTML_META_ELEMENT),
    class("Text", Some("Node"), VersionSet::ALL, TEXT),
    class("Document", Some("Node"), VersionSet::ALL, DOCUMENT),
    class("Selection", None, VersionSet::ALL, SELECTION),
    class("Range", None, VersionSet::ALL, RANGE),
    class("StyleSheetList", None, VersionSet::ALL, STYLE_SHEET_LIST),
    class("CSSStyleSheet", None, VersionSet::ALL, CSS_STYLE_SHEET),
    class("CSSRuleList", None, VersionSet::ALL, CSS_RULE_LIST),
    class("CSSRule", None, VersionSet::ALL, CSS_RULE),
    class("CSSStyleRule", Some("CSSRule"), VersionSet::ALL, CSS_STYLE_RULE),
    class("CSSGroupingRule", Some("CSSRule"), VersionSet::ALL, CSS_GROUPING_RULE),
    class("CSSConditionRule", Some("CSSGroupingRule"), VersionSet::ALL, CSS_CONDITION_RULE),
    class("CSSMediaRule", Some("CSSConditionRule"), VersionSet::ALL, CSS_MEDIA_RULE),
    class("MediaList", None, VersionSet::ALL, MEDIA_LIST),
    class("CSSStyleDeclaration", None, VersionSet::ALL, CSS_STYLE_DECLARATION),
    class("Event", None, VersionSet::ALL, EVENT),
    class(
        "PresentationConnectionCloseEvent",
        Some("Event"),
        VersionSet::BLINK,
        PRESENTATION_CONNECTION_CLOSE_EVENT,
    ),
    class("PeriodicSyncManager", None, VersionSet::BLINK, &[]),
];
