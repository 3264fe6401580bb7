//! Node, Element, Text and Document members

use emu_dom::{DomException, NodeData, NodeId};

use super::{arg_node, arg_string, receiver};
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

fn this_node(realm: &Realm, this: Option<WrapperId>) -> Result<NodeId, JsError> {
    match receiver(realm, this)? {
        NativeRef::Node(id) => Ok(id),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn wrap_node(realm: &mut Realm, node: Option<NodeId>) -> JsValue {
    realm.wrap(node.map(NativeRef::Node))
}

fn required_node(realm: &Realm, args: &[JsValue], index: usize, method: &str) -> Result<NodeId, JsError> {
    arg_node(realm, args, index)?.ok_or_else(|| {
        JsError::TypeError(format!(
            "Failed to execute '{}' on 'Node': parameter {} is not of type 'Node'",
            method,
            index + 1
        ))
    })
}

// --- Node ---

pub(super) fn node_type(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm
        .document
        .tree
        .get(node)
        .map(|n| JsValue::from(n.node_type() as u32))
        .unwrap_or(JsValue::Number(0.0)))
}

pub(super) fn node_name(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm.document.tree.get(node).map(|n| n.node_name()).unwrap_or_default().into())
}

pub(super) fn parent_node(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let parent = realm.document.tree.parent(node);
    Ok(wrap_node(realm, parent))
}

pub(super) fn first_child(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let child = realm.document.tree.first_child(node);
    Ok(wrap_node(realm, child))
}

pub(super) fn last_child(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let child = realm.document.tree.last_child(node);
    Ok(wrap_node(realm, child))
}

pub(super) fn previous_sibling(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let sibling = realm.document.tree.prev_sibling(node);
    Ok(wrap_node(realm, sibling))
}

pub(super) fn next_sibling(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let sibling = realm.document.tree.next_sibling(node);
    Ok(wrap_node(realm, sibling))
}

pub(super) fn get_text_content(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let tree = &realm.document.tree;
    Ok(match tree.get(node).map(|n| &n.data) {
        Some(NodeData::Document) | Some(NodeData::Doctype { .. }) | None => JsValue::Null,
        _ => tree.text_content(node).into(),
    })
}

pub(super) fn set_text_content(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let text = match args.first() {
        Some(v) if !v.is_nullish() => v.to_js_string(),
        _ => String::new(),
    };
    realm.set_text_content(node, &text)?;
    Ok(JsValue::Undefined)
}

pub(super) fn append_child(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let parent = this_node(realm, this)?;
    let child = required_node(realm, args, 0, "appendChild")?;
    realm.append_child(parent, child)?;
    Ok(wrap_node(realm, Some(child)))
}

pub(super) fn insert_before(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let parent = this_node(realm, this)?;
    let child = required_node(realm, args, 0, "insertBefore")?;
    let reference = arg_node(realm, args, 1)?;
    realm.insert_before(parent, child, reference)?;
    Ok(wrap_node(realm, Some(child)))
}

pub(super) fn remove_child(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let parent = this_node(realm, this)?;
    let child = required_node(realm, args, 0, "removeChild")?;
    realm.remove_child(parent, child)?;
    Ok(wrap_node(realm, Some(child)))
}

pub(super) fn compare_document_position(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let other = required_node(realm, args, 0, "compareDocumentPosition")?;
    let position = realm.document.tree.compare_document_position(node, other);
    Ok(u32::from(position.bits()).into())
}

pub(super) fn contains(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(match arg_node(realm, args, 0)? {
        Some(other) => realm.document.tree.is_inclusive_ancestor(node, other).into(),
        None => false.into(),
    })
}

pub(super) fn has_child_nodes(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm.document.tree.first_child(node).is_some().into())
}

// --- Element ---

fn attribute(realm: &Realm, this: Option<WrapperId>, name: &str) -> Result<Option<String>, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm
        .document
        .tree
        .get(node)
        .and_then(|n| n.as_element())
        .and_then(|e| e.get_attr(name))
        .map(str::to_string))
}

fn set_attribute_value(realm: &mut Realm, this: Option<WrapperId>, name: &str, value: &str) -> Result<(), JsError> {
    let node = this_node(realm, this)?;
    if let Some(element) = realm.document.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
        element.set_attr(name, value);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), JsError> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\'' | '/' | '=')) {
        return Err(DomException::InvalidCharacter(format!("'{}' is not a valid name", name)).into());
    }
    Ok(())
}

pub(super) fn tag_name(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    node_name(realm, this, &[])
}

pub(super) fn get_id(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(attribute(realm, this, "id")?.unwrap_or_default().into())
}

pub(super) fn set_id(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    set_attribute_value(realm, this, "id", &arg_string(args, 0))?;
    Ok(JsValue::Undefined)
}

pub(super) fn get_attribute(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0).to_ascii_lowercase();
    Ok(attribute(realm, this, &name)?.into())
}

pub(super) fn set_attribute(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0).to_ascii_lowercase();
    validate_name(&name)?;
    set_attribute_value(realm, this, &name, &arg_string(args, 1))?;
    Ok(JsValue::Undefined)
}

pub(super) fn remove_attribute(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    let name = arg_string(args, 0).to_ascii_lowercase();
    if let Some(element) = realm.document.tree.get_mut(node).and_then(|n| n.as_element_mut()) {
        element.remove_attr(&name);
    }
    Ok(JsValue::Undefined)
}

pub(super) fn has_attribute(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0).to_ascii_lowercase();
    Ok(attribute(realm, this, &name)?.is_some().into())
}

// --- Reflected string attributes ---

macro_rules! reflect {
    ($getter:ident, $setter:ident, $attr:literal) => {
        pub(super) fn $getter(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
            Ok(attribute(realm, this, $attr)?.unwrap_or_default().into())
        }

        pub(super) fn $setter(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
            set_attribute_value(realm, this, $attr, &arg_string(args, 0))?;
            Ok(JsValue::Undefined)
        }
    };
}

reflect!(get_title, set_title, "title");
reflect!(get_lang, set_lang, "lang");
reflect!(get_http_equiv, set_http_equiv, "http-equiv");
reflect!(get_content, set_content, "content");
reflect!(get_name, set_name, "name");
reflect!(get_scheme, set_scheme, "scheme");

// --- Text ---

/// `new Text(data)`
pub(super) fn text_constructor(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let data = match args.first() {
        Some(v) if !v.is_undefined() => v.to_js_string(),
        _ => String::new(),
    };
    let node = realm.document.create_text_node(&data);
    Ok(wrap_node(realm, Some(node)))
}

pub(super) fn text_data(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm
        .document
        .tree
        .get(node)
        .and_then(|n| n.character_data())
        .unwrap_or_default()
        .into())
}

pub(super) fn set_text_data(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    realm.set_text_content(node, &arg_string(args, 0))?;
    Ok(JsValue::Undefined)
}

pub(super) fn text_length(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let node = this_node(realm, this)?;
    Ok(realm.document.tree.node_length(node).into())
}

// --- Document ---

pub(super) fn get_element_by_id(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let found = realm.document.get_element_by_id(&arg_string(args, 0));
    Ok(wrap_node(realm, found))
}

pub(super) fn create_element(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let tag = arg_string(args, 0);
    validate_name(&tag)?;
    let node = realm.document.create_element(&tag);
    Ok(wrap_node(realm, Some(node)))
}

pub(super) fn create_text_node(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = realm.document.create_text_node(&arg_string(args, 0));
    Ok(wrap_node(realm, Some(node)))
}

pub(super) fn document_body(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let body = realm.document.body();
    Ok(wrap_node(realm, body))
}

pub(super) fn document_head(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let head = realm.document.head();
    Ok(wrap_node(realm, head))
}

pub(super) fn document_element(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let root = realm.document.document_element();
    Ok(wrap_node(realm, root))
}

pub(super) fn document_title(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.document.title().into())
}

pub(super) fn document_url(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.document.url().into())
}

pub(super) fn style_sheets(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::StyleSheetList)))
}
