//! Selection and Range members

use emu_dom::{DomException, NodeId, SelectionRange};

use super::{arg, arg_node, arg_u32, receiver};
use crate::wrapper::RangeId;
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

fn wrap_node(realm: &mut Realm, node: Option<NodeId>) -> JsValue {
    realm.wrap(node.map(NativeRef::Node))
}

/// Range object passed as argument `index`
fn arg_range(realm: &Realm, args: &[JsValue], index: usize, method: &str) -> Result<SelectionRange, JsError> {
    let range = arg(args, index)
        .as_object()
        .and_then(|id| match realm.native_for(id) {
            Some(NativeRef::Range(r)) => realm.range(r).copied(),
            _ => None,
        });
    range.ok_or_else(|| {
        JsError::TypeError(format!(
            "Failed to execute '{}' on 'Selection': parameter {} is not of type 'Range'",
            method,
            index + 1
        ))
    })
}

fn required_node(realm: &Realm, args: &[JsValue], index: usize, method: &str) -> Result<NodeId, JsError> {
    arg_node(realm, args, index)?.ok_or_else(|| {
        JsError::TypeError(format!(
            "Failed to execute '{}': parameter {} is not of type 'Node'",
            method,
            index + 1
        ))
    })
}

fn check_offset(realm: &Realm, node: NodeId, offset: u32) -> Result<(), JsError> {
    let length = realm.document.tree.node_length(node);
    if offset > length {
        return Err(DomException::IndexSize(format!("{} is larger than the node's length ({})", offset, length)).into());
    }
    Ok(())
}

// --- Selection ---

pub(super) fn anchor_node(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let anchor = realm.selection.anchor(&realm.document.tree).map(|(node, _)| node);
    Ok(wrap_node(realm, anchor))
}

pub(super) fn anchor_offset(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let offset = realm.selection.anchor(&realm.document.tree).map_or(0, |(_, o)| o);
    Ok(offset.into())
}

pub(super) fn focus_node(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let focus = realm.selection.focus(&realm.document.tree).map(|(node, _)| node);
    Ok(wrap_node(realm, focus))
}

pub(super) fn focus_offset(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let offset = realm.selection.focus(&realm.document.tree).map_or(0, |(_, o)| o);
    Ok(offset.into())
}

pub(super) fn is_collapsed(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.selection.is_collapsed().into())
}

pub(super) fn range_count(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.selection.range_count().into())
}

pub(super) fn selection_type(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.selection.selection_type().as_str().into())
}

/// Fresh Range holding a copy of the stored range
pub(super) fn get_range_at(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let n = arg(args, 0).to_number();
    let index = if n.is_finite() { n.trunc() as i64 } else { 0 };
    let range = *realm.selection.range_at(index)?;
    Ok(realm.new_range(range))
}

pub(super) fn add_range(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let range = arg_range(realm, args, 0, "addRange")?;
    realm.selection.add_range(range);
    Ok(JsValue::Undefined)
}

pub(super) fn remove_range(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let range = arg_range(realm, args, 0, "removeRange")?;
    if !realm.selection.remove_range(&range) {
        tracing::debug!("removeRange: range is not part of the selection");
    }
    Ok(JsValue::Undefined)
}

pub(super) fn remove_all_ranges(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    realm.selection.remove_all_ranges();
    Ok(JsValue::Undefined)
}

pub(super) fn empty(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    realm.selection.empty();
    Ok(JsValue::Undefined)
}

/// `collapse(null)` empties the selection
pub(super) fn collapse(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let Some(node) = arg_node(realm, args, 0)? else {
        realm.selection.remove_all_ranges();
        return Ok(JsValue::Undefined);
    };
    let offset = arg_u32(args, 1);
    check_offset(realm, node, offset)?;
    realm.selection.collapse(node, offset);
    Ok(JsValue::Undefined)
}

pub(super) fn collapse_to_start(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let Realm { selection, document, .. } = realm;
    selection.collapse_to_start(&document.tree);
    Ok(JsValue::Undefined)
}

pub(super) fn collapse_to_end(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let Realm { selection, document, .. } = realm;
    selection.collapse_to_end(&document.tree);
    Ok(JsValue::Undefined)
}

pub(super) fn extend(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = required_node(realm, args, 0, "extend")?;
    let offset = arg_u32(args, 1);
    check_offset(realm, node, offset)?;
    let Realm { selection, document, .. } = realm;
    selection.extend(&document.tree, node, offset);
    Ok(JsValue::Undefined)
}

pub(super) fn select_all_children(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = required_node(realm, args, 0, "selectAllChildren")?;
    let Realm { selection, document, .. } = realm;
    selection.select_all_children(&document.tree, node);
    Ok(JsValue::Undefined)
}

pub(super) fn selection_to_string(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.selection.to_string(&realm.document.tree).into())
}

// --- Range ---

fn this_range(realm: &Realm, this: Option<WrapperId>) -> Result<RangeId, JsError> {
    match receiver(realm, this)? {
        NativeRef::Range(id) if realm.range(id).is_some() => Ok(id),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn range_value(realm: &Realm, this: Option<WrapperId>) -> Result<SelectionRange, JsError> {
    let id = this_range(realm, this)?;
    realm.range(id).copied().ok_or_else(JsError::illegal_invocation)
}

/// `new Range()`: collapsed at the start of the document
pub(super) fn range_constructor(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.new_range(SelectionRange::collapsed_at(NodeId::ROOT, 0)))
}

pub(super) fn start_container(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let range = range_value(realm, this)?;
    Ok(wrap_node(realm, Some(range.start_container())))
}

pub(super) fn start_offset(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(range_value(realm, this)?.start_offset().into())
}

pub(super) fn end_container(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let range = range_value(realm, this)?;
    Ok(wrap_node(realm, Some(range.end_container())))
}

pub(super) fn end_offset(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(range_value(realm, this)?.end_offset().into())
}

pub(super) fn range_collapsed(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(range_value(realm, this)?.is_collapsed().into())
}

pub(super) fn common_ancestor_container(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let range = range_value(realm, this)?;
    let ancestor = range.common_ancestor_container(&realm.document.tree);
    Ok(wrap_node(realm, ancestor))
}

pub(super) fn set_start(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_range(realm, this)?;
    let node = required_node(realm, args, 0, "setStart")?;
    let offset = arg_u32(args, 1);
    let Realm { ranges, document, .. } = realm;
    if let Some(range) = ranges.get_mut(&id) {
        range.set_start_checked(&document.tree, node, offset)?;
    }
    Ok(JsValue::Undefined)
}

pub(super) fn set_end(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_range(realm, this)?;
    let node = required_node(realm, args, 0, "setEnd")?;
    let offset = arg_u32(args, 1);
    let Realm { ranges, document, .. } = realm;
    if let Some(range) = ranges.get_mut(&id) {
        range.set_end_checked(&document.tree, node, offset)?;
    }
    Ok(JsValue::Undefined)
}

pub(super) fn range_collapse(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_range(realm, this)?;
    let to_start = arg(args, 0).to_boolean();
    if let Some(range) = realm.range_mut(id) {
        range.collapse(to_start);
    }
    Ok(JsValue::Undefined)
}

pub(super) fn select_node_contents(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_range(realm, this)?;
    let node = required_node(realm, args, 0, "selectNodeContents")?;
    if realm.document.tree.get(node).is_some_and(|n| matches!(n.data, emu_dom::NodeData::Doctype { .. })) {
        return Err(DomException::InvalidNodeType("The node provided is a doctype".to_string()).into());
    }
    let contents = SelectionRange::contents_of(&realm.document.tree, node);
    if let Some(range) = realm.range_mut(id) {
        *range = contents;
    }
    Ok(JsValue::Undefined)
}

pub(super) fn clone_range(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let range = range_value(realm, this)?;
    Ok(realm.new_range(range))
}

pub(super) fn range_to_string(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let range = range_value(realm, this)?;
    Ok(range.to_string(&realm.document.tree).into())
}

pub(super) fn range_detach(_: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}
