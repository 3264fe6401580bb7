//! CSSOM members: style sheets, rules, media lists, computed style

use emu_css::{ComputedStyle, CssRule, MediaList, RuleId, StyleSheet};
use emu_dom::DomException;

use super::{arg, arg_string, arg_u32, receiver};
use crate::wrapper::SheetId;
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

fn this_sheet(realm: &Realm, this: Option<WrapperId>) -> Result<SheetId, JsError> {
    match receiver(realm, this)? {
        NativeRef::StyleSheet(id) => Ok(id),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn this_rule(realm: &Realm, this: Option<WrapperId>) -> Result<(SheetId, RuleId), JsError> {
    match receiver(realm, this)? {
        NativeRef::CssRule(sheet, rule) => Ok((sheet, rule)),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn rule_of(realm: &Realm, sheet: SheetId, rule: RuleId) -> Option<&CssRule> {
    realm.sheet(sheet).and_then(|s| s.rule(rule))
}

fn missing_sheet() -> JsError {
    JsError::from(DomException::InvalidState("The style sheet no longer exists".to_string()))
}

/// `insertRule(text, index = 0)` on a sheet or grouping rule
fn insert_into(realm: &mut Realm, sheet: SheetId, parent: Option<RuleId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let text = arg_string(args, 0);
    let index = arg_u32(args, 1);
    let sheet = realm.sheet_mut(sheet).ok_or_else(missing_sheet)?;
    Ok(sheet.insert_rule(parent, &text, index)?.into())
}

fn delete_from(realm: &mut Realm, sheet: SheetId, parent: Option<RuleId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0);
    let sheet = realm.sheet_mut(sheet).ok_or_else(missing_sheet)?;
    sheet.delete_rule(parent, index)?;
    Ok(JsValue::Undefined)
}

// --- StyleSheetList ---

pub(super) fn sheet_list_length(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.sheets.len().into())
}

pub(super) fn sheet_list_item(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0);
    let native = ((index as usize) < realm.sheets.len()).then_some(NativeRef::StyleSheet(SheetId(index)));
    Ok(realm.wrap(native))
}

// --- CSSStyleSheet ---

pub(super) fn sheet_css_rules(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    Ok(realm.wrap(Some(NativeRef::CssRuleList(sheet, None))))
}

pub(super) fn sheet_media(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    Ok(realm.wrap(Some(NativeRef::MediaList(sheet, None))))
}

pub(super) fn sheet_owner_node(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    let owner = realm.sheet(sheet).and_then(StyleSheet::owner);
    Ok(realm.wrap(owner.map(NativeRef::Node)))
}

pub(super) fn sheet_href(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    Ok(realm.sheet(sheet).and_then(|s| s.href()).into())
}

pub(super) fn sheet_type(_: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok("text/css".into())
}

pub(super) fn sheet_disabled(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    Ok(realm.sheet(sheet).is_some_and(|s| s.disabled).into())
}

pub(super) fn set_sheet_disabled(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    if let Some(sheet) = realm.sheet_mut(sheet) {
        sheet.disabled = arg(args, 0).to_boolean();
    }
    Ok(JsValue::Undefined)
}

pub(super) fn sheet_insert_rule(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    insert_into(realm, sheet, None, args)
}

pub(super) fn sheet_delete_rule(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let sheet = this_sheet(realm, this)?;
    delete_from(realm, sheet, None, args)
}

// --- CSSRuleList ---

fn this_rule_list(realm: &Realm, this: Option<WrapperId>) -> Result<(SheetId, Option<RuleId>), JsError> {
    match receiver(realm, this)? {
        NativeRef::CssRuleList(sheet, parent) => Ok((sheet, parent)),
        _ => Err(JsError::illegal_invocation()),
    }
}

pub(super) fn rule_list_length(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, parent) = this_rule_list(realm, this)?;
    let len = realm
        .sheet(sheet)
        .and_then(|s| s.rule_list(parent))
        .map_or(0, <[RuleId]>::len);
    Ok(len.into())
}

pub(super) fn rule_list_item(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, parent) = this_rule_list(realm, this)?;
    let index = arg_u32(args, 0) as usize;
    let rule = realm
        .sheet(sheet)
        .and_then(|s| s.rule_list(parent))
        .and_then(|list| list.get(index).copied());
    Ok(realm.wrap(rule.map(|r| NativeRef::CssRule(sheet, r))))
}

// --- CSSRule and subclasses ---

pub(super) fn rule_type(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    let code = rule_of(realm, sheet, rule).map_or(0, CssRule::type_code);
    Ok(u32::from(code).into())
}

pub(super) fn rule_css_text(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    Ok(realm.sheet(sheet).map(|s| s.css_text(rule)).unwrap_or_default().into())
}

pub(super) fn rule_parent_rule(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    let parent = rule_of(realm, sheet, rule).and_then(|r| r.parent);
    Ok(realm.wrap(parent.map(|p| NativeRef::CssRule(sheet, p))))
}

pub(super) fn rule_parent_style_sheet(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    let live = rule_of(realm, sheet, rule).is_some();
    Ok(realm.wrap(live.then_some(NativeRef::StyleSheet(sheet))))
}

pub(super) fn selector_text(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    Ok(rule_of(realm, sheet, rule)
        .and_then(CssRule::selector_text)
        .unwrap_or_default()
        .into())
}

pub(super) fn grouping_css_rules(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    Ok(realm.wrap(Some(NativeRef::CssRuleList(sheet, Some(rule)))))
}

pub(super) fn grouping_insert_rule(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    insert_into(realm, sheet, Some(rule), args)
}

pub(super) fn grouping_delete_rule(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    delete_from(realm, sheet, Some(rule), args)
}

pub(super) fn condition_text(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    Ok(realm
        .sheet(sheet)
        .and_then(|s| s.condition_text(rule))
        .unwrap_or_default()
        .into())
}

/// The same MediaList object on every read
pub(super) fn media_rule_media(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let (sheet, rule) = this_rule(realm, this)?;
    Ok(realm.wrap(Some(NativeRef::MediaList(sheet, Some(rule)))))
}

// --- MediaList ---

fn this_media(realm: &Realm, this: Option<WrapperId>) -> Result<&MediaList, JsError> {
    match receiver(realm, this)? {
        NativeRef::MediaList(sheet, None) => realm.sheet(sheet).map(StyleSheet::media).ok_or_else(missing_sheet),
        NativeRef::MediaList(sheet, Some(rule)) => rule_of(realm, sheet, rule)
            .and_then(CssRule::media)
            .ok_or_else(JsError::illegal_invocation),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn this_media_mut(realm: &mut Realm, this: Option<WrapperId>) -> Result<&mut MediaList, JsError> {
    match receiver(realm, this)? {
        NativeRef::MediaList(sheet, None) => realm.sheet_mut(sheet).map(StyleSheet::media_mut).ok_or_else(missing_sheet),
        NativeRef::MediaList(sheet, Some(rule)) => realm
            .sheet_mut(sheet)
            .and_then(|s| s.rule_mut(rule))
            .and_then(CssRule::media_mut)
            .ok_or_else(JsError::illegal_invocation),
        _ => Err(JsError::illegal_invocation()),
    }
}

pub(super) fn media_text(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_media(realm, this)?.media_text().into())
}

pub(super) fn set_media_text(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let text = match args.first() {
        Some(v) if !v.is_nullish() => v.to_js_string(),
        _ => String::new(),
    };
    this_media_mut(realm, this)?.set_media_text(&text);
    Ok(JsValue::Undefined)
}

pub(super) fn media_length(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_media(realm, this)?.len().into())
}

pub(super) fn media_item(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0) as usize;
    Ok(this_media(realm, this)?.item(index).into())
}

pub(super) fn append_medium(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let medium = arg_string(args, 0);
    this_media_mut(realm, this)?.append_medium(&medium);
    Ok(JsValue::Undefined)
}

pub(super) fn delete_medium(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let medium = arg_string(args, 0);
    this_media_mut(realm, this)?.delete_medium(&medium)?;
    Ok(JsValue::Undefined)
}

// --- CSSStyleDeclaration (computed) ---

fn computed(realm: &Realm, this: Option<WrapperId>) -> Result<ComputedStyle, JsError> {
    match receiver(realm, this)? {
        NativeRef::ComputedStyle(node) => Ok(ComputedStyle::compute(&realm.document.tree, node, realm.profile())),
        _ => Err(JsError::illegal_invocation()),
    }
}

pub(super) fn style_display(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(computed(realm, this)?.display().into())
}

pub(super) fn get_property_value(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let property = arg_string(args, 0);
    Ok(computed(realm, this)?.property_value(&property).into())
}
