//! Window, Navigator and the navigator's plugin/mime-type arrays

use emu_version::{BrowserProfile, Feature};

use super::{arg_node, arg_string, arg_u32, receiver};
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

/// A `navigator.plugins` entry
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub filename: String,
    pub description: String,
    /// Indices into the realm's mime types
    pub mime_types: Vec<u32>,
}

/// A mime type, listed in `navigator.mimeTypes` or built by script
#[derive(Debug, Clone, Default)]
pub struct MimeTypeInfo {
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub suffixes: Option<String>,
    pub plugin: Option<u32>,
    pub listed: bool,
}

const PDF_PLUGINS: [&str; 5] = [
    "PDF Viewer",
    "Chrome PDF Viewer",
    "Chromium PDF Viewer",
    "Microsoft Edge PDF Viewer",
    "WebKit built-in PDF",
];

/// Plugins and mime types the profile advertises
pub fn navigator_data(profile: &BrowserProfile) -> (Vec<PluginInfo>, Vec<MimeTypeInfo>) {
    if !profile.has_feature(Feature::JsNavigatorPdfViewer) {
        return (Vec::new(), Vec::new());
    }

    let plugins = PDF_PLUGINS
        .iter()
        .map(|name| PluginInfo {
            name: name.to_string(),
            filename: "internal-pdf-viewer".to_string(),
            description: "Portable Document Format".to_string(),
            mime_types: vec![0, 1],
        })
        .collect();
    let mime_types = ["application/pdf", "text/pdf"]
        .iter()
        .map(|mime| MimeTypeInfo {
            mime_type: Some(mime.to_string()),
            description: Some("Portable Document Format".to_string()),
            suffixes: Some("pdf".to_string()),
            plugin: Some(0),
            listed: true,
        })
        .collect();
    (plugins, mime_types)
}

// --- Window ---

pub(super) fn window_self(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::Window)))
}

pub(super) fn window_document(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::Node(emu_dom::NodeId::ROOT))))
}

pub(super) fn window_navigator(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::Navigator)))
}

pub(super) fn get_selection(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::Selection)))
}

pub(super) fn get_computed_style(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let node = arg_node(realm, args, 0)?
        .filter(|&id| realm.document.tree.get(id).is_some_and(|n| n.is_element()))
        .ok_or_else(|| {
            JsError::TypeError("Failed to execute 'getComputedStyle': parameter 1 is not of type 'Element'".to_string())
        })?;
    Ok(realm.wrap(Some(NativeRef::ComputedStyle(node))))
}

// --- Navigator ---

pub(super) fn user_agent(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.profile().user_agent().into())
}

pub(super) fn mime_types(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::MimeTypeArray)))
}

pub(super) fn plugins(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.wrap(Some(NativeRef::PluginArray)))
}

pub(super) fn pdf_viewer_enabled(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.profile().has_feature(Feature::JsNavigatorPdfViewer).into())
}

pub(super) fn java_enabled(_: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(false.into())
}

pub(super) fn cookie_enabled(_: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(true.into())
}

// --- MimeTypeArray ---

fn listed_mime_types(realm: &Realm) -> Vec<u32> {
    realm
        .mime_types
        .iter()
        .enumerate()
        .filter(|(_, m)| m.listed)
        .map(|(i, _)| i as u32)
        .collect()
}

pub(super) fn mime_type_array_length(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(listed_mime_types(realm).len().into())
}

pub(super) fn mime_type_array_item(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0) as usize;
    let native = listed_mime_types(realm).get(index).map(|&i| NativeRef::MimeType(i));
    Ok(realm.wrap(native))
}

pub(super) fn mime_type_array_named_item(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0);
    let native = listed_mime_types(realm)
        .into_iter()
        .find(|&i| realm.mime_types[i as usize].mime_type.as_deref() == Some(name.as_str()))
        .map(NativeRef::MimeType);
    Ok(realm.wrap(native))
}

// --- MimeType ---

/// `new MimeType()`: an unlisted mime type with no data
pub(super) fn mime_type_constructor(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let index = realm.mime_types.len() as u32;
    realm.mime_types.push(MimeTypeInfo::default());
    Ok(realm.wrap(Some(NativeRef::MimeType(index))))
}

fn this_mime_type<'a>(realm: &'a Realm, this: Option<WrapperId>) -> Result<&'a MimeTypeInfo, JsError> {
    match receiver(realm, this)? {
        NativeRef::MimeType(i) => realm.mime_types.get(i as usize).ok_or_else(JsError::illegal_invocation),
        _ => Err(JsError::illegal_invocation()),
    }
}

pub(super) fn mime_type_description(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_mime_type(realm, this)?.description.clone().into())
}

pub(super) fn mime_type_suffixes(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_mime_type(realm, this)?.suffixes.clone().into())
}

pub(super) fn mime_type_type(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_mime_type(realm, this)?.mime_type.clone().into())
}

pub(super) fn mime_type_enabled_plugin(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let plugin = this_mime_type(realm, this)?.plugin;
    Ok(realm.wrap(plugin.map(NativeRef::Plugin)))
}

// --- PluginArray / Plugin ---

pub(super) fn plugin_array_length(realm: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(realm.plugins.len().into())
}

pub(super) fn plugin_array_item(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0);
    let native = ((index as usize) < realm.plugins.len()).then_some(NativeRef::Plugin(index));
    Ok(realm.wrap(native))
}

pub(super) fn plugin_array_named_item(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0);
    let native = realm
        .plugins
        .iter()
        .position(|p| p.name == name)
        .map(|i| NativeRef::Plugin(i as u32));
    Ok(realm.wrap(native))
}

pub(super) fn plugin_array_refresh(_: &mut Realm, _: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(JsValue::Undefined)
}

fn this_plugin<'a>(realm: &'a Realm, this: Option<WrapperId>) -> Result<&'a PluginInfo, JsError> {
    match receiver(realm, this)? {
        NativeRef::Plugin(i) => realm.plugins.get(i as usize).ok_or_else(JsError::illegal_invocation),
        _ => Err(JsError::illegal_invocation()),
    }
}

pub(super) fn plugin_name(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_plugin(realm, this)?.name.as_str().into())
}

pub(super) fn plugin_filename(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_plugin(realm, this)?.filename.as_str().into())
}

pub(super) fn plugin_description(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_plugin(realm, this)?.description.as_str().into())
}

pub(super) fn plugin_length(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    Ok(this_plugin(realm, this)?.mime_types.len().into())
}

pub(super) fn plugin_item(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let index = arg_u32(args, 0) as usize;
    let native = this_plugin(realm, this)?.mime_types.get(index).map(|&i| NativeRef::MimeType(i));
    Ok(realm.wrap(native))
}

pub(super) fn plugin_named_item(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let name = arg_string(args, 0);
    let native = this_plugin(realm, this)?
        .mime_types
        .iter()
        .copied()
        .find(|&i| {
            realm
                .mime_types
                .get(i as usize)
                .and_then(|m| m.mime_type.as_deref())
                == Some(name.as_str())
        })
        .map(NativeRef::MimeType);
    Ok(realm.wrap(native))
}
