//! Capability registry behavior across browser versions

use std::sync::Arc;

use emu_dom::Document;
use emu_js::{CONSTRUCTOR, CapabilityRegistry, MemberKind, NativeRef, Realm};
use emu_version::{BrowserProfile, BrowserVersion};

const VERSIONS: [BrowserVersion; 5] = [
    BrowserVersion::Chrome,
    BrowserVersion::Edge,
    BrowserVersion::Firefox,
    BrowserVersion::FirefoxEsr,
    BrowserVersion::InternetExplorer,
];

fn is_blink(version: BrowserVersion) -> bool {
    matches!(version, BrowserVersion::Chrome | BrowserVersion::Edge)
}

#[test]
fn test_blink_only_members() {
    let registry = CapabilityRegistry::standard().unwrap();
    for version in VERSIONS {
        assert_eq!(
            registry.is_supported("PresentationConnectionCloseEvent", CONSTRUCTOR, MemberKind::Constructor, version),
            is_blink(version),
            "{:?}",
            version
        );
        assert_eq!(registry.is_class_exposed("PeriodicSyncManager", version), is_blink(version));
    }
}

#[test]
fn test_version_gated_members() {
    let registry = CapabilityRegistry::standard().unwrap();
    for version in VERSIONS {
        let ie = version == BrowserVersion::InternetExplorer;
        assert_eq!(registry.is_supported("HTMLMetaElement", "scheme", MemberKind::Getter, version), ie);
        assert_eq!(registry.is_supported("Range", CONSTRUCTOR, MemberKind::Constructor, version), !ie);
        assert_eq!(registry.is_supported("CSSConditionRule", "conditionText", MemberKind::Getter, version), !ie);
        assert_eq!(registry.is_supported("Selection", "type", MemberKind::Getter, version), !ie);
    }
}

#[test]
fn test_inherited_members_resolve_to_their_owner() {
    let registry = CapabilityRegistry::standard().unwrap();
    let chrome = BrowserVersion::Chrome;

    let d = registry.resolve("CSSMediaRule", "cssRules", MemberKind::Getter, chrome).unwrap();
    assert_eq!(d.owner, "CSSGroupingRule");
    let d = registry.resolve("HTMLMetaElement", "appendChild", MemberKind::Function, chrome).unwrap();
    assert_eq!(d.owner, "Node");
    assert!(registry.resolve("HTMLMetaElement", "scheme", MemberKind::Getter, chrome).is_none());

    assert_eq!(
        registry.lookup_order("CSSMediaRule"),
        &["CSSMediaRule", "CSSConditionRule", "CSSGroupingRule", "CSSRule"]
    );
}

#[test]
fn test_wrapper_identity_is_stable() {
    let registry = Arc::new(CapabilityRegistry::standard().unwrap());
    let document = emu_html::parse("<html><body><p id=x>hi</p></body></html>").unwrap();
    let mut realm = Realm::new(document, BrowserProfile::new(BrowserVersion::Firefox), registry);

    let p = realm.document().get_element_by_id("x").unwrap();
    let first = realm.wrapper(NativeRef::Node(p));
    let second = realm.wrapper(NativeRef::Node(p));
    assert_eq!(first, second);
    assert_eq!(realm.native_for(first), Some(NativeRef::Node(p)));
    assert_eq!(realm.wrappers().class_of(first), Some("HTMLElement"));

    assert_eq!(realm.window(), realm.window());
}

#[test]
fn test_meta_wrapper_class() {
    let registry = Arc::new(CapabilityRegistry::standard().unwrap());
    let html = r#"<html><head><meta name="author" content="x"></head><body></body></html>"#;
    let mut realm = Realm::new(emu_html::parse(html).unwrap(), BrowserProfile::new(BrowserVersion::Edge), registry);

    let meta = realm.document().get_elements_by_tag_name("meta")[0];
    let id = realm.wrapper(NativeRef::Node(meta));
    assert_eq!(realm.wrappers().class_of(id), Some("HTMLMetaElement"));
    assert_eq!(realm.get(id, "content").unwrap(), emu_js::JsValue::from("x"));
    assert_eq!(realm.get(id, "scheme").unwrap(), emu_js::JsValue::Undefined);
}

#[test]
fn test_document_without_script_has_empty_sheet_list() {
    let registry = Arc::new(CapabilityRegistry::standard().unwrap());
    let realm = Realm::new(Document::new("about:blank"), BrowserProfile::new(BrowserVersion::Chrome), registry);
    assert!(realm.style_sheets().is_empty());
}
