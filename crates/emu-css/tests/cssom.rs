//! CSSOM and display-style behavior across browser profiles

use emu_css::{CssRule, DisplayStyle, StyleSheet, default_display_style, parse_stylesheet};
use emu_dom::{Document, Provenance};
use emu_version::{BrowserProfile, BrowserVersion, Feature, FeatureSet};

#[test]
fn test_media_rule_round_trip() {
    let css = r#"
        body { margin: 0; }
        @media print {
            p { color: black; }
        }
    "#;
    let mut sheet = parse_stylesheet(css).unwrap();
    assert_eq!(sheet.len(), 2);

    let media = sheet.css_rules()[1];
    assert_eq!(sheet.rule(media).unwrap().type_code(), CssRule::MEDIA_RULE);

    let list = sheet.rule_mut(media).unwrap().media_mut().unwrap();
    list.append_medium("screen");
    assert_eq!(list.media_text(), "print, screen");
    assert_eq!(sheet.condition_text(media).as_deref(), Some("print, screen"));
    assert!(sheet.css_text(media).starts_with("@media print, screen {"));
}

#[test]
fn test_rules_nested_in_media_are_style_rules() {
    let sheet = StyleSheet::parse("@media screen { p { display: none } } em { display: block }").unwrap();
    let styles = sheet.style_rules();
    assert_eq!(styles.len(), 2);
    let nested = sheet.rule(styles[0]).unwrap();
    assert_eq!(nested.parent, Some(sheet.css_rules()[0]));
    assert_eq!(nested.property_value("display"), Some("none"));
}

#[test]
fn test_script_created_rtc_across_versions() {
    let mut doc = Document::default();
    let rtc = doc.create_element("rtc");

    let expected = [
        (BrowserVersion::Chrome, DisplayStyle::Empty),
        (BrowserVersion::Edge, DisplayStyle::Empty),
        (BrowserVersion::Firefox, DisplayStyle::RubyTextContainer),
        (BrowserVersion::FirefoxEsr, DisplayStyle::RubyTextContainer),
        (BrowserVersion::InternetExplorer, DisplayStyle::Empty),
    ];
    for (version, style) in expected {
        let profile = BrowserProfile::new(version);
        assert_eq!(default_display_style(doc.tree(), rtc, &profile), Some(style));
    }

    let body = doc.body().unwrap();
    doc.tree.append_child(body, rtc).unwrap();
    let chrome = BrowserProfile::new(BrowserVersion::Chrome);
    assert_eq!(default_display_style(doc.tree(), rtc, &chrome), Some(DisplayStyle::Inline));
}

#[test]
fn test_flag_override_on_custom_profile() {
    let mut doc = Document::default();
    let rp = doc.tree.create_element("rp", Provenance::Script);
    let rb = doc.tree.create_element("rb", Provenance::Parser);

    let plain = BrowserProfile::new(BrowserVersion::Chrome).with_features(FeatureSet::empty());
    assert_eq!(default_display_style(doc.tree(), rp, &plain), Some(DisplayStyle::Empty));
    assert_eq!(default_display_style(doc.tree(), rb, &plain), Some(DisplayStyle::Inline));

    let flagged = BrowserProfile::new(BrowserVersion::Chrome).with_features(
        Feature::CssRpDisplayNoneAlways.bit() | Feature::CssRbDisplayRubyBaseAlways.bit(),
    );
    assert_eq!(default_display_style(doc.tree(), rp, &flagged), Some(DisplayStyle::None));
    assert_eq!(default_display_style(doc.tree(), rb, &flagged), Some(DisplayStyle::RubyBase));
}
