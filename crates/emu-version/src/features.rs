//! Feature matrix
//!
//! Boolean behavior switches that differ between simulated browsers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::BrowserVersion;

/// A single behavior switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    /// `rt`/`rtc` always get their ruby-text display, even when detached
    CssRtDisplayRubyTextAlways,
    /// `rp` is always `display: none`
    CssRpDisplayNoneAlways,
    /// `rb` always gets `display: ruby-base`
    CssRbDisplayRubyBaseAlways,
    /// `navigator.plugins`/`navigator.mimeTypes` list the built-in PDF viewer
    JsNavigatorPdfViewer,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::CssRtDisplayRubyTextAlways,
        Feature::CssRpDisplayNoneAlways,
        Feature::CssRbDisplayRubyBaseAlways,
        Feature::JsNavigatorPdfViewer,
    ];

    /// The flag bit for this feature
    pub fn bit(self) -> FeatureSet {
        match self {
            Feature::CssRtDisplayRubyTextAlways => FeatureSet::CSS_RT_DISPLAY_RUBY_TEXT_ALWAYS,
            Feature::CssRpDisplayNoneAlways => FeatureSet::CSS_RP_DISPLAY_NONE_ALWAYS,
            Feature::CssRbDisplayRubyBaseAlways => FeatureSet::CSS_RB_DISPLAY_RUBY_BASE_ALWAYS,
            Feature::JsNavigatorPdfViewer => FeatureSet::JS_NAVIGATOR_PDF_VIEWER,
        }
    }
}

bitflags! {
    /// Enabled features of one session
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureSet: u32 {
        const CSS_RT_DISPLAY_RUBY_TEXT_ALWAYS = 1 << 0;
        const CSS_RP_DISPLAY_NONE_ALWAYS = 1 << 1;
        const CSS_RB_DISPLAY_RUBY_BASE_ALWAYS = 1 << 2;
        const JS_NAVIGATOR_PDF_VIEWER = 1 << 3;
    }
}

impl FeatureSet {
    /// The feature matrix row for a version
    pub fn for_version(version: BrowserVersion) -> Self {
        match version {
            BrowserVersion::Chrome | BrowserVersion::Edge => Self::JS_NAVIGATOR_PDF_VIEWER,
            BrowserVersion::Firefox | BrowserVersion::FirefoxEsr => {
                Self::CSS_RT_DISPLAY_RUBY_TEXT_ALWAYS
                    | Self::CSS_RP_DISPLAY_NONE_ALWAYS
                    | Self::CSS_RB_DISPLAY_RUBY_BASE_ALWAYS
                    | Self::JS_NAVIGATOR_PDF_VIEWER
            }
            BrowserVersion::InternetExplorer => Self::empty(),
        }
    }

    #[inline]
    pub fn has(self, feature: Feature) -> bool {
        self.contains(feature.bit())
    }

    /// Features enabled in this set
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firefox_ruby_flags() {
        let ff = FeatureSet::for_version(BrowserVersion::Firefox);
        assert!(ff.has(Feature::CssRtDisplayRubyTextAlways));
        assert!(ff.has(Feature::CssRpDisplayNoneAlways));

        let chrome = FeatureSet::for_version(BrowserVersion::Chrome);
        assert!(!chrome.has(Feature::CssRtDisplayRubyTextAlways));
    }

    #[test]
    fn test_ie_has_no_pdf_viewer() {
        let ie = FeatureSet::for_version(BrowserVersion::InternetExplorer);
        assert!(!ie.has(Feature::JsNavigatorPdfViewer));
        assert_eq!(ie.features().count(), 0);
    }

    #[test]
    fn test_feature_names() {
        let f: Feature = serde_json::from_str("\"CSS_RT_DISPLAY_RUBY_TEXT_ALWAYS\"").unwrap();
        assert_eq!(f, Feature::CssRtDisplayRubyTextAlways);
    }
}
