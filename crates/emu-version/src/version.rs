//! Simulated browser versions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::FeatureSet;

/// A browser whose script-observable behavior can be simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserVersion {
    #[default]
    Chrome,
    Edge,
    Firefox,
    FirefoxEsr,
    #[serde(rename = "ie", alias = "internet-explorer")]
    InternetExplorer,
}

impl BrowserVersion {
    /// Every configured version, in declaration order
    pub const ALL: [BrowserVersion; 5] = [
        BrowserVersion::Chrome,
        BrowserVersion::Edge,
        BrowserVersion::Firefox,
        BrowserVersion::FirefoxEsr,
        BrowserVersion::InternetExplorer,
    ];

    /// Short name used in logs and expectation tables
    pub fn nickname(self) -> &'static str {
        match self {
            BrowserVersion::Chrome => "Chrome",
            BrowserVersion::Edge => "Edge",
            BrowserVersion::Firefox => "FF",
            BrowserVersion::FirefoxEsr => "FF-ESR",
            BrowserVersion::InternetExplorer => "IE",
        }
    }

    /// Default `navigator.userAgent` value
    pub fn user_agent(self) -> &'static str {
        match self {
            BrowserVersion::Chrome => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            }
            BrowserVersion::Edge => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0"
            }
            BrowserVersion::Firefox => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0"
            }
            BrowserVersion::FirefoxEsr => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:115.0) Gecko/20100101 Firefox/115.0"
            }
            BrowserVersion::InternetExplorer => {
                "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko"
            }
        }
    }

    /// The single-member version set for this version
    pub fn as_set(self) -> VersionSet {
        match self {
            BrowserVersion::Chrome => VersionSet::CHROME,
            BrowserVersion::Edge => VersionSet::EDGE,
            BrowserVersion::Firefox => VersionSet::FIREFOX,
            BrowserVersion::FirefoxEsr => VersionSet::FIREFOX_ESR,
            BrowserVersion::InternetExplorer => VersionSet::IE,
        }
    }

    /// Feature flags this version ships with
    pub fn default_features(self) -> FeatureSet {
        FeatureSet::for_version(self)
    }
}

bitflags! {
    /// Set of browser versions a capability is exposed on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VersionSet: u8 {
        const CHROME = 1 << 0;
        const EDGE = 1 << 1;
        const FIREFOX = 1 << 2;
        const FIREFOX_ESR = 1 << 3;
        const IE = 1 << 4;

        const BLINK = Self::CHROME.bits() | Self::EDGE.bits();
        const GECKO = Self::FIREFOX.bits() | Self::FIREFOX_ESR.bits();
        const MODERN = Self::BLINK.bits() | Self::GECKO.bits();
        const ALL = Self::MODERN.bits() | Self::IE.bits();
    }
}

impl VersionSet {
    /// Whether `version` is a member of this set
    #[inline]
    pub fn includes(self, version: BrowserVersion) -> bool {
        self.contains(version.as_set())
    }

    /// Versions in this set, in declaration order
    pub fn versions(self) -> impl Iterator<Item = BrowserVersion> {
        BrowserVersion::ALL.into_iter().filter(move |v| self.includes(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_set() {
        assert!(VersionSet::BLINK.includes(BrowserVersion::Chrome));
        assert!(VersionSet::BLINK.includes(BrowserVersion::Edge));
        assert!(!VersionSet::BLINK.includes(BrowserVersion::Firefox));
        assert!(!VersionSet::BLINK.includes(BrowserVersion::InternetExplorer));
    }

    #[test]
    fn test_all_contains_every_version() {
        for version in BrowserVersion::ALL {
            assert!(VersionSet::ALL.includes(version), "{}", version.nickname());
        }
        assert_eq!(VersionSet::ALL.versions().count(), 5);
    }

    #[test]
    fn test_empty_set() {
        assert!(VersionSet::empty().versions().next().is_none());
    }

    #[test]
    fn test_serde_names() {
        let v: BrowserVersion = serde_json::from_str("\"firefox-esr\"").unwrap();
        assert_eq!(v, BrowserVersion::FirefoxEsr);
        let v: BrowserVersion = serde_json::from_str("\"ie\"").unwrap();
        assert_eq!(v, BrowserVersion::InternetExplorer);
    }
}
