//! Profile loading from configuration files

use std::io::Write;

use emu_version::{BrowserProfile, BrowserVersion, ConfigLoader, Feature};
use tempfile::NamedTempFile;

#[test]
fn test_profile_from_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "browser = \"ie\"").unwrap();
    writeln!(file, "enable_features = [\"JS_NAVIGATOR_PDF_VIEWER\"]").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    let profile = BrowserProfile::from_config(&config).unwrap();

    assert_eq!(profile.version(), BrowserVersion::InternetExplorer);
    assert!(profile.has_feature(Feature::JsNavigatorPdfViewer));
    assert!(profile.user_agent().contains("Trident"));
}

#[test]
fn test_stock_profiles_match_feature_matrix() {
    for version in BrowserVersion::ALL {
        let profile = BrowserProfile::new(version);
        assert_eq!(profile.features(), version.default_features());
        assert_eq!(profile.user_agent(), version.user_agent());
    }
}
