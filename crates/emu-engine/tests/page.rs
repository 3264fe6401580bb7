//! Page lifecycle through the engine

use std::io::Write;
use std::thread;

use emu_css::DisplayStyle;
use emu_engine::{Engine, EngineConfig, EngineError};
use emu_js::JsValue;
use emu_version::BrowserVersion;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Ruby</title></head>
<body>
<ruby id="r">漢<rt>kan</rt></ruby>
<script>document.body.setAttribute('data-ready', 'yes');</script>
<script type="text/template">this is not javascript</script>
<script>throw new Error('boom');</script>
<script>document.body.id = 'after-error';</script>
</body>
</html>"#;

fn engine(toml: &str) -> Engine {
    Engine::new(EngineConfig::load_str(toml).unwrap()).unwrap()
}

#[test]
fn test_inline_scripts_run_in_order() {
    let engine = engine("");
    let page = engine.load_html(PAGE, "https://example.com/ruby").unwrap();

    assert_eq!(page.url(), "https://example.com/ruby");
    assert_eq!(page.eval("document.body.getAttribute('data-ready')").unwrap(), JsValue::from("yes"));
    assert_eq!(page.eval("document.body.id").unwrap(), JsValue::from("after-error"));
    assert_eq!(page.eval("document.title").unwrap(), JsValue::from("Ruby"));
    assert_eq!(page.eval("document.URL").unwrap(), JsValue::from("https://example.com/ruby"));
}

#[test]
fn test_script_errors_surface_to_caller() {
    let page = engine("").load_html("<body></body>", "about:blank").unwrap();
    let err = page.eval("document.body.appendChild(document)").unwrap_err();
    match err {
        EngineError::JavaScript(e) => {
            assert_eq!(e.name(), "HierarchyRequestError");
            assert_eq!(e.code(), Some(3));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_display_style_follows_profile() {
    let html = "<body><ruby>a<rt>b</rt></ruby></body>";
    for (browser, expected) in [("chrome", DisplayStyle::RubyText), ("firefox", DisplayStyle::RubyText)] {
        let page = engine(&format!("[session]\nbrowser = \"{}\"", browser))
            .load_html(html, "about:blank")
            .unwrap();
        let rt = page
            .with_realm(|realm| realm.document().get_elements_by_tag_name("rt")[0])
            .unwrap();
        assert_eq!(page.display_style(rt).unwrap(), Some(expected));
    }

    for (browser, expected) in [("chrome", DisplayStyle::Empty), ("firefox", DisplayStyle::RubyText)] {
        let page = engine(&format!("[session]\nbrowser = \"{}\"", browser))
            .load_html(html, "about:blank")
            .unwrap();
        let detached = page.with_realm(|realm| realm.document_mut().create_element("rt")).unwrap();
        assert_eq!(page.display_style(detached).unwrap(), Some(expected), "{}", browser);
    }
}

#[test]
fn test_tasks_from_other_threads_run_in_order() {
    let page = engine("").load_html("<body></body>", "about:blank").unwrap();
    let sender = page.task_sender();

    let worker = thread::spawn(move || {
        for tag in ["h1", "p", "footer"] {
            sender
                .post(move |realm| {
                    let body = realm.document().body().unwrap();
                    let el = realm.document_mut().create_element(tag);
                    realm.append_child(body, el).unwrap();
                })
                .unwrap();
        }
    });
    worker.join().unwrap();

    assert_eq!(page.eval("document.body.hasChildNodes()").unwrap(), JsValue::Bool(false));
    assert_eq!(page.run_pending_tasks().unwrap(), 3);
    assert_eq!(page.run_pending_tasks().unwrap(), 0);

    let tags = page
        .eval("[document.body.firstChild.tagName, document.body.lastChild.tagName].join(',')")
        .unwrap();
    assert_eq!(tags, JsValue::from("H1,FOOTER"));
}

#[test]
fn test_destroyed_node_gets_fresh_wrapper() {
    let page = engine("").load_html("<body><p id=x>hi</p></body>", "about:blank").unwrap();
    page.exec("window.saved = document.getElementById('x'); saved.marker = 1;").unwrap();

    let p = page
        .with_realm(|realm| realm.document().get_element_by_id("x").unwrap())
        .unwrap();
    assert_eq!(page.destroy_node(p).unwrap(), 2);

    assert_eq!(page.eval("document.getElementById('x')").unwrap(), JsValue::Null);
    assert_eq!(page.eval("saved.marker").unwrap(), JsValue::Number(1.0));
}

#[test]
fn test_collection_keeps_node_wrappers() {
    let page = engine("").load_html("<body><p id=x>hi</p></body>", "about:blank").unwrap();
    page.exec("document.getElementById('x').marker = 7; new Range();").unwrap();
    page.collect_garbage();

    assert_eq!(page.eval("document.getElementById('x').marker").unwrap(), JsValue::Number(7.0));
    let held = page.with_realm(|realm| realm.script_object_count()).unwrap();
    assert_eq!(held, 0);
}

#[test]
fn test_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "enable_javascript = true\n\n[session]\nbrowser = \"edge\"").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let engine = Engine::new(config).unwrap();
    assert_eq!(engine.profile().version(), BrowserVersion::Edge);

    let page = engine.load_html("<body></body>", "about:blank").unwrap();
    assert_eq!(page.eval("'PeriodicSyncManager' in window").unwrap(), JsValue::Bool(true));
}
