//! Markup loading into the arena tree

use emu_dom::{NodeData, NodeType};
use emu_html::HtmlParser;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
    <style media="screen">p { color: red; }</style>
  </head>
  <body>
    <!-- note -->
    <p id="greeting">Hello <b>bold</b> world</p>
  </body>
</html>"#;

#[test]
fn test_doctype_and_url() {
    let doc = HtmlParser::new().parse_with_url(PAGE, "https://example.com/page").unwrap();
    assert_eq!(doc.url(), "https://example.com/page");

    let first = doc.tree().first_child(doc.tree().root()).unwrap();
    assert_eq!(doc.tree().get(first).unwrap().node_type(), NodeType::DocumentType);
}

#[test]
fn test_attributes_preserved() {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let meta = doc.get_elements_by_tag_name("meta")[0];
    let element = doc.tree().get(meta).unwrap().as_element().unwrap();
    assert_eq!(element.get_attr("http-equiv"), Some("Content-Type"));
    assert_eq!(element.get_attr("content"), Some("text/html; charset=utf-8"));
}

#[test]
fn test_style_text_and_comments() {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let style = doc.get_elements_by_tag_name("style")[0];
    assert_eq!(doc.tree().text_content(style), "p { color: red; }");

    let body = doc.body().unwrap();
    let comments: Vec<_> = doc
        .tree()
        .children(body)
        .filter(|&id| matches!(doc.tree().get(id).unwrap().data, NodeData::Comment(_)))
        .collect();
    assert_eq!(comments.len(), 1);
}

#[test]
fn test_whitespace_only_text_dropped() {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let paragraph = doc.get_element_by_id("greeting").unwrap();
    assert_eq!(doc.tree().child_count(paragraph), 3);
    assert_eq!(doc.tree().text_content(paragraph), "Hello bold world");

    let body = doc.body().unwrap();
    assert!(
        doc.tree()
            .children(body)
            .all(|id| !doc.tree().get(id).unwrap().is_text())
    );
}
