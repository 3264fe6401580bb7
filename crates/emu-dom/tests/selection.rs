//! Selection state machine behavior over a parsed-like document

use emu_dom::{Document, NodeId, Selection, SelectionRange, SelectionType};

/// `<body><p id="a">alpha</p><p id="b">beta</p><div id="empty"></div></body>`
fn document() -> (Document, NodeId, NodeId, NodeId) {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let make = |doc: &mut Document, id: &str, tag: &str, text: Option<&str>| {
        let el = doc.tree.create_element(tag, emu_dom::Provenance::Parser);
        doc.tree.get_mut(el).unwrap().as_element_mut().unwrap().set_attr("id", id);
        doc.tree.append_child(body, el).unwrap();
        if let Some(text) = text {
            let t = doc.tree.create_text(text);
            doc.tree.append_child(el, t).unwrap();
        }
        el
    };
    let a = make(&mut doc, "a", "p", Some("alpha"));
    let b = make(&mut doc, "b", "p", Some("beta"));
    let empty = make(&mut doc, "empty", "div", None);
    let a_text = doc.tree.first_child(a).unwrap();
    let b_text = doc.tree.first_child(b).unwrap();
    (doc, a_text, b_text, empty)
}

#[test]
fn test_type_none_iff_no_ranges() {
    let (doc, a, b, _) = document();
    let r1 = SelectionRange::new(a, 0, a, 2);
    let r2 = SelectionRange::collapsed_at(b, 1);
    let r3 = SelectionRange::new(a, 1, b, 2);

    let mut selection = Selection::new();
    let steps: Vec<(bool, SelectionRange)> = vec![
        (true, r1),
        (true, r2),
        (false, r1),
        (true, r3),
        (false, r2),
        (false, r2),
        (false, r3),
        (true, r2),
        (false, r2),
    ];
    for (add, range) in steps {
        if add {
            selection.add_range(range);
        } else {
            selection.remove_range(&range);
        }
        assert_eq!(
            selection.selection_type() == SelectionType::None,
            selection.range_count() == 0
        );
    }
    assert_eq!(selection.to_string(doc.tree()), "");
}

#[test]
fn test_collapse_always_caret() {
    let (_, a, b, _) = document();
    let mut selection = Selection::new();
    selection.collapse(a, 3);
    assert_eq!(selection.range_count(), 1);
    assert_eq!(selection.selection_type(), SelectionType::Caret);

    selection.add_range(SelectionRange::new(b, 0, b, 4));
    assert_eq!(selection.selection_type(), SelectionType::Range);
    selection.collapse(b, 2);
    assert_eq!(selection.range_count(), 1);
    assert_eq!(selection.selection_type(), SelectionType::Caret);
    assert!(selection.is_collapsed());
}

#[test]
fn test_remove_never_promotes_to_caret() {
    let (_, a, b, _) = document();
    let collapsed = SelectionRange::collapsed_at(a, 1);
    let wide = SelectionRange::new(b, 0, b, 4);

    let mut selection = Selection::new();
    selection.add_range(wide);
    selection.add_range(collapsed);
    assert_eq!(selection.selection_type(), SelectionType::Range);

    assert!(selection.remove_range(&wide));
    assert_eq!(selection.range_count(), 1);
    assert_eq!(selection.selection_type(), SelectionType::Range);

    assert!(!selection.remove_range(&wide));
    assert_eq!(selection.selection_type(), SelectionType::Range);
}

#[test]
fn test_range_at_out_of_bounds() {
    let (_, a, b, _) = document();
    let mut selection = Selection::new();
    for i in [-1, 0, 5] {
        let err = selection.range_at(i).unwrap_err();
        assert_eq!(err.name(), "IndexSizeError");
    }

    selection.add_range(SelectionRange::new(a, 0, a, 1));
    selection.add_range(SelectionRange::new(b, 0, b, 1));
    let count = selection.range_count() as i64;
    for i in [-1, count, count + 5] {
        let err = selection.range_at(i).unwrap_err();
        assert_eq!(err.code(), 1);
        assert_eq!(err.message(), format!("Invalid range index: {}", i));
    }
    assert!(selection.range_at(count - 1).is_ok());
}

#[test]
fn test_collapsed_then_wide_scenario() {
    let (_, a, b, _) = document();
    let mut selection = Selection::new();

    selection.add_range(SelectionRange::new(a, 0, a, 0));
    assert_eq!(selection.selection_type(), SelectionType::Caret);

    selection.add_range(SelectionRange::new(b, 0, b, 3));
    assert_eq!(selection.selection_type(), SelectionType::Range);
    assert_eq!(selection.range_count(), 2);
}

#[test]
fn test_select_all_children() {
    let (doc, a, _, empty) = document();
    let mut selection = Selection::new();

    selection.select_all_children(doc.tree(), empty);
    assert_eq!(selection.selection_type(), SelectionType::Caret);
    assert_eq!(selection.range_count(), 1);

    let paragraph = doc.tree.parent(a).unwrap();
    selection.select_all_children(doc.tree(), paragraph);
    assert_eq!(selection.selection_type(), SelectionType::Range);
    assert_eq!(selection.to_string(doc.tree()), "alpha");
}

#[test]
fn test_collapse_to_edges_on_empty_selection() {
    let (doc, _, _, _) = document();
    let mut selection = Selection::new();
    selection.collapse_to_start(doc.tree());
    assert_eq!(selection.selection_type(), SelectionType::None);
    selection.collapse_to_end(doc.tree());
    assert_eq!(selection.selection_type(), SelectionType::None);
    assert_eq!(selection.range_count(), 0);
}

#[test]
fn test_anchor_focus_follow_document_order() {
    let (doc, a, b, _) = document();
    let mut selection = Selection::new();
    selection.add_range(SelectionRange::new(b, 1, b, 3));
    selection.add_range(SelectionRange::new(a, 0, a, 2));

    assert_eq!(selection.anchor(doc.tree()), Some((b, 1)));
    assert_eq!(selection.focus(doc.tree()), Some((b, 3)));
    assert_eq!(selection.to_string(doc.tree()), "etal");
}
