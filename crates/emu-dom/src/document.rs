//! Document - High-level document API

use crate::{DomTree, NodeId, Provenance};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html", Provenance::Parser);
        let head = tree.create_element("head", Provenance::Parser);
        let body = tree.create_element("body", Provenance::Parser);

        // Fresh detached nodes under a container cannot fail to insert
        let root = tree.root();
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self.find_child(root, "html").unwrap_or(NodeId::NONE);
        if self.html_element.is_valid() {
            self.head_element = self.find_child(self.html_element, "head").unwrap_or(NodeId::NONE);
            self.body_element = self.find_child(self.html_element, "body").unwrap_or(NodeId::NONE);
        }
    }

    fn find_child(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.tree.children(parent).find(|&id| {
            self.tree
                .get(id)
                .and_then(|n| n.as_element())
                .is_some_and(|e| e.tag == tag)
        })
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        match self.find_child(self.head_element, "title") {
            Some(title) => self.tree.text_content(title).trim().to_string(),
            None => String::new(),
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option().filter(|&id| self.tree.is_alive(id))
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option().filter(|&id| self.tree.is_alive(id))
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option().filter(|&id| self.tree.is_alive(id))
    }

    /// Get element by ID (first match in tree order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root()).into_iter().find(|&node| {
            self.tree
                .get(node)
                .and_then(|n| n.as_element())
                .is_some_and(|e| e.id() == Some(id))
        })
    }

    /// Elements with the given tag in tree order
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&node| {
                self.tree
                    .get(node)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.tag == tag)
            })
            .collect()
    }

    /// `document.createElement`: a detached, script-created element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag, Provenance::Script)
    }

    /// `document.createTextNode`
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.tree.create_text(text)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.url.capacity()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_skeleton() {
        let doc = Document::new("https://example.com/");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree.parent(html), Some(doc.tree.root()));
        assert_eq!(doc.tree.parent(doc.head().unwrap()), Some(html));
        assert_eq!(doc.tree.parent(doc.body().unwrap()), Some(html));
        assert_eq!(doc.url(), "https://example.com/");
    }

    #[test]
    fn test_finalize_and_title() {
        let mut doc = Document::empty("about:blank");
        let root = doc.tree.root();
        let html = doc.tree.create_element("html", Provenance::Parser);
        let head = doc.tree.create_element("head", Provenance::Parser);
        let title = doc.tree.create_element("title", Provenance::Parser);
        let text = doc.tree.create_text(" Ruby ");
        doc.tree.append_child(root, html).unwrap();
        doc.tree.append_child(html, head).unwrap();
        doc.tree.append_child(head, title).unwrap();
        doc.tree.append_child(title, text).unwrap();

        assert!(doc.head().is_none());
        doc.finalize();
        assert_eq!(doc.head(), Some(head));
        assert!(doc.body().is_none());
        assert_eq!(doc.title(), "Ruby");
    }

    #[test]
    fn test_script_created_element() {
        let mut doc = Document::default();
        let rtc = doc.create_element("RTC");
        let node = doc.tree.get(rtc).unwrap();
        assert!(node.as_element().unwrap().created_by_script());
        assert_eq!(doc.tree.parent(rtc), None);
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.tree.get_mut(div).unwrap().as_element_mut().unwrap().set_attr("id", "main");
        doc.tree.append_child(body, div).unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(doc.get_elements_by_tag_name("DIV"), vec![div]);
    }
}
