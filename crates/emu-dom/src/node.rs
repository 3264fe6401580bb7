//! DOM Node
//!
//! Links are stored as [`NodeId`]s with [`NodeId::NONE`] as the null link,
//! which keeps a node free of pointers and trivially movable in the arena.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// DOM `nodeType`
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    /// DOM `nodeName`
    pub fn node_name(&self) -> String {
        match &self.data {
            NodeData::Document => "#document".to_string(),
            NodeData::Doctype { name } => name.clone(),
            NodeData::Element(e) => e.tag.to_ascii_uppercase(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Text or comment
    #[inline]
    pub fn is_character_data(&self) -> bool {
        matches!(self.data, NodeData::Text(_) | NodeData::Comment(_))
    }

    /// Whether this node may have children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Character data of a text or comment node
    pub fn character_data(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// DOM node type constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
}

/// Who created an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    /// Built by the markup parser
    #[default]
    Parser,
    /// Built by `document.createElement`
    Script,
}

/// Element attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase local name
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub provenance: Provenance,
}

impl ElementData {
    pub fn new(tag: &str, provenance: Provenance) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            provenance,
        }
    }

    #[inline]
    pub fn created_by_script(&self) -> bool {
        self.provenance == Provenance::Script
    }

    /// Get an attribute value (names are case-insensitive)
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning whether it existed
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }

    /// Cached id attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_case_insensitive() {
        let mut elem = ElementData::new("META", Provenance::Parser);
        elem.set_attr("HTTP-EQUIV", "refresh");

        assert_eq!(elem.tag, "meta");
        assert_eq!(elem.get_attr("http-equiv"), Some("refresh"));
        assert!(elem.remove_attr("Http-Equiv"));
        assert!(!elem.has_attr("http-equiv"));
    }

    #[test]
    fn test_node_names() {
        let node = Node::new(NodeData::Element(ElementData::new("rtc", Provenance::Script)));
        assert_eq!(node.node_name(), "RTC");
        assert_eq!(node.node_type(), NodeType::Element);
        assert!(node.as_element().unwrap().created_by_script());

        let text = Node::new(NodeData::Text("hi".to_string()));
        assert_eq!(text.node_name(), "#text");
        assert_eq!(text.node_type() as u16, 3);
    }
}
