//! DOM Tree (arena-based allocation)
//!
//! Slots are never reused: destroying a node leaves a tombstone so that a
//! stale [`NodeId`] can never alias a newer node.

use crate::{DocumentPosition, DomException, ElementData, Node, NodeData, NodeId, Provenance};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
    live: usize,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        let mut tree = Self { nodes: Vec::new(), live: 0 };
        tree.push(Node::new(NodeData::Document));
        tree
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.live += 1;
        id
    }

    /// Get a live node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    /// Get a mutable live node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }

    /// Whether `id` names a node that has not been destroyed
    #[inline]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // --- Creation ---

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str, provenance: Provenance) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(tag, provenance))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(text.to_string())))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype { name: name.to_string() }))
    }

    // --- Navigation ---

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Iterate the children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    pub fn child_count(&self, id: NodeId) -> u32 {
        self.children(id).count() as u32
    }

    pub fn child_at(&self, id: NodeId, index: u32) -> Option<NodeId> {
        self.children(id).nth(index as usize)
    }

    /// Index of a node within its parent's children
    pub fn index_of(&self, id: NodeId) -> Option<u32> {
        let parent = self.parent(id)?;
        self.children(parent).position(|c| c == id).map(|i| i as u32)
    }

    /// Ancestors from the node itself up to its root (inclusive)
    pub fn inclusive_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = id.to_option().filter(|n| self.is_alive(*n));
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node.to_option();
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Subtree of `id` in tree order (including `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<NodeId> = self.children(node).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Whether the node is connected to the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.inclusive_ancestors(id).last() == Some(&NodeId::ROOT)
    }

    // --- Mutation ---

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomException> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomException> {
        self.validate_insertion(parent, child)?;

        let mut reference = reference;
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomException::NotFound(
                    "The node before which the new node is to be inserted is not a child of this node"
                        .to_string(),
                ));
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }

        self.detach(child);

        let prev = match reference {
            Some(r) => self.prev_sibling(r),
            None => self.last_child(parent),
        };

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev.unwrap_or(NodeId::NONE);
            node.next_sibling = reference.unwrap_or(NodeId::NONE);
        }
        match prev {
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    node.next_sibling = child;
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = child;
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(node) = self.get_mut(r) {
                    node.prev_sibling = child;
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.last_child = child;
                }
            }
        }
        Ok(())
    }

    /// Whether `child` may become a child of `parent`
    pub fn validate_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomException> {
        let parent_node = self
            .get(parent)
            .ok_or_else(|| DomException::NotFound("Parent node does not exist".to_string()))?;
        let child_node = self
            .get(child)
            .ok_or_else(|| DomException::NotFound("Node does not exist".to_string()))?;

        if !parent_node.is_container() {
            return Err(DomException::HierarchyRequest(format!(
                "{} nodes cannot have children",
                parent_node.node_name()
            )));
        }
        if matches!(child_node.data, NodeData::Document) {
            return Err(DomException::HierarchyRequest(
                "A document cannot be inserted".to_string(),
            ));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomException::HierarchyRequest(
                "The new child element contains the parent".to_string(),
            ));
        }
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomException> {
        if self.parent(child) != Some(parent) {
            return Err(DomException::NotFound(
                "The node to be removed is not a child of this node".to_string(),
            ));
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink a node from its parent, keeping its subtree intact
    pub fn detach(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else {
            return;
        };
        let parent = node.parent;
        let prev = node.prev_sibling;
        let next = node.next_sibling;
        if !parent.is_valid() {
            return;
        }

        if let Some(p) = self.get_mut(prev) {
            p.next_sibling = next;
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = next;
        }
        if let Some(n) = self.get_mut(next) {
            n.prev_sibling = prev;
        } else if let Some(par) = self.get_mut(parent) {
            par.last_child = prev;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Detach and destroy a subtree, returning the destroyed ids in tree order
    pub fn destroy(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == NodeId::ROOT {
            return Vec::new();
        }
        let doomed = self.descendants(id);
        self.detach(id);
        for node in &doomed {
            if let Some(slot) = self.nodes.get_mut(node.0 as usize) {
                if slot.take().is_some() {
                    self.live -= 1;
                }
            }
        }
        tracing::debug!("Destroyed {} nodes rooted at {:?}", doomed.len(), id);
        doomed
    }

    // --- Content ---

    /// DOM node length: UTF-16 length for character data, child count otherwise
    pub fn node_length(&self, id: NodeId) -> u32 {
        match self.get(id) {
            Some(node) => match &node.data {
                NodeData::Text(t) | NodeData::Comment(t) => t.encode_utf16().count() as u32,
                NodeData::Doctype { .. } => 0,
                _ => self.child_count(id),
            },
            None => 0,
        }
    }

    /// `textContent` (document nodes yield an empty string)
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => t.clone(),
            Some(NodeData::Element(_)) => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| self.get(n).and_then(|node| node.as_text()))
                .collect(),
            _ => String::new(),
        }
    }

    /// Replace the data of a text or comment node
    pub fn set_character_data(&mut self, id: NodeId, data: &str) -> bool {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => {
                *t = data.to_string();
                true
            }
            _ => false,
        }
    }

    // --- Ordering ---

    /// `reference.compareDocumentPosition(other)`
    ///
    /// Nodes in different trees are reported as DISCONNECTED without a
    /// direction bit.
    pub fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if reference == other {
            return DocumentPosition::empty();
        }
        let ref_chain = self.inclusive_ancestors(reference);
        let other_chain = self.inclusive_ancestors(other);
        if ref_chain.is_empty() || other_chain.is_empty() || ref_chain.last() != other_chain.last() {
            return DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC;
        }
        if other_chain.contains(&reference) {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }
        if ref_chain.contains(&other) {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }

        // Walk both chains from the root to the first divergence
        let mut ref_iter = ref_chain.iter().rev();
        let mut other_iter = other_chain.iter().rev();
        loop {
            match (ref_iter.next(), other_iter.next()) {
                (Some(a), Some(b)) if a == b => continue,
                (Some(a), Some(b)) => {
                    let mut sibling = self.next_sibling(*a);
                    while let Some(s) = sibling {
                        if s == *b {
                            return DocumentPosition::FOLLOWING;
                        }
                        sibling = self.next_sibling(s);
                    }
                    return DocumentPosition::PRECEDING;
                }
                _ => return DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC,
            }
        }
    }

    /// Deepest node that is an inclusive ancestor of both
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let b_chain = self.inclusive_ancestors(b);
        self.inclusive_ancestors(a)
            .into_iter()
            .find(|n| b_chain.contains(n))
    }

    /// Memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Option<Node>>()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div", Provenance::Parser);
        let a = tree.create_text("hello");
        let b = tree.create_element("span", Provenance::Parser);
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        (tree, div, a, b)
    }

    #[test]
    fn test_append_and_navigate() {
        let (tree, div, a, b) = sample();
        assert_eq!(tree.parent(a), Some(div));
        assert_eq!(tree.first_child(div), Some(a));
        assert_eq!(tree.last_child(div), Some(b));
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.child_count(div), 2);
        assert_eq!(tree.index_of(b), Some(1));
    }

    #[test]
    fn test_insert_before_moves_node() {
        let (mut tree, div, a, b) = sample();
        tree.insert_before(div, b, Some(a)).unwrap();
        let order: Vec<NodeId> = tree.children(div).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(tree.first_child(div), Some(b));
        assert_eq!(tree.last_child(div), Some(a));
    }

    #[test]
    fn test_hierarchy_errors() {
        let (mut tree, div, a, _) = sample();
        assert!(matches!(
            tree.append_child(a, div),
            Err(DomException::HierarchyRequest(_))
        ));
        let root = tree.root();
        assert!(matches!(
            tree.append_child(div, root),
            Err(DomException::HierarchyRequest(_))
        ));
    }

    #[test]
    fn test_remove_child_not_found() {
        let (mut tree, _, a, b) = sample();
        let other = tree.create_element("p", Provenance::Script);
        assert!(matches!(tree.remove_child(other, a), Err(DomException::NotFound(_))));
        tree.remove_child(tree.parent(b).unwrap(), b).unwrap();
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_document_position() {
        let (tree, div, a, b) = sample();
        assert!(tree.compare_document_position(a, b).is_following());
        assert!(tree.compare_document_position(b, a).is_preceding());
        let pos = tree.compare_document_position(div, a);
        assert!(pos.contains(DocumentPosition::CONTAINED_BY));
        assert!(pos.is_following());
        assert!(tree.compare_document_position(a, a).is_same());
    }

    #[test]
    fn test_disconnected_has_no_direction() {
        let (mut tree, _, a, _) = sample();
        let loose = tree.create_element("p", Provenance::Script);
        let pos = tree.compare_document_position(a, loose);
        assert!(pos.is_disconnected());
        assert!(!pos.is_preceding());
        assert!(!pos.is_following());
    }

    #[test]
    fn test_destroy_tombstones() {
        let (mut tree, div, a, b) = sample();
        let before = tree.len();
        let destroyed = tree.destroy(div);
        assert_eq!(destroyed, vec![div, a, b]);
        assert_eq!(tree.len(), before - 3);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.first_child(tree.root()), None);

        // ids are not reused
        let fresh = tree.create_text("x");
        assert!(fresh.index() > b.index());
    }

    #[test]
    fn test_node_length_utf16() {
        let mut tree = DomTree::new();
        let t = tree.create_text("a\u{1F600}");
        assert_eq!(tree.node_length(t), 3);
    }

    #[test]
    fn test_text_content() {
        let (tree, div, _, b) = sample();
        assert_eq!(tree.text_content(div), "hello");
        assert_eq!(tree.text_content(b), "");
    }
}
