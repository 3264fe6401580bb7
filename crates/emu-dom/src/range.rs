//! Ranges
//!
//! A range is a pair of boundary points over the tree. Ranges are plain
//! values: two ranges with the same boundary points are equal, which is the
//! identity `Selection::remove_range` uses.

use std::cmp::Ordering;

use crate::{DomException, DomTree, NodeId};

/// Range boundary point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    /// The container node
    pub node: NodeId,
    /// Offset within the container (UTF-16 offset for character data, child index otherwise)
    pub offset: u32,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: u32) -> Self {
        Self { node, offset }
    }

    /// Tree-order comparison of two boundary points.
    ///
    /// Returns `None` when the containers are in different trees.
    pub fn compare(&self, tree: &DomTree, other: &BoundaryPoint) -> Option<Ordering> {
        if self.node == other.node {
            return Some(self.offset.cmp(&other.offset));
        }
        let position = tree.compare_document_position(self.node, other.node);
        if position.is_disconnected() {
            return None;
        }
        if position.is_following() {
            // other's container is after ours; unless it lives inside us past our offset
            if tree.is_inclusive_ancestor(self.node, other.node) {
                let child = child_toward(tree, self.node, other.node)?;
                let index = tree.index_of(child)?;
                if index < self.offset {
                    return Some(Ordering::Greater);
                }
            }
            Some(Ordering::Less)
        } else {
            other.compare(tree, self).map(Ordering::reverse)
        }
    }
}

/// Child of `ancestor` on the path down to `descendant`
fn child_toward(tree: &DomTree, ancestor: NodeId, descendant: NodeId) -> Option<NodeId> {
    let mut current = descendant;
    loop {
        let parent = tree.parent(current)?;
        if parent == ancestor {
            return Some(current);
        }
        current = parent;
    }
}

/// A contiguous part of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl SelectionRange {
    /// Collapsed range at the given position
    pub fn collapsed_at(node: NodeId, offset: u32) -> Self {
        let point = BoundaryPoint::new(node, offset);
        Self { start: point, end: point }
    }

    /// Range between two points
    pub fn new(start_container: NodeId, start_offset: u32, end_container: NodeId, end_offset: u32) -> Self {
        Self {
            start: BoundaryPoint::new(start_container, start_offset),
            end: BoundaryPoint::new(end_container, end_offset),
        }
    }

    /// Range spanning all contents of `node`
    pub fn contents_of(tree: &DomTree, node: NodeId) -> Self {
        Self::new(node, 0, node, tree.node_length(node))
    }

    // --- Getters ---

    pub fn start(&self) -> BoundaryPoint {
        self.start
    }

    pub fn end(&self) -> BoundaryPoint {
        self.end
    }

    pub fn start_container(&self) -> NodeId {
        self.start.node
    }

    pub fn start_offset(&self) -> u32 {
        self.start.offset
    }

    pub fn end_container(&self) -> NodeId {
        self.end.node
    }

    pub fn end_offset(&self) -> u32 {
        self.end.offset
    }

    /// Start and end are the same point
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary points
    pub fn common_ancestor_container(&self, tree: &DomTree) -> Option<NodeId> {
        tree.common_ancestor(self.start.node, self.end.node)
    }

    // --- Setters ---

    /// Set the start position without validation
    pub fn set_start(&mut self, node: NodeId, offset: u32) {
        self.start = BoundaryPoint::new(node, offset);
    }

    /// Set the end position without validation
    pub fn set_end(&mut self, node: NodeId, offset: u32) {
        self.end = BoundaryPoint::new(node, offset);
    }

    /// `Range.setStart`: validates the offset and keeps start <= end
    pub fn set_start_checked(&mut self, tree: &DomTree, node: NodeId, offset: u32) -> Result<(), DomException> {
        let point = checked_point(tree, node, offset)?;
        self.start = point;
        if point.compare(tree, &self.end) != Some(Ordering::Less) && point != self.end {
            self.end = point;
        }
        Ok(())
    }

    /// `Range.setEnd`: validates the offset and keeps start <= end
    pub fn set_end_checked(&mut self, tree: &DomTree, node: NodeId, offset: u32) -> Result<(), DomException> {
        let point = checked_point(tree, node, offset)?;
        self.end = point;
        if point.compare(tree, &self.start) != Some(Ordering::Greater) && point != self.start {
            self.start = point;
        }
        Ok(())
    }

    /// Collapse the range to one of its boundaries
    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    // --- Live range maintenance ---

    /// A child was inserted into `parent` at `index`
    pub fn child_inserted(&mut self, parent: NodeId, index: u32) {
        for point in [&mut self.start, &mut self.end] {
            if point.node == parent && point.offset > index {
                point.offset += 1;
            }
        }
    }

    /// `child` (at `index` in `parent`) is about to be removed
    pub fn child_removing(&mut self, tree: &DomTree, parent: NodeId, index: u32, child: NodeId) {
        for point in [&mut self.start, &mut self.end] {
            if tree.is_inclusive_ancestor(child, point.node) {
                *point = BoundaryPoint::new(parent, index);
            } else if point.node == parent && point.offset > index {
                point.offset -= 1;
            }
        }
    }

    /// All data of a character-data node was replaced
    pub fn data_replaced(&mut self, node: NodeId) {
        for point in [&mut self.start, &mut self.end] {
            if point.node == node {
                point.offset = 0;
            }
        }
    }

    // --- Content ---

    /// `Range.toString()`: the text covered by the range
    pub fn to_string(&self, tree: &DomTree) -> String {
        let (start, end) = (self.start, self.end);
        if start.node == end.node {
            return match tree.get(start.node).and_then(|n| n.as_text()) {
                Some(text) => utf16_slice(text, start.offset, Some(end.offset)),
                None => self.contained_text(tree),
            };
        }

        let mut out = String::new();
        if let Some(text) = tree.get(start.node).and_then(|n| n.as_text()) {
            out.push_str(&utf16_slice(text, start.offset, None));
        }
        out.push_str(&self.contained_text(tree));
        if let Some(text) = tree.get(end.node).and_then(|n| n.as_text()) {
            out.push_str(&utf16_slice(text, 0, Some(end.offset)));
        }
        out
    }

    /// Text of text nodes entirely inside the range, in tree order
    fn contained_text(&self, tree: &DomTree) -> String {
        let Some(root) = tree.inclusive_ancestors(self.start.node).last().copied() else {
            return String::new();
        };
        let mut out = String::new();
        for node in tree.descendants(root) {
            if node == self.start.node || node == self.end.node {
                continue;
            }
            let Some(text) = tree.get(node).and_then(|n| n.as_text()) else {
                continue;
            };
            let head = BoundaryPoint::new(node, 0);
            let tail = BoundaryPoint::new(node, tree.node_length(node));
            let after_start = matches!(
                head.compare(tree, &self.start),
                Some(Ordering::Greater | Ordering::Equal)
            );
            let before_end = matches!(
                tail.compare(tree, &self.end),
                Some(Ordering::Less | Ordering::Equal)
            );
            if after_start && before_end {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for SelectionRange {
    fn default() -> Self {
        Self::collapsed_at(NodeId::ROOT, 0)
    }
}

fn checked_point(tree: &DomTree, node: NodeId, offset: u32) -> Result<BoundaryPoint, DomException> {
    let Some(n) = tree.get(node) else {
        return Err(DomException::InvalidState("Boundary node does not exist".to_string()));
    };
    if matches!(n.data, crate::NodeData::Doctype { .. }) {
        return Err(DomException::InvalidState("Boundary node is a doctype".to_string()));
    }
    if offset > tree.node_length(node) {
        return Err(DomException::IndexSize(format!(
            "The offset {} is larger than the node's length ({})",
            offset,
            tree.node_length(node)
        )));
    }
    Ok(BoundaryPoint::new(node, offset))
}

/// Slice a string by UTF-16 code unit offsets
fn utf16_slice(text: &str, from: u32, to: Option<u32>) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let len = units.len();
    let from = (from as usize).min(len);
    let to = to.map(|t| (t as usize).min(len)).unwrap_or(len);
    if from >= to {
        return String::new();
    }
    String::from_utf16_lossy(&units[from..to])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provenance;

    fn paragraph() -> (DomTree, NodeId, NodeId, NodeId) {
        // <p>Hello <b>bold</b> world</p>
        let mut tree = DomTree::new();
        let p = tree.create_element("p", Provenance::Parser);
        let t1 = tree.create_text("Hello ");
        let b = tree.create_element("b", Provenance::Parser);
        let t2 = tree.create_text("bold");
        let t3 = tree.create_text(" world");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();
        tree.append_child(p, t3).unwrap();
        (tree, p, t1, t3)
    }

    #[test]
    fn test_range_creation() {
        let range = SelectionRange::collapsed_at(NodeId(1), 5);

        assert_eq!(range.start_container(), NodeId(1));
        assert_eq!(range.start_offset(), 5);
        assert_eq!(range.end_container(), NodeId(1));
        assert_eq!(range.end_offset(), 5);
        assert!(range.is_collapsed());
    }

    #[test]
    fn test_range_collapse() {
        let mut range = SelectionRange::new(NodeId(1), 0, NodeId(1), 10);

        range.collapse(true);
        assert!(range.is_collapsed());
        assert_eq!(range.end_offset(), 0);

        let mut range2 = SelectionRange::new(NodeId(1), 0, NodeId(1), 10);
        range2.collapse(false);
        assert!(range2.is_collapsed());
        assert_eq!(range2.start_offset(), 10);
    }

    #[test]
    fn test_value_equality() {
        let a = SelectionRange::new(NodeId(1), 0, NodeId(2), 3);
        let b = SelectionRange::new(NodeId(1), 0, NodeId(2), 3);
        assert_eq!(a, b);
        assert_ne!(a, SelectionRange::collapsed_at(NodeId(1), 0));
    }

    #[test]
    fn test_to_string_across_nodes() {
        let (tree, _, t1, t3) = paragraph();
        let range = SelectionRange::new(t1, 2, t3, 3);
        assert_eq!(range.to_string(&tree), "llo bold wo");
    }

    #[test]
    fn test_to_string_contents() {
        let (tree, p, _, _) = paragraph();
        let range = SelectionRange::contents_of(&tree, p);
        assert_eq!(range.to_string(&tree), "Hello bold world");
    }

    #[test]
    fn test_boundary_compare_parent_offset() {
        let (tree, p, t1, t3) = paragraph();
        // (p, 1) sits between t1 and <b>
        let mid = BoundaryPoint::new(p, 1);
        assert_eq!(BoundaryPoint::new(t1, 3).compare(&tree, &mid), Some(Ordering::Less));
        assert_eq!(BoundaryPoint::new(t3, 0).compare(&tree, &mid), Some(Ordering::Greater));
    }

    #[test]
    fn test_set_end_checked() {
        let (tree, _, t1, _) = paragraph();
        let mut range = SelectionRange::collapsed_at(t1, 0);
        assert!(matches!(
            range.set_end_checked(&tree, t1, 99),
            Err(DomException::IndexSize(_))
        ));
        range.set_end_checked(&tree, t1, 4).unwrap();
        assert_eq!(range.to_string(&tree), "Hell");

        // moving start past end collapses
        range.set_start_checked(&tree, t1, 5).unwrap();
        assert!(range.is_collapsed());
        assert_eq!(range.end_offset(), 5);
    }

    #[test]
    fn test_child_removing_moves_points() {
        let (tree, p, _, t3) = paragraph();
        let b = tree.child_at(p, 1).unwrap();
        let inner = tree.first_child(b).unwrap();
        let mut range = SelectionRange::new(inner, 1, t3, 2);
        range.child_removing(&tree, p, 1, b);
        assert_eq!(range.start(), BoundaryPoint::new(p, 1));
        assert_eq!(range.end(), BoundaryPoint::new(t3, 2));
    }
}
