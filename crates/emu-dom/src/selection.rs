//! Selection state machine
//!
//! A selection owns zero or more ranges in insertion order and a derived
//! type: `None`, `Caret` or `Range`. Only the explicit transitions below
//! change the type; removal never promotes a selection to `Caret`.
//!
//! "First" and "last" range are found by scanning a snapshot of the ranges
//! with document-position comparison of their start containers. Ranges whose
//! containers are incomparable never displace the current candidate.

use crate::{DomException, DomTree, NodeId, SelectionRange};

/// Selection type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    #[default]
    None,
    Caret,
    Range,
}

impl SelectionType {
    /// Script-visible `Selection.type` value
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionType::None => "None",
            SelectionType::Caret => "Caret",
            SelectionType::Range => "Range",
        }
    }
}

/// The current selection of a document
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Ranges in insertion order
    ranges: Vec<SelectionRange>,
    selection_type: SelectionType,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    // --- Getters ---

    /// Get the selection type
    pub fn selection_type(&self) -> SelectionType {
        self.selection_type
    }

    /// Get the number of ranges
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Ranges in insertion order
    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// `getRangeAt`: fails with IndexSizeError outside `[0, rangeCount)`
    pub fn range_at(&self, index: i64) -> Result<&SelectionRange, DomException> {
        if index < 0 || index as usize >= self.ranges.len() {
            return Err(DomException::IndexSize(format!("Invalid range index: {}", index)));
        }
        Ok(&self.ranges[index as usize])
    }

    /// Empty, or exactly one collapsed range
    pub fn is_collapsed(&self) -> bool {
        self.ranges.is_empty() || (self.ranges.len() == 1 && self.ranges[0].is_collapsed())
    }

    /// Anchor: start of the last range by document position
    pub fn anchor(&self, tree: &DomTree) -> Option<(NodeId, u32)> {
        self.last_range(tree).map(|r| (r.start_container(), r.start_offset()))
    }

    /// Focus: end of the last range by document position
    pub fn focus(&self, tree: &DomTree) -> Option<(NodeId, u32)> {
        self.last_range(tree).map(|r| (r.end_container(), r.end_offset()))
    }

    /// First range by document position of its start container
    pub fn first_range(&self, tree: &DomTree) -> Option<SelectionRange> {
        self.first_index(tree).map(|i| self.ranges[i])
    }

    /// Last range by document position of its start container
    pub fn last_range(&self, tree: &DomTree) -> Option<SelectionRange> {
        self.last_index(tree).map(|i| self.ranges[i])
    }

    fn first_index(&self, tree: &DomTree) -> Option<usize> {
        let snapshot = self.ranges.clone();
        let mut first: Option<usize> = None;
        for (i, range) in snapshot.iter().enumerate() {
            match first {
                None => first = Some(i),
                Some(f) => {
                    let position = tree
                        .compare_document_position(snapshot[f].start_container(), range.start_container());
                    if position.is_preceding() {
                        first = Some(i);
                    }
                }
            }
        }
        first
    }

    fn last_index(&self, tree: &DomTree) -> Option<usize> {
        let snapshot = self.ranges.clone();
        let mut last: Option<usize> = None;
        for (i, range) in snapshot.iter().enumerate() {
            match last {
                None => last = Some(i),
                Some(l) => {
                    let position = tree
                        .compare_document_position(snapshot[l].start_container(), range.start_container());
                    if position.is_following() {
                        last = Some(i);
                    }
                }
            }
        }
        last
    }

    // --- Transitions ---

    /// Append a range; no merging with existing ranges
    pub fn add_range(&mut self, range: SelectionRange) {
        self.ranges.push(range);
        self.selection_type = match self.selection_type {
            SelectionType::None | SelectionType::Caret if range.is_collapsed() => SelectionType::Caret,
            _ => SelectionType::Range,
        };
    }

    /// Remove the first range equal to `range`; returns whether one was removed
    pub fn remove_range(&mut self, range: &SelectionRange) -> bool {
        let removed = match self.ranges.iter().position(|r| r == range) {
            Some(index) => {
                self.ranges.remove(index);
                true
            }
            None => false,
        };
        if self.ranges.is_empty() {
            self.selection_type = SelectionType::None;
        }
        removed
    }

    /// Remove all ranges
    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
        self.selection_type = SelectionType::None;
    }

    /// Alias of [`Selection::remove_all_ranges`]
    pub fn empty(&mut self) {
        self.remove_all_ranges();
    }

    /// Replace everything with one collapsed range; always a caret
    pub fn collapse(&mut self, node: NodeId, offset: u32) {
        self.ranges.clear();
        self.ranges.push(SelectionRange::collapsed_at(node, offset));
        self.selection_type = SelectionType::Caret;
    }

    /// Keep only the first range, collapsed to its start. No-op when empty.
    pub fn collapse_to_start(&mut self, tree: &DomTree) {
        if let Some(mut first) = self.first_range(tree) {
            first.collapse(true);
            self.ranges.clear();
            self.ranges.push(first);
            self.selection_type = SelectionType::Caret;
        }
    }

    /// Keep only the last range, collapsed to its end. No-op when empty.
    pub fn collapse_to_end(&mut self, tree: &DomTree) {
        if let Some(mut last) = self.last_range(tree) {
            last.collapse(false);
            self.ranges.clear();
            self.ranges.push(last);
            self.selection_type = SelectionType::Caret;
        }
    }

    /// Move the end of the last range. No-op when empty.
    pub fn extend(&mut self, tree: &DomTree, node: NodeId, offset: u32) {
        if let Some(index) = self.last_index(tree) {
            self.ranges[index].set_end(node, offset);
            self.selection_type = SelectionType::Range;
        }
    }

    /// Replace everything with one range spanning the contents of `node`
    pub fn select_all_children(&mut self, tree: &DomTree, node: NodeId) {
        let range = SelectionRange::contents_of(tree, node);
        self.ranges.clear();
        self.ranges.push(range);
        self.selection_type = if range.is_collapsed() {
            SelectionType::Caret
        } else {
            SelectionType::Range
        };
    }

    // --- Content ---

    /// Selected text: every range's text in insertion order
    pub fn to_string(&self, tree: &DomTree) -> String {
        self.ranges.iter().map(|r| r.to_string(tree)).collect()
    }

    // --- Live range maintenance ---

    /// Reconcile ranges with a child inserted into `parent` at `index`
    pub fn child_inserted(&mut self, parent: NodeId, index: u32) {
        for range in &mut self.ranges {
            range.child_inserted(parent, index);
        }
    }

    /// Reconcile ranges with `child` about to be removed from `parent`
    pub fn child_removing(&mut self, tree: &DomTree, parent: NodeId, index: u32, child: NodeId) {
        for range in &mut self.ranges {
            range.child_removing(tree, parent, index, child);
        }
    }

    /// Reconcile ranges with the data of `node` being replaced
    pub fn data_replaced(&mut self, node: NodeId) {
        for range in &mut self.ranges {
            range.data_replaced(node);
        }
    }
}
