//! Emu DOM - Document Object Model
//!
//! Arena DOM tree, document-position comparison, ranges and the
//! selection state machine.

mod node;
mod tree;
mod document;
mod position;
mod range;
mod selection;
mod exception;

pub use node::{Attribute, ElementData, Node, NodeData, NodeType, Provenance};
pub use tree::{Children, DomTree};
pub use document::Document;
pub use position::DocumentPosition;
pub use range::{BoundaryPoint, SelectionRange};
pub use selection::{Selection, SelectionType};
pub use exception::DomException;

/// Node identifier (index into arena)
///
/// Ids are never reused, so an id names one node for the lifetime of the
/// document even after that node is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Invalid/null node ID
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// `Some(self)` unless this is [`NodeId::NONE`]
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}
