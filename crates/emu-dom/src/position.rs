//! Document position comparison results

use bitflags::bitflags;

bitflags! {
    /// Result of `compareDocumentPosition`, describing the *other* node
    /// relative to the reference node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DocumentPosition: u16 {
        const DISCONNECTED = 0x01;
        const PRECEDING = 0x02;
        const FOLLOWING = 0x04;
        const CONTAINS = 0x08;
        const CONTAINED_BY = 0x10;
        const IMPLEMENTATION_SPECIFIC = 0x20;
    }
}

impl DocumentPosition {
    /// Other node comes before the reference node
    #[inline]
    pub fn is_preceding(self) -> bool {
        self.contains(Self::PRECEDING)
    }

    /// Other node comes after the reference node
    #[inline]
    pub fn is_following(self) -> bool {
        self.contains(Self::FOLLOWING)
    }

    /// Nodes live in different trees; no order is established
    #[inline]
    pub fn is_disconnected(self) -> bool {
        self.contains(Self::DISCONNECTED)
    }

    /// Same node
    #[inline]
    pub fn is_same(self) -> bool {
        self.is_empty()
    }
}
