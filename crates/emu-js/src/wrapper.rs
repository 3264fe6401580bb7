//! Wrapper/native binding
//!
//! Every native entity script can see is named by a [`NativeRef`]. The
//! [`WrapperCache`] hands out one [`WrapperId`] per live native entity, built
//! lazily on first request, and maps ids back to their native entity.
//!
//! Wrappers of script-owned entities (ranges and events) can be released
//! once script drops them; every other wrapper lives as long as the realm.

use std::collections::HashMap;

use emu_css::RuleId;
use emu_dom::NodeId;

use crate::JsValue;

/// Script wrapper identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WrapperId(pub(crate) u32);

impl WrapperId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Script-owned Range in the realm's range store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeId(pub(crate) u32);

/// Style sheet index in the realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub(crate) u32);

/// Event object in the realm's event store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub(crate) u32);

/// Identity of a native entity reachable from script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeRef {
    Window,
    Navigator,
    Selection,
    /// Any tree node; the document is `Node(NodeId::ROOT)`
    Node(NodeId),
    Range(RangeId),
    StyleSheetList,
    StyleSheet(SheetId),
    /// Top-level rules when the rule is `None`
    CssRuleList(SheetId, Option<RuleId>),
    CssRule(SheetId, RuleId),
    /// Sheet media when the rule is `None`
    MediaList(SheetId, Option<RuleId>),
    ComputedStyle(NodeId),
    MimeTypeArray,
    MimeType(u32),
    PluginArray,
    Plugin(u32),
    Event(EventId),
    PeriodicSyncManager,
}

impl NativeRef {
    /// Node this entity is bound to, if any
    pub fn node(self) -> Option<NodeId> {
        match self {
            NativeRef::Node(id) | NativeRef::ComputedStyle(id) => Some(id),
            _ => None,
        }
    }

    /// Entity that exists only while script holds its wrapper
    pub fn is_script_owned(self) -> bool {
        matches!(self, NativeRef::Range(_) | NativeRef::Event(_))
    }
}

#[derive(Debug)]
struct WrapperEntry {
    native: NativeRef,
    class: &'static str,
    expandos: Vec<(String, JsValue)>,
}

/// Native entity to wrapper map
#[derive(Debug, Default)]
pub struct WrapperCache {
    entries: HashMap<WrapperId, WrapperEntry>,
    live: HashMap<NativeRef, WrapperId>,
    /// Ids are never reused
    next: u32,
}

impl WrapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrapper for `native`, built on first request
    ///
    /// `class_of` runs only when a new wrapper is built.
    pub fn wrapper_for(&mut self, native: NativeRef, class_of: impl FnOnce() -> &'static str) -> WrapperId {
        if let Some(&id) = self.live.get(&native) {
            return id;
        }

        let id = WrapperId(self.next);
        self.next += 1;
        let class = class_of();
        self.entries.insert(
            id,
            WrapperEntry {
                native,
                class,
                expandos: Vec::new(),
            },
        );
        self.live.insert(native, id);
        tracing::debug!(wrapper = id.0, class, "Created wrapper for {:?}", native);
        id
    }

    /// Wrapper currently bound to `native`, without building one
    pub fn get(&self, native: NativeRef) -> Option<WrapperId> {
        self.live.get(&native).copied()
    }

    /// Native entity behind a wrapper
    pub fn native_for(&self, id: WrapperId) -> Option<NativeRef> {
        self.entries.get(&id).map(|e| e.native)
    }

    /// Class the wrapper was built as
    pub fn class_of(&self, id: WrapperId) -> Option<&'static str> {
        self.entries.get(&id).map(|e| e.class)
    }

    /// Drop the binding for `native`; the next request builds a fresh wrapper
    pub fn invalidate(&mut self, native: NativeRef) -> Option<WrapperId> {
        let removed = self.live.remove(&native);
        if let Some(id) = removed {
            tracing::debug!(wrapper = id.0, "Invalidated wrapper for {:?}", native);
        }
        removed
    }

    /// Forget a wrapper script can no longer reach
    ///
    /// Returns the entity it was bound to.
    pub fn release(&mut self, id: WrapperId) -> Option<NativeRef> {
        let entry = self.entries.remove(&id)?;
        if self.live.get(&entry.native) == Some(&id) {
            self.live.remove(&entry.native);
        }
        tracing::trace!(wrapper = id.0, "Released wrapper for {:?}", entry.native);
        Some(entry.native)
    }

    /// Whether the wrapper is still the one bound to its native entity
    pub fn is_live(&self, id: WrapperId) -> bool {
        self.native_for(id)
            .is_some_and(|native| self.live.get(&native) == Some(&id))
    }

    pub fn expando(&self, id: WrapperId, name: &str) -> Option<&JsValue> {
        self.entries
            .get(&id)?
            .expandos
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn set_expando(&mut self, id: WrapperId, name: &str, value: JsValue) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        match entry.expandos.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => entry.expandos.push((name.to_string(), value)),
        }
    }

    /// Wrappers held, including stale ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_identity() {
        let mut cache = WrapperCache::new();
        let a = cache.wrapper_for(NativeRef::Selection, || "Selection");
        let b = cache.wrapper_for(NativeRef::Selection, || unreachable!());
        assert_eq!(a, b);
        assert_eq!(cache.native_for(a), Some(NativeRef::Selection));
        assert_eq!(cache.class_of(a), Some("Selection"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_builds_fresh_wrapper() {
        let mut cache = WrapperCache::new();
        let node = NativeRef::Node(NodeId::ROOT);
        let first = cache.wrapper_for(node, || "Document");
        assert_eq!(cache.invalidate(node), Some(first));
        assert!(!cache.is_live(first));

        let second = cache.wrapper_for(node, || "Document");
        assert_ne!(first, second);
        assert!(cache.is_live(second));
        // The stale wrapper still names its entity
        assert_eq!(cache.native_for(first), Some(node));
    }

    #[test]
    fn test_expandos() {
        let mut cache = WrapperCache::new();
        let id = cache.wrapper_for(NativeRef::Window, || "Window");
        assert_eq!(cache.expando(id, "answer"), None);
        cache.set_expando(id, "answer", JsValue::Number(42.0));
        cache.set_expando(id, "answer", JsValue::Number(43.0));
        assert_eq!(cache.expando(id, "answer"), Some(&JsValue::Number(43.0)));
    }

    #[test]
    fn test_release_frees_entry() {
        let mut cache = WrapperCache::new();
        let window = cache.wrapper_for(NativeRef::Window, || "Window");
        let range = NativeRef::Range(RangeId(0));
        let id = cache.wrapper_for(range, || "Range");
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.release(id), Some(range));
        assert_eq!(cache.release(id), None);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(range).is_none());
        assert_eq!(cache.class_of(id), None);

        // Fresh ids are never handed out twice
        let next = cache.wrapper_for(NativeRef::Selection, || "Selection");
        assert!(next != id && next != window);
    }
}
