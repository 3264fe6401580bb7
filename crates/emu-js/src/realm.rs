//! Page realm
//!
//! The realm owns everything a page's scripts can reach: the document, the
//! selection, the wrapper cache, style sheets and navigator data. It is the
//! dispatch surface every script-visible member goes through: lookups are
//! gated on the capability registry for the session's browser version, and
//! members missing for that version behave as if they never existed.

use std::collections::HashMap;
use std::sync::Arc;

use emu_css::{MediaList, RuleKind, StyleSheet};
use emu_dom::{Document, NodeData, NodeId, Selection, SelectionRange};
use emu_version::{BrowserProfile, BrowserVersion};

use crate::capability::CONSTRUCTOR;
use crate::host::{EventRecord, MimeTypeInfo, PluginInfo};
use crate::wrapper::{EventId, RangeId, SheetId};
use crate::{CapabilityRegistry, JsError, JsValue, MemberKind, NativeRef, WrapperCache, WrapperId};

/// Per-page script-visible state
#[derive(Debug)]
pub struct Realm {
    pub(crate) document: Document,
    pub(crate) selection: Selection,
    pub(crate) wrappers: WrapperCache,
    /// Script-owned Range objects, freed with their wrappers
    pub(crate) ranges: HashMap<RangeId, SelectionRange>,
    pub(crate) sheets: Vec<StyleSheet>,
    pub(crate) events: HashMap<EventId, EventRecord>,
    next_range: u32,
    next_event: u32,
    pub(crate) plugins: Vec<PluginInfo>,
    pub(crate) mime_types: Vec<MimeTypeInfo>,
    profile: BrowserProfile,
    registry: Arc<CapabilityRegistry>,
}

impl Realm {
    /// Realm over a loaded document
    pub fn new(document: Document, profile: BrowserProfile, registry: Arc<CapabilityRegistry>) -> Self {
        let (plugins, mime_types) = crate::host::navigator_data(&profile);
        let mut realm = Self {
            document,
            selection: Selection::new(),
            wrappers: WrapperCache::new(),
            ranges: HashMap::new(),
            sheets: Vec::new(),
            events: HashMap::new(),
            next_range: 0,
            next_event: 0,
            plugins,
            mime_types,
            profile,
            registry,
        };
        realm.load_style_elements();

        tracing::info!(
            browser = realm.profile.version().nickname(),
            sheets = realm.sheets.len(),
            "Created realm for {}",
            realm.document.url()
        );
        realm
    }

    fn load_style_elements(&mut self) {
        for node in self.document.get_elements_by_tag_name("style") {
            let css = self.document.tree.text_content(node);
            let media = self
                .document
                .tree
                .get(node)
                .and_then(|n| n.as_element())
                .and_then(|e| e.get_attr("media"))
                .map(MediaList::parse)
                .unwrap_or_default();
            let sheet = match StyleSheet::parse(&css) {
                Ok(sheet) => sheet,
                Err(e) => {
                    tracing::warn!("Ignoring unparsable <style> content: {}", e);
                    StyleSheet::new()
                }
            };
            self.sheets.push(sheet.with_owner(node).with_media(media));
        }
    }

    /// Add a style sheet not backed by a `<style>` element
    pub fn add_style_sheet(&mut self, sheet: StyleSheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    // --- Accessors ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }

    #[inline]
    pub fn version(&self) -> BrowserVersion {
        self.profile.version()
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn wrappers(&self) -> &WrapperCache {
        &self.wrappers
    }

    pub fn style_sheets(&self) -> &[StyleSheet] {
        &self.sheets
    }

    // --- Wrapping ---

    /// Wrapper for `native`; `None` wraps to `null`
    pub fn wrap(&mut self, native: Option<NativeRef>) -> JsValue {
        match native {
            Some(native) => JsValue::Object(self.wrapper(native)),
            None => JsValue::Null,
        }
    }

    /// Identity-stable wrapper for a native entity
    pub fn wrapper(&mut self, native: NativeRef) -> WrapperId {
        if let Some(id) = self.wrappers.get(native) {
            return id;
        }
        let class = self.class_for(native);
        self.wrappers.wrapper_for(native, || class)
    }

    /// Wrapper of the global object
    pub fn window(&mut self) -> WrapperId {
        self.wrapper(NativeRef::Window)
    }

    pub fn native_for(&self, id: WrapperId) -> Option<NativeRef> {
        self.wrappers.native_for(id)
    }

    /// Most specific exposed class for a native entity
    pub fn class_for(&self, native: NativeRef) -> &'static str {
        match native {
            NativeRef::Window => "Window",
            NativeRef::Navigator => "Navigator",
            NativeRef::Selection => "Selection",
            NativeRef::Node(id) => self.node_class(id),
            NativeRef::Range(_) => "Range",
            NativeRef::StyleSheetList => "StyleSheetList",
            NativeRef::StyleSheet(_) => "CSSStyleSheet",
            NativeRef::CssRuleList(..) => "CSSRuleList",
            NativeRef::CssRule(sheet, rule) => match self.sheet(sheet).and_then(|s| s.rule(rule)).map(|r| &r.kind) {
                Some(RuleKind::Style { .. }) => "CSSStyleRule",
                Some(RuleKind::Media { .. }) => "CSSMediaRule",
                _ => "CSSRule",
            },
            NativeRef::MediaList(..) => "MediaList",
            NativeRef::ComputedStyle(_) => "CSSStyleDeclaration",
            NativeRef::MimeTypeArray => "MimeTypeArray",
            NativeRef::MimeType(_) => "MimeType",
            NativeRef::PluginArray => "PluginArray",
            NativeRef::Plugin(_) => "Plugin",
            NativeRef::Event(id) => self.event(id).map(|e| e.class).unwrap_or("Event"),
            NativeRef::PeriodicSyncManager => "PeriodicSyncManager",
        }
    }

    fn node_class(&self, id: NodeId) -> &'static str {
        let candidates: &[&'static str] = match self.document.tree.get(id).map(|n| &n.data) {
            Some(NodeData::Document) => &["Document", "Node"],
            Some(NodeData::Text(_)) => &["Text", "Node"],
            Some(NodeData::Element(e)) if e.tag == "meta" => &["HTMLMetaElement", "HTMLElement", "Element", "Node"],
            Some(NodeData::Element(_)) => &["HTMLElement", "Element", "Node"],
            _ => &["Node"],
        };
        let version = self.version();
        candidates
            .iter()
            .copied()
            .find(|class| self.registry.is_class_exposed(class, version))
            .unwrap_or("Node")
    }

    // --- Dispatch ---

    /// Whether a global constructor named `name` exists
    pub fn global_exposed(&self, name: &str) -> bool {
        self.registry.is_class_exposed(name, self.version())
    }

    /// `new Class(...args)`
    pub fn construct(&mut self, class: &str, args: &[JsValue]) -> Result<JsValue, JsError> {
        let version = self.version();
        if !self.registry.is_class_exposed(class, version) {
            return Err(JsError::Reference(format!("{} is not defined", class)));
        }
        let handler = self
            .registry
            .own(class, CONSTRUCTOR, MemberKind::Constructor, version)
            .map(|d| d.handler);
        match handler {
            Some(handler) => handler(self, None, args),
            None => Err(JsError::TypeError("Illegal constructor".to_string())),
        }
    }

    /// Property read on a wrapper
    pub fn get(&mut self, this: WrapperId, member: &str) -> Result<JsValue, JsError> {
        let class = self.wrappers.class_of(this).ok_or_else(JsError::illegal_invocation)?;
        let handler = self
            .registry
            .resolve(class, member, MemberKind::Getter, self.version())
            .map(|d| d.handler);
        match handler {
            Some(handler) => handler(self, Some(this), &[]),
            None => Ok(self.wrappers.expando(this, member).cloned().unwrap_or_default()),
        }
    }

    /// Property write on a wrapper
    pub fn set(&mut self, this: WrapperId, member: &str, value: JsValue) -> Result<(), JsError> {
        let class = self.wrappers.class_of(this).ok_or_else(JsError::illegal_invocation)?;
        let version = self.version();
        if let Some(handler) = self
            .registry
            .resolve(class, member, MemberKind::Setter, version)
            .map(|d| d.handler)
        {
            handler(self, Some(this), &[value])?;
            return Ok(());
        }
        if self.registry.resolve(class, member, MemberKind::Getter, version).is_some() {
            tracing::debug!("Ignoring write to read-only {}.{}", class, member);
            return Ok(());
        }
        self.wrappers.set_expando(this, member, value);
        Ok(())
    }

    /// Method call on a wrapper
    pub fn call(&mut self, this: WrapperId, member: &str, args: &[JsValue]) -> Result<JsValue, JsError> {
        let class = self.wrappers.class_of(this).ok_or_else(JsError::illegal_invocation)?;
        let handler = self
            .registry
            .resolve(class, member, MemberKind::Function, self.version())
            .map(|d| d.handler);
        match handler {
            Some(handler) => handler(self, Some(this), args),
            None => Err(JsError::TypeError(format!("{} is not a function", member))),
        }
    }

    /// Call an entry point on behalf of a script prototype slot
    ///
    /// The receiver must be an instance of `owner`.
    pub fn invoke_declared(
        &mut self,
        owner: &str,
        member: &str,
        kind: MemberKind,
        this: Option<WrapperId>,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let version = self.version();
        if kind == MemberKind::Constructor {
            return self.construct(owner, args);
        }
        let handler = self
            .registry
            .own(owner, member, kind, version)
            .map(|d| d.handler)
            .ok_or_else(|| JsError::TypeError(format!("{} is not a function", member)))?;

        let receiver = this.ok_or_else(JsError::illegal_invocation)?;
        let class = self.wrappers.class_of(receiver).ok_or_else(JsError::illegal_invocation)?;
        if !self.registry.is_a(class, owner) {
            tracing::warn!("{}.{} called on a {} receiver", owner, member, class);
            return Err(JsError::illegal_invocation());
        }
        handler(self, Some(receiver), args)
    }

    // --- Native stores ---

    pub(crate) fn sheet(&self, id: SheetId) -> Option<&StyleSheet> {
        self.sheets.get(id.0 as usize)
    }

    pub(crate) fn sheet_mut(&mut self, id: SheetId) -> Option<&mut StyleSheet> {
        self.sheets.get_mut(id.0 as usize)
    }

    pub(crate) fn range(&self, id: RangeId) -> Option<&SelectionRange> {
        self.ranges.get(&id)
    }

    pub(crate) fn range_mut(&mut self, id: RangeId) -> Option<&mut SelectionRange> {
        self.ranges.get_mut(&id)
    }

    /// Store a script-owned Range and wrap it
    pub(crate) fn new_range(&mut self, range: SelectionRange) -> JsValue {
        let id = RangeId(self.next_range);
        self.next_range += 1;
        self.ranges.insert(id, range);
        self.wrap(Some(NativeRef::Range(id)))
    }

    pub(crate) fn event(&self, id: EventId) -> Option<&EventRecord> {
        self.events.get(&id)
    }

    pub(crate) fn event_mut(&mut self, id: EventId) -> Option<&mut EventRecord> {
        self.events.get_mut(&id)
    }

    pub(crate) fn new_event(&mut self, record: EventRecord) -> JsValue {
        let id = EventId(self.next_event);
        self.next_event += 1;
        self.events.insert(id, record);
        self.wrap(Some(NativeRef::Event(id)))
    }

    /// Script-owned Range and Event objects still held
    pub fn script_object_count(&self) -> usize {
        self.ranges.len() + self.events.len()
    }

    /// Script dropped its last reference to a wrapper
    ///
    /// Frees the wrapper and, for script-owned entities, the entity itself.
    /// Other wrappers stay bound. Returns whether anything was freed.
    pub fn release(&mut self, id: WrapperId) -> bool {
        match self.wrappers.native_for(id) {
            Some(native) if native.is_script_owned() => {
                self.wrappers.release(id);
                match native {
                    NativeRef::Range(range) => {
                        self.ranges.remove(&range);
                    }
                    NativeRef::Event(event) => {
                        self.events.remove(&event);
                    }
                    _ => {}
                }
                true
            }
            _ => false,
        }
    }

    // --- Mutation with live-range reconciliation ---

    /// Insert `child` into `parent` before `reference`, moving it if attached
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> Result<(), JsError> {
        let tree = &self.document.tree;
        tree.validate_insertion(parent, child)?;
        let mut reference = reference;
        if let Some(r) = reference {
            if tree.parent(r) != Some(parent) {
                return Err(emu_dom::DomException::NotFound(
                    "The node before which the new node is to be inserted is not a child of this node".to_string(),
                )
                .into());
            }
            // Inserting a node before itself keeps its position
            if r == child {
                reference = tree.next_sibling(child);
            }
        }

        self.detach_node(child);
        self.document.tree.insert_before(parent, child, reference)?;
        if let Some(index) = self.document.tree.index_of(child) {
            self.selection.child_inserted(parent, index);
            for range in self.ranges.values_mut() {
                range.child_inserted(parent, index);
            }
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), JsError> {
        self.insert_before(parent, child, None)
    }

    /// Remove `child` from `parent`; the node stays alive
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), JsError> {
        if self.document.tree.parent(child) != Some(parent) {
            return Err(emu_dom::DomException::NotFound(
                "The node to be removed is not a child of this node".to_string(),
            )
            .into());
        }
        self.detach_node(child);
        Ok(())
    }

    /// Unlink a node from its parent, reconciling ranges first
    fn detach_node(&mut self, child: NodeId) {
        let tree = &self.document.tree;
        let (Some(parent), Some(index)) = (tree.parent(child), tree.index_of(child)) else {
            return;
        };
        let Realm {
            document,
            selection,
            ranges,
            ..
        } = self;
        selection.child_removing(&document.tree, parent, index, child);
        for range in ranges.values_mut() {
            range.child_removing(&document.tree, parent, index, child);
        }
        document.tree.detach(child);
    }

    /// `textContent` setter
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), JsError> {
        let is_container = match self.document.tree.get(node) {
            Some(n) if n.character_data().is_some() => false,
            Some(n) if n.is_element() => true,
            _ => return Ok(()),
        };

        if !is_container {
            self.document.tree.set_character_data(node, text);
            self.selection.data_replaced(node);
            for range in self.ranges.values_mut() {
                range.data_replaced(node);
            }
            return Ok(());
        }

        let children: Vec<NodeId> = self.document.tree.children(node).collect();
        for child in children {
            self.detach_node(child);
        }
        if !text.is_empty() {
            let text_node = self.document.tree.create_text(text);
            self.append_child(node, text_node)?;
        }
        Ok(())
    }

    /// Destroy a subtree and drop the wrappers bound to it
    pub fn destroy_node(&mut self, node: NodeId) -> usize {
        self.detach_node(node);
        let destroyed = self.document.tree.destroy(node);
        for id in &destroyed {
            self.wrappers.invalidate(NativeRef::Node(*id));
            self.wrappers.invalidate(NativeRef::ComputedStyle(*id));
        }
        destroyed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm(version: BrowserVersion) -> Realm {
        let registry = Arc::new(CapabilityRegistry::standard().unwrap());
        Realm::new(Document::new("about:blank"), BrowserProfile::new(version), registry)
    }

    #[test]
    fn test_null_wraps_to_null() {
        let mut realm = realm(BrowserVersion::Chrome);
        assert_eq!(realm.wrap(None), JsValue::Null);
    }

    #[test]
    fn test_absent_member_is_undefined() {
        let mut realm = realm(BrowserVersion::Firefox);
        let window = realm.window();
        assert_eq!(realm.get(window, "noSuchThing").unwrap(), JsValue::Undefined);

        realm.set(window, "noSuchThing", JsValue::from("x")).unwrap();
        assert_eq!(realm.get(window, "noSuchThing").unwrap(), JsValue::from("x"));

        let err = realm.call(window, "noSuchThing", &[]).unwrap_err();
        assert_eq!(err, JsError::TypeError("noSuchThing is not a function".to_string()));
    }

    #[test]
    fn test_unexposed_constructor() {
        let mut realm = realm(BrowserVersion::Firefox);
        let err = realm.construct("PeriodicSyncManager", &[]).unwrap_err();
        assert_eq!(err.name(), "ReferenceError");
        assert!(!realm.global_exposed("PeriodicSyncManager"));
    }

    #[test]
    fn test_remove_child_reconciles_selection() {
        let mut realm = realm(BrowserVersion::Chrome);
        let body = realm.document.body().unwrap();
        let p = realm.document.create_element("p");
        realm.append_child(body, p).unwrap();
        realm.selection.collapse(p, 0);

        realm.remove_child(body, p).unwrap();
        let range = realm.selection.ranges()[0];
        assert_eq!(range.start_container(), body);
        assert_eq!(range.start_offset(), 0);
    }

    #[test]
    fn test_insert_before_self_is_a_no_op_move() {
        let mut realm = realm(BrowserVersion::Chrome);
        let body = realm.document.body().unwrap();
        let p = realm.document.create_element("p");
        let em = realm.document.create_element("em");
        realm.append_child(body, p).unwrap();
        realm.append_child(body, em).unwrap();

        realm.insert_before(body, p, Some(p)).unwrap();
        realm.insert_before(body, em, Some(em)).unwrap();
        assert_eq!(realm.document.tree.parent(p), Some(body));
        assert_eq!(realm.document.tree.children(body).collect::<Vec<_>>(), vec![p, em]);
    }

    #[test]
    fn test_release_frees_script_owned_entities() {
        let mut realm = realm(BrowserVersion::Chrome);
        let body = realm.document.body().unwrap();
        let JsValue::Object(range) = realm.new_range(SelectionRange::collapsed_at(body, 0)) else {
            panic!("expected a Range wrapper");
        };
        let window = realm.window();
        assert_eq!(realm.script_object_count(), 1);

        assert!(!realm.release(window));
        assert!(realm.release(range));
        assert!(!realm.release(range));
        assert_eq!(realm.script_object_count(), 0);
        assert!(realm.wrappers.native_for(range).is_none());
        assert!(realm.wrappers.is_live(window));

        // Mutations only see ranges still held
        let p = realm.document.create_element("p");
        realm.append_child(body, p).unwrap();
        assert!(realm.ranges.is_empty());
    }

    #[test]
    fn test_destroy_invalidates_wrappers() {
        let mut realm = realm(BrowserVersion::Chrome);
        let body = realm.document.body().unwrap();
        let p = realm.document.create_element("p");
        realm.append_child(body, p).unwrap();

        let before = realm.wrapper(NativeRef::Node(p));
        assert_eq!(realm.destroy_node(p), 1);
        assert!(!realm.wrappers.is_live(before));
        assert!(realm.wrappers.get(NativeRef::Node(p)).is_none());
    }
}
