//! Capability registry
//!
//! Host classes are declared in static tables ([`ClassDecl`]) naming, per
//! member, the browser versions on which it exists. The registry validates
//! the tables once at startup and answers membership questions with hash
//! lookups keyed by owner, then member name.
//!
//! A member that is not exposed for the active version does not exist:
//! lookups simply return `None`/`false`, never an access error.

use std::collections::HashMap;
use std::fmt;

use emu_version::{BrowserVersion, VersionSet};

use crate::{CapabilityError, JsError, JsValue, Realm, WrapperId};

/// Native entry point: `(realm, receiver, args) -> result`
pub type HostFn = fn(&mut Realm, Option<WrapperId>, &[JsValue]) -> Result<JsValue, JsError>;

/// Name under which constructors are declared
pub const CONSTRUCTOR: &str = "constructor";

/// Kind of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Constructor,
    Getter,
    Setter,
    Function,
}

impl MemberKind {
    const ALL: [MemberKind; 4] = [
        MemberKind::Constructor,
        MemberKind::Getter,
        MemberKind::Setter,
        MemberKind::Function,
    ];

    fn slot(self) -> usize {
        match self {
            MemberKind::Constructor => 0,
            MemberKind::Getter => 1,
            MemberKind::Setter => 2,
            MemberKind::Function => 3,
        }
    }

    /// Name used by the script prelude
    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Getter => "getter",
            MemberKind::Setter => "setter",
            MemberKind::Function => "function",
        }
    }
}

/// One declared member
#[derive(Clone, Copy)]
pub struct MemberDecl {
    pub name: &'static str,
    pub kind: MemberKind,
    /// `None` inherits the class's version set
    pub versions: Option<VersionSet>,
    pub handler: HostFn,
}

impl MemberDecl {
    pub const fn constructor(handler: HostFn) -> Self {
        Self {
            name: CONSTRUCTOR,
            kind: MemberKind::Constructor,
            versions: None,
            handler,
        }
    }

    pub const fn getter(name: &'static str, handler: HostFn) -> Self {
        Self {
            name,
            kind: MemberKind::Getter,
            versions: None,
            handler,
        }
    }

    pub const fn setter(name: &'static str, handler: HostFn) -> Self {
        Self {
            name,
            kind: MemberKind::Setter,
            versions: None,
            handler,
        }
    }

    pub const fn function(name: &'static str, handler: HostFn) -> Self {
        Self {
            name,
            kind: MemberKind::Function,
            versions: None,
            handler,
        }
    }

    /// Restrict to a subset of the class's versions
    pub const fn only(mut self, versions: VersionSet) -> Self {
        self.versions = Some(versions);
        self
    }
}

impl fmt::Debug for MemberDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDecl")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("versions", &self.versions)
            .finish_non_exhaustive()
    }
}

/// One declared host class
#[derive(Debug, Clone, Copy)]
pub struct ClassDecl {
    pub name: &'static str,
    /// Class whose members this one also answers to
    pub extends: Option<&'static str>,
    pub exposed: VersionSet,
    pub members: &'static [MemberDecl],
}

/// Resolved `(owner, member, kind, versions)` entry
#[derive(Clone, Copy)]
pub struct CapabilityDescriptor {
    pub owner: &'static str,
    pub name: &'static str,
    pub kind: MemberKind,
    pub versions: VersionSet,
    pub handler: HostFn,
}

impl CapabilityDescriptor {
    #[inline]
    pub fn supports(&self, version: BrowserVersion) -> bool {
        self.versions.includes(version)
    }
}

impl fmt::Debug for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityDescriptor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("versions", &self.versions)
            .finish_non_exhaustive()
    }
}

type MemberSlots = [Option<CapabilityDescriptor>; 4];

#[derive(Debug)]
struct ClassEntry {
    extends: Option<&'static str>,
    exposed: VersionSet,
    /// Own members in declaration order
    members: Vec<(&'static str, MemberKind)>,
    /// This class followed by its ancestors
    lookup: Vec<&'static str>,
}

/// Registry of every declared class and member
#[derive(Debug)]
pub struct CapabilityRegistry {
    classes: HashMap<&'static str, ClassEntry>,
    /// Descriptor slots by owner, then member name
    members: HashMap<&'static str, HashMap<&'static str, MemberSlots>>,
    /// Class names, parents before children
    order: Vec<&'static str>,
}

impl CapabilityRegistry {
    /// Registry over the built-in host classes
    pub fn standard() -> Result<Self, CapabilityError> {
        Self::build(crate::host::DECLARATIONS)
    }

    /// Validate declarations and build the lookup tables
    pub fn build(decls: &[ClassDecl]) -> Result<Self, CapabilityError> {
        let mut classes: HashMap<&'static str, ClassEntry> = HashMap::new();
        let mut members: HashMap<&'static str, HashMap<&'static str, MemberSlots>> = HashMap::new();

        for decl in decls {
            if classes.contains_key(decl.name) {
                return Err(CapabilityError::DuplicateClass(decl.name));
            }
            if decl.exposed.is_empty() {
                return Err(CapabilityError::EmptyVersionSet {
                    owner: decl.name,
                    member: None,
                });
            }

            let mut own = Vec::with_capacity(decl.members.len());
            for member in decl.members {
                let versions = member.versions.unwrap_or(decl.exposed);
                if versions.is_empty() {
                    return Err(CapabilityError::EmptyVersionSet {
                        owner: decl.name,
                        member: Some(member.name),
                    });
                }
                if !decl.exposed.contains(versions) {
                    return Err(CapabilityError::MemberOutsideClass {
                        owner: decl.name,
                        member: member.name,
                    });
                }

                let slots = members.entry(decl.name).or_default().entry(member.name).or_default();
                let slot = &mut slots[member.kind.slot()];
                if slot.is_some() {
                    return Err(CapabilityError::DuplicateMember {
                        owner: decl.name,
                        member: member.name,
                        kind: member.kind,
                    });
                }
                *slot = Some(CapabilityDescriptor {
                    owner: decl.name,
                    name: member.name,
                    kind: member.kind,
                    versions,
                    handler: member.handler,
                });
                own.push((member.name, member.kind));
            }

            classes.insert(
                decl.name,
                ClassEntry {
                    extends: decl.extends,
                    exposed: decl.exposed,
                    members: own,
                    lookup: Vec::new(),
                },
            );
        }

        // Resolve inheritance chains
        let mut lookups = Vec::with_capacity(decls.len());
        for decl in decls {
            let mut chain = vec![decl.name];
            let mut current = decl.extends;
            while let Some(parent) = current {
                let Some(entry) = classes.get(parent) else {
                    let child = chain.last().copied().unwrap_or(decl.name);
                    return Err(CapabilityError::UnknownParent { class: child, parent });
                };
                if chain.contains(&parent) {
                    return Err(CapabilityError::Cycle(decl.name));
                }
                chain.push(parent);
                current = entry.extends;
            }
            if let Some(parent) = decl.extends {
                let parent_exposed = classes.get(parent).map_or(VersionSet::empty(), |e| e.exposed);
                if !parent_exposed.contains(decl.exposed) {
                    return Err(CapabilityError::ParentNotExposed {
                        class: decl.name,
                        parent,
                    });
                }
            }
            lookups.push((decl.name, chain));
        }

        // Parents before children
        let mut order: Vec<&'static str> = Vec::with_capacity(decls.len());
        let mut by_depth: Vec<(usize, usize, &'static str)> = lookups
            .iter()
            .enumerate()
            .map(|(index, (name, chain))| (chain.len(), index, *name))
            .collect();
        by_depth.sort();
        order.extend(by_depth.into_iter().map(|(_, _, name)| name));

        for (name, chain) in lookups {
            if let Some(entry) = classes.get_mut(name) {
                entry.lookup = chain;
            }
        }

        tracing::debug!(
            classes = classes.len(),
            members = members.values().map(|m| m.len()).sum::<usize>(),
            "Built capability registry"
        );
        Ok(Self { classes, members, order })
    }

    /// Whether the class itself is visible on `version`
    pub fn is_class_exposed(&self, class: &str, version: BrowserVersion) -> bool {
        self.classes.get(class).is_some_and(|c| c.exposed.includes(version))
    }

    /// Whether `owner` declares `member` of `kind` for `version`
    pub fn is_supported(&self, owner: &str, member: &str, kind: MemberKind, version: BrowserVersion) -> bool {
        self.own(owner, member, kind, version).is_some()
    }

    /// Own member of `owner`, if exposed on `version`
    pub fn own(&self, owner: &str, member: &str, kind: MemberKind, version: BrowserVersion) -> Option<&CapabilityDescriptor> {
        self.members
            .get(owner)?
            .get(member)?[kind.slot()]
            .as_ref()
            .filter(|d| d.supports(version))
    }

    /// Member as seen on an instance of `class`: own members first, then ancestors
    pub fn resolve(&self, class: &str, member: &str, kind: MemberKind, version: BrowserVersion) -> Option<&CapabilityDescriptor> {
        self.lookup_order(class)
            .iter()
            .find_map(|owner| self.own(owner, member, kind, version))
    }

    /// `class` followed by its ancestors
    pub fn lookup_order(&self, class: &str) -> &[&'static str] {
        self.classes.get(class).map(|c| c.lookup.as_slice()).unwrap_or(&[])
    }

    /// Whether an instance of `class` is also a `candidate`
    pub fn is_a(&self, class: &str, candidate: &str) -> bool {
        self.lookup_order(class).contains(&candidate)
    }

    pub fn extends(&self, class: &str) -> Option<&'static str> {
        self.classes.get(class).and_then(|c| c.extends)
    }

    /// Classes exposed on `version`, parents before children
    pub fn exposed_classes(&self, version: BrowserVersion) -> Vec<&'static str> {
        self.order
            .iter()
            .copied()
            .filter(|name| self.is_class_exposed(name, version))
            .collect()
    }

    /// Own members of `class` exposed on `version`, in declaration order
    pub fn members_for(&self, class: &str, version: BrowserVersion) -> Vec<&CapabilityDescriptor> {
        let Some(entry) = self.classes.get(class) else {
            return Vec::new();
        };
        entry
            .members
            .iter()
            .filter_map(|(name, kind)| self.own(class, name, *kind, version))
            .collect()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of declared descriptors across all kinds
    pub fn member_count(&self) -> usize {
        self.members
            .values()
            .flat_map(|m| m.values())
            .map(|slots| MemberKind::ALL.iter().filter(|k| slots[k.slot()].is_some()).count())
            .sum()
    }
}
