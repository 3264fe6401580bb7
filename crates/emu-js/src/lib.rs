//! Emu JavaScript Host
//!
//! Version-gated script bindings over the Emu DOM and CSSOM.
//!
//! Features:
//! - Capability registry: which classes and members each browser exposes
//! - Wrapper cache: one script object per native entity
//! - Host objects for window, navigator, nodes, selection, ranges, CSSOM and events
//! - QuickJS bridge with a `tracing`-backed console

mod bridge;
mod capability;
mod console;
mod error;
mod host;
mod realm;
mod value;
mod wrapper;

pub use bridge::ScriptContext;
pub use capability::{
    CONSTRUCTOR, CapabilityDescriptor, CapabilityRegistry, ClassDecl, HostFn, MemberDecl, MemberKind,
};
pub use error::{CapabilityError, JsError};
pub use realm::Realm;
pub use value::{JsValue, format_number};
pub use wrapper::{NativeRef, WrapperCache, WrapperId};
