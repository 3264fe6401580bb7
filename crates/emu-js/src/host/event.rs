//! Event and PresentationConnectionCloseEvent members

use super::{arg, arg_string, receiver};
use crate::wrapper::EventId;
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

/// Native state of a script-created event
#[derive(Debug, Clone, Default)]
pub struct EventRecord {
    pub class: &'static str,
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// `PresentationConnectionCloseEvent` fields
    pub reason: String,
    pub message: String,
}

impl EventRecord {
    fn from_init(class: &'static str, event_type: String, init: &JsValue) -> Self {
        let flag = |name: &str| init.member(name).is_some_and(JsValue::to_boolean);
        Self {
            class,
            event_type,
            bubbles: flag("bubbles"),
            cancelable: flag("cancelable"),
            ..Self::default()
        }
    }
}

fn required_type(args: &[JsValue], class: &str) -> Result<String, JsError> {
    if args.is_empty() {
        return Err(JsError::TypeError(format!(
            "Failed to construct '{}': 1 argument required, but only 0 present.",
            class
        )));
    }
    Ok(arg_string(args, 0))
}

fn this_event(realm: &Realm, this: Option<WrapperId>) -> Result<EventId, JsError> {
    match receiver(realm, this)? {
        NativeRef::Event(id) if realm.event(id).is_some() => Ok(id),
        _ => Err(JsError::illegal_invocation()),
    }
}

fn with_event<T>(realm: &Realm, this: Option<WrapperId>, f: impl FnOnce(&EventRecord) -> T) -> Result<T, JsError> {
    let id = this_event(realm, this)?;
    realm.event(id).map(f).ok_or_else(JsError::illegal_invocation)
}

/// `new Event(type, init)`
pub(super) fn event_constructor(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let event_type = required_type(args, "Event")?;
    Ok(realm.new_event(EventRecord::from_init("Event", event_type, arg(args, 1))))
}

/// `new PresentationConnectionCloseEvent(type, init)`
pub(super) fn close_event_constructor(realm: &mut Realm, _: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let class = "PresentationConnectionCloseEvent";
    let event_type = required_type(args, class)?;
    let init = arg(args, 1);
    let reason = match init.member("reason") {
        Some(v) if !v.is_undefined() => v.to_js_string(),
        _ => {
            return Err(JsError::TypeError(format!(
                "Failed to construct '{}': required member reason is undefined.",
                class
            )));
        }
    };
    let message = init.member("message").map(JsValue::to_js_string).unwrap_or_default();

    let mut record = EventRecord::from_init(class, event_type, init);
    record.reason = reason;
    record.message = message;
    Ok(realm.new_event(record))
}

pub(super) fn event_type(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.event_type.as_str().into())
}

pub(super) fn bubbles(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.bubbles.into())
}

pub(super) fn cancelable(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.cancelable.into())
}

pub(super) fn default_prevented(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.default_prevented.into())
}

/// Only cancelable events record the cancellation
pub(super) fn prevent_default(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_event(realm, this)?;
    if let Some(event) = realm.event_mut(id) {
        if event.cancelable {
            event.default_prevented = true;
        }
    }
    Ok(JsValue::Undefined)
}

pub(super) fn stop_propagation(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_event(realm, this)?;
    if let Some(event) = realm.event_mut(id) {
        event.propagation_stopped = true;
    }
    Ok(JsValue::Undefined)
}

/// `initEvent(type, bubbles, cancelable)`
pub(super) fn init_event(realm: &mut Realm, this: Option<WrapperId>, args: &[JsValue]) -> Result<JsValue, JsError> {
    let id = this_event(realm, this)?;
    let event_type = arg_string(args, 0);
    let bubbles = arg(args, 1).to_boolean();
    let cancelable = arg(args, 2).to_boolean();
    if let Some(event) = realm.event_mut(id) {
        event.event_type = event_type;
        event.bubbles = bubbles;
        event.cancelable = cancelable;
        event.default_prevented = false;
    }
    Ok(JsValue::Undefined)
}

pub(super) fn close_reason(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.reason.as_str().into())
}

pub(super) fn close_message(realm: &mut Realm, this: Option<WrapperId>, _: &[JsValue]) -> Result<JsValue, JsError> {
    with_event(realm, this, |e| e.message.as_str().into())
}
