//! Script bridge
//!
//! Runs page scripts in QuickJS. A single host function carries every
//! member access across the boundary as a JSON request; the prelude builds
//! constructors and prototypes for the classes exposed on the session's
//! browser version and keeps a JS-side map from wrapper id to object so the
//! same native entity always surfaces as the same script object.
//!
//! Range and Event wrappers are held weakly on the script side. When script
//! drops the last reference, a finalizer sends a `release` request and the
//! realm frees the entity. Finalizers run as pending jobs after each
//! evaluation.

use std::sync::{Arc, Mutex, MutexGuard};

use rquickjs::{Context, Ctx, Function, Runtime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::capability::{CONSTRUCTOR, MemberKind};
use crate::console;
use crate::{JsError, JsValue, NativeRef, Realm, WrapperId};

const PRELUDE: &str = include_str!("prelude.js");
const RUN: &str = "__emuRun";
const MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// JavaScript context bound to one page realm
pub struct ScriptContext {
    context: Context,
    // Dropped after the context
    runtime: Runtime,
    realm: Arc<Mutex<Realm>>,
}

impl ScriptContext {
    /// Create a context exposing the realm's classes to script
    pub fn new(realm: Arc<Mutex<Realm>>) -> Result<Self, JsError> {
        let runtime = Runtime::new()?;
        runtime.set_memory_limit(MEMORY_LIMIT);
        let context = Context::full(&runtime)?;

        let meta = {
            let mut guard = lock(&realm)?;
            prelude_meta(&mut guard)?
        };

        let host_realm = realm.clone();
        context.with(|ctx| -> Result<(), JsError> {
            console::install_console(&ctx).map_err(|e| caught(&ctx, e))?;

            let host = Function::new(ctx.clone(), move |payload: String| -> Result<String, rquickjs::Error> {
                Ok(dispatch(&host_realm, &payload))
            })?;
            let prelude: Function = ctx.eval(PRELUDE).map_err(|e| caught(&ctx, e))?;
            prelude.call::<_, ()>((host, meta)).map_err(|e| caught(&ctx, e))?;
            Ok(())
        })?;

        tracing::debug!("Script context ready");
        Ok(Self {
            context,
            runtime,
            realm,
        })
    }

    /// Evaluate JavaScript code
    pub fn eval(&self, code: &str) -> Result<JsValue, JsError> {
        let reply: String = self.context.with(|ctx| -> Result<String, JsError> {
            let run: Function = ctx.globals().get(RUN)?;
            run.call::<_, String>((code,)).map_err(|e| caught(&ctx, e))
        })?;
        self.run_pending_jobs();

        let reply: Value = serde_json::from_str(&reply)?;
        if let Some(error) = reply.get("e") {
            return Err(error_from_wire(error));
        }
        Ok(reply.get("v").map(from_wire).unwrap_or_default())
    }

    /// Execute JavaScript (ignore result)
    pub fn exec(&self, code: &str) -> Result<(), JsError> {
        self.eval(code).map(|_| ())
    }

    /// Run a full collection, then the finalizers it queued
    pub fn collect_garbage(&self) {
        self.runtime.run_gc();
        self.run_pending_jobs();
    }

    /// Drain promise reactions and finalizer callbacks
    fn run_pending_jobs(&self) {
        let mut ran = 0usize;
        loop {
            match self.runtime.execute_pending_job() {
                Ok(true) => ran += 1,
                Ok(false) => break,
                Err(_) => tracing::warn!("A pending script job threw"),
            }
        }
        if ran > 0 {
            tracing::trace!(jobs = ran, "Ran pending script jobs");
        }
    }

    pub fn realm(&self) -> &Arc<Mutex<Realm>> {
        &self.realm
    }

    /// Run `f` with the realm locked
    pub fn with_realm<R>(&self, f: impl FnOnce(&mut Realm) -> R) -> Result<R, JsError> {
        let mut guard = lock(&self.realm)?;
        Ok(f(&mut guard))
    }
}

fn lock(realm: &Mutex<Realm>) -> Result<MutexGuard<'_, Realm>, JsError> {
    realm
        .lock()
        .map_err(|_| JsError::Runtime("Realm lock poisoned".to_string()))
}

/// Turn a pending QuickJS exception into a `JsError`
fn caught(ctx: &Ctx<'_>, err: rquickjs::Error) -> JsError {
    match err {
        rquickjs::Error::Exception => {
            let value = ctx.catch();
            let message = value
                .as_exception()
                .and_then(|e| e.message())
                .unwrap_or_else(|| "Uncaught exception".to_string());
            JsError::Runtime(message)
        }
        other => other.into(),
    }
}

// --- Prelude metadata ---

#[derive(Serialize)]
struct PreludeMeta {
    window: u32,
    classes: Vec<ClassMeta>,
}

#[derive(Serialize)]
struct ClassMeta {
    name: &'static str,
    extends: Option<&'static str>,
    ctor: bool,
    members: Vec<MemberMeta>,
}

#[derive(Serialize)]
struct MemberMeta {
    name: &'static str,
    kind: &'static str,
}

fn prelude_meta(realm: &mut Realm) -> Result<String, JsError> {
    let window = realm.window().index();
    let version = realm.version();
    let registry = realm.registry();

    let classes = registry
        .exposed_classes(version)
        .into_iter()
        .map(|name| ClassMeta {
            name,
            extends: registry.extends(name),
            ctor: registry.is_supported(name, CONSTRUCTOR, MemberKind::Constructor, version),
            members: registry
                .members_for(name, version)
                .into_iter()
                .filter(|d| d.kind != MemberKind::Constructor)
                .map(|d| MemberMeta {
                    name: d.name,
                    kind: d.kind.as_str(),
                })
                .collect(),
        })
        .collect();

    Ok(serde_json::to_string(&PreludeMeta { window, classes })?)
}

// --- Host requests ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Op {
    Construct,
    Get,
    Set,
    Call,
    /// Script dropped a weakly held wrapper
    Release,
}

impl Op {
    fn kind(&self) -> Option<MemberKind> {
        match self {
            Op::Construct => Some(MemberKind::Constructor),
            Op::Get => Some(MemberKind::Getter),
            Op::Set => Some(MemberKind::Setter),
            Op::Call => Some(MemberKind::Function),
            Op::Release => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HostRequest {
    op: Op,
    #[serde(default)]
    cls: String,
    #[serde(default)]
    name: String,
    this: Option<u32>,
    #[serde(default)]
    args: Vec<Value>,
}

/// Handle one request from script; never fails, errors travel in the reply
fn dispatch(realm: &Mutex<Realm>, payload: &str) -> String {
    let reply = match handle(realm, payload) {
        Ok(value) => json!({ "v": value }),
        Err(e) => json!({ "e": error_to_wire(&e) }),
    };
    reply.to_string()
}

fn handle(realm: &Mutex<Realm>, payload: &str) -> Result<Value, JsError> {
    let request: HostRequest = serde_json::from_str(payload)?;
    let args: Vec<JsValue> = request.args.iter().map(from_wire).collect();
    let this = request.this.map(WrapperId);

    let mut realm = lock(realm)?;
    let Some(kind) = request.op.kind() else {
        if let Some(id) = this {
            realm.release(id);
        }
        return Ok(Value::Null);
    };
    let value = realm.invoke_declared(&request.cls, &request.name, kind, this, &args)?;
    Ok(to_wire(&value, &realm))
}

// --- Wire format ---

fn from_wire(value: &Value) -> JsValue {
    match value {
        Value::Null => JsValue::Null,
        Value::Bool(b) => JsValue::Bool(*b),
        Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => JsValue::String(s.clone()),
        Value::Array(items) => JsValue::Dictionary(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), from_wire(v)))
                .collect(),
        ),
        Value::Object(fields) => match fields.get("t").and_then(Value::as_str) {
            Some("n") => {
                let n = match fields.get("v").and_then(Value::as_str) {
                    Some("Infinity") => f64::INFINITY,
                    Some("-Infinity") => f64::NEG_INFINITY,
                    _ => f64::NAN,
                };
                JsValue::Number(n)
            }
            Some("o") => match fields.get("id").and_then(Value::as_u64) {
                Some(id) => JsValue::Object(WrapperId(id as u32)),
                None => JsValue::Undefined,
            },
            Some("d") => match fields.get("v") {
                Some(Value::Object(entries)) => {
                    JsValue::Dictionary(entries.iter().map(|(k, v)| (k.clone(), from_wire(v))).collect())
                }
                _ => JsValue::Dictionary(Vec::new()),
            },
            _ => JsValue::Undefined,
        },
    }
}

fn to_wire(value: &JsValue, realm: &Realm) -> Value {
    match value {
        JsValue::Undefined => json!({ "t": "u" }),
        JsValue::Null => Value::Null,
        JsValue::Bool(b) => Value::Bool(*b),
        JsValue::Number(n) if n.is_finite() => json!(n),
        JsValue::Number(n) => json!({ "t": "n", "v": crate::value::format_number(*n) }),
        JsValue::String(s) => Value::String(s.clone()),
        JsValue::Object(id) => json!({
            "t": "o",
            "id": id.index(),
            "cls": realm.wrappers().class_of(*id).unwrap_or("Object"),
            "weak": realm.native_for(*id).is_some_and(NativeRef::is_script_owned),
        }),
        JsValue::Dictionary(entries) => {
            let fields: Map<String, Value> = entries.iter().map(|(k, v)| (k.clone(), to_wire(v, realm))).collect();
            json!({ "t": "d", "v": fields })
        }
    }
}

fn error_to_wire(error: &JsError) -> Value {
    let kind = match error {
        JsError::Dom { .. } => "dom",
        JsError::TypeError(_) => "type",
        JsError::Reference(_) => "reference",
        JsError::Syntax(_) => "syntax",
        JsError::Runtime(_) => "error",
    };
    json!({
        "kind": kind,
        "name": error.name(),
        "code": error.code().unwrap_or(0),
        "message": error.message(),
    })
}

fn error_from_wire(error: &Value) -> JsError {
    let field = |name: &str| error.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    let message = field("message");
    match error.get("kind").and_then(Value::as_str) {
        Some("dom") => JsError::Dom {
            name: field("name"),
            code: error.get("code").and_then(Value::as_u64).unwrap_or(0) as u16,
            message,
        },
        Some("type") => JsError::TypeError(message),
        Some("reference") => JsError::Reference(message),
        Some("syntax") => JsError::Syntax(message),
        _ => {
            let name = field("name");
            if name.is_empty() || name == "Error" {
                JsError::Runtime(message)
            } else {
                JsError::Runtime(format!("{}: {}", name, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip_special_values() {
        let nan = from_wire(&json!({ "t": "n", "v": "NaN" }));
        assert!(nan.as_number().unwrap().is_nan());
        assert_eq!(from_wire(&json!({ "t": "n", "v": "-Infinity" })), JsValue::Number(f64::NEG_INFINITY));
        assert_eq!(from_wire(&json!({ "t": "u" })), JsValue::Undefined);
        assert_eq!(from_wire(&json!({ "t": "o", "id": 7, "cls": "Range" })), JsValue::Object(WrapperId(7)));

        let dict = from_wire(&json!({ "t": "d", "v": { "bubbles": true } }));
        assert_eq!(dict.member("bubbles"), Some(&JsValue::Bool(true)));
    }

    #[test]
    fn test_error_wire_format() {
        let err = JsError::from(emu_dom::DomException::IndexSize("Invalid range index: 0".to_string()));
        let wire = error_to_wire(&err);
        assert_eq!(wire["kind"], "dom");
        assert_eq!(wire["code"], 1);
        assert_eq!(error_from_wire(&wire), err);

        let custom = error_from_wire(&json!({ "kind": "error", "name": "RangeError", "message": "bad" }));
        assert_eq!(custom, JsError::Runtime("RangeError: bad".to_string()));
    }
}
