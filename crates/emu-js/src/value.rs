//! Script values crossing the host boundary

use crate::WrapperId;

/// JavaScript value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A host object, by wrapper identity
    Object(WrapperId),
    /// A plain script object, flattened to its own enumerable properties
    Dictionary(Vec<(String, JsValue)>),
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<WrapperId> {
        match self {
            JsValue::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Property of a dictionary value
    pub fn member(&self, key: &str) -> Option<&JsValue> {
        match self {
            JsValue::Dictionary(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// `typeof`
    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null | JsValue::Object(_) | JsValue::Dictionary(_) => "object",
            JsValue::Bool(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
        }
    }

    /// ECMAScript `ToBoolean`
    pub fn to_boolean(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Bool(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Object(_) | JsValue::Dictionary(_) => true,
        }
    }

    /// ECMAScript `ToNumber` for primitives; objects are NaN
    pub fn to_number(&self) -> f64 {
        match self {
            JsValue::Undefined => f64::NAN,
            JsValue::Null => 0.0,
            JsValue::Bool(b) => f64::from(u8::from(*b)),
            JsValue::Number(n) => *n,
            JsValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            JsValue::Object(_) | JsValue::Dictionary(_) => f64::NAN,
        }
    }

    /// ECMAScript `ToInt32`
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// ECMAScript `ToUint32`
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    /// ECMAScript `ToString` for primitives
    pub fn to_js_string(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_string(),
            JsValue::Null => "null".to_string(),
            JsValue::Bool(b) => b.to_string(),
            JsValue::Number(n) => format_number(*n),
            JsValue::String(s) => s.clone(),
            JsValue::Object(_) | JsValue::Dictionary(_) => "[object Object]".to_string(),
        }
    }
}

/// Number to string the way script prints it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Bool(b)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<u32> for JsValue {
    fn from(n: u32) -> Self {
        JsValue::Number(f64::from(n))
    }
}

impl From<i32> for JsValue {
    fn from(n: i32) -> Self {
        JsValue::Number(f64::from(n))
    }
}

impl From<usize> for JsValue {
    fn from(n: usize) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(s.to_string())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(s)
    }
}

impl From<WrapperId> for JsValue {
    fn from(id: WrapperId) -> Self {
        JsValue::Object(id)
    }
}

/// `None` becomes `null`
impl<T: Into<JsValue>> From<Option<T>> for JsValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(JsValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string() {
        assert_eq!(JsValue::Number(3.0).to_js_string(), "3");
        assert_eq!(JsValue::Number(0.5).to_js_string(), "0.5");
        assert_eq!(JsValue::Number(f64::NAN).to_js_string(), "NaN");
        assert_eq!(JsValue::Null.to_js_string(), "null");
        assert_eq!(JsValue::from(None::<&str>), JsValue::Null);
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(JsValue::Number(-1.0).to_uint32(), u32::MAX);
        assert_eq!(JsValue::Number(-1.0).to_int32(), -1);
        assert_eq!(JsValue::from("  42 ").to_int32(), 42);
        assert_eq!(JsValue::Undefined.to_int32(), 0);
        assert_eq!(JsValue::Number(2.9).to_uint32(), 2);
    }

    #[test]
    fn test_dictionary_member() {
        let dict = JsValue::Dictionary(vec![("bubbles".to_string(), JsValue::Bool(true))]);
        assert_eq!(dict.member("bubbles"), Some(&JsValue::Bool(true)));
        assert_eq!(dict.member("cancelable"), None);
        assert!(dict.to_boolean());
    }
}
