//! Console API
//!
//! Implements console.log, console.warn, console.error, etc. on top of
//! `tracing`.

use std::fmt::Write;

use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Value};

const LEVELS: [&str; 5] = ["log", "info", "warn", "error", "debug"];

/// Install console API into the global object
pub fn install_console(ctx: &Ctx) -> Result<(), rquickjs::Error> {
    let console = Object::new(ctx.clone())?;

    for level in LEVELS {
        console.set(
            level,
            Function::new(ctx.clone(), move |_ctx: Ctx, args: Rest<Value>| {
                log_with_level(level, &args.0);
                Ok::<(), rquickjs::Error>(())
            })?,
        )?;
    }

    ctx.globals().set("console", console)?;
    Ok(())
}

/// Log values with a specific level
fn log_with_level(level: &str, values: &[Value]) {
    let mut output = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        format_value(&mut output, value);
    }

    match level {
        "error" => tracing::error!("[JS] {}", output),
        "warn" => tracing::warn!("[JS] {}", output),
        "debug" => tracing::debug!("[JS] {}", output),
        _ => tracing::info!("[JS] {}", output),
    }
}

/// Format a JavaScript value for logging
fn format_value(out: &mut String, value: &Value) {
    if value.is_undefined() {
        out.push_str("undefined");
    } else if value.is_null() {
        out.push_str("null");
    } else if let Some(b) = value.as_bool() {
        write!(out, "{}", b).ok();
    } else if let Some(n) = value.as_int() {
        write!(out, "{}", n).ok();
    } else if let Some(n) = value.as_float() {
        out.push_str(&crate::value::format_number(n));
    } else if let Some(s) = value.as_string() {
        if let Ok(s) = s.to_string() {
            out.push_str(&s);
        }
    } else if value.is_array() {
        out.push_str("[Array]");
    } else if value.is_function() {
        out.push_str("[Function]");
    } else if value.is_object() {
        out.push_str("[Object]");
    } else {
        out.push_str("[unknown]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rquickjs::{Context, Runtime};

    #[test]
    fn test_console_levels() {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();

        context.with(|ctx| {
            install_console(&ctx).unwrap();
            let _: Value = ctx
                .eval("console.log('Hello', 42, 1.5, true, null); console.warn('warn'); console.error('error'); console.debug([1])")
                .unwrap();
        });
    }

    #[test]
    fn test_format_value() {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();

        context.with(|ctx| {
            let mut out = String::new();
            let value: Value = ctx.eval("2.5").unwrap();
            format_value(&mut out, &value);
            assert_eq!(out, "2.5");
        });
    }
}
