//! Built-in functions for BotScript.
//!
//! These are native Rust functions callable by name from a script, distinct
//! from user-defined `function`s (which live in the environment as
//! closures) and from host verbs (which dispatch through [`crate::host`]).
//! Builtins never touch the environment or the host bridge — they are pure
//! functions over [`Value`]s.

use std::collections::HashMap;

use crate::ast::Value;
use crate::error::{BotScriptError, Result};

/// Registry of built-in functions available to a script.
pub struct Builtins {
    functions: HashMap<&'static str, fn(&[Value]) -> Result<Value>>,
}

impl Builtins {
    pub fn new() -> Self {
        let mut functions: HashMap<&'static str, fn(&[Value]) -> Result<Value>> = HashMap::new();

        functions.insert("print", print_fn);
        functions.insert("len", len_fn);
        functions.insert("type", type_fn);

        functions.insert("math_random", math_random);
        functions.insert("math_floor", math_floor);
        functions.insert("math_ceil", math_ceil);
        functions.insert("math_abs", math_abs);
        functions.insert("math_sin", math_sin);
        functions.insert("math_cos", math_cos);
        functions.insert("math_sqrt", math_sqrt);
        functions.insert("math_atan2", math_atan2);

        Self { functions }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        self.functions.get(name).map(|func| func(args))
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_arity(name: &str, args: &[Value], count: usize) -> Result<()> {
    if args.len() != count {
        return Err(BotScriptError::ArityMismatch(format!(
            "'{}' expects {} argument(s), got {}",
            name,
            count,
            args.len()
        )));
    }
    Ok(())
}

fn expect_number(name: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| BotScriptError::TypeError(format!("'{}' expects a number, got {}", name, value.type_name())))
}

/// `print(value)` — writes the value's display form to stdout.
fn print_fn(args: &[Value]) -> Result<Value> {
    expect_arity("print", args, 1)?;
    println!("{}", args[0]);
    Ok(Value::Null)
}

/// `len(value)` — length of a string, in bytes-agnostic character count.
fn len_fn(args: &[Value]) -> Result<Value> {
    expect_arity("len", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
        other => Err(BotScriptError::TypeError(format!(
            "'len' expects a string, got {}",
            other.type_name()
        ))),
    }
}

/// `type(value)` — the runtime type name of a value, as used in diagnostics.
fn type_fn(args: &[Value]) -> Result<Value> {
    expect_arity("type", args, 1)?;
    Ok(Value::String(args[0].type_name().to_string()))
}

/// `math_random()` — a uniform float in `[0, 1)`.
fn math_random(args: &[Value]) -> Result<Value> {
    expect_arity("math_random", args, 0)?;
    use rand::Rng;
    let mut rng = rand::thread_rng();
    Ok(Value::Float(rng.gen::<f64>()))
}

fn math_floor(args: &[Value]) -> Result<Value> {
    expect_arity("math_floor", args, 1)?;
    Ok(Value::Float(expect_number("math_floor", &args[0])?.floor()))
}

fn math_ceil(args: &[Value]) -> Result<Value> {
    expect_arity("math_ceil", args, 1)?;
    Ok(Value::Float(expect_number("math_ceil", &args[0])?.ceil()))
}

fn math_abs(args: &[Value]) -> Result<Value> {
    expect_arity("math_abs", args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.abs())),
        other => Ok(Value::Float(expect_number("math_abs", other)?.abs())),
    }
}

fn math_sin(args: &[Value]) -> Result<Value> {
    expect_arity("math_sin", args, 1)?;
    Ok(Value::Float(expect_number("math_sin", &args[0])?.sin()))
}

fn math_cos(args: &[Value]) -> Result<Value> {
    expect_arity("math_cos", args, 1)?;
    Ok(Value::Float(expect_number("math_cos", &args[0])?.cos()))
}

fn math_sqrt(args: &[Value]) -> Result<Value> {
    expect_arity("math_sqrt", args, 1)?;
    let n = expect_number("math_sqrt", &args[0])?;
    if n < 0.0 {
        return Err(BotScriptError::RuntimeError("math_sqrt of a negative number".to_string()));
    }
    Ok(Value::Float(n.sqrt()))
}

fn math_atan2(args: &[Value]) -> Result<Value> {
    expect_arity("math_atan2", args, 2)?;
    let y = expect_number("math_atan2", &args[0])?;
    let x = expect_number("math_atan2", &args[1])?;
    Ok(Value::Float(y.atan2(x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_characters_not_bytes() {
        let builtins = Builtins::new();
        let result = builtins.call("len", &[Value::String("héllo".to_string())]).unwrap().unwrap();
        assert_eq!(result, Value::Integer(5));
    }

    #[test]
    fn math_abs_preserves_integer_type() {
        let builtins = Builtins::new();
        let result = builtins.call("math_abs", &[Value::Integer(-7)]).unwrap().unwrap();
        assert_eq!(result, Value::Integer(7));
    }

    #[test]
    fn math_sqrt_rejects_negative_input() {
        let builtins = Builtins::new();
        let err = builtins.call("math_sqrt", &[Value::Integer(-1)]).unwrap().unwrap_err();
        assert_eq!(err.kind(), "runtime_error");
    }

    #[test]
    fn unknown_function_is_not_registered() {
        let builtins = Builtins::new();
        assert!(!builtins.has_function("add_frame"));
        assert!(builtins.call("add_frame", &[]).is_none());
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let builtins = Builtins::new();
        let err = builtins.call("len", &[]).unwrap().unwrap_err();
        assert_eq!(err.kind(), "arity_mismatch");
    }
}
