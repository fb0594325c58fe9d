//! Lexically-scoped environment for BotScript.
//!
//! Frames are allocated in an arena owned by the single active execution
//! rather than linked through `Rc<RefCell<_>>`. A function's closure is just
//! a [`FrameId`] — a plain index — so a declaration can point at a frame
//! that (transitively) contains the declaration itself without creating a
//! reference-counted cycle anyone has to break by hand. The whole arena is
//! dropped at the end of one execution, taking every frame (and every
//! cycle) with it.

use std::collections::HashMap;

use crate::ast::Value;
use crate::error::{BotScriptError, Result};

/// A handle to a frame inside an [`Environment`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

struct FrameData {
    bindings: HashMap<String, Value>,
    parent: Option<FrameId>,
}

/// Arena of scope frames, chained by parent handles.
///
/// One `Environment` backs one execution. `push_child`/new frames are never
/// freed individually — they live until the whole `Environment` is dropped,
/// which is also how the object graph's closure cycles are broken (see
/// DESIGN.md).
pub struct Environment {
    frames: Vec<FrameData>,
}

impl Environment {
    /// Creates the global frame. Builtins are installed separately by the
    /// interpreter via repeated `define` calls on the returned root id.
    pub fn new_global() -> (Self, FrameId) {
        let mut env = Self { frames: Vec::new() };
        let root = env.push_child(None);
        (env, root)
    }

    /// Allocates a new frame parented to `parent` (or root if `None`).
    pub fn push_child(&mut self, parent: Option<FrameId>) -> FrameId {
        self.frames.push(FrameData {
            bindings: HashMap::new(),
            parent,
        });
        FrameId(self.frames.len() - 1)
    }

    /// Defines or overwrites `name` in `frame`'s own bindings — never walks
    /// the parent chain.
    pub fn define(&mut self, frame: FrameId, name: impl Into<String>, value: Value) {
        self.frames[frame.0].bindings.insert(name.into(), value);
    }

    /// Walks the parent chain starting at `frame` for the first binding of
    /// `name`.
    pub fn get(&self, frame: FrameId, name: &str) -> Result<Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let data = &self.frames[id.0];
            if let Some(value) = data.bindings.get(name) {
                return Ok(value.clone());
            }
            current = data.parent;
        }
        Err(BotScriptError::UndefinedVariable(name.to_string()))
    }

    /// Walks the parent chain starting at `frame` and mutates the first
    /// frame that already has a binding for `name`. Never creates one.
    pub fn assign(&mut self, frame: FrameId, name: &str, value: Value) -> Result<()> {
        let mut current = Some(frame);
        while let Some(id) = current {
            if self.frames[id.0].bindings.contains_key(name) {
                self.frames[id.0].bindings.insert(name.to_string(), value);
                return Ok(());
            }
            current = self.frames[id.0].parent;
        }
        Err(BotScriptError::UndefinedVariable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_is_local_to_the_current_frame() {
        let (mut env, global) = Environment::new_global();
        env.define(global, "x", Value::Integer(1));
        let child = env.push_child(Some(global));
        env.define(child, "x", Value::Integer(2));

        assert_eq!(env.get(child, "x").unwrap(), Value::Integer(2));
        assert_eq!(env.get(global, "x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn assign_mutates_the_defining_frame_not_a_shadow() {
        let (mut env, global) = Environment::new_global();
        env.define(global, "x", Value::Integer(1));
        let child = env.push_child(Some(global));

        env.assign(child, "x", Value::Integer(9)).unwrap();
        assert_eq!(env.get(global, "x").unwrap(), Value::Integer(9));
    }

    #[test]
    fn assign_to_undefined_name_errors() {
        let (mut env, global) = Environment::new_global();
        let err = env.assign(global, "nope", Value::Null).unwrap_err();
        assert_eq!(err.kind(), "undefined_variable");
    }

    #[test]
    fn closures_keep_their_declaring_frame_addressable() {
        let (mut env, global) = Environment::new_global();
        env.define(global, "n", Value::Integer(1));
        let closure_frame = env.push_child(Some(global));
        env.assign(global, "n", Value::Integer(42)).unwrap();

        // The closure frame can still see the mutated outer binding.
        assert_eq!(env.get(closure_frame, "n").unwrap(), Value::Integer(42));
    }
}
