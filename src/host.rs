//! Host bridge: the verbs a BotScript program dispatches to the embedding
//! bot (`say`, `move`, `goto`, `attack`, `dig`, `place`, `wait`, `equip`,
//! `drop`). The actual bot connection, chat plumbing, and world state live
//! outside this crate; [`Host`] is the seam a caller implements to wire one
//! up. [`MockHost`] is the one provided here, for running and testing
//! scripts with no bot attached.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::ast::Value;
use crate::error::{BotScriptError, Result};

/// Default per-verb timeout before a host call is abandoned as a (non-catchable) timeout.
pub const DEFAULT_VERB_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can execute a host verb. Implementations decide what each
/// verb means against their own bot/world state; this crate only enforces
/// that the verb is known and its arity matches.
pub trait Host {
    fn call(&mut self, verb: &str, args: &[Value]) -> Result<Value>;
}

/// Static description of one host verb's argument contract.
pub struct VerbSpec {
    pub name: &'static str,
    pub arity: RangeInclusive<usize>,
}

/// The nine verbs a BotScript program may invoke, in the order `say` is the
/// most common and `drop` the least constrained.
pub const VERBS: &[VerbSpec] = &[
    VerbSpec { name: "say", arity: 1..=1 },
    VerbSpec { name: "move", arity: 1..=3 },
    VerbSpec { name: "goto", arity: 3..=3 },
    VerbSpec { name: "attack", arity: 0..=1 },
    VerbSpec { name: "dig", arity: 0..=1 },
    VerbSpec { name: "place", arity: 1..=1 },
    VerbSpec { name: "wait", arity: 1..=1 },
    VerbSpec { name: "equip", arity: 1..=1 },
    VerbSpec { name: "drop", arity: 0..=1 },
];

pub fn verb_spec(name: &str) -> Option<&'static VerbSpec> {
    VERBS.iter().find(|v| v.name == name)
}

fn check_arity(spec: &VerbSpec, args: &[Value]) -> Result<()> {
    if spec.arity.contains(&args.len()) {
        Ok(())
    } else {
        Err(BotScriptError::ArityMismatch(format!(
            "'{}' expects {}..={} arguments, got {}",
            spec.name,
            spec.arity.start(),
            spec.arity.end(),
            args.len()
        )))
    }
}

/// A host with nothing behind it: every verb is validated for arity and
/// then logged, returning `null`. Lets a script run to completion (and its
/// tests pass) without a live bot connection.
pub struct MockHost;

impl Host for MockHost {
    fn call(&mut self, verb: &str, args: &[Value]) -> Result<Value> {
        let spec = verb_spec(verb)
            .ok_or_else(|| BotScriptError::HostError(format!("unknown host verb '{}'", verb)))?;
        check_arity(spec, args)?;
        log::info!("host::{} {:?}", verb, args);
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_host_accepts_say_with_one_argument() {
        let mut host = MockHost;
        let result = host.call("say", &[Value::String("hi".to_string())]);
        assert!(result.is_ok());
    }

    #[test]
    fn mock_host_rejects_wrong_arity() {
        let mut host = MockHost;
        let err = host.call("goto", &[Value::Integer(1)]).unwrap_err();
        assert_eq!(err.kind(), "arity_mismatch");
    }

    #[test]
    fn mock_host_rejects_unknown_verb() {
        let mut host = MockHost;
        let err = host.call("teleport", &[]).unwrap_err();
        assert_eq!(err.kind(), "host_error");
        assert!(err.catchable());
    }
}
