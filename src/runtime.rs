//! Owns the single current script execution: the cooperative cancellation
//! flag and the counters a caller polls through [`ScriptRuntime::status`].
//! This replaces the teacher's OS-process daemon (a PID file plus SIGTERM)
//! with an in-process "current execution" context — there is no
//! subprocess to manage, so stopping a script means flipping a flag the
//! evaluator checks at its own suspension points (`src/interpreter.rs`).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crate::error::{BotScriptError, Diagnostic, Result};
use crate::host::Host;
use crate::interpreter::{Interpreter, StackFrame, DEFAULT_MAX_CALL_DEPTH};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::store::ScriptStore;

/// Outcome of one `execute_source` call.
#[derive(Debug)]
pub struct ExecutionResult {
    pub statements_executed: u64,
    pub commands_executed: u64,
    pub elapsed_ms: u128,
    pub diagnostics: Vec<Diagnostic>,
    pub error: Option<BotScriptError>,
    /// The call chain at the point `error` was raised, innermost call
    /// first. Empty unless `error` is an uncaught runtime error that
    /// unwound through at least one user function call (§3, §7).
    pub stack_trace: Vec<StackFrame>,
}

impl ExecutionResult {
    /// Success requires zero unrecovered runtime errors (parse errors
    /// already refuse execution before this result is built).
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Snapshot returned by [`ScriptRuntime::status`].
#[derive(Debug, Clone, Copy)]
pub struct RuntimeStatus {
    pub running: bool,
    pub statements_executed: u64,
    pub commands_executed: u64,
}

/// Owns the one execution a host may have in flight at a time. `execute_source`
/// rejects (`busy`) rather than queues when another is already active — this
/// crate never runs two scripts concurrently on the same runtime (§5/§8 P8).
pub struct ScriptRuntime {
    running: AtomicBool,
    cancelled: AtomicBool,
    statements_executed: AtomicU64,
    commands_executed: AtomicU64,
    max_call_depth: usize,
}

impl ScriptRuntime {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            statements_executed: AtomicU64::new(0),
            commands_executed: AtomicU64::new(0),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Parses and runs `source` against `host`. Lexing and parsing always
    /// run; execution is refused (a `parse_error` result, not an `Err`) if
    /// the parse produced any diagnostic, per §7 — lex errors alone do not
    /// block execution as long as parsing subsequently has none.
    pub fn execute_source(&self, source: &str, host: &mut dyn Host) -> Result<ExecutionResult> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(BotScriptError::HostError("a script is already running".to_string()));
        }

        let result = self.execute_inner(source, host);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Fetches `name` from `store` and runs it, per §6's `load_and_execute`.
    /// A failure to find the script surfaces as an `Err` before any frame is
    /// allocated — there is nothing to parse yet.
    pub fn load_and_execute(
        &self,
        store: &dyn ScriptStore,
        name: &str,
        host: &mut dyn Host,
    ) -> Result<ExecutionResult> {
        let source = store.load(name)?;
        self.execute_source(&source, host)
    }

    fn execute_inner(&self, source: &str, host: &mut dyn Host) -> Result<ExecutionResult> {
        self.cancelled.store(false, Ordering::SeqCst);
        let started = Instant::now();

        let (tokens, lex_diagnostics) = Lexer::new(source).tokenize();
        let (program, parse_diagnostics) = Parser::new(tokens).parse();

        let mut diagnostics = lex_diagnostics;
        diagnostics.extend(parse_diagnostics.iter().cloned());

        if !parse_diagnostics.is_empty() {
            return Ok(ExecutionResult {
                statements_executed: 0,
                commands_executed: 0,
                elapsed_ms: started.elapsed().as_millis(),
                diagnostics,
                error: Some(BotScriptError::ParseError(
                    "refusing to execute a program with parse errors".to_string(),
                )),
                stack_trace: Vec::new(),
            });
        }

        let mut interpreter =
            Interpreter::new(host, &self.cancelled).with_max_call_depth(self.max_call_depth);
        let outcome = interpreter.run(&program);

        let statements_executed = interpreter.statement_count();
        let commands_executed = interpreter.command_count();
        self.statements_executed.store(statements_executed, Ordering::SeqCst);
        self.commands_executed.store(commands_executed, Ordering::SeqCst);
        let stack_trace = interpreter.stack_trace().to_vec();

        if let Err(err) = &outcome {
            // The innermost call's span is the closest thing to "where this
            // happened" an error without its own span has; top-level errors
            // (empty trace) fall back to the start of the source.
            let span = stack_trace
                .first()
                .map(|frame| frame.span)
                .unwrap_or_else(|| crate::ast::Span::new(1, 1, 0, 0));
            diagnostics.push(Diagnostic::new(span, format!("{}: {}", err.kind(), err)));
        }

        Ok(ExecutionResult {
            statements_executed,
            commands_executed,
            elapsed_ms: started.elapsed().as_millis(),
            diagnostics,
            stack_trace,
            error: outcome.err(),
        })
    }

    pub fn status(&self) -> RuntimeStatus {
        RuntimeStatus {
            running: self.running.load(Ordering::SeqCst),
            statements_executed: self.statements_executed.load(Ordering::SeqCst),
            commands_executed: self.commands_executed.load(Ordering::SeqCst),
        }
    }

    /// Requests cancellation of the in-flight execution, if any. The
    /// evaluator observes this at its next suspension point (§5, P7).
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Default for ScriptRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    #[test]
    fn clean_run_reports_statement_and_command_counts() {
        let runtime = ScriptRuntime::new();
        let mut host = MockHost;
        let result = runtime.execute_source("def $x = 1\nsay $x", &mut host).unwrap();
        assert!(result.succeeded());
        assert_eq!(result.commands_executed, 1);
        assert!(result.statements_executed >= 2);
    }

    #[test]
    fn uncaught_runtime_error_is_recorded_as_a_diagnostic() {
        let runtime = ScriptRuntime::new();
        let mut host = MockHost;
        let result = runtime.execute_source("def $z = $undefined + 1", &mut host).unwrap();
        assert!(!result.succeeded());
        assert_eq!(result.error.as_ref().map(|e| e.kind()), Some("undefined_variable"));
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("undefined_variable"));
        assert_eq!(result.commands_executed, 0);
    }

    #[test]
    fn parse_errors_refuse_execution_without_running_the_host() {
        let runtime = ScriptRuntime::new();
        let mut host = MockHost;
        let result = runtime.execute_source("if true\n  say \"no endif\"", &mut host).unwrap();
        assert!(!result.succeeded());
        assert_eq!(result.commands_executed, 0);
    }

    #[test]
    fn load_and_execute_runs_a_previously_saved_script() {
        use crate::store::{JsonFileStore, ScriptStore};

        let mut path = std::env::temp_dir();
        path.push(format!("botscript-test-load-and-execute-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::at_path(path);
        store.save("greeter", "def $x = 1\nsay $x").unwrap();

        let runtime = ScriptRuntime::new();
        let mut host = MockHost;
        let result = runtime.load_and_execute(&store, "greeter", &mut host).unwrap();
        assert!(result.succeeded());
        assert_eq!(result.commands_executed, 1);
    }

    #[test]
    fn stop_cancels_an_infinite_loop() {
        use crate::ast::Value;
        use std::cell::Cell;

        // Stops the runtime as soon as the loop's first host call lands,
        // so the cancellation check on the next `while` iteration catches it.
        struct StoppingHost<'a> {
            runtime: &'a ScriptRuntime,
            calls: Cell<u32>,
        }

        impl<'a> Host for StoppingHost<'a> {
            fn call(&mut self, _verb: &str, _args: &[Value]) -> Result<Value> {
                self.calls.set(self.calls.get() + 1);
                if self.calls.get() == 1 {
                    self.runtime.stop();
                }
                Ok(Value::Null)
            }
        }

        let runtime = ScriptRuntime::new();
        let mut host = StoppingHost {
            runtime: &runtime,
            calls: Cell::new(0),
        };
        let result = runtime
            .execute_source("while true\n  say \"spin\"\nendwhile", &mut host)
            .unwrap();
        assert_eq!(result.error.as_ref().map(|e| e.kind()), Some("cancelled"));
    }
}
