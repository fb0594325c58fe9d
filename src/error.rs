//! Error handling for the BotScript language.
//!
//! Errors are organized by the phase that raises them (lex, parse, runtime)
//! and, for runtime errors, by whether a script's own `try/catch` may
//! recover from them. `catchable()` is the single source of truth the
//! evaluator consults — see the error taxonomy.

use std::fmt;
use std::error::Error;

use crate::ast::Span;

/// Comprehensive error type for all BotScript operations.
#[derive(Debug, Clone)]
pub enum BotScriptError {
    /// Lexical error: invalid characters, malformed numbers, bad escapes.
    LexError(String),
    /// Syntax error during parsing.
    ParseError(String),
    /// General runtime error that doesn't fit a more specific category.
    RuntimeError(String),
    /// Type mismatch or invalid type operation.
    TypeError(String),
    /// Mathematical division or modulo by zero.
    DivisionByZero,
    /// Reference to a variable that hasn't been declared or is out of scope.
    UndefinedVariable(String),
    /// Call to a function that doesn't exist.
    UndefinedFunction(String),
    /// Wrong number of arguments passed to a function or host action.
    ArityMismatch(String),
    /// Host bridge refused or failed an action (bot disconnected, invalid
    /// state, bad arguments for the verb).
    HostError(String),
    /// Call stack exceeded its configured maximum depth.
    StackOverflow,
    /// A per-action or whole-script timeout elapsed.
    Timeout(String),
    /// Execution was stopped via a cooperative cancellation request.
    Cancelled,
    /// File system or I/O operation error.
    IOError(String),
}

impl BotScriptError {
    /// Whether a `try/catch` in the running script may intercept this
    /// error. Pre-execution errors (lex/parse) and fatal conditions
    /// (timeout, stack overflow, cancellation) are never catchable.
    pub fn catchable(&self) -> bool {
        matches!(
            self,
            BotScriptError::RuntimeError(_)
                | BotScriptError::TypeError(_)
                | BotScriptError::DivisionByZero
                | BotScriptError::UndefinedVariable(_)
                | BotScriptError::UndefinedFunction(_)
                | BotScriptError::ArityMismatch(_)
                | BotScriptError::HostError(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BotScriptError::LexError(_) => "lex_error",
            BotScriptError::ParseError(_) => "parse_error",
            BotScriptError::RuntimeError(_) => "runtime_error",
            BotScriptError::TypeError(_) => "type_error",
            BotScriptError::DivisionByZero => "division_by_zero",
            BotScriptError::UndefinedVariable(_) => "undefined_variable",
            BotScriptError::UndefinedFunction(_) => "undefined_function",
            BotScriptError::ArityMismatch(_) => "arity_mismatch",
            BotScriptError::HostError(_) => "host_error",
            BotScriptError::StackOverflow => "stack_overflow",
            BotScriptError::Timeout(_) => "timeout",
            BotScriptError::Cancelled => "cancelled",
            BotScriptError::IOError(_) => "io_error",
        }
    }
}

impl fmt::Display for BotScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BotScriptError::LexError(msg) => write!(f, "Lexical error: {}", msg),
            BotScriptError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            BotScriptError::RuntimeError(msg) => write!(f, "Runtime error: {}", msg),
            BotScriptError::TypeError(msg) => write!(f, "Type error: {}", msg),
            BotScriptError::DivisionByZero => write!(f, "Division by zero"),
            BotScriptError::UndefinedVariable(name) => write!(f, "Undefined variable: {}", name),
            BotScriptError::UndefinedFunction(name) => write!(f, "Undefined function: {}", name),
            BotScriptError::ArityMismatch(msg) => write!(f, "Arity mismatch: {}", msg),
            BotScriptError::HostError(msg) => write!(f, "Host error: {}", msg),
            BotScriptError::StackOverflow => write!(f, "Call stack exceeded maximum depth"),
            BotScriptError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            BotScriptError::Cancelled => write!(f, "Execution cancelled"),
            BotScriptError::IOError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl Error for BotScriptError {}

impl From<std::io::Error> for BotScriptError {
    fn from(err: std::io::Error) -> Self {
        BotScriptError::IOError(err.to_string())
    }
}

impl From<serde_json::Error> for BotScriptError {
    fn from(err: serde_json::Error) -> Self {
        BotScriptError::IOError(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BotScriptError>;

/// A single recoverable problem found during lexing or parsing, with enough
/// context to show the user where it happened without aborting the pass.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}
