//! Tree-walking interpreter for BotScript.
//!
//! Statements and expressions are evaluated directly against the AST — no
//! bytecode pass. Variable scope is an [`Environment`] arena addressed by
//! [`FrameId`] handles; function calls push a new frame parented at the
//! function's closure (not the caller's frame), which is what makes
//! closures capture their declaring scope rather than their call site.
//!
//! Two things keep a runaway script from hanging the process: a bounded
//! call stack (`max_call_depth`, default [`DEFAULT_MAX_CALL_DEPTH`]) turns
//! unbounded recursion into a catchable `stack_overflow`, and a cooperative
//! cancellation check every [`YIELD_EVERY`] statements lets a caller stop
//! execution between ticks without needing `async`.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ast::*;
use crate::builtins::Builtins;
use crate::environment::{Environment, FrameId};
use crate::error::{BotScriptError, Result};
use crate::host::Host;

/// Default maximum call depth before recursion is treated as a stack overflow.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// How many statements run between cooperative cancellation checks.
const YIELD_EVERY: u64 = 1000;

/// Internal control-flow signal distinct from any script-visible [`Value`].
enum Signal {
    None,
    Return(Value),
}

/// One entry of the call stack an uncaught error reports back (§3, §7):
/// the function that was executing and the span of the call that entered
/// it.
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub span: Span,
}

/// Executes a parsed [`Program`] against a host bridge.
pub struct Interpreter<'a> {
    env: Environment,
    global: FrameId,
    builtins: Builtins,
    host: &'a mut dyn Host,
    cancelled: &'a AtomicBool,
    max_call_depth: usize,
    call_depth: usize,
    statement_count: u64,
    command_count: u64,
    /// Built bottom-up as an error unwinds through `call_function`: the
    /// innermost call appends first, so by the time it reaches the top
    /// level this is the full call chain at the point the error was
    /// raised. Cleared whenever a `try/catch` recovers the error it
    /// belongs to (see `StatementKind::Try`).
    trace: Vec<StackFrame>,
}

impl<'a> Interpreter<'a> {
    pub fn new(host: &'a mut dyn Host, cancelled: &'a AtomicBool) -> Self {
        let (env, global) = Environment::new_global();
        Self {
            env,
            global,
            builtins: Builtins::new(),
            host,
            cancelled,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
            statement_count: 0,
            command_count: 0,
            trace: Vec::new(),
        }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// How many statements this interpreter has executed so far.
    pub fn statement_count(&self) -> u64 {
        self.statement_count
    }

    /// How many host verbs this interpreter has dispatched so far.
    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    /// The call stack captured at the point the program's final error (if
    /// any) was raised, innermost frame first. Empty if the program
    /// succeeded or the error was caught.
    pub fn stack_trace(&self) -> &[StackFrame] {
        &self.trace
    }

    /// Runs every top-level statement in order. A `return` reaching the top
    /// level simply ends the program early — there is no caller to receive
    /// the value.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        let global = self.global;
        match self.exec_block(&program.statements, global)? {
            Signal::None | Signal::Return(_) => Ok(()),
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            Err(BotScriptError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.statement_count += 1;
        if self.statement_count % YIELD_EVERY == 0 {
            self.check_cancelled()?;
        }
        Ok(())
    }

    fn exec_block(&mut self, stmts: &[Statement], frame: FrameId) -> Result<Signal> {
        for stmt in stmts {
            match self.exec_stmt(stmt, frame)? {
                Signal::None => {}
                signal @ Signal::Return(_) => return Ok(signal),
            }
        }
        Ok(Signal::None)
    }

    fn exec_stmt(&mut self, stmt: &Statement, frame: FrameId) -> Result<Signal> {
        self.tick()?;
        match &stmt.kind {
            StatementKind::VarDecl { name, init } => {
                let value = self.eval(init, frame)?;
                self.env.define(frame, name.clone(), value);
                Ok(Signal::None)
            }

            StatementKind::Assign { name, value } => {
                let value = self.eval(value, frame)?;
                self.env.assign(frame, name, value)?;
                Ok(Signal::None)
            }

            StatementKind::ExpressionStatement(expr) => {
                self.eval(expr, frame)?;
                Ok(Signal::None)
            }

            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => {
                if self.eval(condition, frame)?.is_truthy() {
                    let child = self.env.push_child(Some(frame));
                    self.exec_block(then_block, child)
                } else if let Some(else_block) = else_block {
                    let child = self.env.push_child(Some(frame));
                    self.exec_block(else_block, child)
                } else {
                    Ok(Signal::None)
                }
            }

            StatementKind::While { condition, body } => {
                while self.eval(condition, frame)?.is_truthy() {
                    self.check_cancelled()?;
                    let child = self.env.push_child(Some(frame));
                    match self.exec_block(body, child)? {
                        Signal::None => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::None)
            }

            StatementKind::Repeat { count, body } => {
                let n = match self.eval(count, frame)? {
                    Value::Integer(n) if n >= 0 => n,
                    other => {
                        return Err(BotScriptError::TypeError(format!(
                            "'repeat' expects a non-negative integer, got {}",
                            other
                        )))
                    }
                };
                for _ in 0..n {
                    self.check_cancelled()?;
                    let child = self.env.push_child(Some(frame));
                    match self.exec_block(body, child)? {
                        Signal::None => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::None)
            }

            StatementKind::For {
                var,
                from,
                to,
                body,
            } => {
                let start = self.eval_int(from, frame)?;
                let end = self.eval_int(to, frame)?;
                let step: i64 = if start <= end { 1 } else { -1 };
                let mut i = start;
                loop {
                    if step > 0 && i > end {
                        break;
                    }
                    if step < 0 && i < end {
                        break;
                    }
                    self.check_cancelled()?;
                    let child = self.env.push_child(Some(frame));
                    self.env.define(child, var.clone(), Value::Integer(i));
                    match self.exec_block(body, child)? {
                        Signal::None => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                    i += step;
                }
                Ok(Signal::None)
            }

            StatementKind::FunctionDecl { name, params, body } => {
                let function = Rc::new(FunctionValue {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    closure: frame,
                });
                self.env.define(frame, name.clone(), Value::Function(function));
                Ok(Signal::None)
            }

            StatementKind::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::Null,
                };
                Ok(Signal::Return(value))
            }

            StatementKind::Block(stmts) => {
                let child = self.env.push_child(Some(frame));
                self.exec_block(stmts, child)
            }

            StatementKind::Try {
                body,
                catch_var,
                catch_body,
            } => {
                let try_frame = self.env.push_child(Some(frame));
                let trace_mark = self.trace.len();
                match self.exec_block(body, try_frame) {
                    Ok(signal) => Ok(signal),
                    Err(err) if err.catchable() => {
                        // The error was recovered: the partial trace built
                        // while it unwound through any calls inside the
                        // try body no longer describes a live failure.
                        self.trace.truncate(trace_mark);
                        let catch_frame = self.env.push_child(Some(frame));
                        self.env
                            .define(catch_frame, catch_var.clone(), Value::String(err.to_string()));
                        self.exec_block(catch_body, catch_frame)
                    }
                    Err(err) => Err(err),
                }
            }

            StatementKind::Switch {
                discriminant,
                cases,
                default_body,
            } => {
                let value = self.eval(discriminant, frame)?;
                for (label, body) in cases {
                    let label_value = self.eval(label, frame)?;
                    if value == label_value {
                        let child = self.env.push_child(Some(frame));
                        return self.exec_block(body, child);
                    }
                }
                match default_body {
                    Some(body) => {
                        let child = self.env.push_child(Some(frame));
                        self.exec_block(body, child)
                    }
                    None => Ok(Signal::None),
                }
            }

            StatementKind::HostCall { verb, args } => {
                self.check_cancelled()?;
                let values = self.eval_args(args, frame)?;
                self.host.call(verb, &values)?;
                self.command_count += 1;
                Ok(Signal::None)
            }
        }
    }

    fn eval_int(&mut self, expr: &Expression, frame: FrameId) -> Result<i64> {
        match self.eval(expr, frame)? {
            Value::Integer(n) => Ok(n),
            Value::Float(n) => Ok(n as i64),
            other => Err(BotScriptError::TypeError(format!(
                "expected a number, got {}",
                other.type_name()
            ))),
        }
    }

    fn eval_args(&mut self, args: &[Expression], frame: FrameId) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, frame)).collect()
    }

    fn eval(&mut self, expr: &Expression, frame: FrameId) -> Result<Value> {
        match &expr.kind {
            ExpressionKind::Literal(value) => Ok(value.clone()),
            ExpressionKind::Variable(name) => self.env.get(frame, name),
            ExpressionKind::Grouping(inner) => self.eval(inner, frame),

            ExpressionKind::Unary { operator, operand } => {
                let value = self.eval(operand, frame)?;
                apply_unary(*operator, value)
            }

            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => match operator {
                BinaryOperator::And => {
                    let left = self.eval(left, frame)?;
                    if !left.is_truthy() {
                        Ok(left)
                    } else {
                        self.eval(right, frame)
                    }
                }
                BinaryOperator::Or => {
                    let left = self.eval(left, frame)?;
                    if left.is_truthy() {
                        Ok(left)
                    } else {
                        self.eval(right, frame)
                    }
                }
                op => {
                    let left = self.eval(left, frame)?;
                    let right = self.eval(right, frame)?;
                    apply_binary(*op, left, right)
                }
            },

            ExpressionKind::Call { callee, args } => self.eval_call(callee, args, frame, expr.span),
        }
    }

    fn eval_call(&mut self, callee: &Expression, args: &[Expression], frame: FrameId, call_span: Span) -> Result<Value> {
        if let ExpressionKind::Variable(name) = &callee.kind {
            match self.env.get(frame, name) {
                Ok(value) => return self.call_value(value, args, frame, call_span),
                Err(BotScriptError::UndefinedVariable(_)) => {
                    let values = self.eval_args(args, frame)?;
                    if let Some(result) = self.builtins.call(name, &values) {
                        return result;
                    }
                    return Err(BotScriptError::UndefinedFunction(name.clone()));
                }
                Err(other) => return Err(other),
            }
        }
        let callee_value = self.eval(callee, frame)?;
        self.call_value(callee_value, args, frame, call_span)
    }

    fn call_value(&mut self, value: Value, args: &[Expression], frame: FrameId, call_span: Span) -> Result<Value> {
        match value {
            Value::Function(function) => self.call_function(&function, args, frame, call_span),
            Value::HostAction(name) => {
                let values = self.eval_args(args, frame)?;
                self.host.call(&name, &values)
            }
            other => Err(BotScriptError::TypeError(format!("{} is not callable", other.type_name()))),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<FunctionValue>,
        args: &[Expression],
        frame: FrameId,
        call_span: Span,
    ) -> Result<Value> {
        if args.len() != function.params.len() {
            return Err(BotScriptError::ArityMismatch(format!(
                "'{}' expects {} argument(s), got {}",
                function.name,
                function.params.len(),
                args.len()
            )));
        }
        let values = self.eval_args(args, frame)?;

        self.call_depth += 1;
        if self.call_depth > self.max_call_depth {
            self.call_depth -= 1;
            return Err(BotScriptError::StackOverflow);
        }

        let call_frame = self.env.push_child(Some(function.closure));
        for (param, value) in function.params.iter().zip(values) {
            self.env.define(call_frame, param.clone(), value);
        }
        let outcome = self.exec_block(&function.body, call_frame);
        self.call_depth -= 1;

        if outcome.is_err() {
            self.trace.push(StackFrame {
                function_name: function.name.clone(),
                span: call_span,
            });
        }

        match outcome? {
            Signal::Return(value) => Ok(value),
            Signal::None => Ok(Value::Null),
        }
    }
}

fn apply_unary(operator: UnaryOperator, value: Value) -> Result<Value> {
    match operator {
        UnaryOperator::Negate => match value {
            Value::Integer(n) => Ok(Value::Integer(-n)),
            Value::Float(n) => Ok(Value::Float(-n)),
            other => Err(BotScriptError::TypeError(format!("cannot negate {}", other.type_name()))),
        },
        UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
    }
}

fn apply_binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value> {
    use BinaryOperator::*;
    match operator {
        Add => match (&left, &right) {
            (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!("{}{}", left, right))),
            _ => numeric_op(left, right, |a, b| a + b, |a, b| a.wrapping_add(b)),
        },
        Subtract => numeric_op(left, right, |a, b| a - b, |a, b| a.wrapping_sub(b)),
        Multiply => numeric_op(left, right, |a, b| a * b, |a, b| a.wrapping_mul(b)),
        Divide => {
            if is_zero(&right) {
                return Err(BotScriptError::DivisionByZero);
            }
            numeric_op(left, right, |a, b| a / b, |a, b| a.wrapping_div(b))
        }
        Modulo => {
            if is_zero(&right) {
                return Err(BotScriptError::DivisionByZero);
            }
            numeric_op(left, right, |a, b| a % b, |a, b| a.wrapping_rem(b))
        }
        Equal => Ok(Value::Bool(left == right)),
        NotEqual => Ok(Value::Bool(left != right)),
        Greater => compare(left, right, |ord| ord == std::cmp::Ordering::Greater),
        Less => compare(left, right, |ord| ord == std::cmp::Ordering::Less),
        GreaterEqual => compare(left, right, |ord| ord != std::cmp::Ordering::Less),
        LessEqual => compare(left, right, |ord| ord != std::cmp::Ordering::Greater),
        And | Or => unreachable!("and/or are short-circuited before reaching apply_binary"),
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Integer(0) => true,
        Value::Float(n) => *n == 0.0,
        _ => false,
    }
}

fn numeric_op(left: Value, right: Value, on_float: impl Fn(f64, f64) -> f64, on_int: impl Fn(i64, i64) -> i64) -> Result<Value> {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(on_int(*a, *b))),
        _ => {
            let a = left
                .as_f64()
                .ok_or_else(|| BotScriptError::TypeError(format!("cannot apply arithmetic to {}", left.type_name())))?;
            let b = right
                .as_f64()
                .ok_or_else(|| BotScriptError::TypeError(format!("cannot apply arithmetic to {}", right.type_name())))?;
            Ok(Value::Float(on_float(a, b)))
        }
    }
}

fn compare(left: Value, right: Value, pred: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value> {
    if let (Value::String(a), Value::String(b)) = (&left, &right) {
        // Rust compares `str` byte-by-byte, which agrees with code point
        // order because UTF-8 preserves codepoint ordering.
        return Ok(Value::Bool(pred(a.as_str().cmp(b.as_str()))));
    }
    let a = left
        .as_f64()
        .ok_or_else(|| BotScriptError::TypeError(format!("cannot compare {}", left.type_name())))?;
    let b = right
        .as_f64()
        .ok_or_else(|| BotScriptError::TypeError(format!("cannot compare {}", right.type_name())))?;
    a.partial_cmp(&b)
        .map(pred)
        .map(Value::Bool)
        .ok_or_else(|| BotScriptError::TypeError("comparison produced NaN".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn run(source: &str) -> Result<()> {
        let (tokens, lex_diagnostics) = Lexer::new(source).tokenize();
        assert!(lex_diagnostics.is_empty(), "unexpected lex diagnostics: {:?}", lex_diagnostics);
        let (program, parse_diagnostics) = Parser::new(tokens).parse();
        assert!(parse_diagnostics.is_empty(), "unexpected parse diagnostics: {:?}", parse_diagnostics);
        let mut host = MockHost;
        let cancelled = AtomicBool::new(false);
        let mut interpreter = Interpreter::new(&mut host, &cancelled);
        interpreter.run(&program)
    }

    #[test]
    fn var_decl_and_host_call() {
        assert!(run("def $n = 1\nsay $n").is_ok());
    }

    #[test]
    fn uncaught_error_inside_a_function_call_builds_a_stack_trace() {
        let source = "\
function inner()
  return 1 / 0
endfunction
function outer()
  return inner()
endfunction
outer()";
        let (tokens, _) = Lexer::new(source).tokenize();
        let (program, _) = Parser::new(tokens).parse();
        let mut host = MockHost;
        let cancelled = AtomicBool::new(false);
        let mut interpreter = Interpreter::new(&mut host, &cancelled);

        let err = interpreter.run(&program).unwrap_err();
        assert_eq!(err.kind(), "division_by_zero");

        let trace = interpreter.stack_trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].function_name, "inner");
        assert_eq!(trace[1].function_name, "outer");
    }

    #[test]
    fn a_caught_error_leaves_no_stack_trace_behind() {
        let source = "\
function divide()
  return 1 / 0
endfunction
try
  def $x = divide()
catch $e
  say $e
endtry";
        let (tokens, _) = Lexer::new(source).tokenize();
        let (program, _) = Parser::new(tokens).parse();
        let mut host = MockHost;
        let cancelled = AtomicBool::new(false);
        let mut interpreter = Interpreter::new(&mut host, &cancelled);

        assert!(interpreter.run(&program).is_ok());
        assert!(interpreter.stack_trace().is_empty());
    }

    #[test]
    fn division_by_zero_is_catchable() {
        let source = "try\n  def $x = 1 / 0\ncatch $e\n  say $e\nendtry";
        assert!(run(source).is_ok());
    }

    #[test]
    fn uncaught_runtime_error_propagates() {
        let err = run("say $undefined").unwrap_err();
        assert_eq!(err.kind(), "undefined_variable");
    }

    #[test]
    fn functions_close_over_their_declaring_scope() {
        let source = "\
def $base = 10
function addBase(n)
  return n + $base
endfunction
def $result = addBase(5)
if $result == 15 then
  say \"ok\"
else
  say \"fail\"
endif";
        assert!(run(source).is_ok());
    }

    #[test]
    fn deep_recursion_raises_stack_overflow() {
        let source = "\
function recurse(n)
  return recurse(n + 1)
endfunction
recurse(0)";
        let err = run(source).unwrap_err();
        assert_eq!(err.kind(), "stack_overflow");
    }

    #[test]
    fn for_loop_binds_the_loop_variable() {
        assert!(run("for $i = 1 to 3\n  say $i\nendfor").is_ok());
    }

    #[test]
    fn switch_falls_through_to_default() {
        assert!(run("switch 99\ncase 1\n  say \"one\"\ndefault\n  say \"other\"\nendswitch").is_ok());
    }

    #[test]
    fn repeat_zero_times_runs_the_body_zero_times() {
        assert!(run("repeat 0\n  say \"never\"\nendrepeat").is_ok());
    }

    #[test]
    fn repeat_with_a_float_count_is_a_type_error() {
        let err = run("repeat 2.5\n  say \"x\"\nendrepeat").unwrap_err();
        assert_eq!(err.kind(), "type_error");
    }

    #[test]
    fn repeat_with_a_negative_count_is_a_type_error() {
        let err = run("repeat -3\n  say \"x\"\nendrepeat").unwrap_err();
        assert_eq!(err.kind(), "type_error");
    }

    #[test]
    fn string_concatenation_coerces_numbers() {
        let source = "def $msg = \"count: \" + 3\nsay $msg";
        assert!(run(source).is_ok());
    }

    #[test]
    fn strings_compare_lexicographically_by_code_point() {
        let source = "\
if \"apple\" < \"banana\" then
  say \"ok\"
else
  say \"fail\"
endif";
        assert!(run(source).is_ok());
    }

    #[test]
    fn comparing_incompatible_types_is_a_type_error() {
        let err = run("def $x = 1 < \"a\"").unwrap_err();
        assert_eq!(err.kind(), "type_error");
    }
}
