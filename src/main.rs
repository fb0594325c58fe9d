//! BotScript - the scripting pipeline behind a Minecraft bot's `script ...`
//! chat command.
//!
//! This binary exposes the same verbs a chat user invokes through the bot
//! (`run`, `eval`, `save`, `list`, `status`, `stop`) directly as `clap`
//! subcommands, so the lex -> parse -> evaluate pipeline is exercisable
//! without a live bot connection. A [`host::MockHost`] stands in for the
//! real Minecraft bridge.
//!
//! ## Architecture Overview
//!
//! - **lexer**: source text -> spanned tokens, with panic-mode recovery.
//! - **parser**: tokens -> AST, recursive descent with precedence climbing.
//! - **ast**: the `Statement`/`Expression`/`Value` node types.
//! - **environment**: the arena-backed, closure-capable scope chain.
//! - **interpreter**: tree-walking evaluator, control-flow signals, call stack.
//! - **builtins**: native functions callable by name (`print`, `len`, `math_*`).
//! - **host**: the bot-action verb table (`say`, `move`, `goto`, ...).
//! - **runtime**: owns the single in-flight execution, status, cancellation.
//! - **store**: saved-script persistence, `name -> source` under the OS config dir.
//! - **cli**: the `clap`-derive command surface.
//! - **error**: the shared error taxonomy and diagnostics.

mod ast;
mod builtins;
mod cli;
mod environment;
mod error;
mod host;
mod interpreter;
mod lexer;
mod parser;
mod runtime;
mod store;

use std::process;

use log::{error, info};

use cli::{Cli, Commands};
use host::MockHost;
use runtime::ScriptRuntime;
use store::{JsonFileStore, ScriptStore};

fn main() {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    if let Err(err) = run(args.command) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Run(args) => {
            let store = JsonFileStore::open_default()?;
            info!("running saved script '{}'", args.name);
            let runtime = ScriptRuntime::new();
            let mut host = MockHost;
            let result = runtime
                .load_and_execute(&store, &args.name, &mut host)
                .unwrap_or_else(|err| runtime::ExecutionResult {
                    statements_executed: 0,
                    commands_executed: 0,
                    elapsed_ms: 0,
                    diagnostics: Vec::new(),
                    error: Some(err),
                    stack_trace: Vec::new(),
                });
            report(result)
        }
        Commands::Eval(args) => {
            info!("evaluating literal script ({} bytes)", args.code.len());
            report(execute(&args.code))
        }
        Commands::Save(args) => {
            let mut store = JsonFileStore::open_default()?;
            store.save(&args.name, &args.code)?;
            println!("saved '{}'", args.name);
            Ok(())
        }
        Commands::List => {
            let store = JsonFileStore::open_default()?;
            for name in store.list()? {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Status => {
            // A fresh runtime per process invocation: this CLI is a
            // one-shot driver, not a long-lived daemon, so there is never
            // another execution in flight to report on.
            let runtime = ScriptRuntime::new();
            let status = runtime.status();
            println!(
                "running={} statements_executed={} commands_executed={}",
                status.running, status.statements_executed, status.commands_executed
            );
            Ok(())
        }
        Commands::Stop => {
            println!("no script is running in this process");
            Ok(())
        }
    }
}

fn execute(source: &str) -> runtime::ExecutionResult {
    let runtime = ScriptRuntime::new();
    let mut host = MockHost;
    match runtime.execute_source(source, &mut host) {
        Ok(result) => result,
        Err(err) => runtime::ExecutionResult {
            statements_executed: 0,
            commands_executed: 0,
            elapsed_ms: 0,
            diagnostics: Vec::new(),
            error: Some(err),
            stack_trace: Vec::new(),
        },
    }
}

fn report(result: runtime::ExecutionResult) -> Result<(), Box<dyn std::error::Error>> {
    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }
    info!(
        "statements_executed={} commands_executed={} elapsed_ms={}",
        result.statements_executed, result.commands_executed, result.elapsed_ms
    );
    for frame in &result.stack_trace {
        eprintln!(
            "  at {} ({}:{})",
            frame.function_name, frame.span.line, frame.span.column
        );
    }
    match result.error {
        Some(err) => Err(Box::new(err)),
        None => Ok(()),
    }
}
