//! Command-line surface: `run`, `eval`, `save`, `list`, `status`, `stop` (§6).
//! Structured the same way as a `clap`-derive CLI with a verbosity flag and
//! one subcommand per operation, each backed by an `Args` struct.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity.
    #[arg(value_enum, short, long, default_value_t = LogLevel::Info)]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(alias("E"))]
    Error,
    #[value(alias("W"))]
    Warn,
    #[value(alias("I"))]
    Info,
    #[value(alias("D"))]
    Debug,
    #[value(alias("T"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a previously saved script by name.
    Run(RunArgs),

    /// Parse and run a literal script body passed on the command line.
    Eval(EvalArgs),

    /// Save a script body under a name for later `run`.
    Save(SaveArgs),

    /// List the names of all saved scripts.
    List,

    /// Report whether a script is running and its statement/command counts.
    Status,

    /// Request cancellation of the script currently running, if any.
    Stop,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Name the script was saved under.
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct EvalArgs {
    /// Literal script source.
    pub code: String,
}

#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    /// Name to save the script under ([A-Za-z0-9_-]{1,64}).
    pub name: String,
    /// Literal script source.
    pub code: String,
}
