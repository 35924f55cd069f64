//! Automem — memory-file synchronization CLI.
//!
//! # Usage
//!
//! ```text
//! automem init [--root <dir>] [--memory-file <name>]
//! automem record <path>... [--context "<hash>: <message>"]
//! automem record-command <command> [--exit-code <n>]
//! automem boundary [--active]
//! automem complete [--report <file>]
//! automem status [--json]
//! automem config get [<key>] | set <key> <value>
//! automem diff <document> <section> [--content <file>]
//! automem section read|write <document> <name>
//! ```
//!
//! `record`, `record-command`, and `boundary` are hook glue: an external
//! collaborator calls them after edits, after successful commands, and at
//! each unit-of-work boundary. The rest are operator commands.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    boundary::BoundaryArgs,
    complete::CompleteArgs,
    config::ConfigCommand,
    diff::DiffArgs,
    init::InitArgs,
    record::{RecordArgs, RecordCommandArgs},
    section::SectionCommand,
    status::StatusArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "automem",
    version,
    about = "Keep a project's memory file in sync with AI-assisted code changes",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold the control directory and a marked-up memory file.
    Init(InitArgs),

    /// Record changed file paths in the pending-change ledger.
    Record(RecordArgs),

    /// Record a shell command that executed successfully.
    RecordCommand(RecordCommandArgs),

    /// Observe a batch boundary; prints the worker request when triggering.
    Boundary(BoundaryArgs),

    /// Apply a worker outcome report to the ledger.
    Complete(CompleteArgs),

    /// Show pending changes, trigger state, and the last pass.
    Status(StatusArgs),

    /// Read or change persisted configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show a unified diff of a proposed section rewrite.
    Diff(DiffArgs),

    /// Read or write one machine-owned document section.
    Section {
        #[command(subcommand)]
        command: SectionCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Record(args) => args.run(),
        Commands::RecordCommand(args) => args.run(),
        Commands::Boundary(args) => args.run(),
        Commands::Complete(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Diff(args) => args.run(),
        Commands::Section { command } => commands::section::run(command),
    }
}
