mod commands;
mod config;
mod workspace;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::*;
use tracing_subscriber::EnvFilter;

/// Page builder CLI - edit, lint and publish page component trees
#[derive(Parser, Debug)]
#[command(name = "pagebuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new page builder project
    Init(InitArgs),

    /// Add a component
    Add(AddArgs),

    /// Remove a component and its subtree
    Remove(RemoveArgs),

    /// Update component fields
    Update(UpdateArgs),

    /// Move a component to another slot
    Move(MoveArgs),

    /// Duplicate a component with fresh ids
    Duplicate(DuplicateArgs),

    /// Set component geometry
    Resize(ResizeArgs),

    /// Change a grid item's column or row span
    Span(SpanArgs),

    /// Set editor-only layer flags (name, lock, visibility, stacking)
    Layer(LayerArgs),

    /// Undo the last edit(s)
    Undo(StepArgs),

    /// Redo undone edit(s)
    Redo(StepArgs),

    /// Show or clear the stored history
    History(HistoryArgs),

    /// Render the page to HTML
    Render(RenderArgs),

    /// Lint page files
    Lint(LintArgs),

    /// Save the page back to its file
    Save(PageArgs),

    /// Publish the page
    Publish(PublishArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(cli.command, &cwd.display().to_string()));

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(command: Command, cwd: &str) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::Add(args) => add(args, cwd),
        Command::Remove(args) => remove(args, cwd),
        Command::Update(args) => update(args, cwd),
        Command::Move(args) => move_component(args, cwd),
        Command::Duplicate(args) => duplicate(args, cwd),
        Command::Resize(args) => resize(args, cwd),
        Command::Span(args) => span(args, cwd),
        Command::Layer(args) => layer(args, cwd),
        Command::Undo(args) => undo(args, cwd),
        Command::Redo(args) => redo(args, cwd),
        Command::History(args) => history(args, cwd),
        Command::Render(args) => render(args, cwd),
        Command::Lint(args) => lint(args, cwd),
        Command::Save(args) => save(args, cwd),
        Command::Publish(args) => publish(args, cwd),
    }
}
