use super::PageArgs;
use crate::config::Config;
use crate::workspace::{open_session, page_path, read_page};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_common::FileStore;
use pagebuilder_editor::persistence;

#[derive(Args, Debug)]
pub struct StepArgs {
    /// Number of steps
    #[arg(short = 'n', long, default_value = "1")]
    pub steps: usize,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Print the full history record as JSON
    #[arg(long)]
    pub json: bool,

    /// Drop the locally stored history for the page
    #[arg(long, conflicts_with = "json")]
    pub clear: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

pub fn undo(args: StepArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    let mut done = 0;
    while done < args.steps && session.undo()? {
        done += 1;
    }
    report_steps("undo", done, args.steps, session.live_message());
    Ok(())
}

pub fn redo(args: StepArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    let mut done = 0;
    while done < args.steps && session.redo()? {
        done += 1;
    }
    report_steps("redo", done, args.steps, session.live_message());
    Ok(())
}

fn report_steps(action: &str, done: usize, requested: usize, message: Option<&str>) {
    if done == 0 {
        println!("{} Nothing to {}", "⚠️".yellow(), action);
        return;
    }
    println!("{} {} ({}/{})", "✓".green(), message.unwrap_or(action), done, requested);
}

pub fn history(args: HistoryArgs, cwd: &str) -> Result<()> {
    if args.clear {
        let config = Config::load(cwd)?;
        let page = read_page(&page_path(cwd, &config, args.page.page.as_deref()))?;
        let mut store = FileStore::open(config.get_storage_dir(cwd))?;
        persistence::clear(&mut store, &page.id)?;
        println!("{} Cleared local history for '{}'", "✓".green(), page.id);
        return Ok(());
    }

    let session = open_session(cwd, args.page.page.as_deref())?;
    let history = session.history();

    if args.json {
        println!("{}", serde_json::to_string_pretty(history.record())?);
        return Ok(());
    }

    println!("{} {}", "Page:".bright_white().bold(), session.page().id);
    println!("   Source:      {:?}", session.source());
    println!("   Components:  {}", session.present().node_count());
    println!("   Undo levels: {}", history.undo_levels());
    println!("   Redo levels: {}", history.redo_levels());
    println!("   Grid cols:   {}", history.grid_cols());
    if history.max_levels() > 0 {
        println!("   Limit:       {}", history.max_levels());
    }

    Ok(())
}
