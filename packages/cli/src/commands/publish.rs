use super::PageArgs;
use crate::workspace::open_session;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagebuilder_editor::{EditorSession, LabeledIssue};

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Publish even when validation reports errors
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

pub fn save(args: PageArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.as_deref())?;
    session.save()?;
    announce(&session);
    session.close()?;
    Ok(())
}

pub fn publish(args: PublishArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;

    let issues = session.validate();
    if !issues.is_empty() {
        print_issues(&issues);
        if !args.force {
            bail!("{} validation error(s); fix them or pass --force", issues.len());
        }
    }

    session.publish()?;
    announce(&session);
    Ok(())
}

fn announce(session: &EditorSession) {
    if let Some(message) = session.live_message() {
        println!("{} {}", "✓".green(), message);
    }
    println!("   Page:   {}", session.page().id);
    println!("   Status: {}", session.page().status);
}

fn print_issues(issues: &[LabeledIssue]) {
    for labeled in issues {
        println!(
            "  {} {} ({})",
            "error".red().bold(),
            labeled.issue.message,
            labeled.label_text.dimmed()
        );
    }
    println!();
}
