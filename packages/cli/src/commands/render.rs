use super::PageArgs;
use crate::workspace::open_session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagebuilder_common::Viewport;
use pagebuilder_editor::{to_html, HtmlOptions};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Viewport to render for (defaults to the configured one)
    #[arg(long)]
    pub viewport: Option<Viewport>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the render tree as JSON instead of HTML
    #[arg(long)]
    pub json: bool,

    /// Single-line HTML
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    if let Some(viewport) = args.viewport {
        session.set_viewport(viewport);
    }

    let nodes = session.render(Some(session.viewport()));
    let content = if args.json {
        serde_json::to_string_pretty(&nodes)?
    } else {
        let options = HtmlOptions {
            pretty: !args.compact,
            ..HtmlOptions::default()
        };
        to_html(&nodes, options)
    };

    match args.output {
        Some(path) => {
            let path = PathBuf::from(cwd).join(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            println!(
                "{} Rendered {} ({}) → {}",
                "✓".green(),
                session.page().id,
                session.viewport(),
                path.display()
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}
