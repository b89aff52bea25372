use super::PageArgs;
use crate::workspace::open_session;
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use pagebuilder_common::{EditorFlags, HiddenRule, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stack {
    Forward,
    Backward,
    Front,
    Back,
}

/// Editor-only layer flags; these never enter the undo history
#[derive(Args, Debug)]
pub struct LayerArgs {
    pub id: String,

    /// Layer name shown in the editor
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, conflicts_with = "unlock")]
    pub lock: bool,

    #[arg(long)]
    pub unlock: bool,

    /// Hide on these viewports (comma separated), or everywhere with "all"
    #[arg(long, value_delimiter = ',', conflicts_with = "show")]
    pub hide: Vec<String>,

    /// Show on every viewport
    #[arg(long)]
    pub show: bool,

    /// Restack the component
    #[arg(long, value_enum)]
    pub stack: Option<Stack>,

    #[command(flatten)]
    pub page: PageArgs,
}

pub fn layer(args: LayerArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    if !session.present().contains(&args.id) {
        bail!("Component '{}' not found", args.id);
    }

    let hidden = if args.show {
        Some(HiddenRule::Always(false))
    } else if args.hide.is_empty() {
        None
    } else {
        Some(parse_hidden(&args.hide)?)
    };
    let flags = EditorFlags {
        name: args.name,
        locked: (args.lock || args.unlock).then_some(args.lock),
        z_index: None,
        hidden,
    };

    if !flags.is_empty() {
        session.update_editor(&args.id, flags)?;
    }

    if let Some(stack) = args.stack {
        session.select([args.id.clone()]);
        match stack {
            Stack::Forward => session.bring_forward()?,
            Stack::Backward => session.send_backward()?,
            Stack::Front => session.bring_to_front()?,
            Stack::Back => session.send_to_back()?,
        }
    }

    let flags = session.overlay().get(&args.id).cloned().unwrap_or_default();
    println!("{} {}", "✓".green(), args.id);
    println!("   {}", serde_json::to_string(&flags)?);
    println!("   z-index: {}", session.z_index(&args.id));
    Ok(())
}

fn parse_hidden(values: &[String]) -> Result<HiddenRule> {
    if values.iter().any(|value| value.eq_ignore_ascii_case("all")) {
        return Ok(HiddenRule::Always(true));
    }
    let mut viewports = Vec::new();
    for value in values {
        let viewport: Viewport = value.parse().map_err(anyhow::Error::msg)?;
        if !viewports.contains(&viewport) {
            viewports.push(viewport);
        }
    }
    Ok(HiddenRule::Viewports(viewports))
}
