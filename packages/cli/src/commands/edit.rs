//! Structural edits: each command opens the page, dispatches one mutation
//! through the session (which persists the history) and reports the result.

use super::PageArgs;
use crate::workspace::open_session;
use anyhow::{anyhow, bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use pagebuilder_common::{is_container_type, ComponentNode, Location, Props};
use pagebuilder_editor::{Axis, EditorSession, Mutation};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisArg {
    Column,
    Row,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Column => Axis::Column,
            AxisArg::Row => Axis::Row,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Component type (Section, Grid, Text, Image, Button, ...)
    pub kind: String,

    /// Component id (generated from the type when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Parent container id (root level when omitted)
    #[arg(long)]
    pub parent: Option<String>,

    /// Insert position among the siblings (appends when omitted)
    #[arg(long)]
    pub index: Option<usize>,

    /// Props as key=value; values are parsed as JSON, falling back to strings
    #[arg(long = "prop", value_name = "KEY=VALUE")]
    pub props: Vec<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: String,

    /// Fields as key=value; an empty value clears the field
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    pub id: String,

    /// Target index among the destination siblings
    pub index: usize,

    /// Destination container (stays with the current parent when omitted)
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<String>,

    /// Move to root level
    #[arg(long)]
    pub root: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    pub id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct ResizeArgs {
    pub id: String,

    #[arg(long)]
    pub width: Option<String>,

    #[arg(long)]
    pub height: Option<String>,

    #[arg(long)]
    pub left: Option<String>,

    #[arg(long)]
    pub top: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct SpanArgs {
    /// Grid item id
    pub id: String,

    /// Step the span by one (+1 / -1)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "drag")]
    pub step: Option<i32>,

    /// Simulate a handle drag by this many pixels
    #[arg(long, allow_hyphen_values = true)]
    pub drag: Option<f64>,

    /// Pixel size of the grid container along the axis
    #[arg(long, default_value = "1200")]
    pub container: f64,

    #[arg(long, value_enum, default_value = "column")]
    pub axis: AxisArg,

    #[command(flatten)]
    pub page: PageArgs,
}

pub fn add(args: AddArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;

    let id = match args.id {
        Some(id) => id,
        None => generate_id(&session, &args.kind),
    };
    let mut component = if is_container_type(&args.kind) {
        ComponentNode::container(&id, &args.kind)
    } else {
        ComponentNode::new(&id, &args.kind)
    };
    component.props = parse_assignments(&args.props)?;

    let mutation = Mutation::Add {
        component,
        parent_id: args.parent,
        index: args.index,
    };
    apply(&mut session, &mutation)
}

pub fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    apply(&mut session, &Mutation::Remove { id: args.id })
}

pub fn update(args: UpdateArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    let patch = parse_assignments(&args.fields)?;
    apply(&mut session, &Mutation::Update { id: args.id, patch })
}

pub fn move_component(args: MoveArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;

    let from = session
        .present()
        .locate(&args.id)
        .ok_or_else(|| anyhow!("Component '{}' not found", args.id))?;
    let parent_id = match (args.root, args.parent) {
        (true, _) => None,
        (false, Some(parent)) => Some(parent),
        (false, None) => from.parent_id.clone(),
    };
    let to = Location {
        parent_id,
        index: args.index,
    };

    apply(&mut session, &Mutation::Move { from, to })
}

pub fn duplicate(args: DuplicateArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    apply(&mut session, &Mutation::Duplicate { id: args.id })
}

pub fn resize(args: ResizeArgs, cwd: &str) -> Result<()> {
    if args.width.is_none() && args.height.is_none() && args.left.is_none() && args.top.is_none() {
        bail!("Nothing to resize: pass at least one of --width, --height, --left, --top");
    }

    let mut session = open_session(cwd, args.page.page.as_deref())?;
    let mutation = Mutation::Resize {
        id: args.id,
        width: args.width,
        height: args.height,
        left: args.left,
        top: args.top,
    };
    apply(&mut session, &mutation)
}

pub fn span(args: SpanArgs, cwd: &str) -> Result<()> {
    let mut session = open_session(cwd, args.page.page.as_deref())?;
    let axis = Axis::from(args.axis);

    let changed = match (args.step, args.drag) {
        (Some(direction), _) => session.step_span(&args.id, axis, direction)?,
        (None, Some(delta)) => {
            if !session.begin_grid_resize(&args.id, axis, 0.0, args.container) {
                bail!("Component '{}' is not a resizable grid item", args.id);
            }
            let changed = session.grid_pointer_move(delta)?;
            session.grid_pointer_up();
            changed
        }
        (None, None) => bail!("Pass --step or --drag"),
    };

    let placement = session
        .present()
        .find(&args.id)
        .and_then(|node| node.prop_str(axis.placement_field()))
        .unwrap_or("span 1")
        .to_string();
    report(&session, changed, &format!("{} = {}", axis.placement_field(), placement));
    Ok(())
}

fn apply(session: &mut EditorSession, mutation: &Mutation) -> Result<()> {
    let changed = session.dispatch(mutation)?;
    report(session, changed, mutation.name());
    Ok(())
}

fn report(session: &EditorSession, changed: bool, what: &str) {
    if changed {
        let message = session.live_message().unwrap_or(what);
        println!("{} {}", "✓".green(), message);
        println!(
            "   {} component(s), {} undo level(s)",
            session.present().node_count(),
            session.history().undo_levels()
        );
    } else {
        println!("{} {} left the page unchanged", "⚠️".yellow(), what);
    }
}

/// `<type>-<n>` with the first n not already used in the tree
fn generate_id(session: &EditorSession, kind: &str) -> String {
    let base = kind.to_ascii_lowercase();
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !session.present().contains(candidate))
        .unwrap_or(base)
}

/// Parse `key=value` pairs into a props map
pub fn parse_assignments(pairs: &[String]) -> Result<Props> {
    let mut props = Props::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty key in '{}'", pair);
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        props.insert(key.to_string(), value);
    }
    Ok(props)
}
