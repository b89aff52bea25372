pub mod edit;
pub mod history;
pub mod init;
pub mod layer;
pub mod lint;
pub mod publish;
pub mod render;

pub use edit::{
    add, duplicate, move_component, remove, resize, span, update, AddArgs, DuplicateArgs, MoveArgs, RemoveArgs,
    ResizeArgs, SpanArgs, UpdateArgs,
};
pub use history::{history, redo, undo, HistoryArgs, StepArgs};
pub use init::{init, InitArgs};
pub use layer::{layer, LayerArgs};
pub use lint::{lint, LintArgs};
pub use publish::{publish, save, PublishArgs};
pub use render::{render, RenderArgs};

use clap::Args;
use std::path::PathBuf;

/// Page file selection shared by every editing command
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page JSON file (defaults to `page` in the config)
    #[arg(short, long)]
    pub page: Option<PathBuf>,
}
