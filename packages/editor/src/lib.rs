//! # Page Builder Editor
//!
//! Editing core for the visual page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: user actions, persistence,         │
//! │          save/publish, validation           │
//! └─────────────────────────────────────────────┘
//!          ↓ Mutation              ↑ RenderNode
//! ┌──────────────────────┐  ┌────────────────────┐
//! │ history: past /      │  │ decorate + render: │
//! │ present / future     │  │ overlay per        │
//! └──────────────────────┘  │ viewport           │
//!          ↓                └────────────────────┘
//! ┌─────────────────────────────────────────────┐
//! │ mutations: pure tree operations             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are values**: operations return new trees sharing structure
//! 2. **No change, no history**: a mutation that changes nothing is not recorded
//! 3. **Overlay is side data**: editor flags never enter the component tree
//! 4. **Drag is a state machine**: grid resizing emits one update per span change
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagebuilder_editor::{EditorOptions, EditorSession, Mutation, Page};
//! use pagebuilder_common::{ComponentNode, FileStore};
//!
//! let store = FileStore::open(".pagebuilder")?;
//! let mut session = EditorSession::open(Page::new("home"), Box::new(store), EditorOptions::default());
//!
//! session.dispatch(&Mutation::Add {
//!     component: ComponentNode::container("hero", "Section"),
//!     parent_id: None,
//!     index: None,
//! })?;
//! session.undo()?;
//! ```

mod collaborators;
mod config;
mod errors;
mod history;
mod issues;
mod registry;
mod render;
mod session;

pub mod decorate;
pub mod grid_resize;
pub mod mutations;
pub mod persistence;
pub mod schema;

pub use collaborators::{KeyTranslator, MapTranslator, Page, PageForm, PagePublisher, Translator};
pub use config::EditorOptions;
pub use decorate::{
    decorate_component_for_viewport, decorate_tree_for_viewport, is_hidden_for_viewport, resolve_for_viewport,
    DecoratedNode, Decoration,
};
pub use errors::{EditorError, EditorResult};
pub use grid_resize::{Axis, ContainerMetrics, DragPhase, GridDragState, GridPlacement, GridResizeController, ResizeHandle};
pub use history::{History, HistoryRecord, DEFAULT_GRID_COLS, DEFAULT_MAX_LEVELS};
pub use issues::{resolve_issue_label, IssueLabel, LabeledIssue, Panel};
pub use mutations::Mutation;
pub use persistence::{load_initial_record, storage_key, HistorySource};
pub use registry::{ComponentHandler, ComponentRegistry};
pub use render::{render_tree, to_html, HtmlOptions, RenderNode};
pub use session::{EditorSession, FRONT_Z_INDEX};
