//! # Editor Session
//!
//! Composition root for one page being edited.
//!
//! A session owns the [`History`], the local store the history is persisted
//! to, the canvas viewport and selection, and the grid drag controller. Every
//! change to the history is written back to the store before the call
//! returns.
//!
//! ```rust,ignore
//! let mut session = EditorSession::open(page, Box::new(store), EditorOptions::default());
//! session.dispatch(&Mutation::Remove { id: "hero".into() })?;
//! session.undo()?;
//! let html = session.render_html();
//! session.close()?;
//! ```

use crate::collaborators::{KeyTranslator, Page, PageForm, PagePublisher, Translator};
use crate::config::EditorOptions;
use crate::decorate::{decorate_tree_for_viewport, resolve_for_viewport, DecoratedNode};
use crate::errors::{EditorError, EditorResult};
use crate::grid_resize::{self, Axis, ContainerMetrics, GridResizeController, ResizeHandle};
use crate::history::History;
use crate::issues::{resolve_issue_label, LabeledIssue};
use crate::persistence::{self, HistorySource};
use crate::registry::ComponentRegistry;
use crate::render::{render_tree, to_html, HtmlOptions, RenderNode};
use crate::Mutation;
use pagebuilder_common::{ComponentTree, EditorFlags, KeyValueStore, Location, OverlayMap, Validator, Viewport};
use serde_json::Value;

/// z-index given by "bring to front"
pub const FRONT_Z_INDEX: i64 = 999;

/// One page open in the editor
pub struct EditorSession {
    page: Page,
    history: History,
    source: HistorySource,
    store: Box<dyn KeyValueStore>,
    options: EditorOptions,
    viewport: Viewport,
    selection: Vec<String>,
    grid: GridResizeController,
    registry: ComponentRegistry,
    publisher: Option<Box<dyn PagePublisher>>,
    translator: Box<dyn Translator>,
    validator: Option<Box<dyn Validator>>,
    live_message: Option<String>,
}

impl EditorSession {
    /// Open `page`, restoring history from `store` when possible
    pub fn open(page: Page, store: Box<dyn KeyValueStore>, options: EditorOptions) -> Self {
        let (record, source) = persistence::load_initial_record(&page, &*store);
        let mut history = History::from_record(record).with_max_levels(options.history_limit);
        if source == HistorySource::Fresh {
            history.set_grid_cols(options.grid_cols);
        }

        tracing::debug!(
            "opened page '{}' from {:?} history ({} undo level(s))",
            page.id,
            source,
            history.undo_levels()
        );

        let mut session = Self {
            page,
            history,
            source,
            store,
            viewport: options.default_viewport,
            options,
            selection: Vec::new(),
            grid: GridResizeController::new(),
            registry: ComponentRegistry::new(),
            publisher: None,
            translator: Box::new(KeyTranslator),
            validator: None,
            live_message: None,
        };
        if let Err(err) = session.persist() {
            tracing::warn!("could not store initial history for '{}': {}", session.page.id, err);
        }
        session
    }

    pub fn with_publisher(mut self, publisher: Box<dyn PagePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Where the initial history came from
    pub fn source(&self) -> HistorySource {
        self.source
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn present(&self) -> &ComponentTree {
        self.history.present()
    }

    pub fn overlay(&self) -> &OverlayMap {
        self.history.editor()
    }

    /// Last live-region announcement (translated)
    pub fn live_message(&self) -> Option<&str> {
        self.live_message.as_deref()
    }

    // ---- edits ----------------------------------------------------------

    /// Apply a mutation through the history. `Ok(false)` when nothing changed.
    pub fn dispatch(&mut self, mutation: &Mutation) -> EditorResult<bool> {
        if !self.history.dispatch(mutation) {
            return Ok(false);
        }
        self.persist()?;
        if let Some(key) = mutation.announcement_key() {
            self.announce(key);
        }
        Ok(true)
    }

    pub fn undo(&mut self) -> EditorResult<bool> {
        if !self.history.undo() {
            return Ok(false);
        }
        self.persist()?;
        self.announce("cms.builder.live.undo");
        Ok(true)
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        if !self.history.redo() {
            return Ok(false);
        }
        self.persist()?;
        self.announce("cms.builder.live.redo");
        Ok(true)
    }

    /// Merge editor flags (name, lock, z-index, hidden) for a component
    pub fn update_editor(&mut self, id: &str, flags: EditorFlags) -> EditorResult<()> {
        self.history.update_editor(id, flags);
        self.persist()
    }

    // ---- selection and stacking -----------------------------------------

    pub fn select(&mut self, ids: impl IntoIterator<Item = impl Into<String>>) {
        self.selection = ids.into_iter().map(Into::into).collect();
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Effective z-index: overlay, then the node's own `zIndex`, then 0
    pub fn z_index(&self, id: &str) -> i64 {
        self.overlay()
            .get(id)
            .and_then(|flags| flags.z_index)
            .or_else(|| self.present().find(id).and_then(|node| node.prop_i64("zIndex")))
            .unwrap_or(0)
    }

    pub fn bring_forward(&mut self) -> EditorResult<()> {
        self.restack(|z| z + 1)
    }

    pub fn send_backward(&mut self) -> EditorResult<()> {
        self.restack(|z| (z - 1).max(0))
    }

    pub fn bring_to_front(&mut self) -> EditorResult<()> {
        self.restack(|_| FRONT_Z_INDEX)
    }

    pub fn send_to_back(&mut self) -> EditorResult<()> {
        self.restack(|_| 0)
    }

    fn restack(&mut self, next: impl Fn(i64) -> i64) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        for id in self.selection.clone() {
            let z_index = next(self.z_index(&id));
            self.history
                .update_editor(&id, EditorFlags::default().with_z_index(z_index));
        }
        self.persist()
    }

    /// Move the single selected component `delta` slots among its siblings
    pub fn reorder_selected(&mut self, delta: i32) -> EditorResult<bool> {
        let [id] = self.selection.as_slice() else {
            return Ok(false);
        };
        let Some(from) = self.present().locate(id) else {
            return Ok(false);
        };
        let len = self
            .present()
            .siblings(from.parent_id.as_deref())
            .map(|siblings| siblings.len())
            .unwrap_or(0);

        let target = from.index as i64 + i64::from(delta);
        if target < 0 || target >= len as i64 {
            return Ok(false);
        }

        let to = Location {
            parent_id: from.parent_id.clone(),
            index: target as usize,
        };
        let moved = self.dispatch(&Mutation::Move { from, to })?;
        if moved {
            self.announce("cms.builder.live.blockReordered");
        }
        Ok(moved)
    }

    // ---- rendering ------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn decorated(&self) -> Vec<DecoratedNode> {
        decorate_tree_for_viewport(self.present(), self.overlay(), Some(self.viewport))
    }

    /// Render outline for `viewport` (current viewport when `None`)
    pub fn render(&self, viewport: Option<Viewport>) -> Vec<RenderNode> {
        let viewport = viewport.unwrap_or(self.viewport);
        let decorated = decorate_tree_for_viewport(self.present(), self.overlay(), Some(viewport));
        render_tree(&decorated, &self.registry, Some(viewport))
    }

    pub fn render_html(&self) -> String {
        to_html(&self.render(None), HtmlOptions::default())
    }

    // ---- grid resizing --------------------------------------------------

    /// Track count of the grid `id` sits in, for the current viewport
    pub fn grid_tracks(&self, id: &str, axis: Axis) -> u32 {
        let configured = self
            .present()
            .parent_of(id)
            .and_then(|parent| resolve_for_viewport(parent, axis.tracks_field(), Some(self.viewport)))
            .and_then(Value::as_u64)
            .map(|tracks| tracks.min(u64::from(u32::MAX)) as u32);

        match (configured, axis) {
            (Some(tracks), _) => tracks,
            (None, Axis::Column) => self.history.grid_cols(),
            (None, Axis::Row) => 0,
        }
    }

    /// Pointer pressed on a resize handle. `false` if no drag started.
    pub fn begin_grid_resize(&mut self, id: &str, axis: Axis, pointer: f64, container_pixel_size: f64) -> bool {
        // a pointer-up may have been lost; every pointer-down starts from idle
        self.grid_pointer_up();

        let tracks = self.grid_tracks(id, axis);
        let Some(node) = self.present().find(id) else {
            return false;
        };
        let handle = ResizeHandle::for_node(node, axis, tracks);
        let container = ContainerMetrics {
            tracks,
            pixel_size: container_pixel_size,
        };
        self.grid.pointer_down(&handle, pointer, container)
    }

    /// Pointer moved during a drag; dispatches when the span changes
    pub fn grid_pointer_move(&mut self, pointer: f64) -> EditorResult<bool> {
        match self.grid.pointer_move(pointer) {
            Some(mutation) => self.dispatch(&mutation),
            None => Ok(false),
        }
    }

    pub fn grid_pointer_up(&mut self) {
        if let Some(state) = self.grid.pointer_up() {
            tracing::debug!(
                "grid resize of '{}' ended at span {}",
                state.component_id,
                state.current_span
            );
        }
    }

    /// Increment/decrement button on a grid item
    pub fn step_span(&mut self, id: &str, axis: Axis, direction: i32) -> EditorResult<bool> {
        let tracks = self.grid_tracks(id, axis);
        let Some(node) = self.present().find(id) else {
            return Ok(false);
        };
        let handle = ResizeHandle::for_node(node, axis, tracks);
        match grid_resize::step_span(&handle, tracks, direction) {
            Some(mutation) => self.dispatch(&mutation),
            None => Ok(false),
        }
    }

    // ---- save / publish / validate --------------------------------------

    pub fn form_data(&self) -> EditorResult<PageForm> {
        Ok(PageForm {
            id: self.page.id.clone(),
            updated_at: self.page.updated_at.to_rfc3339(),
            slug: self.page.slug.clone(),
            status: self.page.status.clone(),
            components: serde_json::to_string(self.present())?,
            history: serde_json::to_string(self.history.record())?,
        })
    }

    pub fn save(&mut self) -> EditorResult<()> {
        let form = self.form_data()?;
        self.publisher_mut()?.save(&form)?;
        self.announce("cms.builder.live.saved");
        Ok(())
    }

    /// Publish the page; the stored local history is dropped on success
    pub fn publish(&mut self) -> EditorResult<()> {
        let form = self.form_data()?;
        self.publisher_mut()?.publish(&form)?;
        persistence::clear(&mut *self.store, &self.page.id)?;
        self.page.status = "published".to_string();
        self.announce("cms.builder.live.published");
        Ok(())
    }

    /// Run the validator and label each issue with its inspector panel
    pub fn validate(&self) -> Vec<LabeledIssue> {
        let Some(validator) = &self.validator else {
            return Vec::new();
        };
        validator
            .validate(self.present())
            .into_iter()
            .map(|issue| {
                let label = resolve_issue_label(&issue);
                let label_text = self.translator.translate(&label.translation_key());
                LabeledIssue {
                    issue,
                    label,
                    label_text,
                }
            })
            .collect()
    }

    /// Persist and tear down
    pub fn close(mut self) -> EditorResult<()> {
        self.grid.pointer_up();
        self.persist()
    }

    fn persist(&mut self) -> EditorResult<()> {
        persistence::persist(&mut *self.store, &self.page.id, self.history.record())
    }

    fn publisher_mut(&mut self) -> EditorResult<&mut Box<dyn PagePublisher>> {
        self.publisher
            .as_mut()
            .ok_or_else(|| EditorError::Collaborator("no page publisher configured".to_string()))
    }

    fn announce(&mut self, key: &str) {
        self.live_message = Some(self.translator.translate(key));
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("page", &self.page.id)
            .field("viewport", &self.viewport)
            .field("undo_levels", &self.history.undo_levels())
            .field("redo_levels", &self.history.redo_levels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_common::{ComponentNode, MemoryStore};

    fn grid_page() -> Page {
        Page::new("home").with_components(ComponentTree::from_nodes(vec![ComponentNode::container(
            "grid", "Grid",
        )
        .with_prop("columns", 6)
        .with_children(vec![
            ComponentNode::new("a", "Text").with_prop("gridColumn", "span 2"),
            ComponentNode::new("b", "Text"),
            ComponentNode::new("c", "Text"),
        ])]))
    }

    fn open(page: Page) -> EditorSession {
        EditorSession::open(page, Box::new(MemoryStore::new()), EditorOptions::default())
    }

    #[test]
    fn test_z_order_shortcuts() {
        let mut session = open(grid_page());
        session.select(["a"]);

        session.send_backward().unwrap();
        assert_eq!(session.z_index("a"), 0);

        session.bring_forward().unwrap();
        session.bring_forward().unwrap();
        assert_eq!(session.z_index("a"), 2);

        session.bring_to_front().unwrap();
        assert_eq!(session.z_index("a"), 999);

        session.send_to_back().unwrap();
        assert_eq!(session.z_index("a"), 0);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_reorder_selected() {
        let mut session = open(grid_page());
        session.select(["a"]);

        assert!(!session.reorder_selected(-1).unwrap());
        assert!(session.reorder_selected(1).unwrap());

        let ids: Vec<_> = session
            .present()
            .find("grid")
            .unwrap()
            .children()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        session.select(["a", "b"]);
        assert!(!session.reorder_selected(1).unwrap());
    }

    #[test]
    fn test_grid_tracks_from_parent() {
        let session = open(grid_page());
        assert_eq!(session.grid_tracks("a", Axis::Column), 6);
        assert_eq!(session.grid_tracks("a", Axis::Row), 0);
        assert_eq!(session.grid_tracks("grid", Axis::Column), 12);
    }

    #[test]
    fn test_step_span_dispatches() {
        let mut session = open(grid_page());
        assert!(session.step_span("a", Axis::Column, 1).unwrap());
        assert_eq!(
            session.present().find("a").unwrap().prop_str("gridColumn"),
            Some("span 3")
        );
        assert!(!session.step_span("ghost", Axis::Column, 1).unwrap());
        assert_eq!(session.history().undo_levels(), 1);
    }

    #[test]
    fn test_pointer_down_on_missing_item_drops_stale_drag() {
        let mut session = open(grid_page());
        assert!(session.begin_grid_resize("a", Axis::Column, 0.0, 1200.0));

        // pointer-up never arrived; the next press lands on nothing
        assert!(!session.begin_grid_resize("ghost", Axis::Column, 500.0, 1200.0));
        assert!(!session.grid_pointer_move(600.0).unwrap());
        assert_eq!(
            session.present().find("a").unwrap().prop_str("gridColumn"),
            Some("span 2")
        );
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_pointer_down_restarts_on_new_item() {
        let mut session = open(grid_page());
        assert!(session.begin_grid_resize("a", Axis::Column, 0.0, 1200.0));
        assert!(session.begin_grid_resize("b", Axis::Column, 0.0, 1200.0));

        // 200px is one track of six
        assert!(session.grid_pointer_move(200.0).unwrap());
        assert_eq!(session.present().find("a").unwrap().prop_str("gridColumn"), Some("span 2"));
        assert_eq!(session.present().find("b").unwrap().prop_str("gridColumn"), Some("span 2"));
    }

    #[test]
    fn test_reorder_announces_reordered() {
        let mut session = open(grid_page()).with_translator(Box::new(crate::MapTranslator::english()));
        session.select(["b"]);
        assert!(session.reorder_selected(-1).unwrap());
        assert_eq!(session.live_message(), Some("Block reordered"));

        session.dispatch(&Mutation::Remove { id: "c".into() }).unwrap();
        assert_eq!(session.live_message(), Some("Block deleted"));
    }

    #[test]
    fn test_open_stores_initial_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = pagebuilder_common::FileStore::open(dir.path()).unwrap();
        let session = EditorSession::open(grid_page(), Box::new(store.clone()), EditorOptions::default());
        assert_eq!(session.source(), HistorySource::Fresh);
        drop(session);

        let stored = persistence::read_stored(&store, "home").unwrap();
        assert_eq!(stored.present, grid_page().components);

        let reopened = EditorSession::open(grid_page(), Box::new(store), EditorOptions::default());
        assert_eq!(reopened.source(), HistorySource::Local);
    }

    #[test]
    fn test_save_without_publisher_fails() {
        let mut session = open(grid_page());
        assert!(matches!(session.save(), Err(EditorError::Collaborator(_))));
    }

    #[test]
    fn test_form_data() {
        let session = open(grid_page());
        let form = session.form_data().unwrap();
        assert_eq!(form.id, "home");
        assert_eq!(form.status, "draft");

        let components: ComponentTree = serde_json::from_str(&form.components).unwrap();
        assert_eq!(&components, session.present());
        assert!(form.history.contains("\"past\":[]"));
    }

    #[test]
    fn test_validate_without_validator_is_empty() {
        assert!(open(grid_page()).validate().is_empty());
    }
}
