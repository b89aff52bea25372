//! # Grid Resize Controller
//!
//! Turns pointer drags on a grid item's resize handle into discrete span
//! updates.
//!
//! ## State machine
//!
//! ```text
//!            pointer_down                 pointer_up
//!   Idle ──────────────────▶ Dragging ───────────────▶ Idle
//!                              │  ▲
//!                 pointer_move │  │ (emits an update only when
//!                              └──┘  the clamped span changes)
//! ```
//!
//! A `pointer_down` while already dragging discards the old drag; this is how a
//! lost pointer-up (window blur, released outside the canvas) is recovered.

use crate::Mutation;
use pagebuilder_common::ComponentNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which grid dimension a handle resizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Column,
    Row,
}

impl Axis {
    /// Placement prop on the grid item
    pub fn placement_field(&self) -> &'static str {
        match self {
            Axis::Column => "gridColumn",
            Axis::Row => "gridRow",
        }
    }

    /// Track-count prop on the grid container
    pub fn tracks_field(&self) -> &'static str {
        match self {
            Axis::Column => "columns",
            Axis::Row => "rows",
        }
    }
}

/// Parsed `gridColumn` / `gridRow` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    /// 1-based start line, when the item pins one
    pub start: Option<u32>,
    pub span: u32,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self { start: None, span: 1 }
    }
}

impl GridPlacement {
    pub fn span(span: u32) -> Self {
        Self {
            start: None,
            span: span.max(1),
        }
    }

    /// Parse `span N`, `S / span N`, `S / E`, `S` or `auto`.
    /// Anything unrecognized is treated as `auto` (span 1).
    pub fn parse(raw: &str) -> Self {
        Self::parse_in(raw, None)
    }

    /// Like [`GridPlacement::parse`], resolving negative end lines (`1 / -1`)
    /// against a grid of `tracks` tracks
    pub fn parse_in(raw: &str, tracks: Option<u32>) -> Self {
        let raw = raw.trim();
        let (head, tail) = match raw.split_once('/') {
            Some((head, tail)) => (head.trim(), Some(tail.trim())),
            None => (raw, None),
        };

        if let Some(span) = parse_span(head) {
            return Self::span(span);
        }

        let start = head.parse::<u32>().ok().filter(|s| *s >= 1);
        let span = tail
            .and_then(|tail| {
                parse_span(tail).or_else(|| {
                    let end = parse_end_line(tail, tracks)?;
                    let start = start?;
                    (end > start).then(|| end - start)
                })
            })
            .unwrap_or(1);

        Self { start, span }
    }

    /// 0-based track the item starts on
    pub fn start_track(&self) -> u32 {
        self.start.map(|s| s - 1).unwrap_or(0)
    }

    pub fn with_span(self, span: u32) -> Self {
        Self { span, ..self }
    }
}

impl fmt::Display for GridPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "{} / span {}", start, self.span),
            None => write!(f, "span {}", self.span),
        }
    }
}

/// Positive lines count from 1; `-1` is the line after the last track
fn parse_end_line(raw: &str, tracks: Option<u32>) -> Option<u32> {
    let line = raw.parse::<i64>().ok()?;
    if line >= 1 {
        return u32::try_from(line).ok();
    }
    if line == 0 {
        return None;
    }
    let resolved = i64::from(tracks?) + 2 + line;
    (resolved >= 1).then(|| resolved as u32)
}

fn parse_span(raw: &str) -> Option<u32> {
    let rest = raw.strip_prefix("span")?;
    rest.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

/// A resize handle bound to one grid item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeHandle {
    pub component_id: String,
    pub axis: Axis,
    pub placement: GridPlacement,
}

impl ResizeHandle {
    /// Read the item's current placement for `axis` in a grid of `tracks`
    pub fn for_node(node: &ComponentNode, axis: Axis, tracks: u32) -> Self {
        let placement = node
            .prop_str(axis.placement_field())
            .map(|raw| GridPlacement::parse_in(raw, Some(tracks)))
            .unwrap_or_default();
        Self {
            component_id: node.id.clone(),
            axis,
            placement,
        }
    }
}

/// Rendered size of the grid container along the drag axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMetrics {
    pub tracks: u32,
    pub pixel_size: f64,
}

/// Captured at pointer-down, dropped at pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct GridDragState {
    pub component_id: String,
    pub axis: Axis,
    pub start_pointer: f64,
    pub start_span: u32,
    pub start_track: u32,
    pub explicit_start: Option<u32>,
    pub track_count: u32,
    pub container_pixel_size: f64,

    /// Last span emitted (or the starting span)
    pub current_span: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(GridDragState),
}

/// Drag state machine for one canvas
#[derive(Debug, Default)]
pub struct GridResizeController {
    phase: DragPhase,
}

impl GridResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Start a drag. Returns `false` (and stays idle) when the container
    /// cannot be measured.
    pub fn pointer_down(&mut self, handle: &ResizeHandle, pointer: f64, container: ContainerMetrics) -> bool {
        if let DragPhase::Dragging(stale) = &self.phase {
            tracing::debug!("discarding stale drag on '{}'", stale.component_id);
        }
        self.phase = DragPhase::Idle;

        if container.tracks == 0 || !(container.pixel_size > 0.0) {
            tracing::debug!(
                "not resizing '{}': container has {} track(s) over {}px",
                handle.component_id,
                container.tracks,
                container.pixel_size
            );
            return false;
        }

        self.phase = DragPhase::Dragging(GridDragState {
            component_id: handle.component_id.clone(),
            axis: handle.axis,
            start_pointer: pointer,
            start_span: handle.placement.span,
            start_track: handle.placement.start_track(),
            explicit_start: handle.placement.start,
            track_count: container.tracks,
            container_pixel_size: container.pixel_size,
            current_span: handle.placement.span,
        });
        true
    }

    /// Feed a pointer position; yields an update only when the span changes
    pub fn pointer_move(&mut self, pointer: f64) -> Option<Mutation> {
        let DragPhase::Dragging(state) = &mut self.phase else {
            return None;
        };

        let delta = pixels_to_tracks(pointer - state.start_pointer, state.container_pixel_size, state.track_count);
        let span = clamp_span(i64::from(state.start_span) + delta, state.track_count, state.start_track);
        if span == state.current_span {
            return None;
        }

        state.current_span = span;
        let placement = GridPlacement {
            start: state.explicit_start,
            span,
        };
        Some(placement_update(&state.component_id, state.axis, placement))
    }

    /// End the drag; returns the final state if one was active
    pub fn pointer_up(&mut self) -> Option<GridDragState> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(state) => Some(state),
            DragPhase::Idle => None,
        }
    }
}

/// Increment/decrement button: one track in `direction` without a drag
pub fn step_span(handle: &ResizeHandle, tracks: u32, direction: i32) -> Option<Mutation> {
    if tracks == 0 {
        return None;
    }
    let span = clamp_span(
        i64::from(handle.placement.span) + i64::from(direction.signum()),
        tracks,
        handle.placement.start_track(),
    );
    if span == handle.placement.span {
        return None;
    }
    Some(placement_update(
        &handle.component_id,
        handle.axis,
        handle.placement.with_span(span),
    ))
}

/// Convert a pixel delta to whole tracks, rounding halves toward +∞
pub fn pixels_to_tracks(delta: f64, pixel_size: f64, tracks: u32) -> i64 {
    if tracks == 0 || !(pixel_size > 0.0) {
        return 0;
    }
    let track_size = pixel_size / f64::from(tracks);
    (delta / track_size + 0.5).floor() as i64
}

/// Keep `1 <= span <= tracks - start_track` (never below 1)
pub fn clamp_span(span: i64, tracks: u32, start_track: u32) -> u32 {
    let max = (i64::from(tracks) - i64::from(start_track)).max(1);
    span.clamp(1, max) as u32
}

fn placement_update(id: &str, axis: Axis, placement: GridPlacement) -> Mutation {
    Mutation::update_field(id, axis.placement_field(), Value::String(placement.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(placement: &str) -> ResizeHandle {
        ResizeHandle {
            component_id: "item".into(),
            axis: Axis::Column,
            placement: GridPlacement::parse(placement),
        }
    }

    fn desktop_grid() -> ContainerMetrics {
        ContainerMetrics {
            tracks: 12,
            pixel_size: 1200.0,
        }
    }

    fn emitted_value(mutation: &Mutation) -> Option<&str> {
        match mutation {
            Mutation::Update { patch, .. } => patch.get("gridColumn").and_then(Value::as_str),
            _ => None,
        }
    }

    #[test]
    fn test_parse_placements() {
        assert_eq!(GridPlacement::parse("span 3"), GridPlacement { start: None, span: 3 });
        assert_eq!(GridPlacement::parse("2 / span 4"), GridPlacement { start: Some(2), span: 4 });
        assert_eq!(GridPlacement::parse("2 / 5"), GridPlacement { start: Some(2), span: 3 });
        assert_eq!(GridPlacement::parse("3"), GridPlacement { start: Some(3), span: 1 });
        assert_eq!(GridPlacement::parse("auto"), GridPlacement::default());
        assert_eq!(GridPlacement::parse("span 0"), GridPlacement::default());
    }

    #[test]
    fn test_negative_end_lines_count_from_the_end() {
        assert_eq!(GridPlacement::parse_in("1 / -1", Some(12)), GridPlacement { start: Some(1), span: 12 });
        assert_eq!(GridPlacement::parse_in("2 / -2", Some(12)), GridPlacement { start: Some(2), span: 10 });
        assert_eq!(GridPlacement::parse_in("1 / -20", Some(12)), GridPlacement { start: Some(1), span: 1 });
        assert_eq!(GridPlacement::parse("1 / -1"), GridPlacement { start: Some(1), span: 1 });
    }

    #[test]
    fn test_full_width_item_steps_from_full_span() {
        let node = ComponentNode::new("item", "Text").with_prop("gridColumn", "1 / -1");
        let handle = ResizeHandle::for_node(&node, Axis::Column, 12);
        assert_eq!(handle.placement.span, 12);

        let shrink = step_span(&handle, 12, -1).unwrap();
        assert_eq!(emitted_value(&shrink), Some("1 / span 11"));
        assert!(step_span(&handle, 12, 1).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(GridPlacement::span(2).to_string(), "span 2");
        assert_eq!(GridPlacement::parse("4 / 6").to_string(), "4 / span 2");
    }

    #[test]
    fn test_hundred_pixels_is_one_track() {
        let mut controller = GridResizeController::new();
        assert!(controller.pointer_down(&handle("span 2"), 0.0, desktop_grid()));

        let emitted: Vec<Mutation> = (1..=100)
            .filter_map(|x| controller.pointer_move(f64::from(x)))
            .collect();

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted_value(&emitted[0]), Some("span 3"));
        assert!(controller.pointer_up().is_some());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(pixels_to_tracks(50.0, 1200.0, 12), 1);
        assert_eq!(pixels_to_tracks(49.0, 1200.0, 12), 0);
        assert_eq!(pixels_to_tracks(-50.0, 1200.0, 12), 0);
        assert_eq!(pixels_to_tracks(-51.0, 1200.0, 12), -1);
    }

    #[test]
    fn test_clamps_at_both_ends() {
        let mut controller = GridResizeController::new();
        controller.pointer_down(&handle("span 2"), 500.0, desktop_grid());

        let shrink = controller.pointer_move(0.0).unwrap();
        assert_eq!(emitted_value(&shrink), Some("span 1"));
        assert!(controller.pointer_move(-400.0).is_none());

        let grow = controller.pointer_move(5000.0).unwrap();
        assert_eq!(emitted_value(&grow), Some("span 12"));
    }

    #[test]
    fn test_upper_bound_respects_start_line() {
        let mut controller = GridResizeController::new();
        controller.pointer_down(&handle("4 / span 2"), 0.0, desktop_grid());

        let grow = controller.pointer_move(5000.0).unwrap();
        assert_eq!(emitted_value(&grow), Some("4 / span 9"));
    }

    #[test]
    fn test_pointer_up_stops_emission() {
        let mut controller = GridResizeController::new();
        controller.pointer_down(&handle("span 2"), 0.0, desktop_grid());
        controller.pointer_up();
        assert!(controller.pointer_move(300.0).is_none());
        assert!(controller.pointer_up().is_none());
    }

    #[test]
    fn test_lost_pointer_up_is_recovered() {
        let mut controller = GridResizeController::new();
        controller.pointer_down(&handle("span 2"), 0.0, desktop_grid());
        controller.pointer_move(300.0);

        // New drag from a different origin; no pointer-up in between
        controller.pointer_down(&handle("span 5"), 900.0, desktop_grid());
        assert!(controller.pointer_move(910.0).is_none());

        let next = controller.pointer_move(1000.0).unwrap();
        assert_eq!(emitted_value(&next), Some("span 6"));
    }

    #[test]
    fn test_unmeasurable_container_stays_idle() {
        let mut controller = GridResizeController::new();
        let zero_tracks = ContainerMetrics { tracks: 0, pixel_size: 1200.0 };
        let collapsed = ContainerMetrics { tracks: 12, pixel_size: 0.0 };

        assert!(!controller.pointer_down(&handle("span 2"), 0.0, zero_tracks));
        assert!(!controller.pointer_down(&handle("span 2"), 0.0, collapsed));
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_step_span() {
        let up = step_span(&handle("span 2"), 12, 1).unwrap();
        assert_eq!(emitted_value(&up), Some("span 3"));

        assert!(step_span(&handle("span 1"), 12, -1).is_none());
        assert!(step_span(&handle("span 12"), 12, 1).is_none());
        assert!(step_span(&handle("11 / span 2"), 12, 1).is_none());
    }
}
