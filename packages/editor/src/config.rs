use crate::history::{DEFAULT_GRID_COLS, DEFAULT_MAX_LEVELS};
use pagebuilder_common::Viewport;
use serde::{Deserialize, Serialize};

/// Options for opening an editor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptions {
    /// Column count for grids that do not set their own
    pub grid_cols: u32,

    /// Maximum undo levels (0 = unlimited)
    pub history_limit: usize,

    /// Viewport the canvas starts on
    pub default_viewport: Viewport,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            grid_cols: DEFAULT_GRID_COLS,
            history_limit: DEFAULT_MAX_LEVELS,
            default_viewport: Viewport::Desktop,
        }
    }
}
