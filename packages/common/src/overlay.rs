//! Editor overlay metadata.
//!
//! Editor-only flags keyed by component id. The overlay is never written into
//! the component tree; it is layered on top of it at render time, so it keeps
//! following a component through moves and undo as long as its id is stable.

use crate::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visibility rule stored in the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HiddenRule {
    /// Hidden (or shown) on every viewport
    Always(bool),

    /// Hidden only on the listed viewports
    Viewports(Vec<Viewport>),
}

impl HiddenRule {
    /// Resolve the rule for a viewport. `None` when the rule is viewport-specific
    /// and no viewport was requested.
    pub fn resolve(&self, viewport: Option<Viewport>) -> Option<bool> {
        match self {
            HiddenRule::Always(hidden) => Some(*hidden),
            HiddenRule::Viewports(list) => viewport.map(|vp| list.contains(&vp)),
        }
    }
}

/// Editor flags for one component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<HiddenRule>,
}

impl EditorFlags {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_hidden(mut self, hidden: HiddenRule) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Overwrite every field that is set in `patch`
    pub fn merge(&mut self, patch: EditorFlags) {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.locked.is_some() {
            self.locked = patch.locked;
        }
        if patch.z_index.is_some() {
            self.z_index = patch.z_index;
        }
        if patch.hidden.is_some() {
            self.hidden = patch.hidden;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &EditorFlags::default()
    }
}

/// Component id → editor flags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayMap {
    entries: BTreeMap<String, EditorFlags>,
}

impl OverlayMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&EditorFlags> {
        self.entries.get(id)
    }

    /// Replace the flags for `id`
    pub fn insert(&mut self, id: impl Into<String>, flags: EditorFlags) {
        self.entries.insert(id.into(), flags);
    }

    /// Merge `patch` into the flags for `id`, creating the entry if needed
    pub fn patch(&mut self, id: impl Into<String>, patch: EditorFlags) {
        self.entries.entry(id.into()).or_default().merge(patch);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EditorFlags)> {
        self.entries.iter()
    }

    /// Effective z-index for `id` (0 when unset)
    pub fn z_index(&self, id: &str) -> i64 {
        self.get(id).and_then(|flags| flags.z_index).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hidden_rule_accepts_bool_or_list() {
        let flags: EditorFlags = serde_json::from_value(json!({ "hidden": ["mobile"] })).unwrap();
        assert_eq!(flags.hidden, Some(HiddenRule::Viewports(vec![Viewport::Mobile])));

        let flags: EditorFlags = serde_json::from_value(json!({ "hidden": true })).unwrap();
        assert_eq!(flags.hidden, Some(HiddenRule::Always(true)));
    }

    #[test]
    fn test_resolve_without_viewport() {
        let rule = HiddenRule::Viewports(vec![Viewport::Tablet]);
        assert_eq!(rule.resolve(None), None);
        assert_eq!(rule.resolve(Some(Viewport::Tablet)), Some(true));
        assert_eq!(rule.resolve(Some(Viewport::Desktop)), Some(false));
        assert_eq!(HiddenRule::Always(false).resolve(None), Some(false));
    }

    #[test]
    fn test_patch_merges_fields() {
        let mut overlay = OverlayMap::new();
        overlay.patch("a", EditorFlags::named("Hero"));
        overlay.patch("a", EditorFlags::default().with_z_index(3));

        let flags = overlay.get("a").unwrap();
        assert_eq!(flags.name.as_deref(), Some("Hero"));
        assert_eq!(flags.z_index, Some(3));
        assert_eq!(overlay.z_index("a"), 3);
        assert_eq!(overlay.z_index("b"), 0);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let flags = EditorFlags::default().with_z_index(2).with_locked(true);
        let value = serde_json::to_value(&flags).unwrap();
        assert_eq!(value, json!({ "locked": true, "zIndex": 2 }));
    }
}
