//! Narrow interfaces to the world outside the editor core: the page as the
//! loader hands it over, the save/publish backend, and translation lookup.

use crate::errors::EditorResult;
use chrono::{DateTime, Utc};
use pagebuilder_common::ComponentTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A page as supplied by the page loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub components: ComponentTree,

    /// Server-side history record; kept raw so a malformed one can be ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<serde_json::Value>,
}

fn default_status() -> String {
    "draft".to_string()
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: String::new(),
            status: default_status(),
            updated_at: Utc::now(),
            components: ComponentTree::new(),
            history: None,
        }
    }

    pub fn with_components(mut self, components: ComponentTree) -> Self {
        self.components = components;
        self
    }
}

/// Payload handed to the save/publish backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageForm {
    pub id: String,
    pub updated_at: String,
    pub slug: String,
    pub status: String,

    /// JSON of the present tree
    pub components: String,

    /// JSON of the full history record
    pub history: String,
}

/// Save/publish backend
pub trait PagePublisher {
    fn save(&mut self, form: &PageForm) -> EditorResult<()>;
    fn publish(&mut self, form: &PageForm) -> EditorResult<()>;
}

/// Translation lookup
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Returns keys unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Table-backed translator; unknown keys come back unchanged
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    entries: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// English strings for live announcements and issue panels
    pub fn english() -> Self {
        let mut translator = Self::new();
        for (key, value) in [
            ("cms.builder.live.blockAdded", "Block added"),
            ("cms.builder.live.blockMoved", "Block moved"),
            ("cms.builder.live.blockReordered", "Block reordered"),
            ("cms.builder.live.blockDeleted", "Block deleted"),
            ("cms.builder.live.blockResized", "Block resized"),
            ("cms.builder.live.blockDuplicated", "Block duplicated"),
            ("cms.builder.live.undo", "Undone"),
            ("cms.builder.live.redo", "Redone"),
            ("cms.builder.live.saved", "Page saved"),
            ("cms.builder.live.published", "Page published"),
            ("cms.builder.issues.layout.size", "Layout · Size"),
            ("cms.builder.issues.layout.spacing", "Layout · Spacing"),
            ("cms.builder.issues.layout.position", "Layout · Position"),
            ("cms.builder.issues.interactions.navigate", "Interactions · Navigate"),
            ("cms.builder.issues.interactions.motion", "Interactions · Motion"),
            ("cms.builder.issues.style.colors", "Style · Colors"),
            ("cms.builder.issues.content.media", "Content · Media"),
            ("cms.builder.issues.content.items", "Content · Items"),
            ("cms.builder.issues.unknown", "Unknown"),
        ] {
            translator.insert(key, value);
        }
        translator
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_defaults() {
        let page: Page = serde_json::from_value(json!({ "id": "home" })).unwrap();
        assert_eq!(page.status, "draft");
        assert!(page.components.is_empty());
        assert!(page.history.is_none());
    }

    #[test]
    fn test_page_wire_format() {
        let page: Page = serde_json::from_value(json!({
            "id": "home",
            "slug": "home",
            "status": "published",
            "updatedAt": "2024-05-01T10:00:00Z",
            "components": [{ "id": "a", "type": "Text" }]
        }))
        .unwrap();

        assert_eq!(page.updated_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(page.components.root_ids(), vec!["a"]);
    }

    #[test]
    fn test_translators() {
        assert_eq!(KeyTranslator.translate("x.y"), "x.y");
        let english = MapTranslator::english();
        assert_eq!(english.translate("cms.builder.live.blockAdded"), "Block added");
        assert_eq!(english.translate("missing.key"), "missing.key");
    }
}
