//! Component type registry.
//!
//! Maps a node's `type` tag to a [`ComponentHandler`] that knows how to
//! outline it for the canvas. Tags without a handler go to the fallback
//! handler, so an unknown component still renders (as a labelled block)
//! instead of disappearing.

use crate::schema;
use pagebuilder_common::ComponentNode;
use std::collections::{BTreeMap, HashMap};

/// Rendering behavior for one family of component types
pub trait ComponentHandler {
    /// Handler name (for debugging)
    fn name(&self) -> &'static str;

    /// HTML element used for the node
    fn element(&self, node: &ComponentNode) -> &'static str;

    /// Element attributes derived from the node's props
    fn attributes(&self, _node: &ComponentNode) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Text content, for leaf components that show text
    fn text(&self, _node: &ComponentNode) -> Option<String> {
        None
    }
}

/// Layout containers (`Section`, `Grid`, `StackFlex`, ...)
pub struct ContainerHandler;

impl ComponentHandler for ContainerHandler {
    fn name(&self) -> &'static str {
        "container"
    }

    fn element(&self, node: &ComponentNode) -> &'static str {
        match node.kind.as_str() {
            "Section" => "section",
            _ => "div",
        }
    }
}

/// `Text` and `Heading`
pub struct TextHandler;

impl ComponentHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn element(&self, node: &ComponentNode) -> &'static str {
        if node.kind != "Heading" {
            return "p";
        }
        match node.prop_i64("level").unwrap_or(2) {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        }
    }

    fn text(&self, node: &ComponentNode) -> Option<String> {
        node.prop_str("text").map(str::to_string)
    }
}

pub struct ImageHandler;

impl ComponentHandler for ImageHandler {
    fn name(&self) -> &'static str {
        "image"
    }

    fn element(&self, _node: &ComponentNode) -> &'static str {
        "img"
    }

    fn attributes(&self, node: &ComponentNode) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        if let Some(src) = node.prop_str("src") {
            attrs.insert("src".to_string(), src.to_string());
        }
        attrs.insert(
            "alt".to_string(),
            node.prop_str("alt").unwrap_or_default().to_string(),
        );
        attrs
    }
}

/// Buttons render as links when they navigate somewhere
pub struct ButtonHandler;

impl ComponentHandler for ButtonHandler {
    fn name(&self) -> &'static str {
        "button"
    }

    fn element(&self, node: &ComponentNode) -> &'static str {
        if node.prop_str("href").is_some() {
            "a"
        } else {
            "button"
        }
    }

    fn attributes(&self, node: &ComponentNode) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        match node.prop_str("href") {
            Some(href) => {
                attrs.insert("href".to_string(), href.to_string());
            }
            None => {
                attrs.insert("type".to_string(), "button".to_string());
            }
        }
        attrs
    }

    fn text(&self, node: &ComponentNode) -> Option<String> {
        node.prop_str("label")
            .or_else(|| node.prop_str("text"))
            .map(str::to_string)
    }
}

/// Fallback for tags with no registered handler
pub struct UnknownHandler;

impl ComponentHandler for UnknownHandler {
    fn name(&self) -> &'static str {
        "unknown"
    }

    fn element(&self, _node: &ComponentNode) -> &'static str {
        "div"
    }

    fn attributes(&self, node: &ComponentNode) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("data-unknown-type".to_string(), node.kind.clone());
        attrs
    }
}

/// Type tag → handler lookup with an explicit fallback
pub struct ComponentRegistry {
    handlers: HashMap<String, Box<dyn ComponentHandler>>,
    fallback: Box<dyn ComponentHandler>,
}

impl ComponentRegistry {
    /// Create a registry with the built-in handlers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in schema::CONTAINER_TYPES {
            registry.register(*kind, Box::new(ContainerHandler));
        }
        registry.register("Text", Box::new(TextHandler));
        registry.register("Heading", Box::new(TextHandler));
        registry.register("Image", Box::new(ImageHandler));
        registry.register("Button", Box::new(ButtonHandler));
        registry
    }

    /// Create a registry where every tag goes to the fallback
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Box::new(UnknownHandler),
        }
    }

    /// Register (or replace) the handler for a type tag
    pub fn register(&mut self, kind: impl Into<String>, handler: Box<dyn ComponentHandler>) {
        self.handlers.insert(kind.into(), handler);
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Handler for `kind`, or the fallback
    pub fn handler(&self, kind: &str) -> &dyn ComponentHandler {
        match self.handlers.get(kind) {
            Some(handler) => handler.as_ref(),
            None => {
                tracing::debug!("no handler for component type '{}'", kind);
                self.fallback.as_ref()
            }
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("handlers", &format!("{} handlers", self.handlers.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dispatch() {
        let registry = ComponentRegistry::new();
        assert_eq!(registry.handler("Grid").name(), "container");
        assert_eq!(registry.handler("Heading").name(), "text");
        assert_eq!(registry.handler("Image").name(), "image");
        assert_eq!(registry.handler("Button").name(), "button");
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let registry = ComponentRegistry::new();
        let node = ComponentNode::new("x", "Lottie");
        let handler = registry.handler(&node.kind);

        assert_eq!(handler.name(), "unknown");
        assert_eq!(
            handler.attributes(&node).get("data-unknown-type").map(String::as_str),
            Some("Lottie")
        );
    }

    #[test]
    fn test_heading_levels() {
        let handler = TextHandler;
        let heading = ComponentNode::new("h", "Heading").with_prop("level", 1);
        assert_eq!(handler.element(&heading), "h1");
        assert_eq!(handler.element(&ComponentNode::new("h", "Heading")), "h2");
        assert_eq!(handler.element(&ComponentNode::new("t", "Text")), "p");
    }

    #[test]
    fn test_button_with_href_is_link() {
        let handler = ButtonHandler;
        let link = ComponentNode::new("b", "Button")
            .with_prop("href", "/shop")
            .with_prop("label", "Shop");
        assert_eq!(handler.element(&link), "a");
        assert_eq!(handler.text(&link).as_deref(), Some("Shop"));
        assert_eq!(handler.element(&ComponentNode::new("b", "Button")), "button");
    }

    #[test]
    fn test_custom_handler() {
        struct VideoHandler;
        impl ComponentHandler for VideoHandler {
            fn name(&self) -> &'static str {
                "video"
            }
            fn element(&self, _node: &ComponentNode) -> &'static str {
                "video"
            }
        }

        let mut registry = ComponentRegistry::empty();
        registry.register("Video", Box::new(VideoHandler));
        assert!(registry.is_registered("Video"));
        assert_eq!(registry.handler("Video").name(), "video");
        assert_eq!(registry.handler("Text").name(), "unknown");
    }
}
