//! Render outline for the canvas.
//!
//! Turns a decorated tree into [`RenderNode`]s (element, attributes, inline
//! style) for one viewport, and serializes them to HTML for previews. Hidden
//! nodes are skipped together with their subtree.

use crate::decorate::{resolve_for_viewport, DecoratedNode};
use crate::registry::ComponentRegistry;
use pagebuilder_common::Viewport;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One element of the render outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub kind: String,
    pub element: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Inline `style` attribute value
    pub fn style_attribute(&self) -> String {
        self.style
            .iter()
            .map(|(key, value)| format!("{}: {};", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Props copied into the inline style, resolved per viewport
const SIZE_PROPS: &[(&str, &str)] = &[
    ("width", "width"),
    ("height", "height"),
    ("position", "position"),
    ("top", "top"),
    ("left", "left"),
    ("margin", "margin"),
    ("padding", "padding"),
    ("gap", "gap"),
];

/// Build the render outline for `viewport`
pub fn render_tree(
    decorated: &[DecoratedNode],
    registry: &ComponentRegistry,
    viewport: Option<Viewport>,
) -> Vec<RenderNode> {
    decorated
        .iter()
        .filter_map(|node| render_node(node, registry, viewport))
        .collect()
}

fn render_node(
    decorated: &DecoratedNode,
    registry: &ComponentRegistry,
    viewport: Option<Viewport>,
) -> Option<RenderNode> {
    if decorated.decoration.hidden {
        return None;
    }

    let node = &decorated.node;
    let handler = registry.handler(&node.kind);

    let mut attributes = handler.attributes(node);
    attributes.insert("data-component-id".to_string(), node.id.clone());
    if decorated.decoration.locked == Some(true) {
        attributes.insert("data-locked".to_string(), "true".to_string());
    }
    if let Some(name) = &decorated.decoration.name {
        attributes.insert("aria-label".to_string(), name.clone());
    }

    let mut style = BTreeMap::new();
    for (prop, css) in SIZE_PROPS {
        if let Some(value) = resolve_for_viewport(node, prop, viewport).and_then(css_value) {
            style.insert(css.to_string(), value);
        }
    }
    for (prop, css) in [("gridColumn", "grid-column"), ("gridRow", "grid-row")] {
        if let Some(value) = node.prop_str(prop) {
            style.insert(css.to_string(), value.to_string());
        }
    }
    if node.kind == "Grid" {
        style.insert("display".to_string(), "grid".to_string());
        for (prop, css) in [("columns", "grid-template-columns"), ("rows", "grid-template-rows")] {
            if let Some(tracks) = resolve_for_viewport(node, prop, viewport).and_then(Value::as_u64) {
                style.insert(css.to_string(), format!("repeat({}, minmax(0, 1fr))", tracks));
            }
        }
    }
    if let Some(z_index) = decorated.decoration.z_index {
        style.insert("z-index".to_string(), z_index.to_string());
    }

    Some(RenderNode {
        id: node.id.clone(),
        kind: node.kind.clone(),
        element: handler.element(node).to_string(),
        attributes,
        style,
        text: handler.text(node),
        children: render_tree(&decorated.children, registry, viewport),
    })
}

fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(format!("{}px", n)),
        _ => None,
    }
}

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: HtmlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.buffer.push('\n');
        }
    }
}

/// Serialize a render outline to HTML
pub fn to_html(nodes: &[RenderNode], options: HtmlOptions) -> String {
    let mut ctx = Context {
        options,
        depth: 0,
        buffer: String::new(),
    };
    for node in nodes {
        write_node(node, &mut ctx);
    }
    ctx.buffer
}

fn write_node(node: &RenderNode, ctx: &mut Context) {
    ctx.add_indent();
    ctx.add(&format!("<{}", node.element));

    for (name, value) in &node.attributes {
        ctx.add(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    if !node.style.is_empty() {
        ctx.add(&format!(" style=\"{}\"", escape_html(&node.style_attribute())));
    }

    if is_self_closing(&node.element) {
        ctx.add(" />");
        ctx.newline();
        return;
    }

    ctx.add(">");
    if let Some(text) = &node.text {
        ctx.add(&escape_html(text));
    }

    if !node.children.is_empty() {
        ctx.newline();
        ctx.depth += 1;
        for child in &node.children {
            write_node(child, ctx);
        }
        ctx.depth -= 1;
        ctx.add_indent();
    }

    ctx.add(&format!("</{}>", node.element));
    ctx.newline();
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br" | "hr")
}
