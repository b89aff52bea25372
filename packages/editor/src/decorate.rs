//! Viewport decoration: layer the editor overlay onto the component tree for
//! one viewport without touching the tree itself.

use pagebuilder_common::{ComponentNode, ComponentTree, OverlayMap, Viewport};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Effective editor state of one node for one viewport
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,

    pub hidden: bool,
}

/// A node paired with its decoration, mirroring the tree's shape
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedNode {
    pub node: Arc<ComponentNode>,
    pub decoration: Decoration,
    pub children: Vec<DecoratedNode>,
}

impl DecoratedNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn kind(&self) -> &str {
        &self.node.kind
    }

    /// Find a decorated node at any depth
    pub fn find(&self, id: &str) -> Option<&DecoratedNode> {
        if self.node.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Decorate one node (children are not visited)
pub fn decorate_component_for_viewport(
    node: &ComponentNode,
    overlay: &OverlayMap,
    viewport: Option<Viewport>,
) -> Decoration {
    let flags = overlay.get(&node.id);

    let name = flags
        .and_then(|f| f.name.clone())
        .or_else(|| node.prop_str("name").map(str::to_string));
    let locked = flags.and_then(|f| f.locked).or_else(|| node.prop_bool("locked"));
    let z_index = flags.and_then(|f| f.z_index).or_else(|| node.prop_i64("zIndex"));

    let hidden = flags
        .and_then(|f| f.hidden.as_ref())
        .and_then(|rule| rule.resolve(viewport))
        .unwrap_or_else(|| node.prop_bool("hidden").unwrap_or(false));

    Decoration {
        name,
        locked,
        z_index,
        hidden,
    }
}

/// Decorate every node of the tree, preserving shape
pub fn decorate_tree_for_viewport(
    tree: &ComponentTree,
    overlay: &OverlayMap,
    viewport: Option<Viewport>,
) -> Vec<DecoratedNode> {
    tree.roots()
        .iter()
        .map(|node| decorate_node(node, overlay, viewport))
        .collect()
}

fn decorate_node(node: &Arc<ComponentNode>, overlay: &OverlayMap, viewport: Option<Viewport>) -> DecoratedNode {
    DecoratedNode {
        node: Arc::clone(node),
        decoration: decorate_component_for_viewport(node, overlay, viewport),
        children: node
            .children()
            .iter()
            .map(|child| decorate_node(child, overlay, viewport))
            .collect(),
    }
}

/// Shorthand for the hidden flag alone
pub fn is_hidden_for_viewport(node: &ComponentNode, overlay: &OverlayMap, viewport: Option<Viewport>) -> bool {
    decorate_component_for_viewport(node, overlay, viewport).hidden
}

/// Read `key` for a viewport: `widthMobile` wins over `width` on mobile.
pub fn resolve_for_viewport<'a>(node: &'a ComponentNode, key: &str, viewport: Option<Viewport>) -> Option<&'a Value> {
    viewport
        .and_then(|vp| node.prop(&vp.prop_key(key)))
        .filter(|value| !value.is_null())
        .or_else(|| node.prop(key))
}
