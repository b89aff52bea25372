//! # Component Tree Model
//!
//! A page is an ordered list of root [`ComponentNode`]s. Nodes are shared
//! through [`Arc`] so that every structural edit can build a new tree while
//! reusing the subtrees it did not touch.
//!
//! On the wire a node is a flat JSON object:
//!
//! ```text
//! { "id": "hero", "type": "Section", "children": [...], "padding": "1rem" }
//! ```
//!
//! Everything other than `id`, `type` and `children` lands in [`Props`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Type-specific fields of a component (flattened into the node on the wire)
pub type Props = serde_json::Map<String, Value>;

/// Component types that own a `children` list
pub const CONTAINER_TYPES: &[&str] = &[
    "Section",
    "Canvas",
    "MultiColumn",
    "StackFlex",
    "Grid",
    "CarouselContainer",
    "TabsAccordionContainer",
    "Tabs",
    "Dataset",
    "Repeater",
    "Bind",
];

pub fn is_container_type(kind: &str) -> bool {
    CONTAINER_TYPES.contains(&kind)
}

/// One element of the editable layout tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Unique across the whole tree
    pub id: String,

    /// Component type tag, fixed at creation
    #[serde(rename = "type")]
    pub kind: String,

    /// Present only on containers; order is paint order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<ComponentNode>>>,

    #[serde(flatten)]
    pub props: Props,
}

impl ComponentNode {
    /// Create a leaf node with no props
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            children: None,
            props: Props::new(),
        }
    }

    /// Create an empty container node
    pub fn container(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            children: Some(Vec::new()),
            ..Self::new(id, kind)
        }
    }

    /// Set a prop (builder style)
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Replace the children (makes the node a container)
    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    /// Children slice; empty for leaves
    pub fn children(&self) -> &[Arc<ComponentNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        self.props.get(key).and_then(Value::as_bool)
    }

    pub fn prop_i64(&self, key: &str) -> Option<i64> {
        self.props.get(key).and_then(Value::as_i64)
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        self.props.get(key).and_then(Value::as_f64)
    }

    /// Find a node by id in this subtree (including self)
    pub fn find(&self, id: &str) -> Option<&ComponentNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree (including self)
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }
}

/// Position of a node among its siblings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Parent container id; `None` means root level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub index: usize,
}

impl Location {
    pub fn root(index: usize) -> Self {
        Self {
            parent_id: None,
            index,
        }
    }

    pub fn in_parent(parent_id: impl Into<String>, index: usize) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            index,
        }
    }
}

/// Ordered list of root component nodes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTree {
    roots: Vec<Arc<ComponentNode>>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<ComponentNode>) -> Self {
        Self {
            roots: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(roots: Vec<Arc<ComponentNode>>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Arc<ComponentNode>] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Ids of the root-level nodes, in order
    pub fn root_ids(&self) -> Vec<&str> {
        self.roots.iter().map(|node| node.id.as_str()).collect()
    }

    /// Find a node at any depth
    pub fn find(&self, id: &str) -> Option<&ComponentNode> {
        self.roots.iter().find_map(|node| node.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Locate a node's parent and index among its siblings
    pub fn locate(&self, id: &str) -> Option<Location> {
        fn search(nodes: &[Arc<ComponentNode>], id: &str, parent: Option<&str>) -> Option<Location> {
            for (index, node) in nodes.iter().enumerate() {
                if node.id == id {
                    return Some(Location {
                        parent_id: parent.map(str::to_string),
                        index,
                    });
                }
                if let Some(found) = search(node.children(), id, Some(&node.id)) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.roots, id, None)
    }

    /// Sibling list for a parent id (`None` = roots). `None` if the parent is
    /// missing or is not a container.
    pub fn siblings(&self, parent_id: Option<&str>) -> Option<&[Arc<ComponentNode>]> {
        match parent_id {
            None => Some(&self.roots),
            Some(pid) => self.find(pid).and_then(|parent| parent.children.as_deref()),
        }
    }

    /// Parent node of `id`, if it is nested
    pub fn parent_of(&self, id: &str) -> Option<&ComponentNode> {
        let location = self.locate(id)?;
        location.parent_id.as_deref().and_then(|pid| self.find(pid))
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|node| node.subtree_len()).sum()
    }
}

impl From<Vec<ComponentNode>> for ComponentTree {
    fn from(nodes: Vec<ComponentNode>) -> Self {
        Self::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ComponentTree {
        ComponentTree::from_nodes(vec![
            ComponentNode::container("section", "Section").with_children(vec![
                ComponentNode::new("text", "Text").with_prop("text", "Hello"),
                ComponentNode::container("grid", "Grid")
                    .with_prop("columns", 12)
                    .with_children(vec![ComponentNode::new("img", "Image")]),
            ]),
            ComponentNode::new("footer", "Footer"),
        ])
    }

    #[test]
    fn test_wire_format_is_flat() {
        let node = ComponentNode::new("a", "Text").with_prop("text", "Hi");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({ "id": "a", "type": "Text", "text": "Hi" }));
    }

    #[test]
    fn test_parse_nested_tree() {
        let tree: ComponentTree = serde_json::from_value(json!([
            { "id": "s", "type": "Section", "children": [
                { "id": "t", "type": "Text", "gridColumn": "span 3" }
            ]}
        ]))
        .unwrap();

        assert_eq!(tree.len(), 1);
        let text = tree.find("t").unwrap();
        assert_eq!(text.kind, "Text");
        assert_eq!(text.prop_str("gridColumn"), Some("span 3"));
        assert!(tree.find("s").unwrap().is_container());
    }

    #[test]
    fn test_find_and_locate_at_depth() {
        let tree = sample();
        assert!(tree.contains("img"));
        assert_eq!(tree.locate("img"), Some(Location::in_parent("grid", 0)));
        assert_eq!(tree.locate("footer"), Some(Location::root(1)));
        assert_eq!(tree.locate("missing"), None);
        assert_eq!(tree.parent_of("grid").map(|n| n.id.as_str()), Some("section"));
    }

    #[test]
    fn test_siblings_requires_container() {
        let tree = sample();
        assert_eq!(tree.siblings(None).unwrap().len(), 2);
        assert_eq!(tree.siblings(Some("section")).unwrap().len(), 2);
        assert!(tree.siblings(Some("text")).is_none());
        assert!(tree.siblings(Some("nope")).is_none());
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 5);
    }
}
