//! # Tree Mutations
//!
//! Pure structural operations on a [`ComponentTree`].
//!
//! ## Design Principles
//!
//! 1. **Pure**: the input tree is never modified; a new tree is returned
//! 2. **Shared**: subtrees an operation does not touch are reused via `Arc`
//! 3. **Silent no-ops**: targeting a missing id returns the tree unchanged
//! 4. **Depth-agnostic**: every operation finds nodes at any depth
//!
//! ## Mutation Semantics
//!
//! ### Add
//! - Inserts at an explicit index (clamped) or appends
//! - No-op if the parent is missing or is not a container
//! - No-op if any id in the new subtree already exists
//!
//! ### Move
//! - Array-splice semantics: remove at `from`, then insert at `to`
//! - No-op if the target parent lies inside the moved subtree
//!
//! ### Update
//! - Shallow merge with numeric coercion (see [`crate::schema`])
//! - A patch that changes nothing is a no-op

use crate::schema;
use pagebuilder_common::{ComponentNode, ComponentTree, Location, Props};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

type Nodes = Vec<Arc<ComponentNode>>;

/// Structural operations (the history log is a sequence of these)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Insert a component (with its subtree)
    Add {
        component: ComponentNode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Relocate a component between sibling slots
    Move { from: Location, to: Location },

    /// Delete a component and its subtree
    Remove { id: String },

    /// Shallow-merge props into a component
    Update { id: String, patch: Props },

    /// Set geometry strings (only the provided ones)
    Resize {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top: Option<String>,
    },

    /// Clone a component's subtree with fresh ids, right after the original
    Duplicate { id: String },

    /// Replace the whole tree
    Set { components: ComponentTree },
}

impl Mutation {
    /// Convenience constructor for a single-field update
    pub fn update_field(id: impl Into<String>, key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut patch = Props::new();
        patch.insert(key.into(), value);
        Mutation::Update {
            id: id.into(),
            patch,
        }
    }

    /// Apply to `tree`. `None` means the operation changed nothing.
    pub fn apply(&self, tree: &ComponentTree) -> Option<ComponentTree> {
        match self {
            Mutation::Add {
                component,
                parent_id,
                index,
            } => try_add(tree, component, parent_id.as_deref(), *index),
            Mutation::Move { from, to } => try_move(tree, from, to),
            Mutation::Remove { id } => try_remove(tree, id),
            Mutation::Update { id, patch } => try_update(tree, id, patch),
            Mutation::Resize {
                id,
                width,
                height,
                left,
                top,
            } => {
                let mut patch = Props::new();
                for (key, value) in [("width", width), ("height", height), ("left", left), ("top", top)] {
                    if let Some(value) = value {
                        patch.insert(key.to_string(), value.clone().into());
                    }
                }
                try_update(tree, id, &patch)
            }
            Mutation::Duplicate { id } => try_duplicate(tree, id),
            Mutation::Set { components } => {
                if components == tree {
                    None
                } else {
                    Some(components.clone())
                }
            }
        }
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Add { .. } => "add",
            Mutation::Move { .. } => "move",
            Mutation::Remove { .. } => "remove",
            Mutation::Update { .. } => "update",
            Mutation::Resize { .. } => "resize",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Set { .. } => "set",
        }
    }

    /// Translation key announced to assistive tech after the mutation lands
    pub fn announcement_key(&self) -> Option<&'static str> {
        match self {
            Mutation::Add { .. } => Some("cms.builder.live.blockAdded"),
            Mutation::Move { .. } => Some("cms.builder.live.blockMoved"),
            Mutation::Remove { .. } => Some("cms.builder.live.blockDeleted"),
            Mutation::Resize { .. } => Some("cms.builder.live.blockResized"),
            Mutation::Duplicate { .. } => Some("cms.builder.live.blockDuplicated"),
            Mutation::Update { .. } | Mutation::Set { .. } => None,
        }
    }
}

/// Insert `component` under `parent_id` (root when `None`) at `index` (append when `None`)
pub fn add(
    tree: &ComponentTree,
    component: ComponentNode,
    parent_id: Option<&str>,
    index: Option<usize>,
) -> ComponentTree {
    try_add(tree, &component, parent_id, index).unwrap_or_else(|| tree.clone())
}

/// Root-level splice move
pub fn move_root(tree: &ComponentTree, from: usize, to: usize) -> ComponentTree {
    try_move(tree, &Location::root(from), &Location::root(to)).unwrap_or_else(|| tree.clone())
}

/// Splice move between any two sibling slots
pub fn move_component(tree: &ComponentTree, from: &Location, to: &Location) -> ComponentTree {
    try_move(tree, from, to).unwrap_or_else(|| tree.clone())
}

/// Delete the node with `id` (at any depth) and its subtree
pub fn remove(tree: &ComponentTree, id: &str) -> ComponentTree {
    try_remove(tree, id).unwrap_or_else(|| tree.clone())
}

/// Shallow-merge `patch` into the node with `id`
pub fn update(tree: &ComponentTree, id: &str, patch: &Props) -> ComponentTree {
    try_update(tree, id, patch).unwrap_or_else(|| tree.clone())
}

/// Clone the node with `id` (fresh ids) and insert the copy after it
pub fn duplicate(tree: &ComponentTree, id: &str) -> ComponentTree {
    try_duplicate(tree, id).unwrap_or_else(|| tree.clone())
}

fn try_add(
    tree: &ComponentTree,
    component: &ComponentNode,
    parent_id: Option<&str>,
    index: Option<usize>,
) -> Option<ComponentTree> {
    if let Some(clash) = first_existing_id(tree, component) {
        tracing::warn!("add: id '{}' already exists, ignoring", clash);
        return None;
    }

    let node = Arc::new(component.clone());
    edit_children(tree.roots(), parent_id, |children| {
        Some(insert_at(children, index, node))
    })
    .map(ComponentTree::from_shared)
}

fn try_move(tree: &ComponentTree, from: &Location, to: &Location) -> Option<ComponentTree> {
    let item = tree
        .siblings(from.parent_id.as_deref())?
        .get(from.index)
        .cloned()?;

    if let Some(target) = to.parent_id.as_deref() {
        if item.find(target).is_some() {
            tracing::warn!("move: '{}' cannot be moved into its own subtree", item.id);
            return None;
        }
    }

    if from.parent_id == to.parent_id {
        let len = tree.siblings(from.parent_id.as_deref())?.len();
        // After removal there are len - 1 slots; an insert at the same slot is a no-op
        if to.index.min(len - 1) == from.index {
            return None;
        }
    }

    let without = edit_children(tree.roots(), from.parent_id.as_deref(), |mut children| {
        children.remove(from.index);
        Some(children)
    })?;

    edit_children(&without, to.parent_id.as_deref(), |children| {
        Some(insert_at(children, Some(to.index), item))
    })
    .map(ComponentTree::from_shared)
}

fn try_remove(tree: &ComponentTree, id: &str) -> Option<ComponentTree> {
    remove_from(tree.roots(), id).map(ComponentTree::from_shared)
}

fn remove_from(nodes: &[Arc<ComponentNode>], id: &str) -> Option<Nodes> {
    if let Some(pos) = nodes.iter().position(|node| node.id == id) {
        let mut next = nodes.to_vec();
        next.remove(pos);
        return Some(next);
    }

    for (i, node) in nodes.iter().enumerate() {
        if let Some(children) = node.children.as_deref() {
            if let Some(new_children) = remove_from(children, id) {
                let mut next = nodes.to_vec();
                next[i] = rebuild(node, new_children);
                return Some(next);
            }
        }
    }

    None
}

fn try_update(tree: &ComponentTree, id: &str, patch: &Props) -> Option<ComponentTree> {
    map_node(tree.roots(), id, &mut |node| {
        let props = schema::merge_patch(&node.props, patch);
        if props == node.props {
            return None;
        }
        Some(Arc::new(ComponentNode {
            id: node.id.clone(),
            kind: node.kind.clone(),
            children: node.children.clone(),
            props,
        }))
    })
    .map(ComponentTree::from_shared)
}

fn try_duplicate(tree: &ComponentTree, id: &str) -> Option<ComponentTree> {
    let location = tree.locate(id)?;
    let original = tree.find(id)?;

    let mut taken: HashSet<String> = HashSet::new();
    collect_ids_tree(tree, &mut taken);
    let copy = Arc::new(clone_with_fresh_ids(original, &mut taken));

    edit_children(tree.roots(), location.parent_id.as_deref(), |children| {
        Some(insert_at(children, Some(location.index + 1), copy))
    })
    .map(ComponentTree::from_shared)
}

/// Replace the node with `id` using `f`. Returns `None` when the node is
/// missing or `f` declines to change it.
fn map_node(
    nodes: &[Arc<ComponentNode>],
    id: &str,
    f: &mut dyn FnMut(&ComponentNode) -> Option<Arc<ComponentNode>>,
) -> Option<Nodes> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id == id {
            let replacement = f(node)?;
            let mut next = nodes.to_vec();
            next[i] = replacement;
            return Some(next);
        }

        if let Some(children) = node.children.as_deref() {
            if children.iter().any(|child| child.find(id).is_some()) {
                let new_children = map_node(children, id, f)?;
                let mut next = nodes.to_vec();
                next[i] = rebuild(node, new_children);
                return Some(next);
            }
        }
    }
    None
}

/// Run `f` on the child list of `parent_id` (roots when `None`)
fn edit_children<F>(roots: &[Arc<ComponentNode>], parent_id: Option<&str>, f: F) -> Option<Nodes>
where
    F: FnOnce(Nodes) -> Option<Nodes>,
{
    match parent_id {
        None => f(roots.to_vec()),
        Some(pid) => {
            let mut f = Some(f);
            map_node(roots, pid, &mut |node| {
                let children = node.children.as_ref()?;
                let edit = f.take()?;
                edit(children.clone()).map(|children| rebuild(node, children))
            })
        }
    }
}

fn insert_at(mut list: Nodes, index: Option<usize>, item: Arc<ComponentNode>) -> Nodes {
    let at = index.unwrap_or(list.len()).min(list.len());
    list.insert(at, item);
    list
}

fn rebuild(node: &ComponentNode, children: Nodes) -> Arc<ComponentNode> {
    Arc::new(ComponentNode {
        id: node.id.clone(),
        kind: node.kind.clone(),
        children: Some(children),
        props: node.props.clone(),
    })
}

fn first_existing_id(tree: &ComponentTree, component: &ComponentNode) -> Option<String> {
    if tree.contains(&component.id) {
        return Some(component.id.clone());
    }
    component
        .children()
        .iter()
        .find_map(|child| first_existing_id(tree, child))
}

fn collect_ids(node: &ComponentNode, ids: &mut HashSet<String>) {
    ids.insert(node.id.clone());
    for child in node.children() {
        collect_ids(child, ids);
    }
}

fn collect_ids_tree(tree: &ComponentTree, ids: &mut HashSet<String>) {
    for root in tree.roots() {
        collect_ids(root, ids);
    }
}

fn fresh_id(base: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = format!("{}-copy", base);
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}-copy-{}", base, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

fn clone_with_fresh_ids(node: &ComponentNode, taken: &mut HashSet<String>) -> ComponentNode {
    let id = fresh_id(&node.id, taken);
    let children = node.children.as_ref().map(|children| {
        children
            .iter()
            .map(|child| Arc::new(clone_with_fresh_ids(child, taken)))
            .collect()
    });
    ComponentNode {
        id,
        kind: node.kind.clone(),
        children,
        props: node.props.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(id: &str) -> ComponentNode {
        ComponentNode::new(id, "Text")
    }

    fn abc() -> ComponentTree {
        ComponentTree::from_nodes(vec![text("A"), text("B"), text("C")])
    }

    fn nested() -> ComponentTree {
        ComponentTree::from_nodes(vec![
            ComponentNode::container("page", "Section").with_children(vec![
                ComponentNode::container("grid", "Grid")
                    .with_prop("columns", 12)
                    .with_children(vec![text("cell-1"), text("cell-2")]),
                text("caption"),
            ]),
            text("footer"),
        ])
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation: Mutation = serde_json::from_value(json!({
            "type": "add",
            "component": { "id": "x", "type": "Text" },
            "parentId": "page",
            "index": 0
        }))
        .unwrap();

        assert_eq!(
            mutation,
            Mutation::Add {
                component: text("x"),
                parent_id: Some("page".to_string()),
                index: Some(0),
            }
        );

        let json = serde_json::to_value(&Mutation::Remove { id: "x".into() }).unwrap();
        assert_eq!(json, json!({ "type": "remove", "id": "x" }));
    }

    #[test]
    fn test_add_appends_by_default() {
        let tree = add(&abc(), text("D"), None, None);
        assert_eq!(tree.root_ids(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_add_at_index_is_clamped() {
        let tree = add(&abc(), text("D"), None, Some(1));
        assert_eq!(tree.root_ids(), vec!["A", "D", "B", "C"]);

        let tree = add(&abc(), text("D"), None, Some(99));
        assert_eq!(tree.root_ids(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_add_nested() {
        let tree = add(&nested(), text("cell-3"), Some("grid"), Some(0));
        let grid = tree.find("grid").unwrap();
        let ids: Vec<_> = grid.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cell-3", "cell-1", "cell-2"]);
    }

    #[test]
    fn test_add_to_missing_or_leaf_parent_is_noop() {
        let original = nested();
        assert_eq!(add(&original, text("x"), Some("nope"), None), original);
        assert_eq!(add(&original, text("x"), Some("caption"), None), original);
    }

    #[test]
    fn test_add_rejects_duplicate_ids() {
        let original = nested();
        assert_eq!(add(&original, text("cell-1"), None, None), original);

        let wrapper = ComponentNode::container("fresh", "Section").with_children(vec![text("footer")]);
        assert_eq!(add(&original, wrapper, None, None), original);
    }

    #[test]
    fn test_add_shares_untouched_subtrees() {
        let original = nested();
        let tree = add(&original, text("new"), None, None);
        assert!(Arc::ptr_eq(&original.roots()[0], &tree.roots()[0]));
        assert!(Arc::ptr_eq(&original.roots()[1], &tree.roots()[1]));
    }

    #[test]
    fn test_move_splice_reference_table() {
        let cases: &[(usize, usize, [&str; 3])] = &[
            (0, 1, ["B", "A", "C"]),
            (0, 2, ["B", "C", "A"]),
            (2, 0, ["C", "A", "B"]),
            (1, 0, ["B", "A", "C"]),
            (1, 2, ["A", "C", "B"]),
            (2, 1, ["A", "C", "B"]),
            (0, 9, ["B", "C", "A"]),
            (1, 1, ["A", "B", "C"]),
            (9, 0, ["A", "B", "C"]),
        ];

        for (from, to, expected) in cases {
            let tree = move_root(&abc(), *from, *to);
            assert_eq!(tree.root_ids(), expected.to_vec(), "move({}, {})", from, to);
        }
    }

    #[test]
    fn test_move_two_items() {
        let tree = ComponentTree::from_nodes(vec![text("A"), text("B")]);
        assert_eq!(move_root(&tree, 0, 1).root_ids(), vec!["B", "A"]);
    }

    #[test]
    fn test_move_same_slot_reports_no_change() {
        let mutation = Mutation::Move {
            from: Location::root(2),
            to: Location::root(5),
        };
        assert!(mutation.apply(&abc()).is_none());
    }

    #[test]
    fn test_move_between_parents() {
        let tree = move_component(
            &nested(),
            &Location::in_parent("grid", 1),
            &Location::root(0),
        );
        assert_eq!(tree.root_ids(), vec!["cell-2", "page", "footer"]);
        assert_eq!(tree.find("grid").unwrap().children().len(), 1);
    }

    #[test]
    fn test_move_into_own_subtree_is_noop() {
        let original = nested();
        let tree = move_component(
            &original,
            &Location::root(0),
            &Location::in_parent("grid", 0),
        );
        assert_eq!(tree, original);
    }

    #[test]
    fn test_move_to_missing_parent_is_noop() {
        let original = nested();
        let tree = move_component(&original, &Location::root(1), &Location::in_parent("ghost", 0));
        assert_eq!(tree, original);
    }

    #[test]
    fn test_remove_nested_subtree() {
        let tree = remove(&nested(), "grid");
        assert!(!tree.contains("grid"));
        assert!(!tree.contains("cell-1"));
        assert!(tree.contains("caption"));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let original = nested();
        assert_eq!(remove(&original, "ghost"), original);
    }

    #[test]
    fn test_update_merges_and_coerces() {
        let patch = json!({ "columns": "3", "gap": "1rem" }).as_object().cloned().unwrap();
        let tree = update(&nested(), "grid", &patch);
        let grid = tree.find("grid").unwrap();

        assert_eq!(grid.prop("columns"), Some(&json!(3)));
        assert_eq!(grid.prop_str("gap"), Some("1rem"));
        assert_eq!(grid.children().len(), 2);
    }

    #[test]
    fn test_update_missing_id_returns_same_tree() {
        let original = nested();
        let patch = json!({ "text": "hi" }).as_object().cloned().unwrap();
        assert_eq!(update(&original, "ghost", &patch), original);
    }

    #[test]
    fn test_update_without_effect_reports_no_change() {
        let mutation = Mutation::update_field("grid", "columns", json!("12"));
        assert!(mutation.apply(&nested()).is_none());
    }

    #[test]
    fn test_update_does_not_touch_input() {
        let original = nested();
        let snapshot = original.clone();
        let _ = update(&original, "cell-1", &json!({ "text": "x" }).as_object().cloned().unwrap());
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_resize_only_sets_given_fields() {
        let original = update(
            &nested(),
            "caption",
            &json!({ "height": "20px" }).as_object().cloned().unwrap(),
        );
        let mutation = Mutation::Resize {
            id: "caption".into(),
            width: Some("50%".into()),
            height: None,
            left: None,
            top: None,
        };
        let tree = mutation.apply(&original).unwrap();
        let caption = tree.find("caption").unwrap();
        assert_eq!(caption.prop_str("width"), Some("50%"));
        assert_eq!(caption.prop_str("height"), Some("20px"));
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids() {
        let tree = duplicate(&nested(), "grid");
        let page = tree.find("page").unwrap();
        let ids: Vec<_> = page.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["grid", "grid-copy", "caption"]);

        let copy = tree.find("grid-copy").unwrap();
        let child_ids: Vec<_> = copy.children().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(child_ids, vec!["cell-1-copy", "cell-2-copy"]);

        let again = duplicate(&tree, "grid");
        assert!(again.contains("grid-copy-2"));
    }

    #[test]
    fn test_set_replaces_tree() {
        let mutation = Mutation::Set { components: abc() };
        assert_eq!(mutation.apply(&nested()), Some(abc()));
        assert!(mutation.apply(&abc()).is_none());
    }
}
