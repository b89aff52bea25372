use crate::{ComponentNode, ComponentTree, PathSegment};

/// Visitor pattern for traversing component trees immutably
///
/// The default implementations walk the entire tree depth-first, tracking the
/// path (`[rootIndex, "children", childIndex, ...]`) and the ancestors of the
/// node being visited. Override `visit_node` to act on nodes; call
/// [`walk_node`] from the override to keep descending.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &ComponentTree) {
        walk_tree(self, tree);
    }

    fn visit_node<'a>(&mut self, node: &'a ComponentNode, cx: &mut VisitContext<'a>) {
        walk_node(self, node, cx);
    }
}

/// Traversal state handed to [`Visitor::visit_node`]
#[derive(Debug, Default)]
pub struct VisitContext<'a> {
    /// Path to the node being visited
    pub path: Vec<PathSegment>,

    /// Ancestors from the root down to the direct parent
    pub ancestors: Vec<&'a ComponentNode>,
}

impl VisitContext<'_> {
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn parent(&self) -> Option<&ComponentNode> {
        self.ancestors.last().copied()
    }

    /// Path to a field of the current node
    pub fn field_path(&self, field: &str) -> Vec<PathSegment> {
        let mut path = self.path.clone();
        path.push(PathSegment::Key(field.to_string()));
        path
    }

    /// Index of the root this node belongs to
    pub fn root_index(&self) -> usize {
        match self.path.first() {
            Some(PathSegment::Index(index)) => *index,
            _ => 0,
        }
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &ComponentTree) {
    for (index, root) in tree.roots().iter().enumerate() {
        let mut cx = VisitContext {
            path: vec![PathSegment::Index(index)],
            ancestors: Vec::new(),
        };
        visitor.visit_node(root, &mut cx);
    }
}

pub fn walk_node<'a, V: Visitor>(visitor: &mut V, node: &'a ComponentNode, cx: &mut VisitContext<'a>) {
    for (index, child) in node.children().iter().enumerate() {
        cx.path.push(PathSegment::Key("children".to_string()));
        cx.path.push(PathSegment::Index(index));
        cx.ancestors.push(node);

        visitor.visit_node(child, cx);

        cx.ancestors.pop();
        cx.path.pop();
        cx.path.pop();
    }
}
