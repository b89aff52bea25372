//! Tree-shape rules: nesting depth, who may own children, and text sizing.

use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{is_container_type, ComponentNode, PathSegment, VisitContext};

const DEFAULT_MAX_DEPTH: usize = 8;

const HEIGHT_KEYS: &[&str] = &["height", "heightDesktop", "heightTablet", "heightMobile"];

/// Reports a root whose subtree nests deeper than `max_depth`
pub struct NestingDepthRule {
    pub max_depth: usize,
}

impl Default for NestingDepthRule {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

fn depth(node: &ComponentNode) -> usize {
    node.children()
        .iter()
        .map(|child| 1 + depth(child))
        .max()
        .unwrap_or(0)
}

impl LintRule for NestingDepthRule {
    fn name(&self) -> &'static str {
        "max-nesting-depth"
    }

    fn description(&self) -> &'static str {
        "Limit template nesting depth"
    }

    fn check_root(&self, root: &ComponentNode, index: usize) -> Vec<Diagnostic> {
        if depth(root) <= self.max_depth {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            format!("Template nesting depth exceeds {} levels.", self.max_depth),
            vec![PathSegment::Index(index)],
        )]
    }
}

/// Only container types may own children
pub struct ContainerChildrenRule;

impl LintRule for ContainerChildrenRule {
    fn name(&self) -> &'static str {
        "container-children"
    }

    fn description(&self) -> &'static str {
        "Only container components may have children"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        if node.children().is_empty() || is_container_type(&node.kind) {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            format!(
                "Component '{}' cannot have children; only containers may own children.",
                node.kind
            ),
            cx.field_path("children"),
        )]
    }
}

/// Fixed heights clip text
pub struct TextFixedHeightRule;

impl LintRule for TextFixedHeightRule {
    fn name(&self) -> &'static str {
        "text-fixed-height"
    }

    fn description(&self) -> &'static str {
        "Discourage fixed heights on Text components"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        if node.kind != "Text" {
            return Vec::new();
        }
        let offending = HEIGHT_KEYS
            .iter()
            .find(|key| node.prop_str(key).is_some_and(|value| !value.trim().is_empty()));

        match offending {
            Some(key) => vec![Diagnostic::warning(
                self.name(),
                format!("Text components should not set '{}' (can cause clipping).", key),
                cx.field_path(key),
            )],
            None => Vec::new(),
        }
    }
}
