//! Positioning rules: absolute layout and stacking need a positioned context.

use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, PathSegment, VisitContext};

fn position(node: &ComponentNode) -> Option<&str> {
    node.prop_str("position")
}

fn establishes_context(node: &ComponentNode) -> bool {
    matches!(position(node), Some("relative" | "sticky"))
}

/// Root components may not be absolutely positioned
pub struct RootAbsoluteRule;

impl LintRule for RootAbsoluteRule {
    fn name(&self) -> &'static str {
        "no-root-absolute"
    }

    fn description(&self) -> &'static str {
        "Forbid absolute positioning on root components"
    }

    fn check_root(&self, root: &ComponentNode, index: usize) -> Vec<Diagnostic> {
        if position(root) != Some("absolute") {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            format!(
                "Root component '{}' should not use absolute positioning in templates.",
                root.kind
            ),
            vec![PathSegment::Index(index), PathSegment::from("position")],
        )]
    }
}

/// Absolute components need a relative/sticky ancestor inside the tree
pub struct AbsoluteAncestorRule;

impl LintRule for AbsoluteAncestorRule {
    fn name(&self) -> &'static str {
        "absolute-needs-positioned-ancestor"
    }

    fn description(&self) -> &'static str {
        "Require a relative or sticky ancestor for absolute components"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        if position(node) != Some("absolute") {
            return Vec::new();
        }
        if cx.ancestors.iter().any(|ancestor| establishes_context(ancestor)) {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            "Absolute-positioned components must have a positioned (relative/sticky) ancestor in the template.",
            cx.field_path("position"),
        )
        .with_suggestion("Set position: relative on the containing section")]
    }
}

/// `zIndex` only does something on positioned elements
pub struct ZIndexPositionRule;

impl LintRule for ZIndexPositionRule {
    fn name(&self) -> &'static str {
        "z-index-needs-position"
    }

    fn description(&self) -> &'static str {
        "Require relative, absolute or sticky position when zIndex is set"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let has_z_index = node.prop("zIndex").is_some_and(|value| value.is_number());
        let positioned = matches!(position(node), Some("relative" | "absolute" | "sticky"));
        if !has_z_index || positioned {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            self.name(),
            "'zIndex' requires a positioned element (relative/absolute/sticky).",
            cx.field_path("zIndex"),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn test_root_absolute() {
        let diagnostics = run(
            &RootAbsoluteRule,
            vec![
                ComponentNode::new("a", "Section"),
                ComponentNode::new("b", "Section").with_prop("position", "absolute"),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location(), "1.position");
    }

    #[test]
    fn test_absolute_with_positioned_ancestor() {
        let tree = vec![ComponentNode::container("s", "Section")
            .with_prop("position", "relative")
            .with_children(vec![ComponentNode::container("g", "Grid").with_children(vec![
                ComponentNode::new("badge", "Text").with_prop("position", "absolute"),
            ])])];
        assert!(run(&AbsoluteAncestorRule, tree).is_empty());
    }

    #[test]
    fn test_absolute_without_positioned_ancestor() {
        let tree = vec![ComponentNode::container("s", "Section")
            .with_children(vec![ComponentNode::new("badge", "Text").with_prop("position", "absolute")])];
        let diagnostics = run(&AbsoluteAncestorRule, tree);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location(), "0.children.0.position");
    }

    #[test]
    fn test_z_index_requires_position() {
        let diagnostics = run(
            &ZIndexPositionRule,
            vec![
                ComponentNode::new("a", "Text").with_prop("zIndex", 2),
                ComponentNode::new("b", "Text")
                    .with_prop("zIndex", 2)
                    .with_prop("position", "relative"),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location(), "0.zIndex");
    }
}
