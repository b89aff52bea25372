//! Rules for interaction and motion props.

use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};
use serde_json::Value;

/// A string prop that is present and not blank; numbers count as filled
fn is_filled(node: &ComponentNode, key: &str) -> bool {
    match node.prop(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(value)) => !value.trim().is_empty(),
        Some(_) => true,
    }
}

fn is_truthy_str(node: &ComponentNode, key: &str) -> bool {
    node.prop_str(key).is_some_and(|value| !value.is_empty())
}

pub struct StickyOffsetRule;

impl LintRule for StickyOffsetRule {
    fn name(&self) -> &'static str {
        "sticky-offset"
    }

    fn description(&self) -> &'static str {
        "Require stickyOffset when sticky is set"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        if !is_truthy_str(node, "sticky") || is_filled(node, "stickyOffset") {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            "When 'sticky' is set, 'stickyOffset' is required.",
            cx.field_path("stickyOffset"),
        )]
    }
}

/// `navigate` needs an href, `open-modal` needs modal content
pub struct ClickActionRule;

impl LintRule for ClickActionRule {
    fn name(&self) -> &'static str {
        "click-action-target"
    }

    fn description(&self) -> &'static str {
        "Require the target field for each clickAction"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let (action, required) = match node.prop_str("clickAction") {
            Some(action @ "navigate") => (action, "href"),
            Some(action @ "open-modal") => (action, "modalHtml"),
            _ => return Vec::new(),
        };
        if is_filled(node, required) {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            format!("clickAction '{}' requires '{}'.", action, required),
            cx.field_path(required),
        )]
    }
}

pub struct AnimationDurationRule;

impl LintRule for AnimationDurationRule {
    fn name(&self) -> &'static str {
        "animation-duration"
    }

    fn description(&self) -> &'static str {
        "Require a positive animationDuration when animation is set"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let animated = node
            .prop_str("animation")
            .is_some_and(|animation| !animation.is_empty() && animation != "none");
        let has_duration = node.prop_f64("animationDuration").is_some_and(|duration| duration > 0.0);
        if !animated || has_duration {
            return Vec::new();
        }
        vec![Diagnostic::error(
            self.name(),
            "When 'animation' is set, a positive 'animationDuration' is required.",
            cx.field_path("animationDuration"),
        )]
    }
}

/// Parallax factor must lie in `(0, 1]`
pub struct ParallaxRangeRule;

impl LintRule for ParallaxRangeRule {
    fn name(&self) -> &'static str {
        "parallax-range"
    }

    fn description(&self) -> &'static str {
        "Keep parallax within (0, 1]"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        match node.prop_f64("parallax") {
            Some(parallax) if parallax <= 0.0 || parallax > 1.0 => vec![Diagnostic::error(
                self.name(),
                "'parallax' should be > 0 and ≤ 1.",
                cx.field_path("parallax"),
            )],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn test_sticky_requires_offset() {
        let diagnostics = run(
            &StickyOffsetRule,
            vec![
                ComponentNode::new("a", "Section").with_prop("sticky", "top"),
                ComponentNode::new("b", "Section")
                    .with_prop("sticky", "top")
                    .with_prop("stickyOffset", "64px"),
                ComponentNode::new("c", "Section")
                    .with_prop("sticky", "top")
                    .with_prop("stickyOffset", 0),
            ],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location(), "0.stickyOffset");
    }

    #[test]
    fn test_click_action_targets() {
        let diagnostics = run(
            &ClickActionRule,
            vec![
                ComponentNode::new("a", "Button").with_prop("clickAction", "navigate"),
                ComponentNode::new("b", "Button")
                    .with_prop("clickAction", "open-modal")
                    .with_prop("modalHtml", " "),
                ComponentNode::new("c", "Button")
                    .with_prop("clickAction", "navigate")
                    .with_prop("href", "/shop"),
            ],
        );
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "clickAction 'navigate' requires 'href'.");
        assert_eq!(diagnostics[1].location(), "1.modalHtml");
    }

    #[test]
    fn test_animation_duration() {
        let diagnostics = run(
            &AnimationDurationRule,
            vec![
                ComponentNode::new("a", "Text").with_prop("animation", "fade"),
                ComponentNode::new("b", "Text")
                    .with_prop("animation", "fade")
                    .with_prop("animationDuration", 0),
                ComponentNode::new("c", "Text").with_prop("animation", "none"),
                ComponentNode::new("d", "Text")
                    .with_prop("animation", "slide")
                    .with_prop("animationDuration", 300),
            ],
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_parallax_bounds() {
        let diagnostics = run(
            &ParallaxRangeRule,
            vec![
                ComponentNode::new("a", "Section").with_prop("parallax", 0),
                ComponentNode::new("b", "Section").with_prop("parallax", 1),
                ComponentNode::new("c", "Section").with_prop("parallax", 1.5),
                ComponentNode::new("d", "Section").with_prop("parallax", 0.4),
            ],
        );
        let locations: Vec<_> = diagnostics.iter().map(Diagnostic::location).collect();
        assert_eq!(locations, vec!["0.parallax", "2.parallax"]);
    }
}
