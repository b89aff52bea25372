use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};

const MARGIN_KEYS: &[&str] = &["margin", "marginDesktop", "marginTablet", "marginMobile"];

/// Lint rule that prevents negative margins in templates
pub struct NoNegativeMarginRule;

impl LintRule for NoNegativeMarginRule {
    fn name(&self) -> &'static str {
        "no-negative-margin"
    }

    fn description(&self) -> &'static str {
        "Disallow negative margin values"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let offending = MARGIN_KEYS
            .iter()
            .find(|key| node.prop_str(key).is_some_and(|value| value.trim_start().starts_with('-')));

        match offending {
            Some(key) => vec![Diagnostic::error(
                self.name(),
                format!("Negative margins are not allowed ('{}').", key),
                cx.field_path(key),
            )
            .with_suggestion("Use padding on the parent or a gap on the container instead")],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    #[test]
    fn test_detects_negative_margin() {
        let diagnostics = run(
            &NoNegativeMarginRule,
            vec![ComponentNode::new("a", "Text").with_prop("marginTablet", " -10px 0")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "no-negative-margin");
        assert!(diagnostics[0].message.contains("marginTablet"));
    }

    #[test]
    fn test_reports_once_per_component() {
        let diagnostics = run(
            &NoNegativeMarginRule,
            vec![ComponentNode::new("a", "Text")
                .with_prop("margin", "-1px")
                .with_prop("marginMobile", "-2px")],
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location(), "0.margin");
    }

    #[test]
    fn test_allows_negative_in_non_margin_fields() {
        let diagnostics = run(
            &NoNegativeMarginRule,
            vec![ComponentNode::new("a", "Text")
                .with_prop("top", "-10px")
                .with_prop("margin", "10px")],
        );
        assert!(diagnostics.is_empty());
    }
}
