use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};
use regex::Regex;
use std::sync::LazyLock;

/// Full-viewport sizes overflow the canvas in embedded previews
static FULL_VIEWPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b100(vw|vh)\b").expect("valid viewport unit pattern"));

const SIZE_KEYS: &[&str] = &[
    "width",
    "widthDesktop",
    "widthTablet",
    "widthMobile",
    "height",
    "heightDesktop",
    "heightTablet",
    "heightMobile",
    "margin",
    "marginDesktop",
    "marginTablet",
    "marginMobile",
    "padding",
    "paddingDesktop",
    "paddingTablet",
    "paddingMobile",
];

/// Lint rule that prevents 100vw / 100vh in size and spacing fields
pub struct NoViewportUnitsRule;

impl LintRule for NoViewportUnitsRule {
    fn name(&self) -> &'static str {
        "no-viewport-units"
    }

    fn description(&self) -> &'static str {
        "Disallow 100vw and 100vh in size and spacing fields"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        // One report per component: the first offending field
        let Some((key, matched)) = SIZE_KEYS.iter().find_map(|key| {
            let value = node.prop_str(key)?;
            FULL_VIEWPORT.find(value).map(|m| (*key, m.as_str().to_string()))
        }) else {
            return Vec::new();
        };

        vec![Diagnostic::error(
            self.name(),
            format!(
                "Component '{}' uses disallowed viewport unit in '{}'. Avoid 100vw/100vh.",
                node.kind, key
            ),
            cx.field_path(key),
        )
        .with_suggestion(format!("Use a percentage instead of {} in '{}'", matched, key))]
    }
}
