use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};
use regex::Regex;
use std::sync::LazyLock;

static RAW_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(#|rgba?\(|hsla?\()").expect("valid color pattern"));

const COLOR_KEYS: &[&str] = &["color", "backgroundColor", "borderColor", "outlineColor", "fill", "stroke"];

/// Lint rule that asks for design tokens instead of literal colors
pub struct NoRawColorsRule;

impl LintRule for NoRawColorsRule {
    fn name(&self) -> &'static str {
        "no-raw-colors"
    }

    fn description(&self) -> &'static str {
        "Require design tokens (CSS variables) for color fields"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        COLOR_KEYS
            .iter()
            .filter(|key| node.prop_str(key).is_some_and(is_raw_color))
            .map(|key| {
                Diagnostic::warning(
                    self.name(),
                    format!("Use design tokens (CSS var) instead of raw color in '{}'.", key),
                    cx.field_path(key),
                )
                .with_suggestion("Reference a theme token such as var(--color-primary)")
            })
            .collect()
    }
}

fn is_raw_color(value: &str) -> bool {
    RAW_COLOR.is_match(value.trim())
}
