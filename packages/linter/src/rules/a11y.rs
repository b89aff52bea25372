use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};

/// Smallest comfortable tap target, in pixels
const MIN_TAP_HEIGHT: f64 = 40.0;

/// Accessibility lint rules
pub struct A11yRule;

impl A11yRule {
    fn check_image(node: &ComponentNode, cx: &VisitContext<'_>) -> Option<Diagnostic> {
        if node.prop_str("alt").is_some_and(|alt| !alt.trim().is_empty()) {
            return None;
        }
        Some(
            Diagnostic::error(
                "a11y-img-alt",
                "Image components should include non-empty 'alt' text.",
                cx.field_path("alt"),
            )
            .with_suggestion("Describe the image content in 'alt'"),
        )
    }

    fn check_button(node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if let Some(px) = node.prop_str("height").and_then(pixel_height) {
            if px < MIN_TAP_HEIGHT {
                diagnostics.push(
                    Diagnostic::error(
                        "a11y-tap-size",
                        "Button 'height' should be at least 40px for tap size.",
                        cx.field_path("height"),
                    )
                    .with_suggestion("Raise the height or let padding size the button"),
                );
            }
        }

        let has_text = ["label", "text", "aria-label"]
            .iter()
            .any(|key| node.prop_str(key).is_some_and(|value| !value.trim().is_empty()));
        if !has_text {
            diagnostics.push(
                Diagnostic::warning(
                    "a11y-button-text",
                    "Buttons must have accessible text content",
                    cx.field_path("label"),
                )
                .with_suggestion("Add a 'label', or use 'aria-label' to provide one"),
            );
        }

        diagnostics
    }
}

impl LintRule for A11yRule {
    fn name(&self) -> &'static str {
        "a11y"
    }

    fn description(&self) -> &'static str {
        "Accessibility checks for images and buttons"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        match node.kind.as_str() {
            "Image" => Self::check_image(node, cx).into_iter().collect(),
            "Button" => Self::check_button(node, cx),
            _ => Vec::new(),
        }
    }
}

/// Parse a plain `NNpx` / `NN.Npx` height; anything else is not a pixel value
fn pixel_height(value: &str) -> Option<f64> {
    let number = value.trim().strip_suffix("px")?;
    let digits = number.chars().filter(char::is_ascii_digit).count();
    let dots = number.chars().filter(|c| *c == '.').count();
    if digits == 0 || dots > 1 || digits + dots != number.len() {
        return None;
    }
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;

    fn button(height: &str) -> ComponentNode {
        ComponentNode::new("b", "Button")
            .with_prop("label", "Buy")
            .with_prop("height", height)
    }

    #[test]
    fn test_image_alt() {
        let diagnostics = run(
            &A11yRule,
            vec![
                ComponentNode::new("a", "Image"),
                ComponentNode::new("b", "Image").with_prop("alt", " "),
                ComponentNode::new("c", "Image").with_prop("alt", "Storefront"),
            ],
        );
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.rule == "a11y-img-alt"));
    }

    #[test]
    fn test_button_tap_size() {
        assert_eq!(run(&A11yRule, vec![button("32px")]).len(), 1);
        assert_eq!(run(&A11yRule, vec![button(" 39.5px ")]).len(), 1);
        assert!(run(&A11yRule, vec![button("40px")]).is_empty());
        // Non-pixel heights are left alone
        assert!(run(&A11yRule, vec![button("2rem")]).is_empty());
        assert!(run(&A11yRule, vec![button("-10px")]).is_empty());
    }

    #[test]
    fn test_button_text() {
        let diagnostics = run(&A11yRule, vec![ComponentNode::new("b", "Button")]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "a11y-button-text");
    }

    #[test]
    fn test_pixel_height() {
        assert_eq!(pixel_height("12px"), Some(12.0));
        assert_eq!(pixel_height("1.5px"), Some(1.5));
        assert_eq!(pixel_height("1.2.3px"), None);
        assert_eq!(pixel_height("px"), None);
        assert_eq!(pixel_height("12"), None);
    }
}
