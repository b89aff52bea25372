use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};
use regex::Regex;
use std::sync::LazyLock;

static ASPECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+:\d+$").expect("valid aspect pattern"));

/// Images must pin an aspect ratio like `16:9`
pub struct CropAspectRule;

impl LintRule for CropAspectRule {
    fn name(&self) -> &'static str {
        "image-crop-aspect"
    }

    fn description(&self) -> &'static str {
        "Require a W:H cropAspect on Image components"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        if node.kind != "Image" {
            return Vec::new();
        }

        let message = match node.prop_str("cropAspect").filter(|aspect| !aspect.trim().is_empty()) {
            None => "Image components should specify 'cropAspect' to enforce aspect ratio.",
            Some(aspect) if !ASPECT.is_match(aspect) => {
                "Image 'cropAspect' should be in 'W:H' format like '16:9' or '4:3'."
            }
            Some(_) => return Vec::new(),
        };

        vec![Diagnostic::error(self.name(), message, cx.field_path("cropAspect"))]
    }
}
