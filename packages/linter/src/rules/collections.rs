//! Item-count rules for carousels, sliders and galleries.

use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use pagebuilder_common::{ComponentNode, VisitContext};
use serde_json::Value;

const DEVICE_ITEM_KEYS: &[&str] = &["desktopItems", "tabletItems", "mobileItems"];

/// `minItems`/`maxItems` consistency and per-device counts within bounds
pub struct ItemBoundsRule;

impl LintRule for ItemBoundsRule {
    fn name(&self) -> &'static str {
        "item-bounds"
    }

    fn description(&self) -> &'static str {
        "Keep item counts between minItems and maxItems"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        let min = node.prop_f64("minItems");
        let max = node.prop_f64("maxItems");
        let mut diagnostics = Vec::new();

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                diagnostics.push(Diagnostic::error(
                    self.name(),
                    "minItems cannot be greater than maxItems.",
                    cx.field_path("minItems"),
                ));
            }
        }

        for key in DEVICE_ITEM_KEYS {
            let Some(count) = node.prop_f64(key) else {
                continue;
            };
            if min.is_some_and(|min| count < min) {
                diagnostics.push(Diagnostic::error(
                    self.name(),
                    format!("{} must be ≥ minItems.", key),
                    cx.field_path(key),
                ));
            }
            if max.is_some_and(|max| count > max) {
                diagnostics.push(Diagnostic::error(
                    self.name(),
                    format!("{} must be ≤ maxItems.", key),
                    cx.field_path(key),
                ));
            }
        }

        diagnostics
    }
}

/// Type-specific minimum entry counts
pub struct CollectionSizeRule;

impl CollectionSizeRule {
    fn too_few(&self, cx: &VisitContext<'_>, field: &str, message: String) -> Vec<Diagnostic> {
        vec![Diagnostic::error(self.name(), message, cx.field_path(field))]
    }
}

fn array_len(node: &ComponentNode, key: &str) -> Option<usize> {
    node.prop(key).and_then(Value::as_array).map(Vec::len)
}

impl LintRule for CollectionSizeRule {
    fn name(&self) -> &'static str {
        "collection-size"
    }

    fn description(&self) -> &'static str {
        "Require enough entries for sliders, carousels and galleries"
    }

    fn check_node(&self, node: &ComponentNode, cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        match node.kind.as_str() {
            "ImageSlider" => {
                let min = node.prop_f64("minItems").unwrap_or(2.0);
                match array_len(node, "slides") {
                    Some(len) if (len as f64) < min => {
                        self.too_few(cx, "slides", format!("ImageSlider requires at least {} slides.", min))
                    }
                    _ => Vec::new(),
                }
            }
            "ReviewsCarousel" => match array_len(node, "reviews") {
                Some(len) if len < 2 => {
                    self.too_few(cx, "reviews", "ReviewsCarousel requires at least 2 reviews.".to_string())
                }
                _ => Vec::new(),
            },
            "TestimonialSlider" => match array_len(node, "testimonials") {
                Some(len) if len < 2 => self.too_few(
                    cx,
                    "testimonials",
                    "TestimonialSlider requires at least 2 entries.".to_string(),
                ),
                _ => Vec::new(),
            },
            "Gallery" => match array_len(node, "images") {
                Some(len) if len < 2 => {
                    self.too_few(cx, "images", "Gallery requires at least 2 images.".to_string())
                }
                _ => Vec::new(),
            },
            "ProductCarousel" => match node.prop_str("mode") {
                Some("manual") if array_len(node, "skus").unwrap_or(0) < 2 => self.too_few(
                    cx,
                    "skus",
                    "ProductCarousel (manual) requires at least 2 SKUs.".to_string(),
                ),
                Some("collection")
                    if node.prop_str("collectionId").map_or(true, |id| id.trim().is_empty()) =>
                {
                    self.too_few(
                        cx,
                        "collectionId",
                        "ProductCarousel (collection) requires 'collectionId'.".to_string(),
                    )
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
