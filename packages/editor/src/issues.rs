//! Validation issue → inspector panel mapping.
//!
//! The last field name in an issue path decides which inspector panel and
//! section the editor should open so the user can fix it.

use pagebuilder_common::ValidationIssue;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Layout,
    Interactions,
    Style,
    Content,
    Unknown,
}

impl Panel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Layout => "layout",
            Panel::Interactions => "interactions",
            Panel::Style => "style",
            Panel::Content => "content",
            Panel::Unknown => "unknown",
        }
    }
}

/// Where in the inspector an issue lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueLabel {
    pub panel: Panel,

    /// Section inside the panel (`size`, `navigate`, ...); `None` for unknown
    pub section: Option<&'static str>,

    /// Field the issue points at, if the path names one
    pub field: Option<String>,
}

impl IssueLabel {
    /// Translation key for the panel/section label
    pub fn translation_key(&self) -> String {
        match self.section {
            Some(section) => format!("cms.builder.issues.{}.{}", self.panel.as_str(), section),
            None => format!("cms.builder.issues.{}", self.panel.as_str()),
        }
    }
}

impl fmt::Display for IssueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.panel.as_str())?;
        if let Some(section) = self.section {
            write!(f, " · {}", section)?;
        }
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        Ok(())
    }
}

/// An issue together with its resolved label and display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledIssue {
    pub issue: ValidationIssue,
    pub label: IssueLabel,

    /// Translated panel label
    pub label_text: String,
}

fn section_for(field: &str) -> Option<(Panel, &'static str)> {
    let entry = match field {
        "width" | "height" => (Panel::Layout, "size"),
        "margin" | "padding" => (Panel::Layout, "spacing"),
        "position" | "top" | "left" | "zIndex" => (Panel::Layout, "position"),
        "href" | "clickAction" | "modalHtml" => (Panel::Interactions, "navigate"),
        "parallax" => (Panel::Interactions, "motion"),
        f if f.starts_with("animation") || f.starts_with("sticky") => (Panel::Interactions, "motion"),
        "color" | "colors" => (Panel::Style, "colors"),
        f if f.ends_with("Color") => (Panel::Style, "colors"),
        "cropAspect" | "src" | "alt" => (Panel::Content, "media"),
        "minItems" | "maxItems" | "desktopItems" | "tabletItems" | "mobileItems" => (Panel::Content, "items"),
        _ => return None,
    };
    Some(entry)
}

/// Map an issue to its inspector panel; unmapped fields land on `Unknown`
pub fn resolve_issue_label(issue: &ValidationIssue) -> IssueLabel {
    let field = issue.field();
    match field.and_then(section_for) {
        Some((panel, section)) => IssueLabel {
            panel,
            section: Some(section),
            field: field.map(str::to_string),
        },
        None => IssueLabel {
            panel: Panel::Unknown,
            section: None,
            field: field.map(str::to_string),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_common::PathSegment;

    fn issue_at(field: &str) -> ValidationIssue {
        ValidationIssue::new(
            vec![
                PathSegment::Index(0),
                PathSegment::from("children"),
                PathSegment::Index(2),
                PathSegment::from(field),
            ],
            "problem",
        )
    }

    #[test]
    fn test_label_table() {
        let cases = [
            ("width", Panel::Layout, "size"),
            ("padding", Panel::Layout, "spacing"),
            ("zIndex", Panel::Layout, "position"),
            ("href", Panel::Interactions, "navigate"),
            ("animationDuration", Panel::Interactions, "motion"),
            ("stickyOffset", Panel::Interactions, "motion"),
            ("parallax", Panel::Interactions, "motion"),
            ("backgroundColor", Panel::Style, "colors"),
            ("cropAspect", Panel::Content, "media"),
            ("maxItems", Panel::Content, "items"),
        ];

        for (field, panel, section) in cases {
            let label = resolve_issue_label(&issue_at(field));
            assert_eq!(label.panel, panel, "{}", field);
            assert_eq!(label.section, Some(section), "{}", field);
            assert_eq!(label.field.as_deref(), Some(field));
        }
    }

    #[test]
    fn test_unmapped_is_unknown() {
        let label = resolve_issue_label(&issue_at("frobnicate"));
        assert_eq!(label.panel, Panel::Unknown);
        assert_eq!(label.section, None);
        assert_eq!(label.translation_key(), "cms.builder.issues.unknown");

        let no_field = ValidationIssue::new(vec![PathSegment::Index(3)], "bad node");
        assert_eq!(resolve_issue_label(&no_field).field, None);
    }

    #[test]
    fn test_display_and_key() {
        let label = resolve_issue_label(&issue_at("href"));
        assert_eq!(label.to_string(), "interactions · navigate (href)");
        assert_eq!(label.translation_key(), "cms.builder.issues.interactions.navigate");
    }
}
