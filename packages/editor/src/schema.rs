//! Field-level knowledge about component props: which fields are numeric,
//! which component types are containers, and how patches are normalized
//! before they are merged into a node.

use pagebuilder_common::{ComponentNode, ComponentTree, Props};
use serde_json::{Number, Value};
use std::sync::Arc;

/// Fields the model always stores as JSON numbers
pub const NUMERIC_FIELDS: &[&str] = &[
    "columns",
    "columnsDesktop",
    "columnsTablet",
    "columnsMobile",
    "rows",
    "rowsDesktop",
    "rowsTablet",
    "rowsMobile",
    "minItems",
    "maxItems",
    "desktopItems",
    "tabletItems",
    "mobileItems",
    "zIndex",
    "animationDuration",
    "animationDelay",
    "parallax",
    "hoverScale",
    "hoverOpacity",
    "staggerChildren",
    "lottieSpeed",
];

pub use pagebuilder_common::{is_container_type, CONTAINER_TYPES};

/// Keys owned by structural operations; patches never touch them
const STRUCTURAL_KEYS: &[&str] = &["id", "type", "children"];

pub fn is_numeric_field(key: &str) -> bool {
    NUMERIC_FIELDS.contains(&key)
}

/// What a single patch entry does to a node
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Set(Value),
    Remove,
    Skip,
}

/// Normalize one patch entry.
///
/// `null` and empty strings clear the field. Numeric fields accept numbers or
/// numeric-looking strings (coerced); anything else for a numeric field is
/// skipped.
pub fn normalize_field(key: &str, value: &Value) -> FieldChange {
    if STRUCTURAL_KEYS.contains(&key) {
        return FieldChange::Skip;
    }

    match value {
        Value::Null => FieldChange::Remove,
        Value::String(s) if s.trim().is_empty() => FieldChange::Remove,
        Value::String(s) if is_numeric_field(key) => match parse_number(s) {
            Some(number) => FieldChange::Set(Value::Number(number)),
            None => {
                tracing::warn!("Dropping non-numeric value {:?} for numeric field '{}'", s, key);
                FieldChange::Skip
            }
        },
        Value::Number(_) => FieldChange::Set(value.clone()),
        _ if is_numeric_field(key) => {
            tracing::warn!("Dropping non-numeric value {} for numeric field '{}'", value, key);
            FieldChange::Skip
        }
        _ => FieldChange::Set(value.clone()),
    }
}

/// Parse a numeric-looking string. Integers stay integers.
pub fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    // Rust accepts "inf"/"nan" spellings; the model only stores finite numbers
    let float = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        return Some(Number::from(float as i64));
    }
    Number::from_f64(float)
}

/// Shallow-merge `patch` into `props`, returning the merged map
pub fn merge_patch(props: &Props, patch: &Props) -> Props {
    let mut merged = props.clone();
    for (key, value) in patch {
        match normalize_field(key, value) {
            FieldChange::Set(value) => {
                merged.insert(key.clone(), value);
            }
            FieldChange::Remove => {
                merged.remove(key);
            }
            FieldChange::Skip => {}
        }
    }
    merged
}

/// Ensure every container-typed node carries a `children` list.
///
/// Trees saved by older editors may omit `children` on empty sections; without
/// it nothing could be dropped into them. Untouched subtrees are shared.
pub fn migrate_tree(tree: &ComponentTree) -> ComponentTree {
    ComponentTree::from_shared(tree.roots().iter().map(migrate_node).collect())
}

fn migrate_node(node: &Arc<ComponentNode>) -> Arc<ComponentNode> {
    let needs_children = node.children.is_none() && is_container_type(&node.kind);
    let children = node.children.as_ref().map(|children| {
        children.iter().map(migrate_node).collect::<Vec<_>>()
    });

    let children_changed = match (&node.children, &children) {
        (Some(old), Some(new)) => old
            .iter()
            .zip(new.iter())
            .any(|(a, b)| !Arc::ptr_eq(a, b)),
        _ => false,
    };

    if !needs_children && !children_changed {
        return Arc::clone(node);
    }

    Arc::new(ComponentNode {
        id: node.id.clone(),
        kind: node.kind.clone(),
        children: Some(children.unwrap_or_default()),
        props: node.props.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Props {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let merged = merge_patch(
            &Props::new(),
            &patch(json!({ "columns": "3", "parallax": "0.5", "rows": " 2 " })),
        );
        assert_eq!(merged.get("columns"), Some(&json!(3)));
        assert_eq!(merged.get("parallax"), Some(&json!(0.5)));
        assert_eq!(merged.get("rows"), Some(&json!(2)));
    }

    #[test]
    fn test_non_numeric_fields_keep_strings() {
        let merged = merge_patch(&Props::new(), &patch(json!({ "width": "100", "text": "3" })));
        assert_eq!(merged.get("width"), Some(&json!("100")));
        assert_eq!(merged.get("text"), Some(&json!("3")));
    }

    #[test]
    fn test_invalid_numeric_values_are_dropped() {
        let existing = patch(json!({ "columns": 4 }));
        let merged = merge_patch(&existing, &patch(json!({ "columns": "lots", "rows": "NaN" })));
        assert_eq!(merged.get("columns"), Some(&json!(4)));
        assert!(merged.get("rows").is_none());
    }

    #[test]
    fn test_null_and_empty_clear_fields() {
        let existing = patch(json!({ "columns": 4, "gap": "1rem" }));
        let merged = merge_patch(&existing, &patch(json!({ "columns": "", "gap": null })));
        assert!(merged.is_empty());
    }

    #[test]
    fn test_structural_keys_ignored() {
        let merged = merge_patch(
            &Props::new(),
            &patch(json!({ "id": "other", "type": "Image", "children": [] })),
        );
        assert!(merged.is_empty());
    }

    #[test]
    fn test_migrate_adds_children_to_containers() {
        let tree = ComponentTree::from_nodes(vec![
            ComponentNode::new("s", "Section"),
            ComponentNode::new("t", "Text"),
        ]);
        let migrated = migrate_tree(&tree);

        assert!(migrated.find("s").unwrap().is_container());
        assert!(!migrated.find("t").unwrap().is_container());
        assert!(Arc::ptr_eq(&tree.roots()[1], &migrated.roots()[1]));
    }
}
