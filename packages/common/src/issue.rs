use crate::ComponentTree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a path into the component tree.
///
/// Paths look like `[0, "children", 2, "width"]`: root index, then
/// `"children"`/index pairs, optionally ending in a field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

/// Path from the tree root to a node (or a node field)
pub type NodePath = Vec<PathSegment>;

/// Render a path as `0.children.2.width`
pub fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// A problem reported by a validator against the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: NodePath,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: NodePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Last field-name segment of the path, if any
    pub fn field(&self) -> Option<&str> {
        self.path.iter().rev().find_map(PathSegment::as_key)
    }
}

/// External validator contract: inspects a tree and reports issues.
/// Validators never fail; problems are data.
pub trait Validator {
    fn validate(&self, tree: &ComponentTree) -> Vec<ValidationIssue>;
}
