//! Template lint rules for page builder component trees.
//!
//! Each rule inspects a node (or a root) and reports [`Diagnostic`]s with a
//! path into the tree. [`Linter`] packages the rules as a validator the
//! editor session can call before saving.

mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_tree, LintOptions, Linter};
pub use rules::*;
