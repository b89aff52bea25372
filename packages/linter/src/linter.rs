use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::rules::RuleRegistry;
use pagebuilder_common::{walk_node, ComponentNode, ComponentTree, ValidationIssue, Validator, VisitContext, Visitor};

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,

    /// Drop warnings and keep only errors
    pub errors_only: bool,
}

/// Lint a component tree and return diagnostics
///
/// Root checks run first, in root order; node checks follow in depth-first
/// order with every rule applied to a node before moving on.
pub fn lint_tree(tree: &ComponentTree, options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    let mut diagnostics = run_rules(tree, &registry);

    if options.errors_only {
        diagnostics.retain(|diagnostic| diagnostic.level == DiagnosticLevel::Error);
    }

    diagnostics
}

fn run_rules(tree: &ComponentTree, registry: &RuleRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, root) in tree.roots().iter().enumerate() {
        for rule in registry.rules() {
            diagnostics.extend(rule.check_root(root, index));
        }
    }

    let mut walker = NodeWalker {
        registry,
        diagnostics,
    };
    walker.visit_tree(tree);
    walker.diagnostics
}

struct NodeWalker<'r> {
    registry: &'r RuleRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl Visitor for NodeWalker<'_> {
    fn visit_node<'a>(&mut self, node: &'a ComponentNode, cx: &mut VisitContext<'a>) {
        for rule in self.registry.rules() {
            self.diagnostics.extend(rule.check_node(node, cx));
        }
        walk_node(self, node, cx);
    }
}

/// The rule set packaged as an editor validator
#[derive(Debug, Default)]
pub struct Linter {
    registry: RuleRegistry,
    errors_only: bool,
}

impl Linter {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            errors_only: false,
        }
    }

    pub fn errors_only(mut self) -> Self {
        self.errors_only = true;
        self
    }

    pub fn lint(&self, tree: &ComponentTree) -> Vec<Diagnostic> {
        let mut diagnostics = run_rules(tree, &self.registry);
        if self.errors_only {
            diagnostics.retain(|diagnostic| diagnostic.level == DiagnosticLevel::Error);
        }
        diagnostics
    }
}

impl Validator for Linter {
    fn validate(&self, tree: &ComponentTree) -> Vec<ValidationIssue> {
        self.lint(tree).iter().map(Diagnostic::to_issue).collect()
    }
}
