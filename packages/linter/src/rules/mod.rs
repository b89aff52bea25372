mod a11y;
mod collections;
mod interactions;
mod media;
mod no_negative_spacing;
mod no_raw_colors;
mod no_viewport_units;
mod positioning;
mod structure;

pub use a11y::A11yRule;
pub use collections::{CollectionSizeRule, ItemBoundsRule};
pub use interactions::{AnimationDurationRule, ClickActionRule, ParallaxRangeRule, StickyOffsetRule};
pub use media::CropAspectRule;
pub use no_negative_spacing::NoNegativeMarginRule;
pub use no_raw_colors::NoRawColorsRule;
pub use no_viewport_units::NoViewportUnitsRule;
pub use positioning::{AbsoluteAncestorRule, RootAbsoluteRule, ZIndexPositionRule};
pub use structure::{ContainerChildrenRule, NestingDepthRule, TextFixedHeightRule};

use crate::diagnostic::Diagnostic;
use pagebuilder_common::{ComponentNode, VisitContext};

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check a root-level component once, with its index
    fn check_root(&self, _root: &ComponentNode, _index: usize) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check any component (roots included) with its traversal context
    fn check_node(&self, _node: &ComponentNode, _cx: &VisitContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RootAbsoluteRule),
                Box::new(NoViewportUnitsRule),
                Box::new(CropAspectRule),
                Box::new(StickyOffsetRule),
                Box::new(ClickActionRule),
                Box::new(ItemBoundsRule),
                Box::new(AnimationDurationRule),
                Box::new(ParallaxRangeRule),
                Box::new(AbsoluteAncestorRule),
                Box::new(ZIndexPositionRule),
                Box::new(NoNegativeMarginRule),
                Box::new(NoRawColorsRule),
                Box::new(TextFixedHeightRule),
                Box::new(A11yRule),
                Box::new(NestingDepthRule::default()),
                Box::new(CollectionSizeRule),
                Box::new(ContainerChildrenRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Drop a rule by name; returns whether one was removed
    pub fn disable(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::LintRule;
    use crate::diagnostic::Diagnostic;
    use pagebuilder_common::{walk_node, ComponentNode, ComponentTree, VisitContext, Visitor};

    struct Run<'r> {
        rule: &'r dyn LintRule,
        out: Vec<Diagnostic>,
    }

    impl Visitor for Run<'_> {
        fn visit_node<'a>(&mut self, node: &'a ComponentNode, cx: &mut VisitContext<'a>) {
            self.out.extend(self.rule.check_node(node, cx));
            walk_node(self, node, cx);
        }
    }

    /// Run a single rule over a tree
    pub fn run(rule: &dyn LintRule, nodes: Vec<ComponentNode>) -> Vec<Diagnostic> {
        let tree = ComponentTree::from_nodes(nodes);
        let mut run = Run { rule, out: Vec::new() };
        for (index, root) in tree.roots().iter().enumerate() {
            run.out.extend(rule.check_root(root, index));
        }
        run.visit_tree(&tree);
        run.out
    }
}
