//! Cascade resolution
//!
//! For one widget (or one of its subcontrols): fetch candidate rules from the
//! store by type and id, keep those whose scope covers the widget and whose
//! selector matches, order them by priority and merge their declarations.
//! A lower-priority rule only fills properties nothing above it has set.

use sheen_core::{StateRules, WidgetId, WidgetNode, WidgetTree};

use crate::error::{Result, StyleError};
use crate::matcher::MatchContext;
use crate::properties::PropertyMap;
use crate::selector::Specificity;
use crate::store::{RuleId, RuleStore, Scope, StoredRule};

/// Cascade order: scope first, then specificity, then registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    pub scope_rank: u8,
    pub specificity: Specificity,
    pub order: u64,
}

impl Priority {
    pub fn of(stored: &StoredRule) -> Self {
        Self {
            scope_rank: stored.scope.rank(),
            specificity: stored.rule.selector().specificity(),
            order: stored.order,
        }
    }
}

/// A rule that applies to the widget being resolved
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub id: RuleId,
    pub rule: &'a StoredRule,
    pub priority: Priority,
}

#[derive(Clone, Copy)]
pub struct Cascade<'a> {
    store: &'a RuleStore,
    matcher: MatchContext<'a>,
}

impl<'a> Cascade<'a> {
    pub fn new(
        store: &'a RuleStore,
        tree: &'a WidgetTree,
        rules: &'a StateRules,
        max_ancestor_depth: usize,
    ) -> Self {
        Self {
            store,
            matcher: MatchContext::new(tree, rules, max_ancestor_depth),
        }
    }

    /// Matching rules, highest priority first
    pub fn matching_rules(&self, node: WidgetId, part: Option<&str>) -> Result<Vec<RuleMatch<'a>>> {
        let widget = self.widget(node)?;

        let mut matches = Vec::new();
        for (id, stored) in self.store.query(node, widget.type_name(), widget.id()) {
            if !self.scope_covers(stored, node, widget) {
                continue;
            }
            if self.matcher.matches(stored.rule.selector(), node, part)? {
                matches.push(RuleMatch {
                    id,
                    rule: stored,
                    priority: Priority::of(stored),
                });
            }
        }
        matches.sort_unstable_by(|a, b| b.priority.cmp(&a.priority));
        Ok(matches)
    }

    /// Computed properties for the widget body (`part = None`) or one of its
    /// subcontrols. Keys come back in canonical order.
    pub fn resolve(&self, node: WidgetId, part: Option<&str>) -> Result<PropertyMap> {
        let mut computed = PropertyMap::new();
        for matched in self.matching_rules(node, part)? {
            // Last declaration of a property within a rule wins
            for declaration in matched.rule.rule.declarations().iter().rev() {
                computed.fill(&declaration.property, &declaration.value);
            }
        }
        computed.sort_canonical();
        Ok(computed)
    }

    /// Subcontrols some in-scope rule styles for this widget, sorted
    pub fn styled_parts(&self, node: WidgetId) -> Result<Vec<String>> {
        let widget = self.widget(node)?;

        let mut parts: Vec<String> = self
            .store
            .query(node, widget.type_name(), widget.id())
            .filter(|(_, stored)| self.scope_covers(stored, node, widget))
            .filter_map(|(_, stored)| stored.rule.selector().subcontrol.clone())
            .collect();
        parts.sort_unstable();
        parts.dedup();
        Ok(parts)
    }

    fn widget(&self, node: WidgetId) -> Result<&'a WidgetNode> {
        self.matcher
            .tree
            .get(node)
            .ok_or(StyleError::UnknownWidget(node))
    }

    fn scope_covers(&self, stored: &StoredRule, node: WidgetId, widget: &WidgetNode) -> bool {
        match stored.scope {
            Scope::Global => true,
            Scope::Window(window) => widget.window() == window,
            Scope::Widget(owner) if stored.rule.selector().is_inline() => owner == node,
            Scope::Widget(owner) => self.matcher.tree.is_within(node, owner),
        }
    }
}
