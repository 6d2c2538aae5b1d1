//! Selector matching against the widget tree
//!
//! Matching is a pure function of the selector, the tree and the state
//! rules. Predicates are checked cheapest-first and the first failure ends
//! the evaluation: type, id, subcontrol, ancestor chain, attributes, states.

use sheen_core::{StateRules, StructuralError, TreeError, WidgetId, WidgetNode, WidgetTree};

use crate::selector::{Combinator, CompoundSelector, Selector, StatePredicate};

/// Everything a match needs to look at
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub tree: &'a WidgetTree,
    pub rules: &'a StateRules,
    pub max_ancestor_depth: usize,
}

impl<'a> MatchContext<'a> {
    pub fn new(tree: &'a WidgetTree, rules: &'a StateRules, max_ancestor_depth: usize) -> Self {
        Self {
            tree,
            rules,
            max_ancestor_depth,
        }
    }

    /// Whether `selector` applies to `part` of `node` (`None` is the widget
    /// body). Unknown nodes never match.
    pub fn matches(
        &self,
        selector: &Selector,
        node: WidgetId,
        part: Option<&str>,
    ) -> Result<bool, StructuralError> {
        let Some(widget) = self.tree.get(node) else {
            return Ok(false);
        };
        let subject = &selector.subject;

        if !type_matches(subject, widget) || !id_matches(subject, widget) {
            return Ok(false);
        }
        if selector.subcontrol.as_deref() != part {
            return Ok(false);
        }

        if selector.has_ancestors() {
            let chain = match self.tree.ancestors(node, self.max_ancestor_depth) {
                Ok(chain) => chain,
                Err(TreeError::Structural(err)) => return Err(err),
                Err(_) => return Ok(false),
            };
            if !self.chain_matches(&selector.ancestors, &chain, 0) {
                return Ok(false);
            }
        }

        Ok(self.dynamic_matches(subject, widget))
    }

    /// Match the remaining ancestor compounds right to left. `start` indexes
    /// the nearest candidate in `chain` (nearest-first).
    fn chain_matches(
        &self,
        compounds: &[(CompoundSelector, Combinator)],
        chain: &[WidgetId],
        start: usize,
    ) -> bool {
        let Some(((compound, combinator), rest)) = compounds.split_last() else {
            return true;
        };

        match combinator {
            Combinator::Child => chain.get(start).is_some_and(|&ancestor| {
                self.compound_matches(compound, ancestor) && self.chain_matches(rest, chain, start + 1)
            }),
            Combinator::Descendant => (start..chain.len()).any(|index| {
                self.compound_matches(compound, chain[index])
                    && self.chain_matches(rest, chain, index + 1)
            }),
        }
    }

    fn compound_matches(&self, compound: &CompoundSelector, node: WidgetId) -> bool {
        self.tree.get(node).is_some_and(|widget| {
            type_matches(compound, widget)
                && id_matches(compound, widget)
                && self.dynamic_matches(compound, widget)
        })
    }

    /// Attribute and pseudo-state predicates
    fn dynamic_matches(&self, compound: &CompoundSelector, widget: &WidgetNode) -> bool {
        let attributes_match = compound
            .attributes
            .iter()
            .all(|attr| attr.matches(widget.attribute(&attr.name)));
        if !attributes_match {
            return false;
        }
        if compound.states.is_empty() {
            return true;
        }

        let effective = self.rules.effective(widget.states());
        compound.states.iter().all(|predicate| match predicate {
            StatePredicate::Is(state) => effective.contains(state),
            StatePredicate::Not(state) => !effective.contains(state),
        })
    }
}

fn type_matches(compound: &CompoundSelector, widget: &WidgetNode) -> bool {
    compound
        .type_name
        .as_deref()
        .map_or(true, |type_name| type_name == widget.type_name())
}

fn id_matches(compound: &CompoundSelector, widget: &WidgetNode) -> bool {
    compound
        .id
        .as_deref()
        .map_or(true, |id| widget.id() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_selector;
    use sheen_core::{PseudoState, StateTracker, WidgetSpec};

    struct Fixture {
        tree: WidgetTree,
        rules: StateRules,
        dialog: WidgetId,
        frame: WidgetId,
        button: WidgetId,
    }

    fn fixture() -> Fixture {
        let mut tree = WidgetTree::new();
        let dialog = tree.create(WidgetSpec::new("QDialog").id("settings")).unwrap();
        let frame = tree.create(WidgetSpec::new("QFrame").parent(dialog)).unwrap();
        let button = tree
            .create(
                WidgetSpec::new("QPushButton")
                    .id("specialButton")
                    .attr("class", "primary large")
                    .parent(frame),
            )
            .unwrap();
        Fixture {
            tree,
            rules: StateRules::default(),
            dialog,
            frame,
            button,
        }
    }

    fn check(f: &Fixture, selector: &str, node: WidgetId) -> bool {
        let selector = parse_selector(selector).unwrap();
        MatchContext::new(&f.tree, &f.rules, 64)
            .matches(&selector, node, None)
            .unwrap()
    }

    #[test]
    fn test_type_and_id() {
        let f = fixture();
        assert!(check(&f, "QPushButton", f.button));
        assert!(check(&f, "*", f.button));
        assert!(check(&f, "#specialButton", f.button));
        assert!(check(&f, "QPushButton#specialButton", f.button));
        assert!(!check(&f, "QPushButton#other", f.button));
        assert!(!check(&f, "qpushbutton", f.button));
    }

    #[test]
    fn test_descendant_and_child() {
        let f = fixture();
        assert!(check(&f, "QDialog QPushButton", f.button));
        assert!(check(&f, "QFrame > QPushButton", f.button));
        assert!(!check(&f, "QDialog > QPushButton", f.button));
        assert!(check(&f, "QDialog > QFrame > QPushButton", f.button));
        assert!(check(&f, "#settings QFrame QPushButton", f.button));
        assert!(!check(&f, "QFrame QDialog QPushButton", f.button));
        assert!(!check(&f, "QMainWindow QPushButton", f.button));
        assert!(check(&f, "QDialog > QFrame", f.frame));
        assert!(!check(&f, "QFrame QDialog", f.dialog));
    }

    #[test]
    fn test_descendant_backtracks() {
        let mut f = fixture();
        let inner = f
            .tree
            .create(WidgetSpec::new("QFrame").parent(f.button))
            .unwrap();
        let label = f.tree.create(WidgetSpec::new("QLabel").parent(inner)).unwrap();

        // The nearest QFrame is not a child of QDialog; the outer one is
        assert!(check(&f, "QDialog > QFrame QLabel", label));
    }

    #[test]
    fn test_attributes() {
        let f = fixture();
        assert!(check(&f, "QPushButton[class]", f.button));
        assert!(check(&f, "QPushButton[class=\"primary large\"]", f.button));
        assert!(!check(&f, "QPushButton[class=\"primary\"]", f.button));
        assert!(check(&f, "QPushButton[class~=\"primary\"]", f.button));
        assert!(check(&f, "QPushButton.large", f.button));
        assert!(!check(&f, "QPushButton[flat]", f.button));
    }

    #[test]
    fn test_states_are_conjunctive() {
        let mut f = fixture();
        let mut tracker = StateTracker::default();
        tracker
            .set_state(&mut f.tree, f.button, PseudoState::Hover, true)
            .unwrap();

        assert!(check(&f, "QPushButton:hover", f.button));
        assert!(!check(&f, "QPushButton:hover:pressed", f.button));
        assert!(check(&f, "QPushButton:!pressed", f.button));
        assert!(check(&f, "QPushButton:enabled", f.button));

        tracker
            .set_state(&mut f.tree, f.button, PseudoState::Disabled, true)
            .unwrap();
        assert!(!check(&f, "QPushButton:hover", f.button));
        assert!(check(&f, "QPushButton:disabled", f.button));
    }

    #[test]
    fn test_ancestor_state() {
        let mut f = fixture();
        assert!(!check(&f, "QFrame:hover QPushButton", f.button));
        let mut tracker = StateTracker::default();
        tracker
            .set_state(&mut f.tree, f.frame, PseudoState::Hover, true)
            .unwrap();
        assert!(check(&f, "QFrame:hover QPushButton", f.button));
    }

    #[test]
    fn test_subcontrol_targets_part_only() {
        let f = fixture();
        let selector = parse_selector("QPushButton::menu-indicator").unwrap();
        let cx = MatchContext::new(&f.tree, &f.rules, 64);
        assert!(cx.matches(&selector, f.button, Some("menu-indicator")).unwrap());
        assert!(!cx.matches(&selector, f.button, None).unwrap());

        let body = parse_selector("QPushButton").unwrap();
        assert!(!cx.matches(&body, f.button, Some("menu-indicator")).unwrap());
    }

    #[test]
    fn test_depth_limit() {
        let f = fixture();
        let selector = parse_selector("QDialog QPushButton").unwrap();
        let err = MatchContext::new(&f.tree, &f.rules, 1)
            .matches(&selector, f.button, None)
            .unwrap_err();
        assert_eq!(
            err,
            StructuralError {
                node: f.button,
                limit: 1
            }
        );

        // Selectors without ancestors never walk the chain
        let plain = parse_selector("QPushButton").unwrap();
        assert!(MatchContext::new(&f.tree, &f.rules, 1)
            .matches(&plain, f.button, None)
            .unwrap());
    }

    #[test]
    fn test_matching_is_pure() {
        let f = fixture();
        let selector = parse_selector("QDialog QPushButton#specialButton").unwrap();
        let cx = MatchContext::new(&f.tree, &f.rules, 64);
        let first = cx.matches(&selector, f.button, None).unwrap();
        for _ in 0..3 {
            assert_eq!(cx.matches(&selector, f.button, None).unwrap(), first);
        }
        assert!(f.tree.node(f.button).unwrap().states().is_empty());
    }
}
