//! Rule store
//!
//! Rules are registered under a scope and stamped with a store-wide
//! registration order. Lookup is indexed by the subject's type name, and by
//! id for universal-type rules, so resolving a widget only looks at rules
//! that could possibly apply to it.

use std::fmt;

use rustc_hash::FxHashMap;
use sheen_core::WidgetId;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::rule::{Rule, Stylesheet};

new_key_type! {
    /// Handle to a registered rule
    pub struct RuleId;
}

/// Where a rule was registered. Later variants outrank earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Application-wide sheet
    Global,
    /// Sheet of a top-level window; covers every widget in that window
    Window(WidgetId),
    /// Sheet of one widget; covers the widget and its descendants
    Widget(WidgetId),
}

impl Scope {
    pub fn rank(&self) -> u8 {
        match self {
            Scope::Global => 0,
            Scope::Window(_) => 1,
            Scope::Widget(_) => 2,
        }
    }

    pub fn owner(&self) -> Option<WidgetId> {
        match self {
            Scope::Global => None,
            Scope::Window(id) | Scope::Widget(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Window(id) => write!(f, "window {:?}", id),
            Scope::Widget(id) => write!(f, "widget {:?}", id),
        }
    }
}

/// A rule with its registration data
#[derive(Debug, Clone)]
pub struct StoredRule {
    pub rule: Rule,
    pub scope: Scope,
    /// Store-wide registration order; later registrations win ties
    pub order: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexKey<'a> {
    Type(&'a str),
    Id(&'a str),
    /// Inline declarations of one widget
    Owner(WidgetId),
    Universal,
}

impl<'a> IndexKey<'a> {
    fn of(rule: &'a Rule, scope: Scope) -> Self {
        let selector = rule.selector();
        if selector.is_inline() {
            if let Scope::Widget(owner) = scope {
                return IndexKey::Owner(owner);
            }
        }
        match (selector.type_hint(), selector.id_hint()) {
            (Some(type_name), _) => IndexKey::Type(type_name),
            (None, Some(id)) => IndexKey::Id(id),
            (None, None) => IndexKey::Universal,
        }
    }
}

#[derive(Debug, Default)]
pub struct RuleStore {
    rules: SlotMap<RuleId, StoredRule>,
    by_scope: FxHashMap<Scope, Vec<RuleId>>,
    by_type: FxHashMap<String, Vec<RuleId>>,
    by_id: FxHashMap<String, Vec<RuleId>>,
    by_owner: FxHashMap<WidgetId, Vec<RuleId>>,
    universal: Vec<RuleId>,
    next_order: u64,
    /// Rules whose selectors look above the subject
    ancestor_rules: usize,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Rule, scope: Scope) -> RuleId {
        let order = self.next_order;
        self.next_order += 1;
        if rule.selector().has_ancestors() {
            self.ancestor_rules += 1;
        }

        let bucket = match IndexKey::of(&rule, scope) {
            IndexKey::Type(name) => Bucket::Type(name.to_string()),
            IndexKey::Id(name) => Bucket::Id(name.to_string()),
            IndexKey::Owner(owner) => Bucket::Owner(owner),
            IndexKey::Universal => Bucket::Universal,
        };

        let id = self.rules.insert(StoredRule { rule, scope, order });
        self.by_scope.entry(scope).or_default().push(id);
        match bucket {
            Bucket::Type(name) => self.by_type.entry(name).or_default().push(id),
            Bucket::Id(name) => self.by_id.entry(name).or_default().push(id),
            Bucket::Owner(owner) => self.by_owner.entry(owner).or_default().push(id),
            Bucket::Universal => self.universal.push(id),
        }
        id
    }

    /// Register every rule of a sheet, preserving its source order
    pub fn register_sheet(&mut self, sheet: Stylesheet, scope: Scope) -> Vec<RuleId> {
        let ids: Vec<RuleId> = sheet
            .into_rules()
            .into_iter()
            .map(|rule| self.register(rule, scope))
            .collect();
        debug!(%scope, rules = ids.len(), "registered style sheet");
        ids
    }

    /// Drop every rule of a scope, returning how many were removed
    pub fn unregister(&mut self, scope: Scope) -> usize {
        let Some(ids) = self.by_scope.remove(&scope) else {
            return 0;
        };
        let count = ids.len();
        for id in ids {
            self.remove_indexed(id);
        }
        debug!(%scope, rules = count, "unregistered scope");
        count
    }

    pub fn unregister_rule(&mut self, id: RuleId) -> Option<Rule> {
        let scope = self.rules.get(id)?.scope;
        if let Some(ids) = self.by_scope.get_mut(&scope) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_scope.remove(&scope);
            }
        }
        self.remove_indexed(id)
    }

    /// Swap a scope's rules for a new sheet
    pub fn replace(&mut self, scope: Scope, sheet: Stylesheet) -> Vec<RuleId> {
        self.unregister(scope);
        self.register_sheet(sheet, scope)
    }

    /// Candidate rules for `node`, a widget with this type and id, in no
    /// particular order. Inline rules of other widgets are never returned.
    pub fn query<'a>(
        &'a self,
        node: WidgetId,
        type_name: &str,
        id: Option<&str>,
    ) -> impl Iterator<Item = (RuleId, &'a StoredRule)> + 'a {
        let by_type = self.by_type.get(type_name).map(Vec::as_slice).unwrap_or(&[]);
        let by_id = id
            .and_then(|id| self.by_id.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let by_owner = self.by_owner.get(&node).map(Vec::as_slice).unwrap_or(&[]);

        by_type
            .iter()
            .chain(by_id)
            .chain(by_owner)
            .chain(&self.universal)
            .filter_map(move |&rule_id| self.rules.get(rule_id).map(|stored| (rule_id, stored)))
    }

    pub fn get(&self, id: RuleId) -> Option<&StoredRule> {
        self.rules.get(id)
    }

    /// Rules of one scope in registration order
    pub fn scope_rules(&self, scope: Scope) -> impl Iterator<Item = &StoredRule> {
        self.by_scope
            .get(&scope)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rules.get(*id))
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.by_scope.contains_key(&scope)
    }

    /// Whether any rule depends on ancestors, so a change to one widget can
    /// restyle its descendants
    pub fn has_ancestor_rules(&self) -> bool {
        self.ancestor_rules > 0
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn remove_indexed(&mut self, id: RuleId) -> Option<Rule> {
        let stored = self.rules.remove(id)?;
        if stored.rule.selector().has_ancestors() {
            self.ancestor_rules -= 1;
        }

        match IndexKey::of(&stored.rule, stored.scope) {
            IndexKey::Type(name) => remove_from_bucket(&mut self.by_type, name, id),
            IndexKey::Id(name) => remove_from_bucket(&mut self.by_id, name, id),
            IndexKey::Owner(owner) => {
                if let Some(bucket) = self.by_owner.get_mut(&owner) {
                    bucket.retain(|other| *other != id);
                    if bucket.is_empty() {
                        self.by_owner.remove(&owner);
                    }
                }
            }
            IndexKey::Universal => self.universal.retain(|other| *other != id),
        }
        Some(stored.rule)
    }
}

/// Owned form of [`IndexKey`]
enum Bucket {
    Type(String),
    Id(String),
    Owner(WidgetId),
    Universal,
}

fn remove_from_bucket(index: &mut FxHashMap<String, Vec<RuleId>>, key: &str, id: RuleId) {
    if let Some(bucket) = index.get_mut(key) {
        bucket.retain(|other| *other != id);
        if bucket.is_empty() {
            index.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_selector;
    use sheen_core::{WidgetSpec, WidgetTree};

    fn rule(selector: &str) -> Rule {
        Rule::new(parse_selector(selector).unwrap(), Vec::new())
    }

    fn node() -> WidgetId {
        let mut tree = WidgetTree::new();
        tree.create(WidgetSpec::new("QWidget")).unwrap()
    }

    fn selectors(store: &RuleStore, type_name: &str, id: Option<&str>) -> Vec<String> {
        let mut found: Vec<String> = store
            .query(node(), type_name, id)
            .map(|(_, stored)| stored.rule.selector().to_string())
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_query_uses_indexes() {
        let mut store = RuleStore::new();
        store.register(rule("QPushButton"), Scope::Global);
        store.register(rule("QLabel"), Scope::Global);
        store.register(rule("#ok"), Scope::Global);
        store.register(rule("#cancel"), Scope::Global);
        store.register(rule("*"), Scope::Global);

        assert_eq!(
            selectors(&store, "QPushButton", Some("ok")),
            vec!["#ok", "*", "QPushButton"]
        );
        assert_eq!(selectors(&store, "QCheckBox", None), vec!["*"]);
    }

    #[test]
    fn test_registration_order_is_global() {
        let mut store = RuleStore::new();
        let a = store.register(rule("QLabel"), Scope::Global);
        let b = store.register(rule("QLabel"), Scope::Global);
        assert!(store.get(a).unwrap().order < store.get(b).unwrap().order);
    }

    #[test]
    fn test_unregister_scope() {
        let mut tree = WidgetTree::new();
        let window = tree.create(WidgetSpec::new("QMainWindow")).unwrap();

        let mut store = RuleStore::new();
        store.register(rule("QLabel"), Scope::Global);
        store.register(rule("QLabel"), Scope::Window(window));
        store.register(rule("QDialog QLabel"), Scope::Window(window));
        assert!(store.has_ancestor_rules());

        assert_eq!(store.unregister(Scope::Window(window)), 2);
        assert_eq!(store.len(), 1);
        assert!(!store.has_ancestor_rules());
        assert!(!store.has_scope(Scope::Window(window)));
        assert_eq!(store.unregister(Scope::Window(window)), 0);
        assert_eq!(selectors(&store, "QLabel", None), vec!["QLabel"]);
    }

    #[test]
    fn test_unregister_single_rule() {
        let mut store = RuleStore::new();
        let id = store.register(rule("#ok"), Scope::Global);
        store.register(rule("#ok:hover"), Scope::Global);

        assert!(store.unregister_rule(id).is_some());
        assert!(store.unregister_rule(id).is_none());
        assert_eq!(selectors(&store, "QPushButton", Some("ok")), vec!["#ok:hover"]);
    }

    #[test]
    fn test_replace() {
        let mut store = RuleStore::new();
        store.register_sheet(
            Stylesheet::parse("QLabel { color: red; } QFrame { color: red; }").unwrap(),
            Scope::Global,
        );
        store.replace(
            Scope::Global,
            Stylesheet::parse("QLabel { color: blue; }").unwrap(),
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.scope_rules(Scope::Global).count(), 1);
    }

    #[test]
    fn test_inline_rules_are_indexed_by_owner() {
        let mut tree = WidgetTree::new();
        let labels: Vec<WidgetId> = (0..1000)
            .map(|_| tree.create(WidgetSpec::new("QLabel")).unwrap())
            .collect();
        let button = tree.create(WidgetSpec::new("QPushButton")).unwrap();

        let mut store = RuleStore::new();
        for label in &labels {
            let inline = crate::parser::parse_inline("color: red;", Default::default());
            store.register_sheet(inline.stylesheet, Scope::Widget(*label));
        }
        assert_eq!(store.len(), 1000);
        assert_eq!(store.query(button, "QPushButton", None).count(), 0);
        assert_eq!(store.query(labels[7], "QLabel", None).count(), 1);

        store.unregister(Scope::Widget(labels[7]));
        assert_eq!(store.query(labels[7], "QLabel", None).count(), 0);
        assert_eq!(store.query(labels[8], "QLabel", None).count(), 1);
    }

    #[test]
    fn test_scope_rank() {
        let mut tree = WidgetTree::new();
        let window = tree.create(WidgetSpec::new("QMainWindow")).unwrap();
        assert!(Scope::Global.rank() < Scope::Window(window).rank());
        assert!(Scope::Window(window).rank() < Scope::Widget(window).rank());
    }
}
