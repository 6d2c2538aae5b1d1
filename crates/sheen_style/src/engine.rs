//! The style engine
//!
//! Owns the widget tree mirror, the state tracker, the rule store and the
//! applier, and wires them together: every mutating call re-resolves the
//! widgets it can affect before returning and forwards the resulting deltas
//! to the toolkit's [`StyleSink`].

use rustc_hash::FxHashSet;
use sheen_core::{
    Event, PseudoState, StateEditor, StateTracker, WidgetId, WidgetSpec, WidgetTree,
};
use tracing::{debug, warn};

use crate::apply::{Applier, StyleSink, StyleTarget, TypeDefaults};
use crate::cascade::{Cascade, RuleMatch};
use crate::config::EngineConfig;
use crate::diagnostics::ParseError;
use crate::error::{Result, StyleError};
use crate::properties::PropertyMap;
use crate::rule::Stylesheet;
use crate::store::{RuleStore, Scope};

pub struct StyleEngine<S: StyleSink> {
    config: EngineConfig,
    tree: WidgetTree,
    tracker: StateTracker,
    store: RuleStore,
    defaults: TypeDefaults,
    applier: Applier,
    sink: S,
}

impl<S: StyleSink> StyleEngine<S> {
    pub fn new(config: EngineConfig, sink: S) -> Self {
        let tracker = StateTracker::new(config.state_rules());
        Self {
            config,
            tree: WidgetTree::new(),
            tracker,
            store: RuleStore::new(),
            defaults: TypeDefaults::new(),
            applier: Applier::new(),
            sink,
        }
    }

    pub fn with_defaults(mut self, defaults: TypeDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    // Lifecycle hooks

    /// Mirror a new widget and apply its initial style
    pub fn create_widget(&mut self, spec: WidgetSpec) -> Result<WidgetId> {
        let id = self.tree.create(spec)?;
        self.restyle_node(id)?;
        Ok(id)
    }

    /// Forget a widget, its subtree and every scope they owned
    pub fn destroy_widget(&mut self, id: WidgetId) -> Result<()> {
        let removed = self.tree.destroy(id)?;
        for node in &removed {
            self.store.unregister(Scope::Widget(*node));
            self.store.unregister(Scope::Window(*node));
            self.tracker.forget(*node);
            self.applier.forget_node(*node);
        }
        debug!(widget = ?id, removed = removed.len(), "destroyed widget");
        Ok(())
    }

    /// Move a widget under a new parent (`None` makes it a top-level window)
    pub fn reparent(&mut self, id: WidgetId, parent: Option<WidgetId>) -> Result<()> {
        self.tree.reparent(id, parent)?;
        let subtree = self.tree.subtree(id)?;
        self.restyle_many(subtree)
    }

    pub fn set_id(&mut self, id: WidgetId, object_id: Option<String>) -> Result<()> {
        if self.tree.set_id(id, object_id)? {
            self.restyle_affected(id)?;
        }
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        if self.tree.set_attribute(id, name, value)? {
            self.restyle_affected(id)?;
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: WidgetId, name: &str) -> Result<()> {
        if self.tree.remove_attribute(id, name)? {
            self.restyle_affected(id)?;
        }
        Ok(())
    }

    // Style sheets

    /// Replace the sheet of a scope. Returns the parse diagnostics; rules
    /// that failed to parse are skipped and the rest are applied.
    pub fn set_stylesheet(&mut self, scope: Scope, css: &str) -> Result<Vec<ParseError>> {
        self.check_scope(scope)?;
        let (sheet, diagnostics) = self.parse_for(scope, css);
        self.store.replace(scope, sheet);
        self.restyle_scope(scope)?;
        Ok(diagnostics)
    }

    /// Append a sheet to a scope, after the rules it already has
    pub fn add_stylesheet(&mut self, scope: Scope, css: &str) -> Result<Vec<ParseError>> {
        self.check_scope(scope)?;
        let (sheet, diagnostics) = self.parse_for(scope, css);
        self.store.register_sheet(sheet, scope);
        self.restyle_scope(scope)?;
        Ok(diagnostics)
    }

    /// `widget.setStyleSheet(...)`: a full sheet or a bare declaration list
    pub fn set_widget_stylesheet(&mut self, widget: WidgetId, css: &str) -> Result<Vec<ParseError>> {
        self.set_stylesheet(Scope::Widget(widget), css)
    }

    /// Drop every rule of a scope, returning how many were removed
    pub fn clear_scope(&mut self, scope: Scope) -> Result<usize> {
        let removed = self.store.unregister(scope);
        if removed > 0 {
            self.restyle_scope(scope)?;
        }
        Ok(removed)
    }

    // Pseudo-states

    pub fn set_state(&mut self, id: WidgetId, state: PseudoState, active: bool) -> Result<bool> {
        let changed = self.tracker.set_state(&mut self.tree, id, state, active)?;
        self.flush()?;
        Ok(changed)
    }

    /// Apply several state edits, restyling once for the net change
    pub fn update_states<F>(&mut self, id: WidgetId, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut StateEditor<'_>),
    {
        let changed = self.tracker.update_states(&mut self.tree, id, edit)?;
        self.flush()?;
        Ok(changed)
    }

    pub fn handle_event(&mut self, event: &Event) -> Result<bool> {
        let changed = self.tracker.handle_event(&mut self.tree, event)?;
        self.flush()?;
        Ok(changed)
    }

    // Queries

    /// Resolve a widget's body style without applying it
    pub fn resolve(&self, id: WidgetId) -> Result<PropertyMap> {
        self.cascade().resolve(id, None)
    }

    pub fn resolve_part(&self, id: WidgetId, part: &str) -> Result<PropertyMap> {
        self.cascade().resolve(id, Some(part))
    }

    /// Matching rules for a widget, highest priority first
    pub fn matching_rules(&self, id: WidgetId, part: Option<&str>) -> Result<Vec<RuleMatch<'_>>> {
        self.cascade().matching_rules(id, part)
    }

    /// The style last handed to the toolkit for a widget body
    pub fn computed(&self, id: WidgetId) -> Option<&PropertyMap> {
        self.applier.applied(&StyleTarget::body(id))
    }

    pub fn computed_part(&self, id: WidgetId, part: &str) -> Option<&PropertyMap> {
        self.applier.applied(&StyleTarget::part(id, part))
    }

    /// Re-resolve every widget
    pub fn restyle_all(&mut self) -> Result<()> {
        let all: Vec<WidgetId> = self.tree.iter().map(|(id, _)| id).collect();
        self.restyle_many(all)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn defaults_mut(&mut self) -> &mut TypeDefaults {
        &mut self.defaults
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn cascade(&self) -> Cascade<'_> {
        Cascade::new(
            &self.store,
            &self.tree,
            self.tracker.rules(),
            self.config.max_ancestor_depth,
        )
    }

    fn check_scope(&self, scope: Scope) -> Result<()> {
        let valid = match scope {
            Scope::Global => true,
            Scope::Window(id) => self.tree.get(id).is_some_and(|node| node.parent().is_none()),
            Scope::Widget(id) => self.tree.contains(id),
        };
        if valid {
            Ok(())
        } else {
            Err(StyleError::UnknownScope(scope))
        }
    }

    fn parse_for(&self, scope: Scope, css: &str) -> (Stylesheet, Vec<ParseError>) {
        let policy = self.config.unsupported_properties;
        let result = match scope {
            Scope::Widget(_) => Stylesheet::parse_widget_sheet(css, policy),
            Scope::Global | Scope::Window(_) => Stylesheet::parse_with_policy(css, policy),
        };
        result.log_diagnostics();
        debug!(
            %scope,
            rules = result.stylesheet.len(),
            diagnostics = result.errors.len(),
            "loaded style sheet"
        );
        (result.stylesheet, result.errors)
    }

    /// Restyle whatever a new set of state bits can affect
    fn flush(&mut self) -> Result<()> {
        let dirty = self.tracker.take_dirty(&self.tree);
        if dirty.is_empty() {
            return Ok(());
        }
        if !self.store.has_ancestor_rules() {
            return self.restyle_many(dirty);
        }

        let mut seen = FxHashSet::default();
        let mut nodes = Vec::new();
        for id in dirty {
            for node in self.tree.subtree(id)? {
                if seen.insert(node) {
                    nodes.push(node);
                }
            }
        }
        self.restyle_many(nodes)
    }

    fn restyle_affected(&mut self, id: WidgetId) -> Result<()> {
        if self.store.has_ancestor_rules() {
            let subtree = self.tree.subtree(id)?;
            self.restyle_many(subtree)
        } else {
            self.restyle_node(id).map(|_| ())
        }
    }

    fn restyle_scope(&mut self, scope: Scope) -> Result<()> {
        match scope {
            Scope::Global => self.restyle_all(),
            Scope::Window(id) | Scope::Widget(id) => match self.tree.subtree(id) {
                Ok(subtree) => self.restyle_many(subtree),
                // The owner is gone; nothing left to restyle
                Err(_) => Ok(()),
            },
        }
    }

    /// Restyle every node, carrying on past failures. Returns the first
    /// error.
    fn restyle_many(&mut self, nodes: impl IntoIterator<Item = WidgetId>) -> Result<()> {
        let mut first_error = None;
        for node in nodes {
            if let Err(err) = self.restyle_node(node) {
                warn!(widget = ?node, error = %err, "failed to restyle widget");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolve and apply the body and every styled part of one widget.
    /// Issues at most one repaint request.
    fn restyle_node(&mut self, node: WidgetId) -> Result<bool> {
        let cascade = Cascade::new(
            &self.store,
            &self.tree,
            self.tracker.rules(),
            self.config.max_ancestor_depth,
        );
        let type_name = self.tree.node(node)?.type_name().to_string();

        let mut parts = cascade.styled_parts(node)?;
        for part in self.applier.applied_parts(node) {
            if !parts.contains(&part) {
                parts.push(part);
            }
        }

        let mut resolved = Vec::with_capacity(parts.len() + 1);
        resolved.push((StyleTarget::body(node), cascade.resolve(node, None)?));
        for part in parts {
            let computed = cascade.resolve(node, Some(&part))?;
            resolved.push((StyleTarget::part(node, part), computed));
        }

        let mut changed = false;
        for (target, computed) in resolved {
            let delta = self
                .applier
                .apply(&mut self.sink, &self.defaults, &type_name, &target, computed);
            changed |= !delta.is_empty();
        }
        if changed {
            self.sink.request_repaint(node);
        }
        Ok(changed)
    }
}
