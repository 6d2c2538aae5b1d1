//! Widget tree mirror
//!
//! The toolkit owns the real widgets; the engine keeps this slotmap-backed
//! mirror of their type names, ids, attributes, states and parent links.
//! Lifecycle hooks (create, destroy, reparent) keep the two in step.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;

use crate::state::StateSet;

new_key_type! {
    /// Handle to a widget in the tree
    pub struct WidgetId;
}

/// Ancestor chain longer than the configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("widget {node:?} has more than {limit} ancestors")]
pub struct StructuralError {
    pub node: WidgetId,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),
    #[error("cannot move {child:?} under {parent:?}: it would become its own ancestor")]
    Cycle { child: WidgetId, parent: WidgetId },
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// Everything the toolkit reports when a widget is created
#[derive(Debug, Clone, Default)]
pub struct WidgetSpec {
    pub type_name: String,
    pub id: Option<String>,
    pub parent: Option<WidgetId>,
    pub attributes: Vec<(String, String)>,
    pub states: StateSet,
}

impl WidgetSpec {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn parent(mut self, parent: WidgetId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn state(mut self, state: crate::PseudoState) -> Self {
        self.states.insert(state);
        self
    }
}

/// One mirrored widget
#[derive(Debug, Clone)]
pub struct WidgetNode {
    type_name: String,
    id: Option<String>,
    parent: Option<WidgetId>,
    children: SmallVec<[WidgetId; 4]>,
    /// Top-level ancestor; a root is its own window
    window: WidgetId,
    attributes: FxHashMap<String, String>,
    states: StateSet,
}

impl WidgetNode {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn window(&self) -> WidgetId {
        self.window
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw states, before disabled masking
    pub fn states(&self) -> &StateSet {
        &self.states
    }
}

/// Slotmap-backed widget hierarchy
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Mirror a newly created widget
    pub fn create(&mut self, spec: WidgetSpec) -> Result<WidgetId, TreeError> {
        let window = match spec.parent {
            Some(parent) => Some(self.node(parent)?.window),
            None => None,
        };

        let id = self.nodes.insert_with_key(|key| WidgetNode {
            type_name: spec.type_name,
            id: spec.id,
            parent: spec.parent,
            children: SmallVec::new(),
            window: window.unwrap_or(key),
            attributes: spec.attributes.into_iter().collect(),
            states: spec.states,
        });

        if let Some(parent) = spec.parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.push(id);
            }
        }
        Ok(id)
    }

    /// Remove a widget and its whole subtree, returning the removed ids in
    /// pre-order
    pub fn destroy(&mut self, id: WidgetId) -> Result<Vec<WidgetId>, TreeError> {
        let removed = self.subtree(id)?;
        self.detach(id);
        for node in &removed {
            self.nodes.remove(*node);
        }
        Ok(removed)
    }

    /// Move a widget (with its subtree) under a new parent, or make it a
    /// top-level window with `None`
    pub fn reparent(&mut self, id: WidgetId, parent: Option<WidgetId>) -> Result<(), TreeError> {
        self.node(id)?;
        let window = match parent {
            Some(parent) => {
                self.node(parent)?;
                if self.is_within(parent, id) {
                    return Err(TreeError::Cycle { child: id, parent });
                }
                self.nodes[parent].window
            }
            None => id,
        };

        self.detach(id);
        self.nodes[id].parent = parent;
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        for node in self.subtree(id)? {
            self.nodes[node].window = window;
        }
        Ok(())
    }

    pub fn set_id(&mut self, id: WidgetId, object_id: Option<String>) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        let changed = node.id != object_id;
        node.id = object_id;
        Ok(changed)
    }

    /// Returns true if the value changed
    pub fn set_attribute(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        let value = value.into();
        let previous = node.attributes.insert(name.into(), value.clone());
        Ok(previous.as_deref() != Some(value.as_str()))
    }

    /// Returns true if the attribute was present
    pub fn remove_attribute(&mut self, id: WidgetId, name: &str) -> Result<bool, TreeError> {
        Ok(self.node_mut(id)?.attributes.remove(name).is_some())
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: WidgetId) -> Result<&WidgetNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::UnknownWidget(id))
    }

    fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::UnknownWidget(id))
    }

    pub(crate) fn states_mut(&mut self, id: WidgetId) -> Result<&mut StateSet, TreeError> {
        Ok(&mut self.node_mut(id)?.states)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Ancestors nearest-first. Fails if the chain is longer than `limit`.
    pub fn ancestors(
        &self,
        id: WidgetId,
        limit: usize,
    ) -> Result<SmallVec<[WidgetId; 8]>, TreeError> {
        let mut chain = SmallVec::new();
        let mut current = self.node(id)?.parent;
        while let Some(ancestor) = current {
            if chain.len() == limit {
                return Err(StructuralError { node: id, limit }.into());
            }
            chain.push(ancestor);
            current = self.node(ancestor)?.parent;
        }
        Ok(chain)
    }

    /// The widget and all its descendants in pre-order
    pub fn subtree(&self, id: WidgetId) -> Result<Vec<WidgetId>, TreeError> {
        self.node(id)?;
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Whether `node` is `root` or one of its descendants
    pub fn is_within(&self, node: WidgetId, root: WidgetId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &WidgetNode)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn detach(&mut self, id: WidgetId) {
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|child| *child != id);
            }
        }
    }
}
