//! Style application
//!
//! The applier remembers the map last handed to the toolkit for every
//! (widget, part) target and only forwards the difference. Properties that
//! disappear from a widget's computed style are set back to the widget
//! type's default; the toolkit is never asked to "unset" anything.

use std::fmt;

use rustc_hash::FxHashMap;
use sheen_core::WidgetId;
use tracing::trace;

use crate::properties::{PropertyId, PropertyMap};
use crate::values::Value;

/// A widget body or one of its subcontrols
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleTarget {
    pub node: WidgetId,
    pub part: Option<String>,
}

impl StyleTarget {
    pub fn body(node: WidgetId) -> Self {
        Self { node, part: None }
    }

    pub fn part(node: WidgetId, part: impl Into<String>) -> Self {
        Self {
            node,
            part: Some(part.into()),
        }
    }
}

impl fmt::Display for StyleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            Some(part) => write!(f, "{:?}::{}", self.node, part),
            None => write!(f, "{:?}", self.node),
        }
    }
}

/// The toolkit's primitive style setters
pub trait StyleSink {
    fn set_property(&mut self, target: &StyleTarget, property: &PropertyId, value: &Value);

    fn request_repaint(&mut self, node: WidgetId);
}

/// One call made on a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Set {
        target: StyleTarget,
        property: PropertyId,
        value: Value,
    },
    Repaint(WidgetId),
}

/// Sink that records every call, for tests and dry runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn repaints(&self) -> Vec<WidgetId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Repaint(node) => Some(*node),
                SinkCall::Set { .. } => None,
            })
            .collect()
    }

    /// `(property name, value)` for every set call, in call order
    pub fn sets(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Set {
                    property, value, ..
                } => Some((property.name().to_string(), value.to_string())),
                SinkCall::Repaint(_) => None,
            })
            .collect()
    }
}

impl StyleSink for RecordingSink {
    fn set_property(&mut self, target: &StyleTarget, property: &PropertyId, value: &Value) {
        self.calls.push(SinkCall::Set {
            target: target.clone(),
            property: property.clone(),
            value: value.clone(),
        });
    }

    fn request_repaint(&mut self, node: WidgetId) {
        self.calls.push(SinkCall::Repaint(node));
    }
}

impl<S: StyleSink + ?Sized> StyleSink for &mut S {
    fn set_property(&mut self, target: &StyleTarget, property: &PropertyId, value: &Value) {
        (**self).set_property(target, property, value);
    }

    fn request_repaint(&mut self, node: WidgetId) {
        (**self).request_repaint(node);
    }
}

/// Per-type default values restored when a property stops being styled
#[derive(Debug, Clone, Default)]
pub struct TypeDefaults {
    by_type: FxHashMap<String, PropertyMap>,
}

impl TypeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, type_name: impl Into<String>, property: PropertyId, value: Value) {
        self.by_type
            .entry(type_name.into())
            .or_default()
            .insert(property, value);
    }

    pub fn with(mut self, type_name: impl Into<String>, property: PropertyId, value: Value) -> Self {
        self.set(type_name, property, value);
        self
    }

    /// Default for `property` on widgets of `type_name`
    pub fn value_for(&self, type_name: &str, property: &PropertyId) -> Value {
        self.by_type
            .get(type_name)
            .and_then(|defaults| defaults.get(property))
            .cloned()
            .unwrap_or_else(|| property.initial_value())
    }
}

/// What one application changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDelta {
    /// Added or changed properties
    pub set: Vec<PropertyId>,
    /// Properties restored to their default
    pub reset: Vec<PropertyId>,
}

impl StyleDelta {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.reset.is_empty()
    }

    pub fn len(&self) -> usize {
        self.set.len() + self.reset.len()
    }
}

/// Remembers what was applied to every target, grouped by widget
#[derive(Debug, Default)]
pub struct Applier {
    applied: FxHashMap<WidgetId, FxHashMap<Option<String>, PropertyMap>>,
}

impl Applier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward the difference between the last applied map and `computed`.
    /// Does not request a repaint; the caller batches that per widget.
    pub fn apply<S: StyleSink + ?Sized>(
        &mut self,
        sink: &mut S,
        defaults: &TypeDefaults,
        type_name: &str,
        target: &StyleTarget,
        computed: PropertyMap,
    ) -> StyleDelta {
        let mut delta = StyleDelta::default();
        let previous = self.applied(target);

        for (property, value) in computed.iter() {
            if previous.and_then(|map| map.get(property)) != Some(value) {
                sink.set_property(target, property, value);
                delta.set.push(property.clone());
            }
        }
        if let Some(previous) = previous {
            for property in previous.keys() {
                if !computed.contains(property) {
                    let value = defaults.value_for(type_name, property);
                    sink.set_property(target, property, &value);
                    delta.reset.push(property.clone());
                }
            }
        }

        if !delta.is_empty() {
            trace!(%target, set = delta.set.len(), reset = delta.reset.len(), "applied style delta");
        }
        if computed.is_empty() {
            if let Some(targets) = self.applied.get_mut(&target.node) {
                targets.remove(&target.part);
                if targets.is_empty() {
                    self.applied.remove(&target.node);
                }
            }
        } else {
            self.applied
                .entry(target.node)
                .or_default()
                .insert(target.part.clone(), computed);
        }
        delta
    }

    pub fn applied(&self, target: &StyleTarget) -> Option<&PropertyMap> {
        self.applied
            .get(&target.node)
            .and_then(|targets| targets.get(&target.part))
    }

    /// Parts of `node` that currently carry an applied style
    pub fn applied_parts(&self, node: WidgetId) -> Vec<String> {
        let mut parts: Vec<String> = self
            .applied
            .get(&node)
            .into_iter()
            .flat_map(|targets| targets.keys())
            .filter_map(Clone::clone)
            .collect();
        parts.sort_unstable();
        parts
    }

    /// Drop everything remembered for a destroyed widget
    pub fn forget_node(&mut self, node: WidgetId) {
        self.applied.remove(&node);
    }
}
