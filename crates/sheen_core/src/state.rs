//! Interaction pseudo-states
//!
//! Every widget carries a [`StateSet`]: an independent bit per built-in state
//! plus a short sorted list of toolkit-specific custom states. States are not
//! mutually exclusive; `Pressed` does not clear `Hover`. The only interaction
//! between them is [`StateRules`]: while `Disabled` is set, the suppressed
//! states (hover and pressed by default) stay recorded but drop out of the
//! *effective* set used for selector matching, so re-enabling a widget under
//! the pointer restores its hover look.
//!
//! [`StateTracker`] applies edits to the tree and remembers the effective set
//! each touched widget had before its first edit. [`StateTracker::take_dirty`]
//! then reports only widgets whose effective set changed *net*, which is what
//! bounds re-resolution to one request per batch.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::events::{event_types, Event};
use crate::tree::{TreeError, WidgetId, WidgetTree};

/// An interaction pseudo-state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PseudoState {
    /// `:hover` - pointer is over the widget
    Hover,
    /// `:pressed` (alias `:active`) - pointer or activation key is down
    Pressed,
    /// `:focus` - widget has keyboard focus
    Focus,
    /// `:checked` - checkable widget is on
    Checked,
    /// `:disabled` - widget does not accept input
    Disabled,
    /// `:read-only` - editable widget is read-only
    ReadOnly,
    /// `:selected` - tab or item is selected
    Selected,
    /// Any other state the toolkit chooses to set, lower-cased
    Custom(Box<str>),
}

impl PseudoState {
    /// Built-in states in bit order
    pub const BUILTIN: [PseudoState; 7] = [
        PseudoState::Hover,
        PseudoState::Pressed,
        PseudoState::Focus,
        PseudoState::Checked,
        PseudoState::Disabled,
        PseudoState::ReadOnly,
        PseudoState::Selected,
    ];

    /// Custom states that widget toolkits set on their own: orientation,
    /// item-view branch flags, tri-state checks and similar. Selectors using
    /// them are expected and parse without a warning.
    pub const TOOLKIT_STATES: &'static [&'static str] = &[
        "adjoins-item",
        "alternate",
        "bottom",
        "closable",
        "closed",
        "default",
        "editable",
        "exclusive",
        "first",
        "flat",
        "floatable",
        "has-children",
        "has-siblings",
        "horizontal",
        "indeterminate",
        "last",
        "left",
        "maximized",
        "middle",
        "minimized",
        "movable",
        "next-selected",
        "no-frame",
        "non-exclusive",
        "off",
        "on",
        "only-one",
        "open",
        "previous-selected",
        "right",
        "top",
        "unchecked",
        "vertical",
        "window",
    ];

    /// Parse a built-in state name, accepting the usual aliases
    pub fn builtin(name: &str) -> Option<Self> {
        let state = match name.to_ascii_lowercase().as_str() {
            "hover" => PseudoState::Hover,
            "pressed" | "active" => PseudoState::Pressed,
            "focus" | "focused" => PseudoState::Focus,
            "checked" => PseudoState::Checked,
            "disabled" => PseudoState::Disabled,
            "read-only" | "readonly" => PseudoState::ReadOnly,
            "selected" => PseudoState::Selected,
            _ => return None,
        };
        Some(state)
    }

    /// Parse any state name; unknown names become [`PseudoState::Custom`]
    pub fn parse(name: &str) -> Self {
        Self::builtin(name)
            .unwrap_or_else(|| PseudoState::Custom(name.to_ascii_lowercase().into_boxed_str()))
    }

    /// Canonical pseudo-class name (without the leading colon)
    pub fn name(&self) -> &str {
        match self {
            PseudoState::Hover => "hover",
            PseudoState::Pressed => "pressed",
            PseudoState::Focus => "focus",
            PseudoState::Checked => "checked",
            PseudoState::Disabled => "disabled",
            PseudoState::ReadOnly => "read-only",
            PseudoState::Selected => "selected",
            PseudoState::Custom(name) => name,
        }
    }

    /// Whether this is a custom state listed in [`Self::TOOLKIT_STATES`]
    pub fn is_toolkit_state(&self) -> bool {
        match self {
            PseudoState::Custom(name) => Self::TOOLKIT_STATES.binary_search(&&**name).is_ok(),
            _ => false,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, PseudoState::Custom(_))
    }

    fn bit(&self) -> Option<u8> {
        let index = match self {
            PseudoState::Hover => 0,
            PseudoState::Pressed => 1,
            PseudoState::Focus => 2,
            PseudoState::Checked => 3,
            PseudoState::Disabled => 4,
            PseudoState::ReadOnly => 5,
            PseudoState::Selected => 6,
            PseudoState::Custom(_) => return None,
        };
        Some(1 << index)
    }
}

impl fmt::Display for PseudoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PseudoState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Set of active pseudo-states
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: u8,
    /// Sorted, deduplicated
    custom: SmallVec<[Box<str>; 2]>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, state: &PseudoState) -> bool {
        match (state.bit(), state) {
            (Some(bit), _) => self.bits & bit != 0,
            (None, PseudoState::Custom(name)) => self.custom_index(name).is_ok(),
            (None, _) => false,
        }
    }

    /// Add a state, returning true if it was not already present
    pub fn insert(&mut self, state: PseudoState) -> bool {
        match (state.bit(), state) {
            (Some(bit), _) => {
                let added = self.bits & bit == 0;
                self.bits |= bit;
                added
            }
            (None, PseudoState::Custom(name)) => match self.custom_index(&name) {
                Ok(_) => false,
                Err(index) => {
                    self.custom.insert(index, name);
                    true
                }
            },
            (None, _) => false,
        }
    }

    /// Remove a state, returning true if it was present
    pub fn remove(&mut self, state: &PseudoState) -> bool {
        match (state.bit(), state) {
            (Some(bit), _) => {
                let removed = self.bits & bit != 0;
                self.bits &= !bit;
                removed
            }
            (None, PseudoState::Custom(name)) => match self.custom_index(name) {
                Ok(index) => {
                    self.custom.remove(index);
                    true
                }
                Err(_) => false,
            },
            (None, _) => false,
        }
    }

    /// Set or clear a state, returning true if the set changed
    pub fn set(&mut self, state: PseudoState, active: bool) -> bool {
        if active {
            self.insert(state)
        } else {
            self.remove(&state)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0 && self.custom.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize + self.custom.len()
    }

    /// Built-in states in bit order, then custom states alphabetically
    pub fn iter(&self) -> impl Iterator<Item = PseudoState> + '_ {
        PseudoState::BUILTIN
            .into_iter()
            .filter(move |state| self.contains(state))
            .chain(
                self.custom
                    .iter()
                    .map(|name| PseudoState::Custom(name.clone())),
            )
    }

    /// States in `self` that are not in `other`
    pub fn difference(&self, other: &StateSet) -> StateSet {
        StateSet {
            bits: self.bits & !other.bits,
            custom: self
                .custom
                .iter()
                .filter(|name| other.custom_index(name).is_err())
                .cloned()
                .collect(),
        }
    }

    fn custom_index(&self, name: &str) -> Result<usize, usize> {
        self.custom.binary_search_by(|entry| entry.as_ref().cmp(name))
    }
}

impl FromIterator<PseudoState> for StateSet {
    fn from_iter<I: IntoIterator<Item = PseudoState>>(iter: I) -> Self {
        let mut set = StateSet::new();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<String> = self.iter().map(|s| s.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Interaction rules between states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRules {
    suppressed_when_disabled: StateSet,
}

impl StateRules {
    pub fn new(suppressed_when_disabled: impl IntoIterator<Item = PseudoState>) -> Self {
        Self {
            suppressed_when_disabled: suppressed_when_disabled.into_iter().collect(),
        }
    }

    pub fn suppressed_when_disabled(&self) -> &StateSet {
        &self.suppressed_when_disabled
    }

    /// The states selector matching sees for a widget with `raw` states
    pub fn effective(&self, raw: &StateSet) -> StateSet {
        if raw.contains(&PseudoState::Disabled) {
            raw.difference(&self.suppressed_when_disabled)
        } else {
            raw.clone()
        }
    }
}

impl Default for StateRules {
    fn default() -> Self {
        Self::new([PseudoState::Hover, PseudoState::Pressed])
    }
}

/// Mutable view of one widget's states during a batch
pub struct StateEditor<'a> {
    states: &'a mut StateSet,
}

impl StateEditor<'_> {
    pub fn set(&mut self, state: PseudoState, active: bool) -> bool {
        self.states.set(state, active)
    }

    /// Flip a state and return its new value
    pub fn toggle(&mut self, state: PseudoState) -> bool {
        let active = !self.states.contains(&state);
        self.states.set(state, active);
        active
    }

    pub fn contains(&self, state: &PseudoState) -> bool {
        self.states.contains(state)
    }
}

/// Applies state edits and tracks which widgets need re-resolution
#[derive(Debug, Default)]
pub struct StateTracker {
    rules: StateRules,
    /// Effective states before the first edit since the last flush
    baseline: FxHashMap<WidgetId, StateSet>,
}

impl StateTracker {
    pub fn new(rules: StateRules) -> Self {
        Self {
            rules,
            baseline: FxHashMap::default(),
        }
    }

    pub fn rules(&self) -> &StateRules {
        &self.rules
    }

    /// Effective states of a widget
    pub fn effective_states(&self, tree: &WidgetTree, id: WidgetId) -> Result<StateSet, TreeError> {
        Ok(self.rules.effective(tree.node(id)?.states()))
    }

    /// Set one state. Returns false (and records nothing) when the state
    /// already had the requested value.
    pub fn set_state(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        state: PseudoState,
        active: bool,
    ) -> Result<bool, TreeError> {
        self.update_states(tree, id, |editor| {
            editor.set(state, active);
        })
    }

    /// Apply several edits to one widget as a single batch
    pub fn update_states<F>(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        edit: F,
    ) -> Result<bool, TreeError>
    where
        F: FnOnce(&mut StateEditor<'_>),
    {
        let states = tree.states_mut(id)?;
        let before = states.clone();
        edit(&mut StateEditor { states });
        if *states == before {
            return Ok(false);
        }
        trace!(widget = ?id, from = %before, to = %states, "pseudo-states changed");

        let baseline = self.rules.effective(&before);
        self.baseline.entry(id).or_insert(baseline);
        Ok(true)
    }

    /// Translate a toolkit event into state edits
    pub fn handle_event(&mut self, tree: &mut WidgetTree, event: &Event) -> Result<bool, TreeError> {
        use event_types::*;

        let target = event.target;
        let flag = event.flag();
        match event.event_type {
            POINTER_ENTER => self.set_state(tree, target, PseudoState::Hover, true),
            POINTER_LEAVE => self.update_states(tree, target, |s| {
                s.set(PseudoState::Hover, false);
                s.set(PseudoState::Pressed, false);
            }),
            POINTER_DOWN => self.update_states(tree, target, |s| {
                s.set(PseudoState::Hover, true);
                s.set(PseudoState::Pressed, true);
            }),
            POINTER_UP => self.set_state(tree, target, PseudoState::Pressed, false),
            FOCUS => self.set_state(tree, target, PseudoState::Focus, true),
            BLUR => self.update_states(tree, target, |s| {
                s.set(PseudoState::Focus, false);
                s.set(PseudoState::Pressed, false);
            }),
            KEY_DOWN if event.key_code().activates() => {
                self.set_state(tree, target, PseudoState::Pressed, true)
            }
            KEY_UP if event.key_code().activates() => {
                self.set_state(tree, target, PseudoState::Pressed, false)
            }
            TOGGLE => self.update_states(tree, target, |s| match flag {
                Some(checked) => {
                    s.set(PseudoState::Checked, checked);
                }
                None => {
                    s.toggle(PseudoState::Checked);
                }
            }),
            ENABLED_CHANGED => match flag {
                Some(enabled) => self.set_state(tree, target, PseudoState::Disabled, !enabled),
                None => Ok(false),
            },
            SELECTION_CHANGED => match flag {
                Some(selected) => self.set_state(tree, target, PseudoState::Selected, selected),
                None => Ok(false),
            },
            _ => Ok(false),
        }
    }

    /// Whether any edit is waiting to be flushed
    pub fn has_pending(&self) -> bool {
        !self.baseline.is_empty()
    }

    /// Drain the widgets whose effective states differ from their value
    /// before the first edit since the last call. Destroyed widgets are
    /// dropped silently.
    pub fn take_dirty(&mut self, tree: &WidgetTree) -> Vec<WidgetId> {
        let baseline = std::mem::take(&mut self.baseline);
        let mut dirty: Vec<WidgetId> = baseline
            .into_iter()
            .filter_map(|(id, before)| {
                let node = tree.get(id)?;
                (self.rules.effective(node.states()) != before).then_some(id)
            })
            .collect();
        dirty.sort_unstable();
        dirty
    }

    /// Drop pending bookkeeping for a destroyed widget
    pub fn forget(&mut self, id: WidgetId) {
        self.baseline.remove(&id);
    }
}
