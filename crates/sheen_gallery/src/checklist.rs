//! Checkable list items
//!
//! The check state is data; the box glyph is derived from it when rendering
//! and the `checked` pseudo-state on the item's node follows it so style
//! sheets can react.

use std::fmt;

use sheen_core::{PseudoState, WidgetId, WidgetSpec};
use sheen_style::{StyleEngine, StyleSink};

use crate::error::GalleryError;

/// Widget type of checklist item nodes
pub const ITEM_TYPE: &str = "QListWidgetItem";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
}

impl CheckState {
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::Checked => CheckState::Unchecked,
        }
    }

    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }

    pub fn symbol(self) -> char {
        match self {
            CheckState::Unchecked => '□',
            CheckState::Checked => '☑',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub text: String,
    pub node: WidgetId,
    pub state: CheckState,
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state.symbol(), self.text)
    }
}

/// Items of one list widget
#[derive(Debug, Clone)]
pub struct Checklist {
    list: WidgetId,
    items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn new(list: WidgetId) -> Self {
        Self {
            list,
            items: Vec::new(),
        }
    }

    /// Create an unchecked item node under the list widget
    pub fn push<S: StyleSink>(
        &mut self,
        engine: &mut StyleEngine<S>,
        text: impl Into<String>,
    ) -> Result<usize, GalleryError> {
        let node = engine.create_widget(WidgetSpec::new(ITEM_TYPE).parent(self.list))?;
        self.items.push(ChecklistItem {
            text: text.into(),
            node,
            state: CheckState::Unchecked,
        });
        Ok(self.items.len() - 1)
    }

    /// Flip an item and mirror the result onto its node's `checked` state
    pub fn toggle<S: StyleSink>(
        &mut self,
        engine: &mut StyleEngine<S>,
        index: usize,
    ) -> Result<CheckState, GalleryError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(GalleryError::ItemOutOfRange { index, len })?;

        let state = item.state.toggled();
        engine.set_state(item.node, PseudoState::Checked, state.is_checked())?;
        item.state = state;
        Ok(state)
    }

    /// Check or uncheck every item
    pub fn set_all<S: StyleSink>(
        &mut self,
        engine: &mut StyleEngine<S>,
        state: CheckState,
    ) -> Result<(), GalleryError> {
        for item in &mut self.items {
            engine.set_state(item.node, PseudoState::Checked, state.is_checked())?;
            item.state = state;
        }
        Ok(())
    }

    pub fn render(&self, index: usize) -> Option<String> {
        self.items.get(index).map(ToString::to_string)
    }

    pub fn render_all(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }

    pub fn checked(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|item| item.state.is_checked())
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn list(&self) -> WidgetId {
        self.list
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
