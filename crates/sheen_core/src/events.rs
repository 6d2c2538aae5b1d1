//! Toolkit events consumed by the state tracker
//!
//! The toolkit owns hit-testing and focus management; it forwards the
//! resulting events here and the tracker turns them into pseudo-state edits.

use crate::tree::WidgetId;

/// Event type identifier
pub type EventType = u32;

/// Event types the tracker understands
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;
    pub const KEY_DOWN: EventType = 20;
    pub const KEY_UP: EventType = 21;

    // Widget model changes
    /// Checkable widget toggled (check box, radio button, checkable list item)
    pub const TOGGLE: EventType = 90;
    /// Widget enabled/disabled by the application
    pub const ENABLED_CHANGED: EventType = 91;
    /// Item or tab selection changed
    pub const SELECTION_CHANGED: EventType = 92;
}

/// A UI event aimed at one widget
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: WidgetId,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Key {
        key: KeyCode,
    },
    /// New value of a boolean widget property; `None` flips the current one
    Flag(Option<bool>),
    None,
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);

    pub const UNKNOWN: KeyCode = KeyCode(0);

    /// Keys that press a focused button
    pub fn activates(&self) -> bool {
        *self == KeyCode::SPACE || *self == KeyCode::ENTER
    }
}

impl Event {
    pub fn new(event_type: EventType, target: WidgetId) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
        }
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    pub fn key(event_type: EventType, target: WidgetId, key: KeyCode) -> Self {
        Self::new(event_type, target).with_data(EventData::Key { key })
    }

    /// Toggle a checkable widget; `None` flips the current checked state
    pub fn toggle(target: WidgetId, checked: Option<bool>) -> Self {
        Self::new(event_types::TOGGLE, target).with_data(EventData::Flag(checked))
    }

    pub fn enabled(target: WidgetId, enabled: bool) -> Self {
        Self::new(event_types::ENABLED_CHANGED, target).with_data(EventData::Flag(Some(enabled)))
    }

    pub fn selected(target: WidgetId, selected: bool) -> Self {
        Self::new(event_types::SELECTION_CHANGED, target)
            .with_data(EventData::Flag(Some(selected)))
    }

    /// Boolean payload, if this event carries one
    pub fn flag(&self) -> Option<bool> {
        match self.data {
            EventData::Flag(flag) => flag,
            _ => None,
        }
    }

    pub fn key_code(&self) -> KeyCode {
        match self.data {
            EventData::Key { key } => key,
            _ => KeyCode::UNKNOWN,
        }
    }
}
