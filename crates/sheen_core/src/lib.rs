//! Sheen Core Runtime
//!
//! This crate provides the toolkit-facing half of the Sheen style engine:
//!
//! - **Widget Tree**: the engine's mirror of the toolkit's widget hierarchy,
//!   kept in sync through lifecycle hooks (create, destroy, reparent)
//! - **Pseudo-States**: interaction states (hover, pressed, checked, ...) as a
//!   bit-set per widget
//! - **State Tracking**: idempotent state edits with net-change detection so
//!   a batch of edits requests at most one restyle
//! - **Event Mapping**: pointer, keyboard and toggle events turned into state
//!   edits
//!
//! # Example
//!
//! ```rust
//! use sheen_core::{PseudoState, StateTracker, WidgetSpec, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let window = tree.create(WidgetSpec::new("QMainWindow")).unwrap();
//! let button = tree
//!     .create(WidgetSpec::new("QPushButton").id("ok").parent(window))
//!     .unwrap();
//!
//! let mut tracker = StateTracker::default();
//! tracker.set_state(&mut tree, button, PseudoState::Hover, true).unwrap();
//!
//! // One net change, one restyle request
//! assert_eq!(tracker.take_dirty(&tree), vec![button]);
//! ```

pub mod color;
pub mod events;
pub mod state;
pub mod tree;

pub use color::Color;
pub use events::{Event, EventData, EventType, KeyCode};
pub use state::{PseudoState, StateEditor, StateRules, StateSet, StateTracker};
pub use tree::{StructuralError, TreeError, WidgetId, WidgetNode, WidgetSpec, WidgetTree};
