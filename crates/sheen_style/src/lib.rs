//! Sheen Style Engine
//!
//! Style sheets for widget toolkits, in the familiar
//! `QPushButton#ok:hover { color: red; }` dialect:
//!
//! - **Parsing**: nom-based style sheet parser with positioned diagnostics;
//!   a malformed rule is skipped and parsing carries on
//! - **Selectors**: type, `*`, `#id`, attribute and pseudo-state predicates,
//!   descendant and child combinators, `::subcontrol` parts
//! - **Rule Store**: rules registered per scope (global, window, widget) and
//!   indexed by subject type and id
//! - **Cascade**: scope rank, then specificity, then registration order;
//!   lower-priority rules only fill what is still unset
//! - **Application**: per-target diffing so the toolkit only receives
//!   changed properties and one repaint per widget
//!
//! # Example
//!
//! ```rust
//! use sheen_core::{PseudoState, WidgetSpec};
//! use sheen_style::{EngineConfig, PropertyId, RecordingSink, Scope, StyleEngine};
//!
//! let mut engine = StyleEngine::new(EngineConfig::default(), RecordingSink::new());
//! engine
//!     .set_stylesheet(
//!         Scope::Global,
//!         "QPushButton { color: red; } QPushButton:hover { color: blue; }",
//!     )
//!     .unwrap();
//!
//! let button = engine.create_widget(WidgetSpec::new("QPushButton")).unwrap();
//! engine.set_state(button, PseudoState::Hover, true).unwrap();
//!
//! let color = engine.computed(button).and_then(|m| m.color(&PropertyId::Color));
//! assert_eq!(color, Some(sheen_core::Color::BLUE));
//! ```

pub mod apply;
pub mod cascade;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod properties;
pub mod rule;
pub mod selector;
pub mod store;
pub mod values;

pub use apply::{Applier, RecordingSink, SinkCall, StyleDelta, StyleSink, StyleTarget, TypeDefaults};
pub use cascade::{Cascade, Priority, RuleMatch};
pub use config::{EngineConfig, UnsupportedPropertyPolicy};
pub use diagnostics::{CssParseResult, ParseError, ParseErrorKind, Severity};
pub use engine::StyleEngine;
pub use error::StyleError;
pub use matcher::MatchContext;
pub use parser::{parse_inline, parse_selector, parse_stylesheet};
pub use properties::{PropertyId, PropertyMap};
pub use rule::{Declaration, Rule, Stylesheet};
pub use selector::{
    AttributeOp, AttributeSelector, Combinator, CompoundSelector, Selector, Specificity,
    StatePredicate,
};
pub use store::{RuleId, RuleStore, Scope, StoredRule};
pub use values::{Length, LengthUnit, Value, ValueKind};
