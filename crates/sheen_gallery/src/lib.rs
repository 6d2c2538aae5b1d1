//! Sheen Style Gallery
//!
//! A catalog of ready-made style sheets for common widget kinds (buttons,
//! check boxes, progress bars, tabs, lists, scroll bars) plus an
//! application-wide theme, with English and Chinese labels.
//!
//! - [`Gallery`]: the YAML catalog, embedded or loaded from a string
//! - [`StyleSwitcher`]: swaps a widget's sheet between the variants of its kind
//! - [`Checklist`]: checkable list items whose state drives `:checked`

pub mod catalog;
pub mod checklist;
pub mod error;
pub mod locale;
pub mod switcher;

pub use catalog::{Gallery, GlobalTheme, StyleVariant, WidgetKind};
pub use checklist::{CheckState, Checklist, ChecklistItem};
pub use error::GalleryError;
pub use locale::{Locale, LocalizedText};
pub use switcher::StyleSwitcher;
