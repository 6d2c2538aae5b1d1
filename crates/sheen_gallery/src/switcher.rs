//! Swapping a widget's style sheet between the variants of its kind

use sheen_core::WidgetId;
use sheen_style::{ParseError, Scope, StyleEngine, StyleSink};
use tracing::debug;

use crate::catalog::{StyleVariant, WidgetKind};
use crate::error::GalleryError;

/// A widget bound to one gallery kind
#[derive(Debug, Clone)]
pub struct StyleSwitcher<'g> {
    kind: &'g WidgetKind,
    widget: WidgetId,
    current: Option<usize>,
}

impl<'g> StyleSwitcher<'g> {
    pub fn new(kind: &'g WidgetKind, widget: WidgetId) -> Self {
        Self {
            kind,
            widget,
            current: None,
        }
    }

    /// Replace the widget's sheet with variant `index`. Out-of-range indices
    /// leave the current sheet in place.
    pub fn select<S: StyleSink>(
        &mut self,
        engine: &mut StyleEngine<S>,
        index: usize,
    ) -> Result<Vec<ParseError>, GalleryError> {
        let variant = self.kind.variant(index)?;
        let diagnostics = engine.set_widget_stylesheet(self.widget, &variant.css)?;
        self.current = Some(index);
        debug!(kind = %self.kind.key, variant = %variant.key, "switched widget style");
        Ok(diagnostics)
    }

    /// Drop the widget's sheet
    pub fn clear<S: StyleSink>(&mut self, engine: &mut StyleEngine<S>) -> Result<(), GalleryError> {
        engine.clear_scope(Scope::Widget(self.widget))?;
        self.current = None;
        Ok(())
    }

    pub fn kind(&self) -> &'g WidgetKind {
        self.kind
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_variant(&self) -> Option<&'g StyleVariant> {
        self.current.and_then(|index| self.kind.variants.get(index))
    }
}
