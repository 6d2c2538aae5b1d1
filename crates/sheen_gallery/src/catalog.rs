//! The gallery catalog: widget kinds and their style variants

use rustc_hash::FxHashSet;
use serde::Deserialize;
use tracing::debug;

use crate::error::GalleryError;
use crate::locale::{Locale, LocalizedText};

const EMBEDDED: &str = include_str!("../assets/gallery.yaml");

/// One canned style sheet for a widget kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleVariant {
    pub key: String,
    pub label: LocalizedText,
    #[serde(default)]
    pub note: Option<LocalizedText>,
    pub css: String,
}

impl StyleVariant {
    pub fn label(&self, locale: Locale) -> &str {
        self.label.get(locale)
    }

    pub fn note(&self, locale: Locale) -> Option<&str> {
        self.note.as_ref().map(|note| note.get(locale))
    }
}

/// A widget type with its ordered variants
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WidgetKind {
    pub key: String,
    /// Type name the variants are set on
    pub widget: String,
    pub label: LocalizedText,
    pub variants: Vec<StyleVariant>,
}

impl WidgetKind {
    pub fn label(&self, locale: Locale) -> &str {
        self.label.get(locale)
    }

    pub fn variant(&self, index: usize) -> Result<&StyleVariant, GalleryError> {
        self.variants
            .get(index)
            .ok_or_else(|| GalleryError::VariantOutOfRange {
                kind: self.key.clone(),
                index,
                len: self.variants.len(),
            })
    }

    pub fn variant_by_key(&self, key: &str) -> Option<(usize, &StyleVariant)> {
        self.variants
            .iter()
            .enumerate()
            .find(|(_, variant)| variant.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobalTheme {
    pub label: LocalizedText,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gallery {
    pub global: GlobalTheme,
    pub kinds: Vec<WidgetKind>,
}

impl Gallery {
    /// The catalog compiled into the crate
    pub fn embedded() -> Result<Self, GalleryError> {
        Self::from_yaml(EMBEDDED)
    }

    pub fn from_yaml(src: &str) -> Result<Self, GalleryError> {
        let gallery: Gallery = serde_yaml::from_str(src)?;
        gallery.validate()?;
        debug!(kinds = gallery.kinds.len(), "loaded style gallery");
        Ok(gallery)
    }

    pub fn kinds(&self) -> &[WidgetKind] {
        &self.kinds
    }

    pub fn kind(&self, key: &str) -> Result<&WidgetKind, GalleryError> {
        self.kinds
            .iter()
            .find(|kind| kind.key == key)
            .ok_or_else(|| GalleryError::UnknownKind(key.to_string()))
    }

    pub fn global_css(&self) -> &str {
        &self.global.css
    }

    fn validate(&self) -> Result<(), GalleryError> {
        let mut kinds = FxHashSet::default();
        for kind in &self.kinds {
            if !kinds.insert(kind.key.as_str()) {
                return Err(GalleryError::Catalog(format!(
                    "duplicate kind `{}`",
                    kind.key
                )));
            }
            if kind.variants.is_empty() {
                return Err(GalleryError::Catalog(format!(
                    "kind `{}` has no variants",
                    kind.key
                )));
            }
            let mut variants = FxHashSet::default();
            for variant in &kind.variants {
                if !variants.insert(variant.key.as_str()) {
                    return Err(GalleryError::Catalog(format!(
                        "duplicate variant `{}` in `{}`",
                        variant.key, kind.key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
global:
  label: { en: Theme }
  css: "QLabel { color: red; }"
kinds:
  - key: labels
    widget: QLabel
    label: { en: Labels, zh: 标签 }
    variants:
      - key: red
        label: { en: Red }
        css: "color: red;"
"#;

    #[test]
    fn test_from_yaml() {
        let gallery = Gallery::from_yaml(SMALL).unwrap();
        let kind = gallery.kind("labels").unwrap();
        assert_eq!(kind.widget, "QLabel");
        assert_eq!(kind.label(Locale::Zh), "标签");
        assert_eq!(kind.variant(0).unwrap().label(Locale::Zh), "Red");
        assert_eq!(kind.variant(0).unwrap().note(Locale::En), None);
        assert!(matches!(
            kind.variant(1),
            Err(GalleryError::VariantOutOfRange { index: 1, len: 1, .. })
        ));
        assert!(matches!(
            gallery.kind("sliders"),
            Err(GalleryError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_variants() {
        let src = SMALL.replace(
            "        css: \"color: red;\"\n",
            "        css: \"color: red;\"\n      - key: red\n        label: { en: Again }\n        css: \"color: red;\"\n",
        );
        assert!(matches!(
            Gallery::from_yaml(&src),
            Err(GalleryError::Catalog(_))
        ));
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(
            Gallery::from_yaml("kinds: [unclosed"),
            Err(GalleryError::Yaml(_))
        ));
    }
}
