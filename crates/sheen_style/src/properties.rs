//! Supported properties and the computed property map

use std::fmt;

use indexmap::IndexMap;
use sheen_core::Color;

use crate::values::{Length, LengthUnit, Value, ValueKind};

macro_rules! properties {
    ($($variant:ident => $name:literal, $kind:ident;)*) => {
        /// A style property the engine knows how to hand to the toolkit
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum PropertyId {
            $($variant,)*
            /// Unknown property kept under the pass-through policy
            Custom(Box<str>),
        }

        impl PropertyId {
            /// Every built-in property
            pub const ALL: &'static [PropertyId] = &[$(PropertyId::$variant,)*];

            /// Look up a property by its (case-insensitive) name
            pub fn from_name(name: &str) -> Option<Self> {
                match name.to_ascii_lowercase().as_str() {
                    $($name => Some(PropertyId::$variant),)*
                    _ => None,
                }
            }

            pub fn name(&self) -> &str {
                match self {
                    $(PropertyId::$variant => $name,)*
                    PropertyId::Custom(name) => name,
                }
            }

            pub fn kind(&self) -> ValueKind {
                match self {
                    $(PropertyId::$variant => ValueKind::$kind,)*
                    PropertyId::Custom(_) => ValueKind::Any,
                }
            }
        }
    };
}

properties! {
    Background => "background", Brush;
    BackgroundColor => "background-color", Brush;
    BackgroundImage => "background-image", Any;
    BackgroundRepeat => "background-repeat", Keyword;
    BackgroundPosition => "background-position", Any;
    BackgroundOrigin => "background-origin", Keyword;
    AlternateBackgroundColor => "alternate-background-color", Brush;
    Color => "color", Brush;
    SelectionColor => "selection-color", Brush;
    SelectionBackgroundColor => "selection-background-color", Brush;
    GridlineColor => "gridline-color", Brush;

    Border => "border", Any;
    BorderTop => "border-top", Any;
    BorderRight => "border-right", Any;
    BorderBottom => "border-bottom", Any;
    BorderLeft => "border-left", Any;
    BorderColor => "border-color", Brush;
    BorderWidth => "border-width", Lengths;
    BorderStyle => "border-style", Keyword;
    BorderTopColor => "border-top-color", Brush;
    BorderRightColor => "border-right-color", Brush;
    BorderBottomColor => "border-bottom-color", Brush;
    BorderLeftColor => "border-left-color", Brush;
    BorderTopWidth => "border-top-width", Length;
    BorderRightWidth => "border-right-width", Length;
    BorderBottomWidth => "border-bottom-width", Length;
    BorderLeftWidth => "border-left-width", Length;
    BorderTopStyle => "border-top-style", Keyword;
    BorderRightStyle => "border-right-style", Keyword;
    BorderBottomStyle => "border-bottom-style", Keyword;
    BorderLeftStyle => "border-left-style", Keyword;
    BorderImage => "border-image", Any;
    BorderRadius => "border-radius", Lengths;
    BorderTopLeftRadius => "border-top-left-radius", Lengths;
    BorderTopRightRadius => "border-top-right-radius", Lengths;
    BorderBottomLeftRadius => "border-bottom-left-radius", Lengths;
    BorderBottomRightRadius => "border-bottom-right-radius", Lengths;
    Outline => "outline", Any;

    Padding => "padding", Lengths;
    PaddingTop => "padding-top", Length;
    PaddingRight => "padding-right", Length;
    PaddingBottom => "padding-bottom", Length;
    PaddingLeft => "padding-left", Length;
    Margin => "margin", Lengths;
    MarginTop => "margin-top", Length;
    MarginRight => "margin-right", Length;
    MarginBottom => "margin-bottom", Length;
    MarginLeft => "margin-left", Length;
    Spacing => "spacing", Length;

    Width => "width", Length;
    Height => "height", Length;
    MinWidth => "min-width", Length;
    MinHeight => "min-height", Length;
    MaxWidth => "max-width", Length;
    MaxHeight => "max-height", Length;
    Position => "position", Keyword;
    Top => "top", Length;
    Right => "right", Length;
    Bottom => "bottom", Length;
    Left => "left", Length;

    Font => "font", Any;
    FontFamily => "font-family", Any;
    FontSize => "font-size", Length;
    FontStyle => "font-style", Keyword;
    FontWeight => "font-weight", Keyword;
    LineHeight => "line-height", Any;
    TextAlign => "text-align", Keyword;
    TextDecoration => "text-decoration", Keyword;

    Image => "image", Any;
    Opacity => "opacity", Number;
    SubcontrolOrigin => "subcontrol-origin", Keyword;
    SubcontrolPosition => "subcontrol-position", Any;
}

impl PropertyId {
    pub fn is_custom(&self) -> bool {
        matches!(self, PropertyId::Custom(_))
    }

    /// Value a property falls back to when no rule and no type default sets it
    pub fn initial_value(&self) -> Value {
        let keyword = |k: &str| Value::Keyword(k.to_string());

        match self {
            PropertyId::Color | PropertyId::SelectionColor => Value::Color(Color::BLACK),
            PropertyId::SelectionBackgroundColor => Value::Color(Color::from_hex(0x3399FF)),
            PropertyId::Opacity => Value::Number(1.0),
            PropertyId::FontWeight | PropertyId::FontStyle => keyword("normal"),
            PropertyId::TextAlign => keyword("left"),
            PropertyId::Position => keyword("static"),
            PropertyId::BackgroundRepeat => keyword("repeat"),
            PropertyId::BackgroundOrigin | PropertyId::SubcontrolOrigin => keyword("padding"),
            PropertyId::FontSize => Value::Length(Length::new(9.0, LengthUnit::Pt)),
            PropertyId::MaxWidth | PropertyId::MaxHeight => {
                Value::Length(Length::px(16_777_215.0))
            }
            _ => match self.kind() {
                ValueKind::Brush => Value::Color(Color::TRANSPARENT),
                ValueKind::Length | ValueKind::Lengths => Value::Length(Length::ZERO),
                ValueKind::Number => Value::Number(0.0),
                ValueKind::Keyword | ValueKind::Any => keyword("none"),
            },
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered map of computed properties
///
/// Resolution inserts in priority order; [`PropertyMap::sort_canonical`]
/// then orders keys by name so equal maps print identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: IndexMap<PropertyId, Value>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: PropertyId, value: Value) -> Option<Value> {
        self.entries.insert(property, value)
    }

    /// Set a property only if it is not set yet; returns true if it was set
    pub fn fill(&mut self, property: &PropertyId, value: &Value) -> bool {
        if self.entries.contains_key(property) {
            return false;
        }
        self.entries.insert(property.clone(), value.clone());
        true
    }

    pub fn get(&self, property: &PropertyId) -> Option<&Value> {
        self.entries.get(property)
    }

    /// Convenience lookup by property name
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(property, _)| property.name().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn color(&self, property: &PropertyId) -> Option<Color> {
        self.get(property).and_then(Value::as_color)
    }

    pub fn contains(&self, property: &PropertyId) -> bool {
        self.entries.contains_key(property)
    }

    pub fn remove(&mut self, property: &PropertyId) -> Option<Value> {
        self.entries.shift_remove(property)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyId> {
        self.entries.keys()
    }

    pub fn sort_canonical(&mut self) {
        self.entries.sort_by(|a, _, b, _| a.name().cmp(b.name()));
    }
}

impl FromIterator<(PropertyId, Value)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (PropertyId, Value)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (property, value) in iter {
            map.insert(property, value);
        }
        map
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (property, value) in &self.entries {
            writeln!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}
