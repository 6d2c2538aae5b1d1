//! Selector model and specificity

use std::fmt;

use sheen_core::PseudoState;
use smallvec::SmallVec;

/// How a compound relates to the compound on its right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: the immediate parent
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name~="value"]`: value is one of the whitespace-separated words
    Includes(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: String,
    pub op: AttributeOp,
}

impl AttributeSelector {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttributeOp::Exists, Some(_)) => true,
            (AttributeOp::Equals(expected), Some(actual)) => actual == expected,
            (AttributeOp::Includes(word), Some(actual)) => {
                actual.split_whitespace().any(|w| w == word)
            }
        }
    }
}

/// `:state` or a negated `:!state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatePredicate {
    Is(PseudoState),
    Not(PseudoState),
}

impl StatePredicate {
    pub fn state(&self) -> &PseudoState {
        match self {
            StatePredicate::Is(state) | StatePredicate::Not(state) => state,
        }
    }
}

/// Simple selectors with no combinator between them: `QPushButton#ok[flat="true"]:hover`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// `None` is the universal selector `*`
    pub type_name: Option<String>,
    pub id: Option<String>,
    pub attributes: SmallVec<[AttributeSelector; 2]>,
    pub states: SmallVec<[StatePredicate; 2]>,
}

impl CompoundSelector {
    pub fn universal() -> Self {
        Self::default()
    }

    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_state(mut self, state: PseudoState) -> Self {
        self.states.push(StatePredicate::Is(state));
        self
    }

    pub fn specificity(&self) -> Specificity {
        Specificity {
            ids: u16::from(self.id.is_some()),
            classes: (self.attributes.len() + self.states.len()) as u16,
            types: u16::from(self.type_name.is_some()),
        }
    }
}

/// A complete selector: ancestor chain, subject compound, optional subcontrol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Ancestor compounds, outermost first, each with the combinator that
    /// joins it to the compound on its right
    pub ancestors: Vec<(CompoundSelector, Combinator)>,
    pub subject: CompoundSelector,
    /// `::part`
    pub subcontrol: Option<String>,
    inline: bool,
}

impl Selector {
    pub fn new(subject: CompoundSelector) -> Self {
        Self {
            ancestors: Vec::new(),
            subject,
            subcontrol: None,
            inline: false,
        }
    }

    /// Selector for a declaration-only style sheet set on one widget
    pub fn inline() -> Self {
        Self {
            inline: true,
            ..Self::new(CompoundSelector::universal())
        }
    }

    pub fn with_ancestor(mut self, ancestor: CompoundSelector, combinator: Combinator) -> Self {
        self.ancestors.push((ancestor, combinator));
        self
    }

    pub fn with_subcontrol(mut self, part: impl Into<String>) -> Self {
        self.subcontrol = Some(part.into());
        self
    }

    /// Inline rules style only the widget that owns them
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.subject.type_name.as_deref()
    }

    pub fn id_hint(&self) -> Option<&str> {
        self.subject.id.as_deref()
    }

    /// Whether the selector depends on anything above the subject
    pub fn has_ancestors(&self) -> bool {
        !self.ancestors.is_empty()
    }

    pub fn specificity(&self) -> Specificity {
        let mut specificity = self.subject.specificity();
        for (compound, _) in &self.ancestors {
            specificity = specificity + compound.specificity();
        }
        if self.subcontrol.is_some() {
            specificity.types += 1;
        }
        specificity
    }
}

/// `(ids, attributes + pseudo-states, types + subcontrol)`, compared
/// lexicographically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub types: u16,
}

impl Specificity {
    pub const fn new(ids: u16, classes: u16, types: u16) -> Self {
        Self {
            ids,
            classes,
            types,
        }
    }
}

impl std::ops::Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Specificity) -> Specificity {
        Specificity {
            ids: self.ids.saturating_add(rhs.ids),
            classes: self.classes.saturating_add(rhs.classes),
            types: self.types.saturating_add(rhs.types),
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ids, self.classes, self.types)
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(type_name) => f.write_str(type_name)?,
            None if self.id.is_none() && self.attributes.is_empty() && self.states.is_empty() => {
                f.write_str("*")?
            }
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for attr in &self.attributes {
            match &attr.op {
                AttributeOp::Exists => write!(f, "[{}]", attr.name)?,
                AttributeOp::Equals(value) => write!(f, "[{}=\"{}\"]", attr.name, value)?,
                AttributeOp::Includes(value) => write!(f, "[{}~=\"{}\"]", attr.name, value)?,
            }
        }
        for predicate in &self.states {
            match predicate {
                StatePredicate::Is(state) => write!(f, ":{}", state)?,
                StatePredicate::Not(state) => write!(f, ":!{}", state)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inline {
            return f.write_str("(inline)");
        }
        for (compound, combinator) in &self.ancestors {
            match combinator {
                Combinator::Descendant => write!(f, "{} ", compound)?,
                Combinator::Child => write!(f, "{} > ", compound)?,
            }
        }
        write!(f, "{}", self.subject)?;
        if let Some(part) = &self.subcontrol {
            write!(f, "::{}", part)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_outranks_any_number_of_types() {
        let id = Selector::new(CompoundSelector::universal().with_id("ok"));
        let types = Selector::new(CompoundSelector::of_type("QPushButton").with_state(PseudoState::Hover))
            .with_ancestor(CompoundSelector::of_type("QDialog"), Combinator::Descendant)
            .with_ancestor(CompoundSelector::of_type("QFrame"), Combinator::Child);
        assert!(id.specificity() > types.specificity());
    }

    #[test]
    fn test_subcontrol_counts_as_type() {
        let selector = Selector::new(CompoundSelector::of_type("QCheckBox"))
            .with_subcontrol("indicator");
        assert_eq!(selector.specificity(), Specificity::new(0, 0, 2));
    }

    #[test]
    fn test_display() {
        let selector = Selector::new(
            CompoundSelector::of_type("QPushButton")
                .with_id("ok")
                .with_state(PseudoState::Hover),
        )
        .with_ancestor(CompoundSelector::of_type("QDialog"), Combinator::Child);
        assert_eq!(selector.to_string(), "QDialog > QPushButton#ok:hover");
    }

    #[test]
    fn test_attribute_includes_matches_words() {
        let attr = AttributeSelector {
            name: "class".to_string(),
            op: AttributeOp::Includes("large".to_string()),
        };
        assert!(attr.matches(Some("primary large")));
        assert!(!attr.matches(Some("primary larger")));
        assert!(!attr.matches(None));
    }
}
