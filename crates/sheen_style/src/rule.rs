//! Rules and style sheets

use crate::config::UnsupportedPropertyPolicy;
use crate::diagnostics::{CssParseResult, ParseError};
use crate::properties::PropertyId;
use crate::selector::Selector;
use crate::values::Value;

/// One `property: value` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: Value,
}

impl Declaration {
    pub fn new(property: PropertyId, value: Value) -> Self {
        Self { property, value }
    }
}

/// A selector with its declarations, immutable once parsed
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    selector: Selector,
    declarations: Vec<Declaration>,
    /// Position within the source sheet
    source_order: u32,
}

impl Rule {
    pub fn new(selector: Selector, declarations: Vec<Declaration>) -> Self {
        Self {
            selector,
            declarations,
            source_order: 0,
        }
    }

    pub(crate) fn with_source_order(mut self, source_order: u32) -> Self {
        self.source_order = source_order;
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Declarations in source order; a later one overrides an earlier one
    /// for the same property
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn source_order(&self) -> u32 {
        self.source_order
    }
}

/// Rules in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a style sheet, collecting diagnostics. Unsupported properties
    /// are dropped with a warning.
    pub fn parse_with_errors(css: &str) -> CssParseResult {
        crate::parser::parse_stylesheet(css, UnsupportedPropertyPolicy::Warn)
    }

    pub fn parse_with_policy(css: &str, policy: UnsupportedPropertyPolicy) -> CssParseResult {
        crate::parser::parse_stylesheet(css, policy)
    }

    /// Parse a style sheet, failing on the first error-severity diagnostic.
    /// Warnings are logged.
    #[allow(clippy::result_large_err)]
    pub fn parse(css: &str) -> Result<Self, ParseError> {
        let result = Self::parse_with_errors(css);
        result.log_diagnostics();

        match result.errors.into_iter().find(ParseError::is_error) {
            Some(err) => Err(err),
            None => Ok(result.stylesheet),
        }
    }

    /// Parse the style sheet of a single widget. Text with braces is a full
    /// sheet; anything else is a declaration list that styles only that
    /// widget.
    pub fn parse_widget_sheet(css: &str, policy: UnsupportedPropertyPolicy) -> CssParseResult {
        if css.contains('{') {
            crate::parser::parse_stylesheet(css, policy)
        } else {
            crate::parser::parse_inline(css, policy)
        }
    }

    pub fn push(&mut self, rule: Rule) {
        let order = self.rules.len() as u32;
        self.rules.push(rule.with_source_order(order));
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append another sheet's rules after this one's
    pub fn merge(&mut self, other: Stylesheet) {
        for rule in other.rules {
            self.push(rule);
        }
    }
}
