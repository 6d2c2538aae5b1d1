//! Parse diagnostics
//!
//! Parsing never aborts a whole sheet. Every problem becomes a [`ParseError`]
//! with a position and a severity; `Error` means rules were lost, `Warning`
//! means a declaration was dropped or reinterpreted.

use std::fmt;

use nom::error::{VerboseError, VerboseErrorKind};
use nom::Offset;
use tracing::{debug, warn};

use crate::rule::Stylesheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// A rule was skipped
    Error,
    /// A declaration was dropped or reinterpreted
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed selector, block or declaration; the rule is skipped
    Syntax,
    /// Property the engine does not know
    UnsupportedProperty,
    /// Known property with a value of the wrong shape
    InvalidValue,
    /// State name that is not one of the built-in pseudo-states
    UnknownPseudoState,
}

/// A positioned parse diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub severity: Severity,
    pub message: String,
    /// 1-based
    pub line: usize,
    /// 1-based, counted in characters
    pub column: usize,
    /// Source text starting at the problem, up to the end of its line
    pub fragment: String,
    /// Parser contexts that were open, outermost last
    pub contexts: Vec<String>,
    pub property: Option<String>,
    pub value: Option<String>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: line {}, column {}: {}",
            self.severity, self.line, self.column, self.message
        )?;
        match (&self.property, &self.value) {
            (Some(property), Some(value)) => write!(f, " ({}: {})", property, value),
            (Some(property), None) => write!(f, " ({})", property),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn new(
        kind: ParseErrorKind,
        severity: Severity,
        message: String,
        source: &str,
        offset: usize,
    ) -> Self {
        let (line, column, fragment) = calculate_position(source, offset);
        Self {
            kind,
            severity,
            message,
            line,
            column,
            fragment,
            contexts: Vec::new(),
            property: None,
            value: None,
        }
    }

    fn with_property(mut self, property: &str) -> Self {
        self.property = Some(property.to_string());
        self
    }

    /// Malformed input; `offset` is a byte offset into `source`
    pub fn syntax(message: impl Into<String>, source: &str, offset: usize) -> Self {
        Self::new(
            ParseErrorKind::Syntax,
            Severity::Error,
            message.into(),
            source,
            offset,
        )
    }

    pub fn unsupported_property(property: &str, source: &str, offset: usize) -> Self {
        Self::new(
            ParseErrorKind::UnsupportedProperty,
            Severity::Warning,
            format!("Unsupported property '{}' (ignored)", property),
            source,
            offset,
        )
        .with_property(property)
    }

    pub fn invalid_value(property: &str, value: &str, source: &str, offset: usize) -> Self {
        let mut err = Self::new(
            ParseErrorKind::InvalidValue,
            Severity::Warning,
            format!("Invalid value for '{}': '{}'", property, value),
            source,
            offset,
        )
        .with_property(property);
        err.value = Some(value.to_string());
        err
    }

    pub fn unknown_pseudo_state(name: &str, source: &str, offset: usize) -> Self {
        Self::new(
            ParseErrorKind::UnknownPseudoState,
            Severity::Warning,
            format!("Unknown pseudo-state ':{}' (treated as a custom state)", name),
            source,
            offset,
        )
    }

    /// Syntax error from a nom failure whose fragments are slices of `source`.
    /// Positioned at the innermost failure.
    pub(crate) fn from_verbose(source: &str, err: &VerboseError<&str>) -> Self {
        let offset = err
            .errors
            .first()
            .map_or(0, |(fragment, _)| source.offset(fragment));

        let mut expected = None;
        let mut contexts = Vec::new();
        for (_, kind) in &err.errors {
            match kind {
                VerboseErrorKind::Context(context) => contexts.push((*context).to_string()),
                VerboseErrorKind::Char(c) if expected.is_none() => expected = Some(*c),
                _ => {}
            }
        }

        let message = match (expected, contexts.first()) {
            (Some(c), Some(context)) => format!("expected '{}' in {}", c, context),
            (Some(c), None) => format!("expected '{}'", c),
            (None, Some(context)) => format!("invalid {}", context),
            (None, None) => "invalid syntax".to_string(),
        };

        let mut parse_error = Self::syntax(message, source, offset);
        parse_error.contexts = contexts;
        parse_error
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A parsed sheet together with everything reported while parsing it
#[derive(Debug, Clone, Default)]
pub struct CssParseResult {
    /// Rules that parsed; malformed ones are missing
    pub stylesheet: Stylesheet,
    pub errors: Vec<ParseError>,
}

impl CssParseResult {
    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(move |e| e.severity == severity)
    }

    /// Whether any rule was lost
    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.with_severity(Severity::Warning).next().is_some()
    }

    pub fn errors_only(&self) -> impl Iterator<Item = &ParseError> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings_only(&self) -> impl Iterator<Item = &ParseError> {
        self.with_severity(Severity::Warning)
    }

    /// Skipped rules at `warn`, everything else at `debug`
    pub fn log_diagnostics(&self) {
        for err in &self.errors {
            if err.is_error() {
                warn!(
                    line = err.line,
                    column = err.column,
                    message = %err.message,
                    "style sheet rule skipped"
                );
            } else {
                debug!(
                    severity = %err.severity,
                    kind = ?err.kind,
                    line = err.line,
                    column = err.column,
                    message = %err.message,
                    property = ?err.property,
                    "style sheet diagnostic"
                );
            }
        }
    }
}

/// Line, column and a short preview for a byte offset into `source`
pub(crate) fn calculate_position(source: &str, offset: usize) -> (usize, usize, String) {
    let offset = offset.min(source.len());
    let before = &source[..offset];

    let line = 1 + before.bytes().filter(|b| *b == b'\n').count();
    let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
    let column = 1 + before[line_start..].chars().count();

    let preview = source[offset..]
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(30)
        .collect();
    (line, column, preview)
}
