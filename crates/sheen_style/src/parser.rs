//! Style sheet parser
//!
//! Supports the widget style sheet dialect:
//!
//! ```text
//! /* comments */
//! QPushButton, QToolButton { padding: 4px 8px; }
//! QDialog > QFrame QPushButton#ok:hover:!pressed { color: #fff; }
//! QPushButton[class~="primary"] { background-color: rgb(33, 150, 243); }
//! QCheckBox::indicator:checked { image: url(:/check.png); }
//! QProgressBar::chunk {
//!     background-color: qlineargradient(x1:0, y1:0, x2:1, y2:0,
//!                                       stop:0 #4CAF50, stop:1 #8BC34A);
//! }
//! ```
//!
//! Recovery works rule by rule: a malformed selector or block produces an
//! error-severity [`ParseError`] and parsing resumes after the rule's
//! balanced closing brace. Bad declarations inside an otherwise valid rule
//! produce warnings and are dropped.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, cut, opt},
    error::{context, ErrorKind, ParseError as NomParseError, VerboseError, VerboseErrorKind},
    multi::separated_list1,
    sequence::delimited,
    Finish, IResult, Offset,
};
use sheen_core::PseudoState;
use tracing::trace;

use crate::config::UnsupportedPropertyPolicy;
use crate::diagnostics::{CssParseResult, ParseError};
use crate::properties::PropertyId;
use crate::rule::{Declaration, Rule, Stylesheet};
use crate::selector::{
    AttributeOp, AttributeSelector, Combinator, CompoundSelector, Selector, StatePredicate,
};
use crate::values::parse_value;

/// Custom parser result type using VerboseError for better diagnostics
type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Parse a full style sheet
pub fn parse_stylesheet(css: &str, policy: UnsupportedPropertyPolicy) -> CssParseResult {
    let mut errors = Vec::new();
    let source = blank_comments(css, &mut errors);
    let source = source.as_str();

    let mut stylesheet = Stylesheet::new();
    let mut remaining = source;

    loop {
        let trimmed = remaining.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let start = source.offset(trimmed);

        let Some(brace) = trimmed.find(|c: char| c == '{' || c == '}') else {
            errors.push(ParseError::syntax(
                "expected '{' after selector",
                source,
                start,
            ));
            break;
        };
        if trimmed[brace..].starts_with('}') {
            errors.push(ParseError::syntax("unexpected '}'", source, start + brace));
            remaining = &trimmed[brace + 1..];
            continue;
        }

        let prelude = &trimmed[..brace];
        let body = &trimmed[brace + 1..];
        let Some(scan) = scan_block(body) else {
            errors.push(ParseError::syntax(
                "unclosed declaration block",
                source,
                start + brace,
            ));
            break;
        };
        remaining = &body[scan.close + 1..];

        if let Some(nested) = scan.nested_at {
            errors.push(ParseError::syntax(
                "unexpected '{' inside declaration block",
                source,
                source.offset(&body[nested..]),
            ));
            continue;
        }

        let selectors = match parse_selector_list(source, prelude) {
            Ok(selectors) => selectors,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        for name in unknown_states(&selectors) {
            let lower = prelude.to_ascii_lowercase();
            let offset = lower.find(name.as_str()).unwrap_or(0);
            errors.push(ParseError::unknown_pseudo_state(
                &name,
                source,
                start + offset,
            ));
        }

        let declarations = match parse_declarations(source, &body[..scan.close], policy, &mut errors)
        {
            Ok(declarations) => declarations,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        for selector in selectors {
            trace!(%selector, declarations = declarations.len(), "parsed rule");
            stylesheet.push(Rule::new(selector, declarations.clone()));
        }
    }

    CssParseResult { stylesheet, errors }
}

/// Parse a declaration list with no selector (`color: red; padding: 2px`)
/// into a single inline rule
pub fn parse_inline(css: &str, policy: UnsupportedPropertyPolicy) -> CssParseResult {
    let mut errors = Vec::new();
    let source = blank_comments(css, &mut errors);
    let source = source.as_str();

    let mut stylesheet = Stylesheet::new();
    match parse_declarations(source, source, policy, &mut errors) {
        Ok(declarations) => stylesheet.push(Rule::new(Selector::inline(), declarations)),
        Err(err) => errors.push(err),
    }
    CssParseResult { stylesheet, errors }
}

/// Parse a single selector such as `QDialog > QPushButton#ok:hover`
#[allow(clippy::result_large_err)]
pub fn parse_selector(text: &str) -> Result<Selector, ParseError> {
    all_consuming(delimited(multispace0, complex_selector, multispace0))(text)
        .finish()
        .map(|(_, selector)| selector)
        .map_err(|err| ParseError::from_verbose(text, &err))
}

// ============================================================================
// Block structure
// ============================================================================

struct BlockScan {
    /// Index of the matching `}`
    close: usize,
    /// Index of the first nested `{`, if any
    nested_at: Option<usize>,
}

/// Find the brace closing a block whose `{` was just consumed. Quoted text
/// is skipped. `None` if the input ends first.
fn scan_block(body: &str) -> Option<BlockScan> {
    let mut depth = 1usize;
    let mut nested_at = None;
    let mut quote: Option<char> = None;

    for (index, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '{') => {
                depth += 1;
                nested_at.get_or_insert(index);
            }
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(BlockScan {
                        close: index,
                        nested_at,
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace comments with spaces, keeping byte offsets and line breaks so
/// diagnostics point at the original text
fn blank_comments(css: &str, errors: &mut Vec<ParseError>) -> String {
    fn blank(out: &mut String, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat(' ').take(c.len_utf8()));
            }
        }
    }

    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let comment = &rest[start..];
        match comment[2..].find("*/") {
            Some(end) => {
                let len = end + 4;
                blank(&mut out, &comment[..len]);
                rest = &comment[len..];
            }
            None => {
                errors.push(ParseError::syntax(
                    "unterminated comment",
                    css,
                    css.offset(comment),
                ));
                blank(&mut out, comment);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Declarations
// ============================================================================

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse a single declaration: `name: value;`
fn declaration(input: &str) -> ParseResult<(&str, &str)> {
    let (input, name) = context("property name", identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = context("colon after property name", cut(char(':')))(input)?;
    let (input, value) = context("property value", declaration_value)(input)?;
    let (input, _) = opt(char(';'))(input)?;
    Ok((input, (name, value)))
}

/// Everything up to the next `;` that is outside parentheses and quotes, so
/// `url(data:image/svg+xml;base64,...)` and `"A;B"` stay one value
fn declaration_value(input: &str) -> ParseResult<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => return Ok((&input[index..], &input[..index])),
            _ => {}
        }
    }
    Ok(("", input))
}

/// Parse the inside of a declaration block. A syntax error fails the whole
/// block; property and value problems are pushed to `errors` as warnings.
fn parse_declarations(
    source: &str,
    block: &str,
    policy: UnsupportedPropertyPolicy,
    errors: &mut Vec<ParseError>,
) -> Result<Vec<Declaration>, ParseError> {
    let mut declarations = Vec::new();
    let mut rest = block;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if rest.is_empty() {
            break;
        }
        let (after, (name, value)) = declaration(rest)
            .finish()
            .map_err(|err| ParseError::from_verbose(source, &err))?;
        let name_offset = source.offset(rest);
        rest = after;

        let property = match PropertyId::from_name(name) {
            Some(property) => property,
            None => match policy {
                UnsupportedPropertyPolicy::Warn => {
                    errors.push(ParseError::unsupported_property(name, source, name_offset));
                    continue;
                }
                UnsupportedPropertyPolicy::Ignore => continue,
                UnsupportedPropertyPolicy::PassThrough => {
                    PropertyId::Custom(name.to_ascii_lowercase().into_boxed_str())
                }
            },
        };

        let trimmed = value.trim();
        match parse_value(property.kind(), trimmed) {
            Some(value) => declarations.push(Declaration::new(property, value)),
            None => errors.push(ParseError::invalid_value(
                property.name(),
                trimmed,
                source,
                source.offset(value.trim_start()),
            )),
        }
    }

    Ok(declarations)
}

// ============================================================================
// Selectors
// ============================================================================

fn parse_selector_list(source: &str, prelude: &str) -> Result<Vec<Selector>, ParseError> {
    if prelude.trim().is_empty() {
        return Err(ParseError::syntax(
            "missing selector",
            source,
            source.offset(prelude),
        ));
    }

    let list = separated_list1(
        delimited(multispace0, char(','), multispace0),
        complex_selector,
    );
    all_consuming(delimited(multispace0, list, multispace0))(prelude)
        .finish()
        .map(|(_, selectors)| selectors)
        .map_err(|err| ParseError::from_verbose(source, &err))
}

/// Parse a complex selector: compounds joined by whitespace or `>`
///
/// Examples:
///   `QPushButton`
///   `QPushButton#ok:hover`
///   `QDialog > QFrame QPushButton`
///   `QTabBar::tab:!selected`
fn complex_selector(input: &str) -> ParseResult<Selector> {
    let mut ancestors = Vec::new();
    let (mut remaining, (mut compound, mut subcontrol)) =
        context("selector", compound_selector)(input)?;

    loop {
        let trimmed = remaining.trim_start();

        let combinator = if let Some(after) = trimmed.strip_prefix('>') {
            remaining = after.trim_start();
            Combinator::Child
        } else if trimmed.len() != remaining.len() && starts_compound(trimmed) {
            remaining = trimmed;
            Combinator::Descendant
        } else {
            break;
        };

        if subcontrol.is_some() {
            return Err(failure(trimmed, "subcontrol must end the selector"));
        }
        let (rest, next) = context("selector after combinator", cut(compound_selector))(remaining)?;
        ancestors.push((compound, combinator));
        (compound, subcontrol) = next;
        remaining = rest;
    }

    let mut selector = Selector::new(compound);
    selector.ancestors = ancestors;
    selector.subcontrol = subcontrol;
    Ok((remaining, selector))
}

fn starts_compound(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || matches!(c, '_' | '*' | '#' | '.' | '[' | ':'))
}

/// Parse a compound selector and its optional subcontrol:
/// `QCheckBox#agree[class="big"]::indicator:checked`
fn compound_selector(input: &str) -> ParseResult<(CompoundSelector, Option<String>)> {
    let mut compound = CompoundSelector::default();
    let mut subcontrol = None;

    let (mut remaining, type_name) = opt(alt((tag("*"), identifier)))(input)?;
    match type_name {
        Some("*") | None => {}
        Some(type_name) => compound.type_name = Some(type_name.to_string()),
    }
    let mut parsed_any = type_name.is_some();

    loop {
        let rest = if let Some(rest) = remaining.strip_prefix('#') {
            let (rest, id) = context("id selector", cut(identifier))(rest)?;
            compound.id = Some(id.to_string());
            rest
        } else if let Some(rest) = remaining.strip_prefix('.') {
            let (rest, class) = context("class selector", cut(identifier))(rest)?;
            compound.attributes.push(AttributeSelector {
                name: "class".to_string(),
                op: AttributeOp::Includes(class.to_string()),
            });
            rest
        } else if remaining.starts_with('[') {
            let (rest, attribute) = context("attribute selector", attribute_selector)(remaining)?;
            compound.attributes.push(attribute);
            rest
        } else if let Some(rest) = remaining.strip_prefix("::") {
            if subcontrol.is_some() {
                return Err(failure(remaining, "only one subcontrol per selector"));
            }
            let (rest, part) = context("subcontrol", cut(identifier))(rest)?;
            subcontrol = Some(part.to_string());
            rest
        } else if let Some(rest) = remaining.strip_prefix(':') {
            let (rest, negated) = opt(char('!'))(rest)?;
            let (rest, name) = context("pseudo-state", cut(identifier))(rest)?;
            compound.states.push(state_predicate(name, negated.is_some()));
            rest
        } else {
            break;
        };
        parsed_any = true;
        remaining = rest;
    }

    if !parsed_any {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Many1,
        )));
    }
    Ok((remaining, (compound, subcontrol)))
}

/// `[name]`, `[name=value]` or `[name~=value]`; values may be quoted
fn attribute_selector(input: &str) -> ParseResult<AttributeSelector> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = cut(identifier)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = opt(alt((tag("~="), tag("="))))(input)?;
    let (input, op) = match op {
        Some(op) => {
            let (input, _) = multispace0(input)?;
            let (input, value) = context("attribute value", cut(attribute_value))(input)?;
            let value = value.to_string();
            if op == "~=" {
                (input, AttributeOp::Includes(value))
            } else {
                (input, AttributeOp::Equals(value))
            }
        }
        None => (input, AttributeOp::Exists),
    };
    let (input, _) = multispace0(input)?;
    let (input, _) = context("closing bracket", cut(char(']')))(input)?;

    Ok((
        input,
        AttributeSelector {
            name: name.to_string(),
            op,
        },
    ))
}

fn attribute_value(input: &str) -> ParseResult<&str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        identifier,
    ))(input)
}

/// Map a state name to a predicate, expanding the negative aliases
fn state_predicate(name: &str, negated: bool) -> StatePredicate {
    let (state, positive) = match name.to_ascii_lowercase().as_str() {
        "unchecked" | "off" => (PseudoState::Checked, false),
        "on" => (PseudoState::Checked, true),
        "enabled" => (PseudoState::Disabled, false),
        _ => (PseudoState::parse(name), true),
    };
    if positive != negated {
        StatePredicate::Is(state)
    } else {
        StatePredicate::Not(state)
    }
}

fn unknown_states(selectors: &[Selector]) -> Vec<String> {
    let mut names: Vec<String> = selectors
        .iter()
        .flat_map(|selector| {
            selector
                .ancestors
                .iter()
                .map(|(compound, _)| compound)
                .chain(std::iter::once(&selector.subject))
        })
        .flat_map(|compound| compound.states.iter())
        .map(StatePredicate::state)
        .filter(|state| state.is_custom() && !state.is_toolkit_state())
        .map(|state| state.name().to_string())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

fn failure<'a>(input: &'a str, message: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Failure(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context(message))],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ParseErrorKind, Severity};
    use crate::selector::Specificity;
    use crate::values::Value;
    use sheen_core::Color;

    fn parse(css: &str) -> CssParseResult {
        parse_stylesheet(css, UnsupportedPropertyPolicy::Warn)
    }

    #[test]
    fn test_semicolon_inside_url_stays_in_value() {
        let result = parse(
            "QTextEdit { background-image: url(data:image/svg+xml;base64,AAAA); color: red; } QLabel { color: blue; }",
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let rules = result.stylesheet.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].declarations().len(), 2);
        assert_eq!(
            rules[0].declarations()[0].value,
            Value::Raw("url(data:image/svg+xml;base64,AAAA)".to_string())
        );
    }

    #[test]
    fn test_semicolon_inside_quotes_stays_in_value() {
        let result = parse("QLabel { font-family: \"A;B\"; color: red; }");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let rules = result.stylesheet.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].declarations().len(), 2);
        assert_eq!(
            rules[0].declarations()[1],
            Declaration::new(PropertyId::Color, Value::Color(Color::RED))
        );
    }

    #[test]
    fn test_simple_rule() {
        let result = parse("QPushButton { color: red; padding: 4px 8px; }");
        assert!(result.errors.is_empty());
        let rules = result.stylesheet.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector().type_hint(), Some("QPushButton"));
        assert_eq!(
            rules[0].declarations()[0],
            Declaration::new(PropertyId::Color, Value::Color(Color::RED))
        );
        assert_eq!(rules[0].declarations()[1].value.to_string(), "4px 8px");
    }

    #[test]
    fn test_selector_list_expands() {
        let result = parse("QLineEdit, QTextEdit:focus { border-color: #2196F3 }");
        let rules = result.stylesheet.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selector().to_string(), "QLineEdit");
        assert_eq!(rules[1].selector().to_string(), "QTextEdit:focus");
        assert_eq!(rules[0].declarations(), rules[1].declarations());
        assert!(rules[0].source_order() < rules[1].source_order());
    }

    #[test]
    fn test_malformed_rule_is_skipped() {
        let css = "QLabel { color: red; }\nButton{{bad}}\nQFrame { color: blue; }";
        let result = parse(css);
        assert_eq!(result.stylesheet.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::Syntax);
        assert_eq!(result.errors[0].line, 2);
        assert!(result.has_errors());
    }

    #[test]
    fn test_bad_selector_is_skipped() {
        let result = parse("QPushButton# { color: red; }\nQLabel { color: blue; }");
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].severity, Severity::Error);
    }

    #[test]
    fn test_unclosed_block() {
        let result = parse("QLabel { color: red; }\nQFrame { color: blue;");
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors_only().count(), 1);
    }

    #[test]
    fn test_comments_are_ignored() {
        let css = "/* header */\nQLabel /* inline */ { color: /* x */ red; }\n/* 结束 */";
        let result = parse(css);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.stylesheet.len(), 1);
    }

    #[test]
    fn test_unterminated_comment() {
        let result = parse("QLabel { color: red; } /* oops");
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors_only().count(), 1);
    }

    #[test]
    fn test_unsupported_property_warns() {
        let result = parse("QPushButton { box-shadow: 0 2px 4px black; color: red; }");
        assert_eq!(result.stylesheet.rules()[0].declarations().len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::UnsupportedProperty);
        assert_eq!(result.errors[0].property.as_deref(), Some("box-shadow"));
        assert!(!result.has_errors());
    }

    #[test]
    fn test_pass_through_keeps_unknown_property() {
        let result = parse_stylesheet(
            "QPushButton { box-shadow: 0 2px 4px black; }",
            UnsupportedPropertyPolicy::PassThrough,
        );
        assert!(result.errors.is_empty());
        let declaration = &result.stylesheet.rules()[0].declarations()[0];
        assert_eq!(declaration.property, PropertyId::Custom("box-shadow".into()));
        assert_eq!(declaration.value, Value::Raw("0 2px 4px black".to_string()));
    }

    #[test]
    fn test_invalid_value_warns() {
        let result = parse("QPushButton { color: 12px; width: 100px; }");
        assert_eq!(result.stylesheet.rules()[0].declarations().len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::InvalidValue);
        assert_eq!(result.errors[0].column, 22);
    }

    #[test]
    fn test_multiline_gradient_value() {
        let css = "QProgressBar::chunk {\n    background-color: qlineargradient(x1:0, y1:0,\n        x2:1, y2:0, stop:0 #4CAF50, stop:1 #8BC34A);\n    border-radius: 5px;\n}";
        let result = parse(css);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let rule = &result.stylesheet.rules()[0];
        assert_eq!(rule.selector().subcontrol.as_deref(), Some("chunk"));
        assert_eq!(rule.declarations().len(), 2);
    }

    #[test]
    fn test_negated_states() {
        let selector = parse_selector("QCheckBox::indicator:unchecked:!hover").unwrap();
        assert_eq!(
            selector.subject.states.as_slice(),
            &[
                StatePredicate::Not(PseudoState::Checked),
                StatePredicate::Not(PseudoState::Hover)
            ]
        );
        let selector = parse_selector("QPushButton:!enabled").unwrap();
        assert_eq!(
            selector.subject.states.as_slice(),
            &[StatePredicate::Is(PseudoState::Disabled)]
        );
    }

    #[test]
    fn test_unknown_state_warns() {
        let result = parse("QScrollBar::handle:wobbly { min-height: 20px; }");
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ParseErrorKind::UnknownPseudoState);
        assert_eq!(result.errors[0].column, 20);
    }

    #[test]
    fn test_toolkit_states_parse_silently() {
        let result = parse(
            "QSlider::groove:horizontal { height: 4px; }\n\
             QTreeView::branch:has-children:!has-siblings:closed { border-image: none; }\n\
             QCheckBox::indicator:indeterminate { width: 12px; }",
        );
        assert_eq!(result.stylesheet.len(), 3);
        assert!(
            result.errors.iter().all(|e| e.kind != ParseErrorKind::UnknownPseudoState),
            "{:?}",
            result.errors
        );

        let selector = parse_selector("QTreeView::branch:has-children:!has-siblings:closed").unwrap();
        assert_eq!(
            selector.subject.states.as_slice(),
            &[
                StatePredicate::Is(PseudoState::parse("has-children")),
                StatePredicate::Not(PseudoState::parse("has-siblings")),
                StatePredicate::Is(PseudoState::parse("closed")),
            ]
        );
    }

    #[test]
    fn test_specificity_of_parsed_selectors() {
        let selector = parse_selector("QPushButton#specialButton").unwrap();
        assert_eq!(selector.specificity(), Specificity::new(1, 0, 1));
        let selector = parse_selector("QPushButton[class=\"primary\"]:hover").unwrap();
        assert_eq!(selector.specificity(), Specificity::new(0, 2, 1));
    }

    #[test]
    fn test_subcontrol_must_be_last() {
        assert!(parse_selector("QComboBox::drop-down QLabel").is_err());
        assert!(parse_selector("QComboBox::drop-down::arrow").is_err());
    }

    #[test]
    fn test_inline_declarations() {
        let result = parse_inline(
            "background-color: #4CAF50; color: white; font-size: 14px",
            UnsupportedPropertyPolicy::Warn,
        );
        assert!(result.errors.is_empty());
        let rule = &result.stylesheet.rules()[0];
        assert!(rule.selector().is_inline());
        assert_eq!(rule.declarations().len(), 3);
    }

    #[test]
    fn test_stray_closing_brace() {
        let result = parse("} QLabel { color: red; }");
        assert_eq!(result.stylesheet.len(), 1);
        assert_eq!(result.errors_only().count(), 1);
    }
}
