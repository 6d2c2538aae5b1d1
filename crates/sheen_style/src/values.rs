//! Typed property values
//!
//! Values are parsed according to the kind of the property they belong to.
//! Anything the engine does not model (gradients, shorthands, urls) is kept
//! as a `Raw` string with whitespace collapsed, so multi-line values compare
//! stably.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, opt, recognize},
    error::ParseError as NomParseError,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use sheen_core::Color;
use smallvec::SmallVec;

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Px,
    Pt,
    Em,
    Percent,
}

impl LengthUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Em => "em",
            LengthUnit::Percent => "%",
        }
    }
}

/// A number with a unit; unitless numbers are pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub const ZERO: Length = Length::px(0.0);

    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Shape a property's value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A color or a gradient/palette function
    Brush,
    Length,
    /// One to four lengths (box edges, radii)
    Lengths,
    Number,
    /// A bare identifier or an integer (`bold`, `600`)
    Keyword,
    /// Kept verbatim
    Any,
}

/// A declared or computed property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(Color),
    Length(Length),
    Lengths(SmallVec<[Length; 4]>),
    Number(f32),
    Keyword(String),
    Raw(String),
}

impl Value {
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(color) => Some(*color),
            _ => None,
        }
    }

    pub fn as_length(&self) -> Option<Length> {
        match self {
            Value::Length(length) => Some(*length),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Color(color) => write!(f, "{}", color),
            Value::Length(length) => write!(f, "{}", length),
            Value::Lengths(lengths) => {
                let parts: Vec<String> = lengths.iter().map(|l| l.to_string()).collect();
                f.write_str(&parts.join(" "))
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Keyword(k) => f.write_str(k),
            Value::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Function-style values accepted wherever a color is
const BRUSH_FUNCTIONS: &[&str] = &[
    "qlineargradient(",
    "qradialgradient(",
    "qconicalgradient(",
    "palette(",
    "url(",
];

/// Parse `text` as a value of the given kind
pub fn parse_value(kind: ValueKind, text: &str) -> Option<Value> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return None;
    }

    match kind {
        ValueKind::Brush => parse_color(&text).map(Value::Color).or_else(|| {
            let lower = text.to_ascii_lowercase();
            if lower == "none" {
                return Some(Value::Keyword(lower));
            }
            BRUSH_FUNCTIONS
                .iter()
                .any(|func| lower.starts_with(func) && lower.ends_with(')'))
                .then_some(Value::Raw(text))
        }),
        ValueKind::Length => parse_length(&text).map(Value::Length),
        ValueKind::Lengths => {
            let lengths: Option<SmallVec<[Length; 4]>> =
                text.split(' ').map(parse_length).collect();
            match lengths {
                Some(lengths) if lengths.len() == 1 => Some(Value::Length(lengths[0])),
                Some(lengths) if lengths.len() <= 4 => Some(Value::Lengths(lengths)),
                _ => None,
            }
        }
        ValueKind::Number => all_consuming(number::<nom::error::Error<&str>>)(text.as_str())
            .ok()
            .map(|(_, n)| Value::Number(n)),
        ValueKind::Keyword => {
            if let Ok((_, n)) = all_consuming(number::<nom::error::Error<&str>>)(text.as_str()) {
                Some(Value::Number(n))
            } else if text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                Some(Value::Keyword(text.to_ascii_lowercase()))
            } else {
                None
            }
        }
        ValueKind::Any => Some(Value::Raw(text)),
    }
}

/// Parse a color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` or a name
pub fn parse_color(input: &str) -> Option<Color> {
    let input = input.trim();

    if let Ok((_, color)) = all_consuming(hex_color::<nom::error::Error<&str>>)(input) {
        return Some(color);
    }
    if let Ok((_, color)) = all_consuming(rgb_function::<nom::error::Error<&str>>)(input) {
        return Some(color);
    }
    Color::named(input)
}

/// Parse a length; unitless numbers are pixels
pub fn parse_length(input: &str) -> Option<Length> {
    all_consuming(length::<nom::error::Error<&str>>)(input.trim())
        .ok()
        .map(|(_, length)| length)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decimal number without exponent, so `1em` is not read as scientific
/// notation
fn number<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, f32, E> {
    map_opt(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |s: &str| s.parse::<f32>().ok(),
    )(input)
}

fn length<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Length, E> {
    let (input, value) = number(input)?;
    let (input, unit) = opt(alt((
        map(tag_no_case("px"), |_| LengthUnit::Px),
        map(tag_no_case("pt"), |_| LengthUnit::Pt),
        map(tag_no_case("em"), |_| LengthUnit::Em),
        map(tag("%"), |_| LengthUnit::Percent),
    )))(input)?;

    Ok((input, Length::new(value, unit.unwrap_or(LengthUnit::Px))))
}

fn hex_color<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    let (rest, hex) = preceded(
        char('#'),
        take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
    )(input)?;

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let short = |c: &str| channel(&c.repeat(2));

    let color = match hex.len() {
        3 => short(&hex[0..1])
            .zip(short(&hex[1..2]))
            .zip(short(&hex[2..3]))
            .map(|((r, g), b)| Color::rgb(r, g, b)),
        6 => channel(&hex[0..2])
            .zip(channel(&hex[2..4]))
            .zip(channel(&hex[4..6]))
            .map(|((r, g), b)| Color::rgb(r, g, b)),
        8 => channel(&hex[0..2])
            .zip(channel(&hex[2..4]))
            .zip(channel(&hex[4..6]))
            .zip(channel(&hex[6..8]))
            .map(|(((r, g), b), a)| Color::rgba(r, g, b, a)),
        _ => None,
    };

    match color {
        Some(color) => Ok((rest, color)),
        None => Err(nom::Err::Error(E::from_error_kind(
            input,
            nom::error::ErrorKind::HexDigit,
        ))),
    }
}

fn comma<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, char, E> {
    delimited(multispace0, char(','), multispace0)(input)
}

/// `rgb(r, g, b)` or `rgba(r, g, b, a)`. Channels are 0-255; alpha is a
/// 0-1 fraction, or 0-255 when greater than 1.
fn rgb_function<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Color, E> {
    let (input, name) = alt((tag_no_case("rgba"), tag_no_case("rgb")))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, r) = number(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = number(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = number(input)?;
    let (input, a) = if name.eq_ignore_ascii_case("rgba") {
        let (input, _) = comma(input)?;
        let (input, a) = number(input)?;
        (input, Some(a))
    } else {
        (input, None)
    };
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    let channel = |v: f32| v.clamp(0.0, 255.0).round() as u8;
    let color = Color::rgb(channel(r), channel(g), channel(b));
    let color = match a {
        Some(a) if a > 1.0 => Color { a: channel(a), ..color },
        Some(a) => color.with_alpha(a),
        None => color,
    };
    Ok((input, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#fff"), Some(Color::WHITE));
        assert_eq!(parse_color("#4CAF50"), Some(Color::rgb(0x4c, 0xaf, 0x50)));
        assert_eq!(
            parse_color("#00000080"),
            Some(Color::rgba(0, 0, 0, 0x80))
        );
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ggg"), None);
    }

    #[test]
    fn test_rgba_alpha_ranges() {
        assert_eq!(
            parse_color("rgba(255, 0, 0, 0.5)"),
            Some(Color::rgba(255, 0, 0, 128))
        );
        assert_eq!(
            parse_color("rgba(255,0,0,128)"),
            Some(Color::rgba(255, 0, 0, 128))
        );
        assert_eq!(parse_color("rgb(0, 128, 0)"), Some(Color::GREEN));
        assert_eq!(parse_color("rgb(0, 128)"), None);
    }

    #[test]
    fn test_lengths_and_units() {
        assert_eq!(parse_length("10px"), Some(Length::px(10.0)));
        assert_eq!(parse_length("12"), Some(Length::px(12.0)));
        assert_eq!(
            parse_length("1.5em"),
            Some(Length::new(1.5, LengthUnit::Em))
        );
        assert_eq!(
            parse_length("50%"),
            Some(Length::new(50.0, LengthUnit::Percent))
        );
        assert_eq!(parse_length("10 px"), None);
    }

    #[test]
    fn test_box_lengths() {
        assert_eq!(
            parse_value(ValueKind::Lengths, "8px"),
            Some(Value::Length(Length::px(8.0)))
        );
        let value = parse_value(ValueKind::Lengths, "8px  16px").unwrap();
        assert_eq!(value.to_string(), "8px 16px");
        assert_eq!(parse_value(ValueKind::Lengths, "1px 2px 3px 4px 5px"), None);
    }

    #[test]
    fn test_gradient_is_a_brush() {
        let value = parse_value(
            ValueKind::Brush,
            "qlineargradient(x1:0, y1:0,\n    x2:1, y2:0, stop:0 #4CAF50, stop:1 #8BC34A)",
        )
        .unwrap();
        assert_eq!(
            value,
            Value::Raw(
                "qlineargradient(x1:0, y1:0, x2:1, y2:0, stop:0 #4CAF50, stop:1 #8BC34A)"
                    .to_string()
            )
        );
        assert_eq!(parse_value(ValueKind::Brush, "solid"), None);
        assert_eq!(
            parse_value(ValueKind::Brush, "None"),
            Some(Value::Keyword("none".to_string()))
        );
    }

    #[test]
    fn test_keyword_accepts_numbers() {
        assert_eq!(
            parse_value(ValueKind::Keyword, "Bold"),
            Some(Value::Keyword("bold".to_string()))
        );
        assert_eq!(
            parse_value(ValueKind::Keyword, "600"),
            Some(Value::Number(600.0))
        );
    }
}
