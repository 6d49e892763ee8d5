//! Value parsers for fixed-width text tokens
//!
//! A value parser is a plain function from a token to a typed value. Parsers are
//! built from a handful of primitives and combined with the combinators in this
//! module, so that a record layout can say "an optional float between 0 and 100"
//! instead of repeating the conversion and validation at every call site.
//!
//! ## Architecture
//!
//! - Primitives: [`integer`], [`float`], [`stripped`], [`logical`], [`logical_0_1`],
//!   [`character`], [`region`], [`filename`]
//! - Validation: [`validate`], [`range`], [`range_silent_low`], [`validate_range_inclusive`]
//! - Shape: [`optional`], [`list`], [`segment_list`], [`to_map`]
//! - Lookup: [`enumeration`], [`index_parser`]
//!
//! Every parser trims the token the way the fixed-column files expect, and every
//! failure is a [`ValueParseError`] carrying the offending token.

use crate::app::models::Region;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

#[cfg(test)]
pub mod tests;

/// A token could not be converted to a value
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValueParseError {
    /// The token that failed to parse
    pub value: String,

    /// What was wrong with it
    pub message: String,
}

impl ValueParseError {
    pub fn new(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Result of a single value conversion
pub type ParseResult<T> = std::result::Result<T, ValueParseError>;

/// A shareable, type-erased value parser
pub type BoxedParser<T> = Arc<dyn Fn(&str) -> ParseResult<T> + Send + Sync>;

/// Erase the type of a parser so it can be stored in a record layout
pub fn boxed<T, P>(parser: P) -> BoxedParser<T>
where
    P: Fn(&str) -> ParseResult<T> + Send + Sync + 'static,
{
    Arc::new(parser)
}

fn not_valid(token: &str, type_name: &str) -> ValueParseError {
    ValueParseError::new(token, format!("\"{}\" is not a valid {}", token, type_name))
}

// =============================================================================
// Primitives
// =============================================================================

/// A signed integer, surrounding whitespace ignored
pub fn integer(s: &str) -> ParseResult<i32> {
    let stripped = s.trim();
    stripped
        .parse::<i32>()
        .map_err(|_| not_valid(stripped, "Integer"))
}

/// A single precision float, surrounding whitespace ignored
pub fn float(s: &str) -> ParseResult<f32> {
    let stripped = s.trim();
    stripped
        .parse::<f32>()
        .map_err(|_| not_valid(stripped, "Float"))
}

/// The token with surrounding whitespace removed
pub fn stripped(s: &str) -> ParseResult<String> {
    Ok(s.trim().to_string())
}

/// The token exactly as given
pub fn unstripped(s: &str) -> ParseResult<String> {
    Ok(s.to_string())
}

/// A file name, surrounding whitespace ignored
pub fn filename(s: &str) -> ParseResult<String> {
    stripped(s)
}

/// An integer flag where any non-zero value is true
pub fn logical(s: &str) -> ParseResult<bool> {
    Ok(integer(s)? != 0)
}

/// An integer flag that must be exactly 0 or 1
pub fn logical_0_1(s: &str) -> ParseResult<bool> {
    match integer(s)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ValueParseError::new(s.trim(), "Logical value is not 0 or 1")),
    }
}

/// The first character of a non-blank token
pub fn character(s: &str) -> ParseResult<char> {
    s.chars()
        .next()
        .filter(|_| !s.trim().is_empty())
        .ok_or_else(|| ValueParseError::new(s, "Character is blank"))
}

/// A region code, "C" for coastal or "I" for interior, ignoring case
pub fn region(s: &str) -> ParseResult<Region> {
    s.chars()
        .next()
        .and_then(Region::from_code)
        .ok_or_else(|| ValueParseError::new(s, format!("{} is not a valid region identifier", s)))
}

// =============================================================================
// Validation
// =============================================================================

/// Run `validator` on the parsed value, failing with its message if it returns one
pub fn validate<T, P, V>(parser: P, validator: V) -> impl Fn(&str) -> ParseResult<T> + Send + Sync
where
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
    V: Fn(&T) -> Option<String> + Send + Sync,
{
    move |s: &str| {
        let value = parser(s)?;
        match validator(&value) {
            Some(message) => Err(ValueParseError::new(s.trim(), message)),
            None => Ok(value),
        }
    }
}

fn below_low<T: PartialOrd>(value: &T, low: &T, low_inclusive: bool) -> bool {
    if low_inclusive { value < low } else { value <= low }
}

fn above_high<T: PartialOrd>(value: &T, high: &T, high_inclusive: bool) -> bool {
    if high_inclusive { value > high } else { value >= high }
}

/// A value that must lie within a range
///
/// Failures read like "Percentage must be less than or equal to 100.0.", with
/// float bounds always showing their fractional part.
pub fn range<T, P>(
    parser: P,
    low: T,
    low_inclusive: bool,
    high: T,
    high_inclusive: bool,
    label: impl Into<String>,
) -> impl Fn(&str) -> ParseResult<T> + Send + Sync
where
    T: PartialOrd + Debug + Send + Sync,
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
{
    let label = label.into();
    validate(parser, move |value: &T| {
        if below_low(value, &low, low_inclusive) {
            let relation = if low_inclusive {
                "greater than or equal to"
            } else {
                "greater than"
            };
            return Some(format!("{} must be {} {:?}.", label, relation, low));
        }
        if above_high(value, &high, high_inclusive) {
            let relation = if high_inclusive {
                "less than or equal to"
            } else {
                "less than"
            };
            return Some(format!("{} must be {} {:?}.", label, relation, high));
        }
        None
    })
}

/// Like [`range`], but a value below the lower bound becomes `None` instead of an error
pub fn range_silent_low<T, P>(
    parser: P,
    low: T,
    low_inclusive: bool,
    high: T,
    high_inclusive: bool,
    label: impl Into<String>,
) -> impl Fn(&str) -> ParseResult<Option<T>> + Send + Sync
where
    T: PartialOrd + Debug + Send + Sync,
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
{
    let label = label.into();
    move |s: &str| {
        let value = parser(s)?;
        if below_low(&value, &low, low_inclusive) {
            return Ok(None);
        }
        if above_high(&value, &high, high_inclusive) {
            let relation = if high_inclusive {
                "less than or equal to"
            } else {
                "less than"
            };
            return Err(ValueParseError::new(
                s.trim(),
                format!("{} must be {} {:?}.", label, relation, high),
            ));
        }
        Ok(Some(value))
    }
}

/// A validator that accepts values in `min..=max`
///
/// Returns `None` when `min` is greater than `max`, since no value could pass.
pub fn validate_range_inclusive<T>(
    min: T,
    max: T,
    label: impl Into<String>,
) -> Option<impl Fn(&T) -> Option<String> + Send + Sync>
where
    T: PartialOrd + Debug + Send + Sync,
{
    if min > max {
        return None;
    }
    let label = label.into();
    Some(move |value: &T| {
        if *value < min || *value > max {
            Some(format!(
                "{} is expected to be between {:?} and {:?} but was {:?}",
                label, min, max, value
            ))
        } else {
            None
        }
    })
}

// =============================================================================
// Shape
// =============================================================================

/// A blank token becomes `None`, anything else goes to `parser`
pub fn optional<T, P>(parser: P) -> impl Fn(&str) -> ParseResult<Option<T>> + Send + Sync
where
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
{
    move |s: &str| {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            parser(s).map(Some)
        }
    }
}

/// Whitespace separated values
pub fn list<T, P>(parser: P) -> impl Fn(&str) -> ParseResult<Vec<T>> + Send + Sync
where
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
{
    move |s: &str| s.split_whitespace().map(&parser).collect()
}

/// Fixed-width values, the last of which may be shorter than `width`
pub fn segment_list<T, P>(width: usize, parser: P) -> impl Fn(&str) -> ParseResult<Vec<T>> + Send + Sync
where
    P: Fn(&str) -> ParseResult<T> + Send + Sync,
{
    let width = width.max(1);
    move |s: &str| {
        let chars: Vec<char> = s.chars().collect();
        chars
            .chunks(width)
            .map(|chunk| parser(&chunk.iter().collect::<String>()))
            .collect()
    }
}

/// Bind a positional list to named keys
///
/// Each key is paired with an optional default. Keys with defaults must form a
/// contiguous tail, and take their default when the list is too short to reach
/// them. A required key after a defaulted one is rejected when the parser is built.
pub fn to_map<V, P>(
    parser: P,
    keys: &[(&str, Option<V>)],
) -> crate::Result<impl Fn(&str) -> ParseResult<BTreeMap<String, V>> + Send + Sync + use<V, P>>
where
    V: Clone + Send + Sync,
    P: Fn(&str) -> ParseResult<Vec<V>> + Send + Sync,
{
    let mut default_seen = false;
    for (key, default) in keys {
        default_seen |= default.is_some();
        if default_seen && default.is_none() {
            return Err(crate::Error::configuration(format!(
                "Keys with defaults must follow those without, but {} has no default",
                key
            )));
        }
    }
    let keys: Vec<(String, Option<V>)> = keys
        .iter()
        .map(|(key, default)| (key.to_string(), default.clone()))
        .collect();
    let min = keys.iter().filter(|(_, default)| default.is_none()).count();
    let max = keys.len();

    Ok(move |s: &str| {
        let values = parser(s)?;
        if values.len() < min || values.len() > max {
            let message = if min == max {
                format!(
                    "Expected exactly {} values but there were {}",
                    min,
                    values.len()
                )
            } else {
                format!(
                    "Expected between {} and {} values but there were {}",
                    min,
                    max,
                    values.len()
                )
            };
            return Err(ValueParseError::new(s.trim(), message));
        }
        let mut values = values.into_iter();
        let mut result = BTreeMap::new();
        for (key, default) in &keys {
            match (values.next(), default) {
                (Some(value), _) => {
                    result.insert(key.clone(), value);
                }
                (None, Some(default)) => {
                    result.insert(key.clone(), default.clone());
                }
                (None, None) => {}
            }
        }
        Ok(result)
    })
}

// =============================================================================
// Lookup
// =============================================================================

/// One of a fixed set of named values
///
/// Matching is exact on the trimmed token, and a blank token never matches.
pub fn enumeration<E>(
    type_name: &'static str,
    values: &'static [(&'static str, E)],
) -> impl Fn(&str) -> ParseResult<E> + Send + Sync
where
    E: Copy + Send + Sync + 'static,
{
    move |s: &str| {
        let token = s.trim();
        values
            .iter()
            .find(|(name, _)| !token.is_empty() && *name == token)
            .map(|(_, value)| *value)
            .ok_or_else(|| not_valid(token, type_name))
    }
}

/// The position of the token within `codes`, counted from `from`
pub fn index_parser(
    label: &'static str,
    from: i32,
    codes: &'static [&'static str],
) -> impl Fn(&str) -> ParseResult<i32> + Send + Sync {
    move |s: &str| {
        let token = s.trim();
        codes
            .iter()
            .position(|code| code.trim() == token)
            .map(|position| from + position as i32)
            .ok_or_else(|| not_valid(token, label))
    }
}
