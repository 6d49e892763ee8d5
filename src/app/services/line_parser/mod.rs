//! Fixed-column record parser
//!
//! A [`LineParser`] describes a record layout as an ordered list of segments. Each
//! line of a resource is sliced into those segments, each value segment is run
//! through its value parser, and the resulting [`ParsedEntry`] is folded into an
//! accumulator supplied by the caller.
//!
//! ## Architecture
//!
//! - [`LineParser`] - Segment layout builder and the parse loop
//! - [`Segments`] - Raw segment text handed to segment hooks
//! - [`ParsedEntry`] - Typed field values of one record plus its line number
//!
//! Hooks run in a fixed order for every physical line: stop line, ignored line,
//! segment extraction, stop segment, ignored segment, value parsing, stop entry,
//! ignored entry, and finally the fold. Any failure is wrapped with the 1-based
//! physical line number and, for value failures, the field name.

use crate::app::services::value_parser::{ParseResult, float, integer, segment_list, stripped};
use crate::{Error, Result};
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::sync::Arc;
use tracing::debug;

#[cfg(test)]
pub mod tests;

type ErasedParser = Arc<dyn Fn(&str) -> ParseResult<Box<dyn Any + Send + Sync>> + Send + Sync>;
type LineHook = Box<dyn Fn(&str) -> bool + Send + Sync>;
type SegmentHook = Box<dyn Fn(&Segments<'_>) -> bool + Send + Sync>;
type EntryHook = Box<dyn Fn(&ParsedEntry) -> bool + Send + Sync>;

enum SegmentKind {
    Space,
    Value { name: String, parser: ErasedParser },
}

struct Segment {
    /// `None` for the unbounded trailing segment
    length: Option<usize>,
    kind: SegmentKind,
}

/// The raw text of each segment of one line
///
/// Segments that start past the end of the line are absent.
#[derive(Debug, Clone, Copy)]
pub struct Segments<'a> {
    segments: &'a [Option<String>],
}

impl<'a> Segments<'a> {
    /// Text of a segment, or `None` if the line ended before it
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.segments.get(index).and_then(|s| s.as_deref())
    }

    /// Text of a segment, empty if the line ended before it
    pub fn text(&self, index: usize) -> &'a str {
        self.get(index).unwrap_or("")
    }

    /// Number of segments in the layout
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parsed values of one record
pub struct ParsedEntry {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    line_number: usize,
}

impl fmt::Debug for ParsedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&String> = self.values.keys().collect();
        fields.sort();
        f.debug_struct("ParsedEntry")
            .field("line_number", &self.line_number)
            .field("fields", &fields)
            .finish()
    }
}

impl ParsedEntry {
    /// Physical line number the record came from, starting at 1
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the field was present on the line
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Borrow a field's value
    pub fn get<T: 'static>(&self, name: &str) -> Result<&T> {
        let value = self.values.get(name).ok_or_else(|| {
            Error::value_parse("", format!("Field {} is missing from the line", name))
        })?;
        value.downcast_ref::<T>().ok_or_else(|| {
            Error::value_parse("", format!("Field {} is not a {}", name, type_name::<T>()))
        })
    }

    /// Copy of a field's value
    pub fn value<T: Clone + 'static>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).cloned()
    }

    /// Copy of a field's value, or `default` when the line ended before the field
    pub fn value_or<T: Clone + 'static>(&self, name: &str, default: T) -> Result<T> {
        if self.contains(name) {
            self.value(name)
        } else {
            Ok(default)
        }
    }

    /// Remove a field's value from the entry
    pub fn take<T: 'static>(&mut self, name: &str) -> Result<T> {
        let value = self.values.remove(name).ok_or_else(|| {
            Error::value_parse("", format!("Field {} is missing from the line", name))
        })?;
        value.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            Error::value_parse("", format!("Field {} is not a {}", name, type_name::<T>()))
        })
    }
}

/// Record layout and parse loop for a fixed-column resource
#[derive(Default)]
pub struct LineParser {
    segments: Vec<Segment>,
    layout_error: Option<String>,
    stop_line: Option<LineHook>,
    ignored_line: Option<LineHook>,
    stop_segment: Option<SegmentHook>,
    ignored_segment: Option<SegmentHook>,
    stop_entry: Option<EntryHook>,
    ignored_entry: Option<EntryHook>,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, length: Option<usize>, kind: SegmentKind) -> Self {
        if matches!(self.segments.last(), Some(Segment { length: None, .. })) {
            self.layout_error = Some("Can not add a segment after an unbounded segment".to_string());
        }
        self.segments.push(Segment { length, kind });
        self
    }

    /// Skip `length` columns
    pub fn space(self, length: usize) -> Self {
        self.push(Some(length), SegmentKind::Space)
    }

    /// A field of `length` columns converted by `parser`
    pub fn value<T, P>(self, length: usize, name: &str, parser: P) -> Self
    where
        T: Send + Sync + 'static,
        P: Fn(&str) -> ParseResult<T> + Send + Sync + 'static,
    {
        self.push(Some(length), Self::value_kind(name, parser))
    }

    /// A field taking the rest of the line; nothing may follow it
    pub fn rest<T, P>(self, name: &str, parser: P) -> Self
    where
        T: Send + Sync + 'static,
        P: Fn(&str) -> ParseResult<T> + Send + Sync + 'static,
    {
        self.push(None, Self::value_kind(name, parser))
    }

    /// `count` fields of `width` columns each, collected into a `Vec<T>`
    pub fn multi_value<T, P>(self, count: usize, width: usize, name: &str, parser: P) -> Self
    where
        T: Send + Sync + 'static,
        P: Fn(&str) -> ParseResult<T> + Send + Sync + 'static,
    {
        self.value(count * width, name, segment_list(width, parser))
    }

    /// An `i32` field
    pub fn integer(self, length: usize, name: &str) -> Self {
        self.value(length, name, integer)
    }

    /// An `f32` field
    pub fn floating(self, length: usize, name: &str) -> Self {
        self.value(length, name, float)
    }

    /// A `String` field with surrounding whitespace removed
    pub fn stripped(self, length: usize, name: &str) -> Self {
        self.value(length, name, stripped)
    }

    /// A `String` field taking the rest of the line, surrounding whitespace removed
    pub fn stripped_rest(self, name: &str) -> Self {
        self.rest(name, stripped)
    }

    fn value_kind<T, P>(name: &str, parser: P) -> SegmentKind
    where
        T: Send + Sync + 'static,
        P: Fn(&str) -> ParseResult<T> + Send + Sync + 'static,
    {
        SegmentKind::Value {
            name: name.to_string(),
            parser: Arc::new(move |s: &str| {
                parser(s).map(|value| Box::new(value) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// Stop reading when the raw line matches
    pub fn stop_line(mut self, hook: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.stop_line = Some(Box::new(hook));
        self
    }

    /// Skip the line when the raw line matches
    pub fn ignore_line(mut self, hook: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.ignored_line = Some(Box::new(hook));
        self
    }

    /// Stop reading when the segments match
    pub fn stop_segment(
        mut self,
        hook: impl Fn(&Segments<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.stop_segment = Some(Box::new(hook));
        self
    }

    /// Skip the line when the segments match
    pub fn ignore_segment(
        mut self,
        hook: impl Fn(&Segments<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.ignored_segment = Some(Box::new(hook));
        self
    }

    /// Stop reading when the parsed entry matches
    pub fn stop_entry(mut self, hook: impl Fn(&ParsedEntry) -> bool + Send + Sync + 'static) -> Self {
        self.stop_entry = Some(Box::new(hook));
        self
    }

    /// Skip the line when the parsed entry matches
    pub fn ignore_entry(
        mut self,
        hook: impl Fn(&ParsedEntry) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.ignored_entry = Some(Box::new(hook));
        self
    }

    /// Slice a line into segment text
    pub fn segmentize(&self, line: &str) -> Vec<Option<String>> {
        let chars: Vec<char> = line.chars().collect();
        let mut position = 0;
        self.segments
            .iter()
            .map(|segment| {
                if position >= chars.len() {
                    return None;
                }
                let end = match segment.length {
                    Some(length) if position + length < chars.len() => position + length,
                    _ => chars.len(),
                };
                let text: String = chars[position..end].iter().collect();
                position = end;
                Some(text)
            })
            .collect()
    }

    fn parse_segments(
        &self,
        segments: &[Option<String>],
        line_number: usize,
    ) -> Result<ParsedEntry> {
        let mut values = HashMap::new();
        for (segment, text) in self.segments.iter().zip(segments) {
            let (SegmentKind::Value { name, parser }, Some(text)) = (&segment.kind, text) else {
                continue;
            };
            let value = parser(text.as_str())
                .map_err(|error| Error::line_parse(line_number, Some(name.as_str()), error.into()))?;
            values.insert(name.clone(), value);
        }
        Ok(ParsedEntry {
            values,
            line_number,
        })
    }

    /// Parse a single line as line 1
    pub fn parse_line(&self, line: &str) -> Result<ParsedEntry> {
        if let Some(message) = &self.layout_error {
            return Err(Error::configuration(message.clone()));
        }
        self.parse_segments(&self.segmentize(line), 1)
    }

    /// Parse every record and fold it into `init`
    ///
    /// The fold receives the entry, the accumulator and the physical line number.
    pub fn parse<R, A, F>(&self, input: R, init: A, mut fold: F) -> Result<A>
    where
        R: BufRead,
        F: FnMut(ParsedEntry, A, usize) -> Result<A>,
    {
        if let Some(message) = &self.layout_error {
            return Err(Error::configuration(message.clone()));
        }

        let mut result = init;
        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let line =
                line.map_err(|e| Error::io(format!("Failed to read line {}", line_number), e))?;

            if self.stop_line.as_ref().is_some_and(|hook| hook(line.as_str())) {
                debug!("Stop line at {}", line_number);
                break;
            }
            if self.ignored_line.as_ref().is_some_and(|hook| hook(line.as_str())) {
                continue;
            }

            let segments = self.segmentize(&line);
            let view = Segments {
                segments: &segments,
            };
            if self.stop_segment.as_ref().is_some_and(|hook| hook(&view)) {
                debug!("Stop segment at {}", line_number);
                break;
            }
            if self.ignored_segment.as_ref().is_some_and(|hook| hook(&view)) {
                continue;
            }

            let entry = self.parse_segments(&segments, line_number)?;
            if self.stop_entry.as_ref().is_some_and(|hook| hook(&entry)) {
                debug!("Stop entry at {}", line_number);
                break;
            }
            if self.ignored_entry.as_ref().is_some_and(|hook| hook(&entry)) {
                continue;
            }

            result = fold(entry, result, line_number).map_err(|error| match error {
                Error::LineParse { .. } => error,
                other => Error::line_parse(line_number, None, other),
            })?;
        }
        Ok(result)
    }

    /// Parse every record into a list of entries
    pub fn parse_all<R: BufRead>(&self, input: R) -> Result<Vec<ParsedEntry>> {
        self.parse(input, Vec::new(), |entry, mut entries, _| {
            entries.push(entry);
            Ok(entries)
        })
    }
}
