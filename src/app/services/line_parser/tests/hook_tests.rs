//! Tests for parse loop hooks, fold and line numbering

use super::*;
use crate::Error;
use crate::app::services::line_parser::{LineParser, Segments};

fn create_test_parser() -> LineParser {
    LineParser::new().integer(3, "value").space(1).stripped_rest("label")
}

#[test]
fn test_fold_receives_physical_line_numbers() {
    let parser = create_test_parser().ignore_line(|line| line.trim().is_empty());
    let input = create_test_input("  1 a\n\n  3 c\n");

    let lines = parser
        .parse(input, Vec::new(), |entry, mut acc, line| {
            assert_eq!(entry.line_number(), line);
            acc.push((line, entry.value::<i32>("value")?));
            Ok(acc)
        })
        .unwrap();

    assert_eq!(lines, vec![(1, 1), (3, 3)]);
}

#[test]
fn test_stop_line_ends_parsing() {
    let parser = create_test_parser().stop_line(|line| line.starts_with("999"));
    let input = create_test_input("  1 a\n999 stop\n  x not parsed\n");

    let entries = parser.parse_all(input).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_segment_hooks() {
    let parser = create_test_parser()
        .stop_segment(|segments: &Segments<'_>| segments.text(2).trim() == "Z")
        .ignore_segment(|segments: &Segments<'_>| segments.text(0).trim().is_empty());
    let input = create_test_input("  1 a\n    ignored\n  2 b\n  3 Z\n  x never\n");

    let entries = parser.parse_all(input).unwrap();
    let values: Vec<i32> = entries
        .iter()
        .map(|entry| entry.value::<i32>("value").unwrap())
        .collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_entry_hooks() {
    let parser = create_test_parser()
        .ignore_entry(|entry| entry.value::<i32>("value").map(|v| v == 2).unwrap_or(false))
        .stop_entry(|entry| entry.value::<i32>("value").map(|v| v >= 4).unwrap_or(false));
    let input = create_test_input("  1 a\n  2 b\n  3 c\n  4 d\n  5 e\n");

    let entries = parser.parse_all(input).unwrap();
    let values: Vec<i32> = entries
        .iter()
        .map(|entry| entry.value::<i32>("value").unwrap())
        .collect();
    assert_eq!(values, vec![1, 3]);
}

#[test]
fn test_fold_error_is_wrapped_with_line() {
    let parser = create_test_parser();
    let input = create_test_input("  1 a\n  2 b\n");

    let error = parser
        .parse(input, 0, |entry, acc, _| {
            let value = entry.value::<i32>("value")?;
            if value == 2 {
                return Err(Error::resource_validation("two is not allowed"));
            }
            Ok(acc + value)
        })
        .unwrap_err();

    match error {
        Error::LineParse { line, field, source } => {
            assert_eq!(line, 2);
            assert!(field.is_none());
            assert!(matches!(*source, Error::ResourceValidation { .. }));
        }
        other => panic!("Unexpected error {:?}", other),
    }
}

#[test]
fn test_windows_line_endings() {
    let parser = create_test_parser();
    let input = create_test_input("  1 a\r\n  2 b\r\n");

    let entries = parser.parse_all(input).unwrap();
    assert_eq!(entries[1].value::<String>("label").unwrap(), "b");
}
