//! Tests for segment extraction and value parsing

use super::*;
use crate::Error;
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{float, integer, optional, range};

#[test]
fn test_segmentize_short_line() {
    let parser = LineParser::new().integer(3, "a").space(1).integer(3, "b");

    let segments = parser.segmentize("12  4");
    assert_eq!(
        segments,
        vec![Some("12 ".to_string()), Some(" ".to_string()), Some("4".to_string())]
    );

    // A segment that reaches the end of the line takes what is left
    let segments = parser.segmentize("12 4");
    assert_eq!(
        segments,
        vec![Some("12 ".to_string()), Some("4".to_string()), None]
    );

    let segments = parser.segmentize("12");
    assert_eq!(segments, vec![Some("12".to_string()), None, None]);
}

#[test]
fn test_bounded_segments_ignore_trailing_text() {
    let parser = LineParser::new().stripped(2, "a").stripped(3, "b");

    let segments = parser.segmentize("ab cdefgh");
    assert_eq!(segments, vec![Some("ab".to_string()), Some(" cd".to_string())]);

    let parser = parser.stripped_rest("c");
    let segments = parser.segmentize("ab cdefgh");
    assert_eq!(segments[2], Some("efgh".to_string()));
}

#[test]
fn test_parse_line_values() {
    let parser = LineParser::new()
        .integer(3, "index")
        .space(1)
        .floating(6, "factor")
        .stripped_rest("name");

    let entry = parser.parse_line(" 12   1.5 Some name  ").unwrap();
    assert_eq!(entry.value::<i32>("index").unwrap(), 12);
    assert_eq!(entry.value::<f32>("factor").unwrap(), 1.5);
    assert_eq!(entry.value::<String>("name").unwrap(), "Some name");
}

#[test]
fn test_missing_segments_are_absent() {
    let parser = LineParser::new()
        .integer(3, "index")
        .value(4, "extra", optional(float));

    let entry = parser.parse_line("  7").unwrap();
    assert!(entry.contains("index"));
    assert!(!entry.contains("extra"));
    assert_eq!(entry.value_or::<Option<f32>>("extra", None).unwrap(), None);
    assert!(entry.value::<Option<f32>>("extra").is_err());
}

#[test]
fn test_multi_value() {
    let parser = LineParser::new()
        .stripped(2, "sp")
        .multi_value(3, 4, "coe", float);

    let entry = parser.parse_line("AB 1.0 2.0 3.0").unwrap();
    assert_eq!(entry.value::<Vec<f32>>("coe").unwrap(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_wrong_type_requested() {
    let parser = LineParser::new().integer(3, "index");
    let entry = parser.parse_line("  1").unwrap();
    assert!(entry.value::<f32>("index").is_err());
}

#[test]
fn test_value_error_carries_line_and_field() {
    let parser = LineParser::new().integer(3, "index").space(1).value(
        3,
        "count",
        range(integer, 0, true, 10, true, "count"),
    );

    let input = create_test_input("  1   2\n  2  99\n");
    let error = parser.parse_all(input).unwrap_err();

    match &error {
        Error::LineParse { line, field, .. } => {
            assert_eq!(*line, 2);
            assert_eq!(field.as_deref(), Some("count"));
        }
        other => panic!("Unexpected error {:?}", other),
    }
    assert_eq!(
        error.to_string(),
        "Error at line 2 (field count): count must be less than or equal to 10."
    );
}

#[test]
fn test_segment_after_unbounded_is_rejected() {
    let parser = LineParser::new().stripped_rest("name").integer(2, "after");
    let result = parser.parse_all(create_test_input("x\n"));
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_take_moves_value_out() {
    let parser = LineParser::new().stripped(4, "alias");
    let mut entry = parser.parse_line("ESSF").unwrap();
    assert_eq!(entry.take::<String>("alias").unwrap(), "ESSF");
    assert!(!entry.contains("alias"));
}
