//! Tests for the basal area and diameter upper bounds parser

use super::*;
use crate::app::services::coefficient_parsers::UpperBoundsParser;
use crate::constants::upper_bounds::{DEFAULT_BA, DEFAULT_DQ};

fn bound_line(group: &str, max_ba: &str, max_dq: &str) -> String {
    format!("{:>3}{:>8} {:>8}\n", group, max_ba, max_dq)
}

#[test]
fn test_parse_upper_bounds() {
    let text = [
        bound_line("1", "74.78", "76.10"),
        bound_line("0", "1.0", "1.0"),
        bound_line("", "2.0", "2.0"),
        bound_line("180", "49.87", "34.05"),
    ]
    .concat();

    let bounds = UpperBoundsParser::new(180)
        .parse_bounds(&mut create_test_input(&text))
        .unwrap();

    assert_eq!(bounds.len(), 180);
    assert_eq!(bounds[&1].as_slice(), &[74.78, 76.10]);
    assert_eq!(bounds[&180].coe(2).unwrap(), 34.05);

    let missing = &bounds[&2];
    assert_eq!(missing.from(), 1);
    assert_eq!(missing.coe(1).unwrap(), DEFAULT_BA);
    assert_eq!(missing.coe(2).unwrap(), DEFAULT_DQ);
}

#[test]
fn test_group_out_of_range() {
    let text = bound_line("181", "1.0", "1.0");
    let error = UpperBoundsParser::new(180)
        .parse_bounds(&mut create_test_input(&text))
        .unwrap_err();
    assert!(
        error
            .to_string()
            .contains("Basal Area Group Id 181 is out of range; expecting a value from 1 to 180")
    );
}
