//! Tests for the site curve number and site curve age maximum parsers

use super::*;
use crate::app::services::coefficient_parsers::{SiteCurveAgeMaximumParser, SiteCurveParser};
use crate::app::services::control_map::{ControlMapModifier, ControlValue};
use crate::constants::site_curve::{AGE_SUBSTITUTE, DEFAULT_MAX_AGE};
use crate::MemoryResolver;

fn curve_line(species: &str, coastal: i32, interior: i32) -> String {
    format!("{:<3}{:>3}{:>3}\n", species, coastal, interior)
}

fn age_line(site_curve: i32, values: &[&str]) -> String {
    format!("{:>3}{}\n", site_curve, columns(7, values))
}

#[test]
fn test_parse_site_curve_numbers() {
    let text = [
        "# Site curves by species\n".to_string(),
        curve_line("AC", 11, 12),
        "  indented comment\n".to_string(),
        curve_line("B", 21, 22),
        "\n".to_string(),
        curve_line("C", 31, 32),
        "##\n".to_string(),
        curve_line("XX", 1, 1),
    ]
    .concat();

    let numbers = SiteCurveParser::new()
        .parse_numbers(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    assert_eq!(*numbers.get(&key("AC"), &Region::Coastal).unwrap(), Some(11));
    assert_eq!(*numbers.get(&key("AC"), &Region::Interior).unwrap(), Some(12));
    assert_eq!(*numbers.get(&key("C"), &Region::Interior).unwrap(), Some(32));
    assert!(numbers.get(&key("XX"), &Region::Coastal).is_err());
}

#[test]
fn test_extra_species_are_kept() {
    let text = [
        curve_line("AC", 11, 12),
        curve_line("B", 21, 22),
        curve_line("C", 31, 32),
        curve_line("FD", 41, 42),
    ]
    .concat();

    let numbers = SiteCurveParser::new()
        .parse_numbers(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    assert_eq!(*numbers.get(&key("FD"), &Region::Coastal).unwrap(), Some(41));
}

#[test]
fn test_missing_species_site_curves() {
    let text = [curve_line("AC", 11, 12), curve_line("B", 21, 22)].concat();

    let error = SiteCurveParser::new()
        .parse_numbers(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("Missing expected entries for C"));
}

#[test]
fn test_site_curves_are_optional() {
    let mut map = create_test_control_map();
    map.insert(ControlKey::SiteCurveNumbers, ControlValue::Absent);

    SiteCurveParser::new()
        .modify(&mut map, &MemoryResolver::new())
        .unwrap();

    let numbers = map
        .expect::<crate::app::services::control_map::control_value::SiteCurveNumbers>(
            ControlKey::SiteCurveNumbers,
        )
        .unwrap();
    assert!(numbers.is_empty());
}

#[test]
fn test_parse_age_maximums() {
    let text = [
        age_line(-1, &["140.0", "140.0", "0.0", "0.0"]),
        age_line(1, &["0.0", "120.0", "1.5", "2.5"]),
        "999 end of table\n".to_string(),
        age_line(2, &["1.0", "1.0", "1.0", "1.0"]),
    ]
    .concat();

    let maximums = SiteCurveAgeMaximumParser::new(40)
        .parse_maximums(&mut create_test_input(&text))
        .unwrap();

    assert!(maximums.contains(0));
    assert!(maximums.contains(140));
    assert_eq!(maximums.get(0).age_maximum(Region::Coastal), 140.0);

    let first = maximums.get(1);
    assert_eq!(first.age_coastal, AGE_SUBSTITUTE);
    assert_eq!(first.age_maximum(Region::Interior), 120.0);
    assert_eq!(first.t1, 1.5);
    assert_eq!(first.t2, 2.5);

    // The catch-all row stops at 140, so curve 141 takes the defaults
    assert!(!maximums.contains(141));
    assert_eq!(maximums.get(141).age_coastal, DEFAULT_MAX_AGE);
}

#[test]
fn test_site_curve_out_of_range() {
    let text = age_line(41, &["140.0", "140.0", "0.0", "0.0"]);
    let error = SiteCurveAgeMaximumParser::new(40)
        .parse_maximums(&mut create_test_input(&text))
        .unwrap_err();
    assert!(
        error
            .to_string()
            .contains("Site curve number must be in the range -1 to 40 inclusive")
    );
}
