//! Tests for coefficients keyed by species alone

use super::*;
use crate::app::services::coefficient_parsers::{BySpeciesDqParser, SpeciesCoefficientParser};

fn dq_line(index: i32, indicator: i32, values: &[&str]) -> String {
    format!(" {}{:>2}{}\n", index, indicator, columns(9, values))
}

#[test]
fn test_parse_by_species_dq() {
    let text = [
        dq_line(0, 1, &["-0.48275", "0.19886", "0.23162"]),
        dq_line(1, 1, &["1.0", "2.0", "3.0"]),
        dq_line(2, 0, &["0.6"]),
        "   \n".to_string(),
        dq_line(2, 0, &["9.9"]),
    ]
    .concat();

    let table = BySpeciesDqParser::new()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    let ac = &table["AC"];
    assert_eq!(ac.from(), 0);
    assert_eq!(ac.coe(0).unwrap(), -0.48275);
    assert_eq!(ac.coe(1).unwrap(), 1.0);
    assert_eq!(ac.coe(2).unwrap(), 0.6);

    let c = &table["C"];
    assert_eq!(c.coe(0).unwrap(), 0.23162);
    assert_eq!(c.coe(1).unwrap(), 3.0);
    assert_eq!(c.coe(2).unwrap(), 0.6);
}

#[test]
fn test_by_species_dq_needs_value_per_species() {
    let text = dq_line(0, 1, &["1.0", "2.0"]);
    let error = BySpeciesDqParser::new()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("Expected 3 coefficients but there were 2"));
}

#[test]
fn test_by_species_dq_index_range() {
    let text = dq_line(3, 0, &["1.0"]);
    let error = BySpeciesDqParser::new()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("3 is not a valid coefficient index"));
}

#[test]
fn test_parse_small_component_probability() {
    let text = [
        format!("{:<2}{}\n", "AC", columns(10, &["-1.7", "0.2", "0.3", "-0.004"])),
        format!("{:<2}{}\n", "", columns(10, &["9.0", "9.0", "9.0", "9.0"])),
        format!("{:<2}{}\n", "C", columns(10, &["1.0", "2.0", "3.0", "4.0"])),
    ]
    .concat();

    let table = SpeciesCoefficientParser::small_comp_probability()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    assert_eq!(table["AC"].from(), 1);
    assert_eq!(table["AC"].coe(1).unwrap(), -1.7);
    assert_eq!(table["AC"].coe(4).unwrap(), -0.004);
    assert_eq!(table["C"].sum(), 10.0);

    // Species without a row get zeros
    assert_eq!(table["B"].size(), 4);
    assert_eq!(table["B"].sum(), 0.0);
}

#[test]
fn test_small_component_coefficient_count() {
    let text = format!("{:<2}{}\n", "B", columns(10, &["1.0"]));
    let error = SpeciesCoefficientParser::small_comp_dq()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("Expected 2 coefficients but there were 1"));
}

#[test]
fn test_parse_net_decay_waste_from_zero() {
    let values = ["-4.2", "11.2", "-0.09", "1.0", "-0.3", "0.01"];
    let text = format!("{:<2}{}\n", "B", columns(9, &values));

    let table = SpeciesCoefficientParser::volume_net_decay_waste()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    assert_eq!(table["B"].from(), 0);
    assert_eq!(table["B"].coe(0).unwrap(), -4.2);
    assert_eq!(table["B"].coe(5).unwrap(), 0.01);
    assert!(table["B"].coe(6).is_err());
}

#[test]
fn test_unknown_species_row() {
    let text = format!("{:<2}{}\n", "XX", columns(10, &["1.0", "2.0", "3.0", "4.0"]));
    let error = SpeciesCoefficientParser::veteran_layer_volume_adjust()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("XX is not a valid species"));
}
