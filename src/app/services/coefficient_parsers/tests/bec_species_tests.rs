//! Tests for coefficients keyed by BEC zone and species

use super::*;
use crate::app::services::coefficient_parsers::BecSpeciesCoefficientParser;

fn bec_line(bec: &str, index: i32, indicator: i32, values: &[&str]) -> String {
    format!("{:<4}  {}{:>2}{}\n", bec, index, indicator, columns(8, values))
}

#[test]
fn test_delta_indicators() {
    let text = [
        bec_line("CWH", 0, 0, &["2.0"]),
        bec_line("CWH", 1, 1, &["1.0", "0.5", "-0.5"]),
        bec_line("CWH", 2, 2, &["1.0", "2.0", "3.0"]),
        "    \n".to_string(),
        bec_line("ESSF", 0, 0, &["9.0"]),
    ]
    .concat();

    let table = BecSpeciesCoefficientParser::coe_ba()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    let cwh_b = table.get(&key("CWH"), &key("B")).unwrap();
    assert_eq!(cwh_b.size(), 10);
    assert_eq!(cwh_b.from(), 0);
    assert_eq!(cwh_b.coe(0).unwrap(), 2.0);
    assert_eq!(cwh_b.coe(1).unwrap(), 1.5);
    assert_eq!(cwh_b.coe(2).unwrap(), 2.0);

    let cwh_ac = table.get(&key("CWH"), &key("AC")).unwrap();
    assert_eq!(cwh_ac.coe(1).unwrap(), 1.0);
    let cwh_c = table.get(&key("CWH"), &key("C")).unwrap();
    assert_eq!(cwh_c.coe(1).unwrap(), 0.5);
    assert_eq!(cwh_c.coe(2).unwrap(), 3.0);

    // Nothing after the blank-prefixed line is read
    let essf = table.get(&key("ESSF"), &key("AC")).unwrap();
    assert_eq!(essf.coe(0).unwrap(), 0.0);
}

#[test]
fn test_invalid_bec() {
    let text = bec_line("IDF", 0, 0, &["1.0"]);
    let error = BecSpeciesCoefficientParser::coe_dq()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("IDF is not a valid BEC alias"));
}

#[test]
fn test_per_species_flag() {
    let text = [
        "    comment line ignored\n".to_string(),
        bec_line("AT", 0, 0, &["4.0", "99.0"]),
        bec_line("AT", 6, 1, &["1.0", "2.0", "3.0"]),
    ]
    .concat();

    let table = BecSpeciesCoefficientParser::ba_yield()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap();

    let at_c = table.get(&key("AT"), &key("C")).unwrap();
    assert_eq!(at_c.size(), 7);
    assert_eq!(at_c.coe(0).unwrap(), 4.0);
    assert_eq!(at_c.coe(6).unwrap(), 3.0);
}

#[test]
fn test_per_species_flag_rejects_delta_indicator() {
    let text = bec_line("AT", 0, 2, &["1.0", "2.0", "3.0"]);
    let error = BecSpeciesCoefficientParser::dq_yield()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("2 is not a valid indicator, should be 0 or 1"));
}

#[test]
fn test_coefficient_index_out_of_range() {
    let text = bec_line("AT", 6, 0, &["1.0"]);
    let error = BecSpeciesCoefficientParser::dq_yield()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("6 is not a valid coefficient index"));
}

#[test]
fn test_too_few_species_values() {
    let text = bec_line("CWH", 3, 2, &["1.0", "2.0"]);
    let error = BecSpeciesCoefficientParser::coe_ba()
        .parse_coefficients(&mut create_test_input(&text), &create_test_control_map())
        .unwrap_err();
    assert!(error.to_string().contains("Expected 3 coefficients but there were 2"));
}
