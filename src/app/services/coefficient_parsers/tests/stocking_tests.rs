//! Tests for the stocking class factor parser

use super::*;
use crate::app::services::coefficient_parsers::StockingClassFactorParser;

fn stocking_line(class: &str, region: &str, factor: &str, npct: i32) -> String {
    format!("{} {} P  0{:>6}{:>5}\n", class, region, factor, npct)
}

#[test]
fn test_parse_stocking_class_factors() {
    let text = [
        stocking_line("A", "C", "1.10", 100),
        stocking_line("A", "I", "0.90", 95),
        "\n".to_string(),
        stocking_line("R", "I", "0.75", 60),
        stocking_line(" ", "I", "9.99", 1),
        stocking_line("Z", "C", "0.00", 0),
        stocking_line("B", "C", "2.00", 50),
    ]
    .concat();

    let factors = StockingClassFactorParser::new()
        .parse_factors(&mut create_test_input(&text))
        .unwrap();

    assert_eq!(factors.keys1(), &['A', 'R']);

    let coastal = factors.get(&'A', &Region::Coastal).unwrap().unwrap();
    assert_eq!(coastal.factor, 1.10);
    assert_eq!(coastal.npct_area, 100);
    assert_eq!(coastal.stocking_class, 'A');

    let interior = factors.get(&'R', &Region::Interior).unwrap().unwrap();
    assert_eq!(interior.factor, 0.75);
    assert_eq!(interior.region, Region::Interior);

    assert_eq!(*factors.get(&'R', &Region::Coastal).unwrap(), None);
    assert!(factors.get(&'B', &Region::Coastal).is_err());
}

#[test]
fn test_lowercase_z_ends_table() {
    let text = [stocking_line("z", "C", "1.00", 1), stocking_line("A", "C", "1.00", 1)].concat();
    let factors = StockingClassFactorParser::new()
        .parse_factors(&mut create_test_input(&text))
        .unwrap();
    assert!(factors.keys1().is_empty());
}

#[test]
fn test_invalid_region() {
    let text = stocking_line("A", "X", "1.00", 1);
    let error = StockingClassFactorParser::new()
        .parse_factors(&mut create_test_input(&text))
        .unwrap_err();
    assert!(error.to_string().contains("X is not a valid region identifier"));
}
