//! Tests for the BEC and genus definition parsers

use super::*;
use crate::app::models::Substitution;
use crate::app::services::coefficient_parsers::{BecDefinitionParser, GenusDefinitionParser};

const BEC_FILE: &str = "\
AT   I Alpine Tundra
CWH  C Coastal Western Hemlock
ESSF I Engelmann Spruce -- Subalpine Fir
     Z
XX   I Never read
";

fn genus_line(alias: &str, name: &str, preference: &str) -> String {
    format!("{:<2} {:<32} {:>2}\n", alias, name, preference)
}

#[test]
fn test_parse_bec_definitions() {
    let parser = BecDefinitionParser::new("ESSF");
    let lookup = parser.parse_lookup(&mut create_test_input(BEC_FILE)).unwrap();

    assert_eq!(lookup.aliases(), vec!["AT", "CWH", "ESSF"]);
    assert_eq!(lookup.default_alias(), "ESSF");
    assert_eq!(lookup.for_region(Region::Coastal).len(), 1);

    let tundra = lookup.get("AT", Substitution::PartialFillOk).unwrap().unwrap();
    assert_eq!(tundra.name, "Alpine Tundra");
    assert!(!tundra.is_growth());
    assert!(tundra.is_volume());
    assert!(lookup.get("XX", Substitution::PartialFillOk).unwrap().is_none());
}

#[test]
fn test_missing_default_bec() {
    let parser = BecDefinitionParser::new("IDF");
    let error = parser.parse_lookup(&mut create_test_input(BEC_FILE)).unwrap_err();
    assert!(error.to_string().contains("Could not find default BEC IDF"));
}

#[test]
fn test_default_bec_must_have_growth_equations() {
    let parser = BecDefinitionParser::new("AT");
    let error = parser.parse_lookup(&mut create_test_input(BEC_FILE)).unwrap_err();
    assert!(error.to_string().contains("Default BEC AT is not a growth BEC."));
}

#[test]
fn test_parse_genera_in_preference_order() {
    let text = [
        genus_line("C", "Cedar", "3"),
        genus_line("AC", "Cottonwood", "1"),
        genus_line("B", "Balsam", "2"),
    ]
    .concat();

    let genera = GenusDefinitionParser::new(3)
        .parse_genera(&mut create_test_input(&text))
        .unwrap();

    assert_eq!(genera.aliases(), vec!["AC", "B", "C"]);
    assert_eq!(genera.get("C").unwrap().name, "Cedar");
    assert_eq!(genera.index_of("B").unwrap(), 2);
}

#[test]
fn test_blank_preference_uses_line_number() {
    let text = [
        genus_line("AC", "Cottonwood", ""),
        genus_line("B", "Balsam", " 0"),
    ]
    .concat();

    let genera = GenusDefinitionParser::new(2)
        .parse_genera(&mut create_test_input(&text))
        .unwrap();

    assert_eq!(genera.by_index(1).unwrap().alias, "AC");
    assert_eq!(genera.by_index(2).unwrap().alias, "B");
}

#[test]
fn test_duplicate_preference() {
    let text = [
        genus_line("AC", "Cottonwood", "1"),
        genus_line("B", "Balsam", "1"),
    ]
    .concat();

    let error = GenusDefinitionParser::new(2)
        .parse_genera(&mut create_test_input(&text))
        .unwrap_err();

    assert!(matches!(error, crate::Error::LineParse { line: 2, .. }));
    assert!(error.to_string().contains("Preference 1 has already been set to AC"));
}

#[test]
fn test_preference_out_of_range() {
    let text = genus_line("AC", "Cottonwood", "4");
    let error = GenusDefinitionParser::new(3)
        .parse_genera(&mut create_test_input(&text))
        .unwrap_err();
    assert!(error.to_string().contains("Preference 4 is larger than 3"));
}

#[test]
fn test_missing_genera() {
    let text = genus_line("AC", "Cottonwood", "1");
    let error = GenusDefinitionParser::new(3)
        .parse_genera(&mut create_test_input(&text))
        .unwrap_err();
    assert!(error.to_string().contains("Not all genus definitions were provided."));
}
