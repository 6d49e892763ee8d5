//! Tests for the coefficient resource parsers
//!
//! Every parser is exercised against a control map holding three BEC zones
//! (AT, CWH, ESSF) and three genera (AC, B, C) in that preference order.

use crate::app::models::{BecDefinition, BecLookup, GenusDefinition, GenusDefinitionMap, Region};
use crate::app::services::control_map::{ControlKey, ControlMap};
use crate::config::VdypApplication;
use std::io::Cursor;

pub mod bec_species_tests;
pub mod by_species_tests;
pub mod definition_tests;
pub mod modifier_file_tests;
pub mod site_curve_tests;
pub mod stocking_tests;
pub mod upper_bounds_tests;

/// Wrap text as a buffered reader
pub fn create_test_input(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}

/// BEC lookup with the non-growth zone AT, a coastal zone and an interior zone
pub fn create_test_becs() -> BecLookup {
    BecLookup::new(
        vec![
            BecDefinition::new("AT", Region::Interior, "Alpine Tundra")
                .with_capabilities(false, true, true),
            BecDefinition::new("CWH", Region::Coastal, "Coastal Western Hemlock"),
            BecDefinition::new("ESSF", Region::Interior, "Engelmann Spruce"),
        ],
        "ESSF",
    )
}

/// Three genera in preference order
pub fn create_test_genera() -> GenusDefinitionMap {
    GenusDefinitionMap::new(vec![
        GenusDefinition::new("AC", 1, "Cottonwood"),
        GenusDefinition::new("B", 2, "Balsam"),
        GenusDefinition::new("C", 3, "Cedar"),
    ])
}

/// Control map with the BEC and genus definitions already resolved
pub fn create_test_control_map() -> ControlMap {
    create_test_control_map_for(VdypApplication::Forward)
}

pub fn create_test_control_map_for(application: VdypApplication) -> ControlMap {
    let mut map = ControlMap::new(application);
    map.insert(ControlKey::BecDef, create_test_becs());
    map.insert(ControlKey::Sp0Def, create_test_genera());
    map
}

/// Right-align each value in a column of `width`
pub fn columns(width: usize, values: &[&str]) -> String {
    values.iter().map(|value| format!("{:>width$}", value, width = width)).collect()
}

pub fn key(alias: &str) -> String {
    alias.to_string()
}
