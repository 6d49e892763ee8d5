//! Tests for the modifier file

use super::*;
use crate::MemoryResolver;
use crate::app::models::{Coefficients, InputFileDescriptor, MatrixMap2, MatrixMap3, NonprimaryHlCoefficients};
use crate::app::services::coefficient_parsers::ModifierFileParser;
use crate::app::services::coefficient_parsers::modifier_file::ModifierLine;
use crate::app::services::control_map::control_value::{
    NonprimaryHlTable, SpeciesRegionCoefficients, SpeciesRegionFactors,
};
use crate::app::services::control_map::{ControlMapModifier, ControlValue};

/// A modifier line with flags for FIPSTART, VRISTART and VDYP Forward
fn mod_line(sequence: i32, flags: [i32; 3], mods: &[&str]) -> String {
    format!(
        "{:>3}{:>2}{:>2}{:>2}{:>2}{:>2}{:>2}{}\n",
        sequence,
        flags[0],
        flags[1],
        flags[2],
        0,
        0,
        0,
        columns(6, mods)
    )
}

fn coefficients_table(values: Vec<f32>) -> SpeciesRegionCoefficients {
    MatrixMap2::with_generator(
        create_test_genera().aliases(),
        Region::ALL,
        Coefficients::empty(values.len(), 1),
        |_, _| Coefficients::new(values.clone(), 1),
    )
}

/// Control map with the height and veteran tables a modifier file adjusts
fn create_modifiable_map(application: VdypApplication) -> ControlMap {
    let mut map = create_test_control_map_for(application);
    map.insert(ControlKey::HlPrimarySpEqnP1, coefficients_table(vec![1.0, 2.0, 3.0]));
    map.insert(ControlKey::HlPrimarySpEqnP2, coefficients_table(vec![1.0, 2.0]));
    map.insert(ControlKey::HlPrimarySpEqnP3, coefficients_table(vec![1.0, 2.0, 3.0, 4.0]));
    map.insert(ControlKey::VeteranBq, coefficients_table(vec![2.0, 3.0, 4.0]));

    let aliases = create_test_genera().aliases();
    let mut nonprimary: NonprimaryHlTable = MatrixMap3::new(aliases.clone(), aliases, Region::ALL, None);
    for (equation, primary) in [(1, "B"), (2, "C")] {
        for region in Region::ALL {
            nonprimary
                .put(
                    &key("AC"),
                    &key(primary),
                    &region,
                    Some(NonprimaryHlCoefficients::new(Coefficients::new(vec![1.0, 1.0], 1), equation)),
                )
                .unwrap();
        }
    }
    map.insert(ControlKey::HlNonprimary, nonprimary);
    map
}

fn apply_text(map: &mut ControlMap, text: &str) {
    let resolver = MemoryResolver::new().with_file("mod.dat", text).unwrap();
    map.insert(ControlKey::ModifierFile, ControlValue::FileName("mod.dat".to_string()));
    ModifierFileParser::new(map.application())
        .modify(map, &resolver)
        .unwrap();
}

fn factor(map: &ControlMap, table: ControlKey, sp0: &str, region: Region) -> f32 {
    *map.expect::<SpeciesRegionFactors>(table)
        .unwrap()
        .get(&key(sp0), &region)
        .unwrap()
}

fn coefficient(map: &ControlMap, table: ControlKey, sp0: &str, region: Region, index: i32) -> f32 {
    map.expect::<SpeciesRegionCoefficients>(table)
        .unwrap()
        .get(&key(sp0), &region)
        .unwrap()
        .coe(index)
        .unwrap()
}

#[test]
fn test_defaults_without_file() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    map.insert(ControlKey::ModifierFile, ControlValue::Absent);

    ModifierFileParser::new(VdypApplication::Forward)
        .modify(&mut map, &MemoryResolver::new())
        .unwrap();

    assert!(map.get(ControlKey::ModifierFile).unwrap().is_absent());
    for sp0 in ["AC", "B", "C"] {
        for region in Region::ALL {
            assert_eq!(factor(&map, ControlKey::BaModifiers, sp0, region), 1.0);
            assert_eq!(factor(&map, ControlKey::DqModifiers, sp0, region), 1.0);
            assert_eq!(factor(&map, ControlKey::DecayModifiers, sp0, region), 0.0);
            assert_eq!(factor(&map, ControlKey::WasteModifiers, sp0, region), 0.0);
        }
    }
}

#[test]
fn test_ba_and_dq_modifiers_for_one_species() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    apply_text(&mut map, &mod_line(201, [1, 1, 1], &["0.9", "0.8", "1.1", "1.2"]));

    assert_eq!(factor(&map, ControlKey::BaModifiers, "AC", Region::Coastal), 0.9);
    assert_eq!(factor(&map, ControlKey::BaModifiers, "AC", Region::Interior), 0.8);
    assert_eq!(factor(&map, ControlKey::DqModifiers, "AC", Region::Coastal), 1.1);
    assert_eq!(factor(&map, ControlKey::DqModifiers, "AC", Region::Interior), 1.2);
    assert_eq!(factor(&map, ControlKey::BaModifiers, "B", Region::Coastal), 1.0);

    let descriptor = map.expect::<InputFileDescriptor>(ControlKey::ModifierFile).unwrap();
    assert_eq!(descriptor.name, "mod.dat");
    assert_eq!(descriptor.description, "memory:mod.dat");
}

#[test]
fn test_decay_and_waste_for_all_species() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    apply_text(&mut map, &mod_line(300, [0, 0, 1], &["0.1", "0.2", "0.3", "0.4"]));

    for sp0 in ["AC", "B", "C"] {
        assert_eq!(factor(&map, ControlKey::DecayModifiers, sp0, Region::Coastal), 0.1);
        assert_eq!(factor(&map, ControlKey::DecayModifiers, sp0, Region::Interior), 0.2);
        assert_eq!(factor(&map, ControlKey::WasteModifiers, sp0, Region::Coastal), 0.3);
        assert_eq!(factor(&map, ControlKey::WasteModifiers, sp0, Region::Interior), 0.4);
    }
}

#[test]
fn test_lines_for_other_programs_are_skipped() {
    let text = [
        mod_line(202, [1, 1, 0], &["0.5", "0.5", "0.5", "0.5"]),
        "  0 comment\n".to_string(),
        "999\n".to_string(),
        mod_line(203, [0, 0, 1], &["0.5", "0.5", "0.5", "0.5"]),
    ]
    .concat();

    let mut map = create_modifiable_map(VdypApplication::Forward);
    apply_text(&mut map, &text);
    assert_eq!(factor(&map, ControlKey::BaModifiers, "B", Region::Coastal), 1.0);
    assert_eq!(factor(&map, ControlKey::BaModifiers, "C", Region::Coastal), 1.0);

    let mut map = create_modifiable_map(VdypApplication::VriStart);
    apply_text(&mut map, &text);
    assert_eq!(factor(&map, ControlKey::BaModifiers, "B", Region::Coastal), 0.5);
}

#[test]
fn test_parse_lines_keeps_flagged_lines() {
    let text = [
        mod_line(98, [1, 0, 0], &["0.5", "1.0"]),
        mod_line(201, [0, 0, 1], &["1.0", "1.0", "1.0", "1.0"]),
    ]
    .concat();

    let lines = ModifierFileParser::new(VdypApplication::FipStart)
        .parse_lines(&mut create_test_input(&text))
        .unwrap();

    assert_eq!(
        lines,
        vec![ModifierLine {
            line_number: 1,
            sequence: 98,
            mods: vec![Some(0.5), Some(1.0)],
        }]
    );
}

#[test]
fn test_veteran_bq_modifier() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    apply_text(&mut map, &mod_line(98, [0, 0, 1], &["0.5", "0.0"]));

    assert_eq!(coefficient(&map, ControlKey::VeteranBq, "B", Region::Coastal, 1), 1.0);
    assert_eq!(coefficient(&map, ControlKey::VeteranBq, "B", Region::Coastal, 2), 3.0);
    assert_eq!(coefficient(&map, ControlKey::VeteranBq, "B", Region::Interior, 1), 2.0);
}

#[test]
fn test_height_modifiers() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    apply_text(&mut map, &mod_line(401, [0, 0, 1], &["2.0", "3.0", "4.0", "5.0"]));

    let p1 = |region, index| coefficient(&map, ControlKey::HlPrimarySpEqnP1, "AC", region, index);
    assert_eq!(p1(Region::Coastal, 1), 2.0);
    assert_eq!(p1(Region::Coastal, 2), 4.0);
    assert_eq!(p1(Region::Coastal, 3), 3.0);
    assert_eq!(p1(Region::Interior, 1), 3.0);

    assert_eq!(coefficient(&map, ControlKey::HlPrimarySpEqnP2, "AC", Region::Interior, 1), 3.0);
    assert_eq!(coefficient(&map, ControlKey::HlPrimarySpEqnP2, "AC", Region::Interior, 2), 2.0);
    assert_eq!(coefficient(&map, ControlKey::HlPrimarySpEqnP3, "AC", Region::Coastal, 1), 2.0);
    assert_eq!(coefficient(&map, ControlKey::HlPrimarySpEqnP1, "B", Region::Coastal, 1), 1.0);

    let nonprimary = map.expect::<NonprimaryHlTable>(ControlKey::HlNonprimary).unwrap();
    let modified = nonprimary
        .get(&key("AC"), &key("B"), &Region::Interior)
        .unwrap()
        .as_ref()
        .unwrap();
    assert_eq!(modified.coefficients.coe(1).unwrap(), 5.0);
    assert_eq!(modified.coefficients.coe(2).unwrap(), 1.0);

    let other_equation = nonprimary
        .get(&key("AC"), &key("C"), &Region::Coastal)
        .unwrap()
        .as_ref()
        .unwrap();
    assert_eq!(other_equation.coefficients.coe(1).unwrap(), 1.0);
}

#[test]
fn test_missing_modifier_values() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    let resolver = MemoryResolver::new().with_file("mod.dat", mod_line(201, [0, 0, 1], &["1.0", "1.0"])).unwrap();
    map.insert(ControlKey::ModifierFile, ControlValue::FileName("mod.dat".to_string()));

    let error = ModifierFileParser::new(VdypApplication::Forward)
        .modify(&mut map, &resolver)
        .unwrap_err();
    let message = error.to_string();
    assert!(message.contains("memory:mod.dat"));
    assert!(message.contains("Expected 4 modifier values"));
}

#[test]
fn test_unknown_species_index() {
    let mut map = create_modifiable_map(VdypApplication::Forward);
    let resolver =
        MemoryResolver::new().with_file("mod.dat", mod_line(209, [0, 0, 1], &["1.0", "1.0", "1.0", "1.0"])).unwrap();
    map.insert(ControlKey::ModifierFile, ControlValue::FileName("mod.dat".to_string()));

    let error = ModifierFileParser::new(VdypApplication::Forward)
        .modify(&mut map, &resolver)
        .unwrap_err();
    assert!(error.to_string().contains("No genus has preference index 9"));
}
