//! Tests for the control map, control file reader and resolution pipeline
//!
//! The pipeline fixtures describe a small VDYP Forward run: three BEC zones
//! (AT, CWH, ESSF), three genera (AC, B, C) and an in-memory resolver holding
//! every resource the control file names.

use crate::MemoryResolver;
use crate::app::services::control_map::{ControlKey, ControlMap};
use crate::config::{ControlParserConfig, VdypApplication};
use std::io::Cursor;


/// Wrap text as a buffered reader
pub fn create_test_input(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}

/// A control record with a standard length value
pub fn control_line(sequence: u32, value: &str) -> String {
    format!("{:03} {}\n", sequence, value)
}

pub fn create_test_config() -> ControlParserConfig {
    ControlParserConfig::for_application(VdypApplication::Forward).with_num_species(3)
}

/// Resource name a record points at in the Forward fixture
pub fn resource_name(key: ControlKey) -> String {
    format!("coe/{}.dat", key.name().to_lowercase())
}

const BEC_FILE: &str = "\
AT   I Alpine Tundra
CWH  C Coastal Western Hemlock
ESSF I Engelmann Spruce -- Subalpine Fir
";

/// CWH basal area coefficient 0 of 2.0 for every species
fn coe_ba_file() -> String {
    format!("{:<4}  {}{:>2}{:>8}\n", "CWH", 0, 0, "2.0")
}

fn hl_p1_file() -> String {
    format!("{:<2} {}{:>10}{:>10}{:>10}\n", "AC", "C", "1.00160", "0.20508", "-0.0013743")
}

fn genus_file() -> String {
    [("AC", "Cottonwood", 1), ("B", "Balsam", 2), ("C", "Cedar", 3)]
        .iter()
        .map(|(alias, name, preference)| format!("{:<2} {:<32} {:>2}\n", alias, name, preference))
        .collect()
}

/// Every SP0 and BEC pair numbered in order
fn group_file(becs: &[&str], group_width: usize) -> String {
    let mut text = String::new();
    let mut group = 1;
    for sp0 in ["AC", "B", "C"] {
        for bec in becs {
            text.push_str(&format!("{:<2} {:<4} {:>width$}\n", sp0, bec, group, width = group_width));
            group += 1;
        }
    }
    text
}

/// Records a Forward control file gives, in file order
fn forward_records() -> Vec<(ControlKey, String)> {
    let mut records = vec![
        (ControlKey::MaxNumPoly, "100".to_string()),
        (ControlKey::BecDef, resource_name(ControlKey::BecDef)),
        (ControlKey::Sp0Def, resource_name(ControlKey::Sp0Def)),
        (ControlKey::ForwardInputVdypPoly, "vp_grow.dat".to_string()),
        (ControlKey::ForwardInputVdypLayerBySpecies, "vs_grow.dat".to_string()),
        (ControlKey::ForwardInputVdypLayerBySp0ByUtil, "vu_grow.dat".to_string()),
        (ControlKey::VdypPolygon, "vp_out.dat".to_string()),
    ];
    for key in [
        ControlKey::VolumeEqnGroups,
        ControlKey::DecayGroups,
        ControlKey::BreakageGroups,
        ControlKey::DefaultEqNum,
        ControlKey::EqnModifiers,
    ] {
        records.push((key, resource_name(key)));
    }
    for key in ControlKey::ALL {
        let sequence = key.sequence().unwrap_or(0);
        if (40..=98).contains(&sequence) || (106..=108).contains(&sequence) {
            records.push((key, resource_name(key)));
        }
    }
    records.push((ControlKey::Minima, "5.0 0.0 2.0".to_string()));
    records.push((ControlKey::DebugSwitches, "0 0 0 1".to_string()));
    records
}

/// A complete Forward control file
pub fn create_forward_control_file() -> String {
    let mut text = String::from("    VDYP Forward test control file\n");
    for (key, value) in forward_records() {
        text.push_str(&control_line(key.sequence().unwrap_or(0), &value));
    }
    text
}

/// Resolver holding the control file as "forward.ctl" and every resource it names
pub fn create_forward_resolver() -> MemoryResolver {
    let resolver = MemoryResolver::new()
        .with_file("forward.ctl", create_forward_control_file())
        .and_then(|resolver| resolver.with_file("vp_grow.dat", "01002 S000001 00     1970\n"))
        .and_then(|resolver| resolver.with_file("vs_grow.dat", ""))
        .and_then(|resolver| resolver.with_file("vu_grow.dat", ""))
        .unwrap();

    for (key, value) in forward_records() {
        let content = match key {
            ControlKey::BecDef => BEC_FILE.to_string(),
            ControlKey::Sp0Def => genus_file(),
            ControlKey::VolumeEqnGroups | ControlKey::DecayGroups | ControlKey::BreakageGroups => {
                group_file(&["AT", "CWH", "ESSF"], 3)
            }
            ControlKey::DefaultEqNum => group_file(&["CWH", "ESSF"], 2),
            ControlKey::CoeBa => coe_ba_file(),
            ControlKey::HlPrimarySpEqnP1 => hl_p1_file(),
            _ => String::new(),
        };
        if value.starts_with("coe/") {
            resolver.insert(&value, content).unwrap();
        }
    }
    resolver
}

/// Raw map read from the Forward control file
pub fn create_raw_forward_map() -> ControlMap {
    let parser = crate::ControlParser::new(create_test_config()).unwrap();
    parser
        .read_control_files([create_test_input(&create_forward_control_file())])
        .unwrap()
}
