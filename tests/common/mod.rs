//! Shared fixtures for integration tests
//!
//! Writes a small VDYP Forward run into a temporary directory: a control file,
//! the coefficient files it names under `coe/`, and the polygon input files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vdyp_control::ControlKey;

pub const CONTROL_FILE: &str = "vdyp.ctl";

const BEC_FILE: &str = "\
AT   I Alpine Tundra
CWH  C Coastal Western Hemlock
ESSF I Engelmann Spruce -- Subalpine Fir
";

/// Resource name a record points at
pub fn resource_name(key: ControlKey) -> String {
    format!("coe/{}.dat", key.name().to_lowercase())
}

fn control_line(sequence: u32, value: &str) -> String {
    format!("{:03} {}\n", sequence, value)
}

fn genus_file() -> String {
    [("AC", "Cottonwood", 1), ("B", "Balsam", 2), ("C", "Cedar", 3)]
        .iter()
        .map(|(alias, name, preference)| format!("{:<2} {:<32} {:>2}\n", alias, name, preference))
        .collect()
}

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

/// Text of the Forward control file
pub fn forward_control_file() -> String {
    let mut text = String::from("    VDYP Forward integration test\n");
    for (key, value) in forward_records() {
        text.push_str(&control_line(key.sequence().unwrap_or(0), &value));
    }
    text
}

/// A directory holding a complete Forward run
pub struct ForwardRun {
    pub dir: TempDir,
}

impl ForwardRun {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("coe")).expect("Failed to create coe directory");

        write(dir.path(), CONTROL_FILE, &forward_control_file());
        write(dir.path(), "vp_grow.dat", "01002 S000001 00     1970\n");
        write(dir.path(), "vs_grow.dat", "");
        write(dir.path(), "vu_grow.dat", "");

        for (key, value) in forward_records() {
            if !value.starts_with("coe/") {
                continue;
            }
            let content = match key {
                ControlKey::BecDef => BEC_FILE.to_string(),
                ControlKey::Sp0Def => genus_file(),
                ControlKey::VolumeEqnGroups | ControlKey::DecayGroups | ControlKey::BreakageGroups => {
                    group_file(&["AT", "CWH", "ESSF"], 3)
                }
                ControlKey::DefaultEqNum => group_file(&["CWH", "ESSF"], 2),
                _ => String::new(),
            };
            write(dir.path(), &value, &content);
        }
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn control_file(&self) -> PathBuf {
        self.path(CONTROL_FILE)
    }

    /// Replace a file in the run
    pub fn write(&self, name: &str, content: &str) {
        write(self.dir.path(), name, content);
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path(name)).expect("Failed to remove fixture file");
    }
}

fn write(base: &Path, name: &str, content: &str) {
    fs::write(base.join(name), content).expect("Failed to write fixture file");
}
