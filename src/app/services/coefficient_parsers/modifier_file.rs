//! The modifier file (MODIFIER_FILE, 198)
//!
//! Unlike the other resources, the modifier file has no table of its own. It
//! installs the basal area, diameter, decay and waste modifier tables with
//! their defaults and then adjusts those and several coefficient tables that
//! earlier phases already resolved. Each line carries a flag per program, and
//! only lines flagged for the running application are applied.
//!
//! ## Sequences
//!
//! - `098` - Multiply veteran BQ coefficient 1 by a modifier per region
//! - `200..=299` - Set basal area and diameter modifiers
//! - `300..=399` - Set decay and waste modifiers
//! - `400..=499` - Multiply the height coefficients
//!
//! In the 200, 300 and 400 ranges the last two digits pick a species by its
//! index, with zero meaning every species.

use crate::app::adapters::file_resolver::FileResolver;
use crate::app::models::{InputFileDescriptor, MatrixMap2, Region};
use crate::app::services::control_map::control_value::{
    NonprimaryHlTable, SpeciesRegionCoefficients, SpeciesRegionFactors,
};
use crate::app::services::control_map::modifier::parse_resource;
use crate::app::services::control_map::{
    ControlKey, ControlMap, ControlMapModifier, ControlValue, Requirement,
};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{float, integer, logical, optional};
use crate::config::VdypApplication;
use crate::constants::MAX_REASONABLE_VALUE;
use crate::{Error, Result};
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Program flag column used by each legacy program number, counted from 1
const PROGRAM_FLAG_COLUMNS: [usize; 9] = [1, 0, 2, 0, 0, 3, 4, 5, 0];

/// One applicable line of the modifier file
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierLine {
    pub line_number: usize,
    pub sequence: i32,
    pub mods: Vec<Option<f32>>,
}

impl ModifierLine {
    /// The first `count` modifiers, all of which must be given
    pub fn required_mods(&self, count: usize) -> Result<Vec<f32>> {
        let mods: Option<Vec<f32>> = self.mods.iter().take(count).copied().collect();
        mods.filter(|mods| mods.len() == count).ok_or_else(|| {
            Error::value_parse("", format!("Expected {} modifier values", count))
        })
    }
}

/// Parser for the modifier file
///
/// Layout: sequence(3) then six program flags of 2 columns and ten optional
/// modifiers of 6 columns. A "999" sequence ends the file and a blank or zero
/// sequence is a comment.
pub struct ModifierFileParser {
    application: VdypApplication,
    line_parser: LineParser,
}

impl ModifierFileParser {
    pub fn new(application: VdypApplication) -> Self {
        let line_parser = LineParser::new()
            .integer(3, "sequence")
            .multi_value(6, 2, "programs", optional(logical))
            .multi_value(10, 6, "mods", optional(float))
            .ignore_line(|line| line.trim().is_empty())
            .stop_segment(|segments| segments.text(0) == "999")
            .ignore_segment(|segments| {
                let sequence = segments.text(0);
                sequence.trim().is_empty() || integer(sequence).is_ok_and(|s| s == 0)
            });
        Self {
            application,
            line_parser,
        }
    }

    /// Column of the program flags that applies to this application
    fn flag_index(&self) -> Result<usize> {
        PROGRAM_FLAG_COLUMNS
            .get(self.application.program_number().wrapping_sub(1))
            .copied()
            .filter(|column| *column > 0)
            .map(|column| column - 1)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "{} has no column in the modifier file",
                    self.application
                ))
            })
    }

    /// Read the lines flagged for this application
    pub fn parse_lines(&self, input: &mut dyn BufRead) -> Result<Vec<ModifierLine>> {
        let flag_index = self.flag_index()?;
        self.line_parser.parse(input, Vec::new(), |entry, mut lines, line_number| {
            let sequence: i32 = entry.value("sequence")?;
            let programs: Vec<Option<bool>> = entry.value_or("programs", Vec::new())?;
            let applies = programs.get(flag_index).copied().flatten().unwrap_or(false);
            if applies {
                lines.push(ModifierLine {
                    line_number,
                    sequence,
                    mods: entry.value_or("mods", Vec::new())?,
                });
            }
            Ok(lines)
        })
    }

    /// Install the modifier tables with every species unmodified
    pub fn install_defaults(&self, map: &mut ControlMap) -> Result<()> {
        let species = map.species_aliases()?;
        let factors = |value: f32| -> SpeciesRegionFactors {
            MatrixMap2::new(species.clone(), Region::ALL, value)
        };
        map.insert(ControlKey::BaModifiers, factors(1.0));
        map.insert(ControlKey::DqModifiers, factors(1.0));
        map.insert(ControlKey::DecayModifiers, factors(0.0));
        map.insert(ControlKey::WasteModifiers, factors(0.0));
        Ok(())
    }

    /// Apply one line to the control map
    pub fn apply(&self, line: &ModifierLine, map: &mut ControlMap) -> Result<()> {
        match line.sequence {
            98 => apply_veteran_bq(line, map),
            200..=299 => {
                let species = species_for(map, line.sequence - 200)?;
                let mods = line.required_mods(4)?;
                set_factors(map, ControlKey::BaModifiers, &species, &mods[0..2])?;
                set_factors(map, ControlKey::DqModifiers, &species, &mods[2..4])
            }
            300..=399 => {
                let species = species_for(map, line.sequence - 300)?;
                let mods = line.required_mods(4)?;
                set_factors(map, ControlKey::DecayModifiers, &species, &mods[0..2])?;
                set_factors(map, ControlKey::WasteModifiers, &species, &mods[2..4])
            }
            400..=499 => apply_height(line, map),
            other => {
                warn!("Unexpected modifier sequence {:03} on line {}", other, line.line_number);
                Ok(())
            }
        }
    }
}

/// Species picked by the index part of a sequence; zero picks every species
fn species_for(map: &ControlMap, index: i32) -> Result<Vec<String>> {
    let genera = map.genera()?;
    if index == 0 {
        return Ok(genera.aliases());
    }
    let genus = genera.by_index(index as usize)?;
    Ok(vec![genus.alias.clone()])
}

fn set_factors(map: &mut ControlMap, key: ControlKey, species: &[String], mods: &[f32]) -> Result<()> {
    let table = map.expect_mut::<SpeciesRegionFactors>(key)?;
    for sp0 in species {
        for (region, value) in Region::ALL.iter().zip(mods) {
            table.put(sp0, region, *value)?;
        }
    }
    Ok(())
}

fn apply_veteran_bq(line: &ModifierLine, map: &mut ControlMap) -> Result<()> {
    let mods = line.required_mods(2)?;
    if map.optional::<SpeciesRegionCoefficients>(ControlKey::VeteranBq)?.is_none() {
        return Ok(());
    }
    let species = map.species_aliases()?;
    let table = map.expect_mut::<SpeciesRegionCoefficients>(ControlKey::VeteranBq)?;
    for sp0 in &species {
        for (region, m) in Region::ALL.iter().zip(&mods) {
            if *m != 0.0 {
                table.get_mut(sp0, region)?.scalar_in_place(1, |x| x * m)?;
            }
        }
    }
    Ok(())
}

fn apply_height(line: &ModifierLine, map: &mut ControlMap) -> Result<()> {
    let species = species_for(map, line.sequence - 400)?;
    let all_species = map.species_aliases()?;
    let mods = line.required_mods(4)?;
    let (primary_mods, nonprimary_mods) = mods.split_at(2);

    let p1 = map.expect_mut::<SpeciesRegionCoefficients>(ControlKey::HlPrimarySpEqnP1)?;
    for sp0 in &species {
        for (region, m) in Region::ALL.iter().zip(primary_mods) {
            let coefficients = p1.get_mut(sp0, region)?;
            coefficients.scalar_in_place(1, |x| x * m)?;
            coefficients.scalar_in_place(2, |x| x * m)?;
        }
    }

    let p2 = map.expect_mut::<SpeciesRegionCoefficients>(ControlKey::HlPrimarySpEqnP2)?;
    for sp0 in &species {
        for (region, m) in Region::ALL.iter().zip(primary_mods) {
            p2.get_mut(sp0, region)?.scalar_in_place(1, |x| x * m)?;
        }
    }

    let p3 = map.expect_mut::<SpeciesRegionCoefficients>(ControlKey::HlPrimarySpEqnP3)?;
    for sp0 in &species {
        for (region, m) in Region::ALL.iter().zip(primary_mods) {
            p3.get_mut(sp0, region)?.scalar_in_place(1, |x| {
                if x > 0.0 && x < MAX_REASONABLE_VALUE { x * m } else { x }
            })?;
        }
    }

    let nonprimary = map.expect_mut::<NonprimaryHlTable>(ControlKey::HlNonprimary)?;
    for sp0 in &species {
        for primary in &all_species {
            for (region, m) in Region::ALL.iter().zip(nonprimary_mods) {
                if let Some(entry) = nonprimary.get_mut(sp0, primary, region)?
                    && entry.equation_index == 1
                {
                    entry.coefficients.scalar_in_place(1, |x| x * m)?;
                }
            }
        }
    }
    Ok(())
}

impl ControlMapModifier for ModifierFileParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::ModifierFile
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    /// Install the defaults, then apply the file if one is named
    ///
    /// A resolved modifier file is recorded as an input file descriptor.
    fn modify(&self, map: &mut ControlMap, resolver: &dyn FileResolver) -> Result<()> {
        self.install_defaults(map)?;
        let Some(name) = map.file_name(ControlKey::ModifierFile)? else {
            debug!("No modifier file, using default modifiers");
            map.insert(ControlKey::ModifierFile, ControlValue::Absent);
            return Ok(());
        };

        let description = resolver.describe(&name);
        let lines = parse_resource(resolver, &name, |input| self.parse_lines(input))?;
        for line in &lines {
            self.apply(line, map).map_err(|error| {
                Error::resource_parse(
                    description.clone(),
                    Error::line_parse(line.line_number, None, error),
                )
            })?;
        }
        info!("Applied {} modifiers from {}", lines.len(), description);
        map.insert(
            ControlKey::ModifierFile,
            InputFileDescriptor {
                name,
                description,
            },
        );
        Ok(())
    }
}
