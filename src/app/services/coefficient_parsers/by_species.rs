//! Coefficients keyed by species alone
//!
//! The small component tables, the net decay waste table and the veteran
//! volume adjustment all hold one row of coefficients per SP0. BY_SPECIES_DQ
//! instead holds one coefficient index per line across all species.

use crate::app::models::Coefficients;
use crate::app::services::coefficient_parsers::{
    check_coefficient_count, check_species, line_coefficients,
};
use crate::app::services::control_map::control_value::SpeciesCoefficients;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{float, optional};
use crate::constants::coefficient_counts::{
    BY_SPECIES_DQ, SMALL_COMP_BA, SMALL_COMP_DQ, SMALL_COMP_HL, SMALL_COMP_PROBABILITY,
    SMALL_COMP_WS_VOLUME, VETERAN_VOLUME_ADJUST, VOLUME_NET_DECAY_WASTE,
};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Parser for BY_SPECIES_DQ (060)
///
/// Layout: space(1) index(1) indicator(2) 16 values of 9 columns. Indices 0
/// and 1 give a value per species; other indices give one value for all.
pub struct BySpeciesDqParser {
    line_parser: LineParser,
}

impl Default for BySpeciesDqParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BySpeciesDqParser {
    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .space(1)
            .integer(1, "index")
            .integer(2, "indicator")
            .multi_value(16, 9, "coefficients", optional(float))
            .stop_line(|line| line.starts_with("   "));
        Self { line_parser }
    }

    pub fn parse_coefficients(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<SpeciesCoefficients> {
        let species = map.species_aliases()?;
        let table: SpeciesCoefficients = species
            .iter()
            .map(|sp0| (sp0.clone(), Coefficients::empty(BY_SPECIES_DQ, 0)))
            .collect();

        self.line_parser.parse(input, table, |entry, mut table, _| {
            let index: i32 = entry.value("index")?;
            let values = line_coefficients(&entry, "coefficients")?;
            if !(0..BY_SPECIES_DQ as i32).contains(&index) {
                return Err(Error::value_parse(
                    index.to_string(),
                    format!("{} is not a valid coefficient index", index),
                ));
            }

            let per_species = index == 0 || index == 1;
            check_coefficient_count(&values, if per_species { species.len() } else { 1 })?;
            for (i, sp0) in species.iter().enumerate() {
                let value = if per_species { values[i] } else { values[0] };
                if let Some(coefficients) = table.get_mut(sp0) {
                    coefficients.set(index, value)?;
                }
            }
            Ok(table)
        })
    }
}

impl ControlMapModifier for BySpeciesDqParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::BySpeciesDq
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input, map)
            .map(ControlValue::SpeciesCoefficients)
    }
}

/// Parser for the tables with one row of coefficients per SP0
///
/// Layout: sp0(2) then the coefficients. Species without a row get zeros.
pub struct SpeciesCoefficientParser {
    key: ControlKey,
    num_coefficients: usize,
    index_from: i32,
    line_parser: LineParser,
}

impl SpeciesCoefficientParser {
    pub fn new(key: ControlKey, num_coefficients: usize, width: usize, index_from: i32) -> Self {
        let line_parser = LineParser::new()
            .stripped(2, "sp0")
            .multi_value(num_coefficients, width, "coefficients", optional(float))
            .ignore_segment(|segments| segments.text(0).trim().is_empty());
        Self {
            key,
            num_coefficients,
            index_from,
            line_parser,
        }
    }

    pub fn small_comp_probability() -> Self {
        Self::new(ControlKey::SmallCompProbability, SMALL_COMP_PROBABILITY, 10, 1)
    }

    pub fn small_comp_ba() -> Self {
        Self::new(ControlKey::SmallCompBa, SMALL_COMP_BA, 10, 1)
    }

    pub fn small_comp_dq() -> Self {
        Self::new(ControlKey::SmallCompDq, SMALL_COMP_DQ, 10, 1)
    }

    pub fn small_comp_hl() -> Self {
        Self::new(ControlKey::SmallCompHl, SMALL_COMP_HL, 10, 1)
    }

    pub fn small_comp_ws_volume() -> Self {
        Self::new(ControlKey::SmallCompWsVolume, SMALL_COMP_WS_VOLUME, 10, 1)
    }

    /// VOLUME_NET_DECAY_WASTE (094)
    pub fn volume_net_decay_waste() -> Self {
        Self::new(ControlKey::VolumeNetDecayWaste, VOLUME_NET_DECAY_WASTE, 9, 0)
    }

    /// VETERAN_LAYER_VOLUME_ADJUST (096)
    pub fn veteran_layer_volume_adjust() -> Self {
        Self::new(ControlKey::VeteranLayerVolumeAdjust, VETERAN_VOLUME_ADJUST, 10, 1)
    }

    pub fn parse_coefficients(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<SpeciesCoefficients> {
        let genera = map.genera()?;
        let table: SpeciesCoefficients = genera
            .aliases()
            .into_iter()
            .map(|sp0| (sp0, Coefficients::empty(self.num_coefficients, self.index_from)))
            .collect();

        let table = self.line_parser.parse(input, table, |entry, mut table, _| {
            let sp0: String = entry.value("sp0")?;
            let values = line_coefficients(&entry, "coefficients")?;
            check_species(genera, &sp0)?;
            check_coefficient_count(&values, self.num_coefficients)?;
            table.insert(sp0, Coefficients::new(values, self.index_from));
            Ok(table)
        })?;
        debug!("Read {} for {} species", self.key, table.len());
        Ok(table)
    }
}

impl ControlMapModifier for SpeciesCoefficientParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input, map)
            .map(ControlValue::SpeciesCoefficients)
    }
}
