//! Coefficients keyed by BEC zone and species
//!
//! Each line gives one coefficient index for one BEC zone, across all species.
//! An indicator column says whether the line holds one value for every
//! species, a base value plus per-species deltas, or a value per species.

use crate::app::models::{Coefficients, MatrixMap2};
use crate::app::services::control_map::control_value::BecSpeciesCoefficients;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::coefficient_parsers::{check_bec, check_coefficient_count, line_coefficients};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{float, integer, optional};
use crate::constants::coefficient_counts::{BA_YIELD, BEC_SPECIES, DQ_YIELD};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Columns in the species part of a line
const SPECIES_COLUMNS: usize = 16;

/// How the indicator column is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorMode {
    /// 0 for one value, 1 for a base value plus species deltas, 2 for per species
    Delta,
    /// 0 for one value, 1 for per species
    PerSpeciesFlag,
}

/// Parser for COE_BA (040), COE_DQ (041), BA_YIELD (106) and DQ_YIELD (107)
///
/// Layout: bec(4) space(2) index(1) indicator(2) 16 values of 8 columns.
pub struct BecSpeciesCoefficientParser {
    key: ControlKey,
    num_coefficients: usize,
    mode: IndicatorMode,
    line_parser: LineParser,
}

impl BecSpeciesCoefficientParser {
    pub fn new(key: ControlKey, num_coefficients: usize, mode: IndicatorMode) -> Self {
        let line_parser = LineParser::new()
            .stripped(4, "bec")
            .space(2)
            .integer(1, "index")
            .integer(2, "indicator")
            .multi_value(SPECIES_COLUMNS, 8, "coefficients", optional(float));
        let line_parser = match mode {
            IndicatorMode::Delta => line_parser.stop_line(|line| line.starts_with("   ")),
            IndicatorMode::PerSpeciesFlag => {
                line_parser.ignore_line(|line| line.chars().take(4).all(char::is_whitespace))
            }
        };
        Self {
            key,
            num_coefficients,
            mode,
            line_parser,
        }
    }

    pub fn coe_ba() -> Self {
        Self::new(ControlKey::CoeBa, BEC_SPECIES, IndicatorMode::Delta)
    }

    pub fn coe_dq() -> Self {
        Self::new(ControlKey::CoeDq, BEC_SPECIES, IndicatorMode::Delta)
    }

    pub fn ba_yield() -> Self {
        Self::new(ControlKey::BaYield, BA_YIELD, IndicatorMode::PerSpeciesFlag)
    }

    pub fn dq_yield() -> Self {
        Self::new(ControlKey::DqYield, DQ_YIELD, IndicatorMode::PerSpeciesFlag)
    }

    /// Parse the table over every BEC zone and SP0
    pub fn parse_coefficients(
        &self,
        input: &mut dyn BufRead,
        map: &ControlMap,
    ) -> Result<BecSpeciesCoefficients> {
        let becs = map.becs()?;
        let species = map.species_aliases()?;
        let table = MatrixMap2::new(
            becs.aliases(),
            species.clone(),
            Coefficients::empty(self.num_coefficients, 0),
        );

        let table = self.line_parser.parse(input, table, |entry, mut table, _| {
            let bec: String = entry.value("bec")?;
            let index: i32 = entry.value("index")?;
            let indicator: i32 = entry.value("indicator")?;
            let values = line_coefficients(&entry, "coefficients")?;

            check_bec(becs, &bec)?;
            if index < 0 || index as usize >= self.num_coefficients {
                return Err(Error::value_parse(
                    index.to_string(),
                    format!("{} is not a valid coefficient index", index),
                ));
            }
            let per_species = self.species_values(indicator, &values, species.len())?;
            for (sp0, value) in species.iter().zip(per_species) {
                table.get_mut(&bec, sp0)?.set(index, value)?;
            }
            Ok(table)
        })?;
        debug!("Read {} for {} BEC zones", self.key, table.keys1().len());
        Ok(table)
    }

    /// The value each species takes from one line
    fn species_values(&self, indicator: i32, values: &[f32], num_species: usize) -> Result<Vec<f32>> {
        check_coefficient_count(values, 1)?;
        let base = values[0];
        match (self.mode, indicator) {
            (IndicatorMode::Delta, 2) | (IndicatorMode::PerSpeciesFlag, 1) => {
                check_coefficient_count(values, num_species)?;
                Ok(values.iter().take(num_species).copied().collect())
            }
            (IndicatorMode::Delta, 1) => {
                check_coefficient_count(values, num_species)?;
                Ok(values
                    .iter()
                    .take(num_species)
                    .enumerate()
                    .map(|(i, value)| if i == 0 { base } else { base + value })
                    .collect())
            }
            (IndicatorMode::Delta, _) | (IndicatorMode::PerSpeciesFlag, 0) => Ok(vec![base; num_species]),
            (IndicatorMode::PerSpeciesFlag, other) => Err(Error::value_parse(
                other.to_string(),
                format!("{} is not a valid indicator, should be 0 or 1", other),
            )),
        }
    }
}

impl ControlMapModifier for BecSpeciesCoefficientParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input, map)
            .map(ControlValue::BecSpeciesCoefficients)
    }
}
