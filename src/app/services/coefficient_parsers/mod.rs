//! Parsers for the coefficient resources named by a control file
//!
//! Every parser here is a [`ControlMapModifier`](crate::app::services::control_map::ControlMapModifier)
//! for one or more control keys. Each one describes its line layout with a
//! [`LineParser`](crate::app::services::line_parser::LineParser), validates keys
//! against the BEC and genus definitions already in the control map, and folds
//! the lines into a matrix map or keyed table.
//!
//! ## Architecture
//!
//! - [`definitions`] - BEC zone and SP0 genus definitions
//! - [`equation_groups`] - Equation group tables and equation group modifiers
//! - [`site_curves`] - Site curve numbers and site curve age maximums
//! - [`stocking`] - Stocking class factors
//! - [`bec_species`] - Coefficients keyed by BEC zone and species
//! - [`species_region`] - Coefficients keyed by species and region
//! - [`by_species`] - Coefficients keyed by species alone
//! - [`utilization`] - Coefficients keyed by utilization class, group or BEC scope
//! - [`upper_bounds`] - Basal area and quadratic mean diameter upper bounds
//! - [`modifier_file`] - The modifier file that adjusts other tables
//! - [`data_files`] - Input and output data file descriptors

use crate::app::models::{BecLookup, GenusDefinitionMap};
use crate::app::services::line_parser::ParsedEntry;
use crate::constants::BLANK_OR_ZERO_PATTERN;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

pub mod bec_species;
pub mod by_species;
pub mod data_files;
pub mod definitions;
pub mod equation_groups;
pub mod modifier_file;
pub mod site_curves;
pub mod species_region;
pub mod stocking;
pub mod upper_bounds;
pub mod utilization;

#[cfg(test)]
pub mod tests;

pub use bec_species::{BecSpeciesCoefficientParser, IndicatorMode};
pub use by_species::{BySpeciesDqParser, SpeciesCoefficientParser};
pub use data_files::{InputFileModifier, OutputFileModifier};
pub use definitions::{BecDefinitionParser, GenusDefinitionParser};
pub use equation_groups::{EquationGroupParser, EquationModifierParser};
pub use modifier_file::ModifierFileParser;
pub use site_curves::{SiteCurveAgeMaximumParser, SiteCurveParser};
pub use species_region::{ComponentSizeParser, HlNonprimaryParser, SpeciesRegionCoefficientParser};
pub use stocking::StockingClassFactorParser;
pub use upper_bounds::UpperBoundsParser;
pub use utilization::{GroupCoefficientParser, UtilComponentParser, UtilGroupCoefficientParser};

static BLANK_OR_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BLANK_OR_ZERO_PATTERN).expect("blank or zero pattern is valid"));

/// Whether a short key field is blank or some spelling of zero
pub fn is_blank_or_zero(text: &str) -> bool {
    BLANK_OR_ZERO.is_match(text)
}

/// Fail unless `alias` is a defined SP0 genus
pub fn check_species(genera: &GenusDefinitionMap, alias: &str) -> Result<()> {
    if genera.contains(alias) {
        Ok(())
    } else {
        Err(Error::value_parse(alias, format!("{} is not a valid species", alias)))
    }
}

/// Fail unless `alias` is a defined BEC zone
pub fn check_bec(becs: &BecLookup, alias: &str) -> Result<()> {
    if becs.contains(alias) {
        Ok(())
    } else {
        Err(Error::value_parse(alias, format!("{} is not a valid BEC alias", alias)))
    }
}

/// Fail unless a line supplied at least `expected` coefficients
pub fn check_coefficient_count(values: &[f32], expected: usize) -> Result<()> {
    if values.len() < expected {
        Err(Error::value_parse(
            "",
            format!("Expected {} coefficients but there were {}", expected, values.len()),
        ))
    } else {
        Ok(())
    }
}

/// Coefficients given in a multi-value field, skipping blank columns
///
/// The field must have been declared with `optional(float)` so that padding at
/// the end of a short line is not an error.
pub fn line_coefficients(entry: &ParsedEntry, name: &str) -> Result<Vec<f32>> {
    let values: Vec<Option<f32>> = entry.value_or(name, Vec::new())?;
    Ok(values.into_iter().flatten().collect())
}
