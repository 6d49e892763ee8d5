//! Coefficients keyed by species and region
//!
//! The height, upper bound and veteran tables all start each line with an SP0
//! alias and a region code followed by a run of coefficients. The non-primary
//! height table adds the primary species, and the component size table holds
//! named limits instead of coefficients.

use crate::app::models::{
    ComponentSizeLimits, Coefficients, MatrixMap2, MatrixMap3, NonprimaryHlCoefficients, Region,
};
use crate::app::services::coefficient_parsers::{check_coefficient_count, check_species, line_coefficients};
use crate::app::services::control_map::control_value::{
    ComponentSizeTable, NonprimaryHlTable, SpeciesRegionCoefficients,
};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::{LineParser, ParsedEntry};
use crate::app::services::value_parser::{float, optional, region};
use crate::constants::coefficient_counts::{HL_P1, HL_P2, HL_P3, VETERAN_DQ};
use crate::Result;
use std::io::BufRead;
use tracing::debug;

const HL_WIDTH: usize = 10;

/// Coefficient values of the numbered columns `c1`, `c2` and so on
fn column_values(entry: &ParsedEntry, count: usize) -> Result<Vec<f32>> {
    let mut values = Vec::with_capacity(count);
    for column in 1..=count {
        if let Some(value) = entry.value_or::<Option<f32>>(&format!("c{}", column), None)? {
            values.push(value);
        }
    }
    Ok(values)
}

/// Parser for the tables keyed by SP0 and region
///
/// Layout: sp0(2) space region(1) then one column per coefficient. Tables
/// with an optional region apply a line with a blank region to both regions.
pub struct SpeciesRegionCoefficientParser {
    key: ControlKey,
    num_coefficients: usize,
    optional_region: bool,
    line_parser: LineParser,
}

impl SpeciesRegionCoefficientParser {
    /// `widths` gives the width of each coefficient column
    pub fn new(key: ControlKey, widths: &[usize], optional_region: bool, stop_prefix: &'static str) -> Self {
        let mut line_parser = LineParser::new().stripped(2, "sp0").space(1);
        line_parser = if optional_region {
            line_parser.value(1, "region", optional(region))
        } else {
            line_parser.value(1, "region", region)
        };
        for (i, width) in widths.iter().enumerate() {
            line_parser = line_parser.value(*width, &format!("c{}", i + 1), optional(float));
        }
        let line_parser = line_parser.stop_line(move |line| line.starts_with(stop_prefix));
        Self {
            key,
            num_coefficients: widths.len(),
            optional_region,
            line_parser,
        }
    }

    /// UPPER_BA_BY_CI_S0_P (043): maximum basal area and maximum diameter
    pub fn upper_ba() -> Self {
        Self::new(ControlKey::UpperBaByCiS0P, &[7, 6], false, "   ")
    }

    pub fn hl_p1() -> Self {
        Self::new(ControlKey::HlPrimarySpEqnP1, &[HL_WIDTH; HL_P1], false, "   ")
    }

    pub fn hl_p2() -> Self {
        Self::new(ControlKey::HlPrimarySpEqnP2, &[HL_WIDTH; HL_P2], false, "   ")
    }

    pub fn hl_p3() -> Self {
        Self::new(ControlKey::HlPrimarySpEqnP3, &[HL_WIDTH; HL_P3], false, "   ")
    }

    pub fn veteran_dq() -> Self {
        Self::new(ControlKey::VeteranLayerDq, &[HL_WIDTH; VETERAN_DQ], true, "    ")
    }

    pub fn veteran_bq() -> Self {
        Self::new(ControlKey::VeteranBq, &[HL_WIDTH; VETERAN_DQ], true, "    ")
    }

    pub fn parse_coefficients(
        &self,
        input: &mut dyn BufRead,
        map: &ControlMap,
    ) -> Result<SpeciesRegionCoefficients> {
        let genera = map.genera()?;
        let table = MatrixMap2::new(
            genera.aliases(),
            Region::ALL,
            Coefficients::empty(self.num_coefficients, 1),
        );

        let table = self.line_parser.parse(input, table, |entry, mut table, _| {
            let sp0: String = entry.value("sp0")?;
            let regions: Vec<Region> = if self.optional_region {
                match entry.value_or::<Option<Region>>("region", None)? {
                    Some(region) => vec![region],
                    None => Region::ALL.to_vec(),
                }
            } else {
                vec![entry.value::<Region>("region")?]
            };
            let values = column_values(&entry, self.num_coefficients)?;

            check_species(genera, &sp0)?;
            check_coefficient_count(&values, self.num_coefficients)?;
            for region in regions {
                table.put(&sp0, &region, Coefficients::new(values.clone(), 1))?;
            }
            Ok(table)
        })?;
        debug!("Read {}", self.key);
        Ok(table)
    }
}

impl ControlMapModifier for SpeciesRegionCoefficientParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input, map)
            .map(ControlValue::SpeciesRegionCoefficients)
    }
}

/// Parser for the non-primary height coefficients (HL_NONPRIMARY, 053)
///
/// Layout: sp0(2) space primary sp0(2) space region(1) space equation(1) then
/// two coefficients of 10 columns. Lines blank in the first six columns are
/// skipped.
pub struct HlNonprimaryParser {
    line_parser: LineParser,
}

impl Default for HlNonprimaryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HlNonprimaryParser {
    const NUM_COEFFICIENTS: usize = 2;

    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .stripped(2, "sp0")
            .space(1)
            .stripped(2, "primary")
            .space(1)
            .value(1, "region", region)
            .space(1)
            .integer(1, "equation")
            .multi_value(Self::NUM_COEFFICIENTS, HL_WIDTH, "coefficients", optional(float))
            .ignore_line(|line| line.chars().take(6).all(char::is_whitespace));
        Self { line_parser }
    }

    pub fn parse_table(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<NonprimaryHlTable> {
        let genera = map.genera()?;
        let aliases = genera.aliases();
        let table = MatrixMap3::new(aliases.clone(), aliases, Region::ALL, None);

        self.line_parser.parse(input, table, |entry, mut table, _| {
            let sp0: String = entry.value("sp0")?;
            let primary: String = entry.value("primary")?;
            let region: Region = entry.value("region")?;
            let equation: i32 = entry.value("equation")?;
            let values = line_coefficients(&entry, "coefficients")?;

            check_species(genera, &sp0)?;
            check_species(genera, &primary)?;
            check_coefficient_count(&values, Self::NUM_COEFFICIENTS)?;
            let coefficients = Coefficients::new(values[..Self::NUM_COEFFICIENTS].to_vec(), 1);
            table.put(
                &sp0,
                &primary,
                &region,
                Some(NonprimaryHlCoefficients::new(coefficients, equation)),
            )?;
            Ok(table)
        })
    }
}

impl ControlMapModifier for HlNonprimaryParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::HlNonprimary
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_table(input, map).map(ControlValue::NonprimaryHl)
    }
}

/// Parser for the component size limits (SPECIES_COMPONENT_SIZE_LIMIT, 061)
///
/// Layout: sp0(2) space region(1) then Lorey height maximum, diameter
/// maximum, and the minimum and maximum diameter to height ratios, six
/// columns each.
pub struct ComponentSizeParser {
    line_parser: LineParser,
}

impl Default for ComponentSizeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentSizeParser {
    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .stripped(2, "sp0")
            .space(1)
            .value(1, "region", region)
            .multi_value(4, 6, "limits", optional(float))
            .ignore_line(|line| line.trim().is_empty());
        Self { line_parser }
    }

    pub fn parse_limits(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ComponentSizeTable> {
        let genera = map.genera()?;
        let table = MatrixMap2::new(genera.aliases(), Region::ALL, ComponentSizeLimits::default());

        self.line_parser.parse(input, table, |entry, mut table, _| {
            let sp0: String = entry.value("sp0")?;
            let region: Region = entry.value("region")?;
            let values = line_coefficients(&entry, "limits")?;

            check_species(genera, &sp0)?;
            check_coefficient_count(&values, 4)?;
            let limits = ComponentSizeLimits {
                lorey_height_maximum: values[0],
                quad_mean_diameter_maximum: values[1],
                min_quad_mean_diameter_lorey_height_ratio: values[2],
                max_quad_mean_diameter_lorey_height_ratio: values[3],
            };
            table.put(&sp0, &region, limits)?;
            Ok(table)
        })
    }
}

impl ControlMapModifier for ComponentSizeParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::SpeciesComponentSizeLimit
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_limits(input, map).map(ControlValue::ComponentSizeLimits)
    }
}
