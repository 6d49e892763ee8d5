//! Site curve numbers and site curve age maximums
//!
//! Both resources are optional. Without them every species has no site curve
//! and every site curve uses the default maximum ages.

use crate::app::models::{MatrixMap2, Region, SiteCurveAgeMaximum, SiteCurveAgeMaximums};
use crate::app::services::control_map::control_value::SiteCurveNumbers;
use crate::app::services::control_map::{
    ControlKey, ControlMap, ControlMapModifier, ControlValue, Requirement,
};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{ParseResult, float, integer, validate};
use crate::constants::site_curve::{AGE_SUBSTITUTE, CATCH_ALL_MAX};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::debug;

/// Parser for the site curve numbers (SITE_CURVE_NUMBERS, 025)
///
/// Layout: species(3) coastal(3) interior(3). A line starting "##" ends the
/// file, and blank lines, lines starting "# " and lines starting with two
/// spaces are comments.
pub struct SiteCurveParser {
    line_parser: LineParser,
}

impl Default for SiteCurveParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteCurveParser {
    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .stripped(3, "species")
            .integer(3, "coastal")
            .integer(3, "interior")
            .stop_line(|line| line.starts_with("##"))
            .ignore_line(|line| {
                line.trim().is_empty() || line.starts_with("# ") || line.starts_with("  ")
            });
        Self { line_parser }
    }

    /// An empty table, used when the record is not given
    pub fn empty() -> SiteCurveNumbers {
        MatrixMap2::new(Vec::<String>::new(), Vec::<Region>::new(), None)
    }

    /// Parse the table; every defined SP0 must have an entry
    pub fn parse_numbers(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<SiteCurveNumbers> {
        let found = self
            .line_parser
            .parse(input, BTreeMap::new(), |entry, mut found, _| {
                let species: String = entry.value("species")?;
                let coastal: i32 = entry.value("coastal")?;
                let interior: i32 = entry.value("interior")?;
                found.insert(species, [coastal, interior]);
                Ok(found)
            })?;

        let missing: Vec<String> = map
            .species_aliases()?
            .into_iter()
            .filter(|sp0| !found.contains_key(sp0))
            .collect();
        if !missing.is_empty() {
            return Err(Error::resource_validation(format!(
                "Missing expected entries for {}",
                missing.join(", ")
            )));
        }

        let numbers = MatrixMap2::with_generator(found.keys().cloned(), Region::ALL, None, |sp, region| {
            found.get(sp).map(|curves| curves[region.index()])
        });
        debug!("Read site curve numbers for {} species", found.len());
        Ok(numbers)
    }
}

impl ControlMapModifier for SiteCurveParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::SiteCurveNumbers
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    fn default_value(&self, _map: &ControlMap) -> Result<ControlValue> {
        Ok(ControlValue::SiteCurveNumbers(Self::empty()))
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_numbers(input, map).map(ControlValue::SiteCurveNumbers)
    }
}

/// Maximum age column: zero or less means effectively unlimited
fn age(s: &str) -> ParseResult<f32> {
    let value = float(s)?;
    Ok(if value <= 0.0 { AGE_SUBSTITUTE } else { value })
}

/// Parser for the site curve age maximums (SITE_CURVE_AGE_MAX, 026)
///
/// Layout: site curve(3) coastal(7) interior(7) t1(7) t2(7). A line starting
/// "999" ends the file. Site curve -1 is a catch-all row that fills every
/// site curve from 0 to 140.
pub struct SiteCurveAgeMaximumParser {
    line_parser: LineParser,
}

impl SiteCurveAgeMaximumParser {
    pub fn new(max_site_curve: i32) -> Self {
        let line_parser = LineParser::new()
            .value(
                3,
                "sc",
                validate(integer, move |sc: &i32| {
                    (*sc < -1 || *sc > max_site_curve).then(|| {
                        format!(
                            "Site curve number must be in the range -1 to {} inclusive",
                            max_site_curve
                        )
                    })
                }),
            )
            .value(7, "coastal", age)
            .value(7, "interior", age)
            .floating(7, "t1")
            .floating(7, "t2")
            .stop_line(|line| line.starts_with("999"));
        Self { line_parser }
    }

    pub fn parse_maximums(&self, input: &mut dyn BufRead) -> Result<SiteCurveAgeMaximums> {
        self.line_parser
            .parse(input, SiteCurveAgeMaximums::new(), |entry, mut maximums, _| {
                let site_curve: i32 = entry.value("sc")?;
                let maximum = SiteCurveAgeMaximum {
                    age_coastal: entry.value("coastal")?,
                    age_interior: entry.value("interior")?,
                    t1: entry.value("t1")?,
                    t2: entry.value("t2")?,
                };
                if site_curve < 0 {
                    for sc in 0..=CATCH_ALL_MAX {
                        maximums.insert(sc, maximum);
                    }
                } else {
                    maximums.insert(site_curve, maximum);
                }
                Ok(maximums)
            })
    }
}

impl ControlMapModifier for SiteCurveAgeMaximumParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::SiteCurveAgeMax
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    fn default_value(&self, _map: &ControlMap) -> Result<ControlValue> {
        Ok(ControlValue::SiteCurveAgeMaximums(SiteCurveAgeMaximums::new()))
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_maximums(input).map(ControlValue::SiteCurveAgeMaximums)
    }
}
