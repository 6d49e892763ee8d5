//! Stocking class factors (STOCKING_CLASS_FACTORS, 033)
//!
//! Only FIPSTART reads this table. The layer and inventory type group columns
//! are part of the layout but do not affect the result.

use crate::app::models::{MatrixMap2, Region, StockingClassFactor};
use crate::app::services::control_map::control_value::StockingClassFactors;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{character, integer, optional, region};
use crate::Result;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::debug;

/// Parser for the stocking class factor table
///
/// Layout: class(1) space region(1) space layer(1) itg(3) factor(6) npct(5).
/// A "Z" class ends the file and a blank class is skipped.
pub struct StockingClassFactorParser {
    line_parser: LineParser,
}

impl Default for StockingClassFactorParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StockingClassFactorParser {
    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .value(1, "stk", character)
            .space(1)
            .value(1, "region", region)
            .space(1)
            .value(1, "layer", optional(character))
            .value(3, "itg", optional(integer))
            .floating(6, "factor")
            .integer(5, "npct")
            .ignore_line(|line| line.trim().is_empty())
            .stop_segment(|segments| segments.text(0).eq_ignore_ascii_case("Z"))
            .ignore_segment(|segments| segments.text(0).trim().is_empty());
        Self { line_parser }
    }

    /// Parse the table over the stocking classes it names and both regions
    pub fn parse_factors(&self, input: &mut dyn BufRead) -> Result<StockingClassFactors> {
        let found = self
            .line_parser
            .parse(input, BTreeMap::new(), |entry, mut found, _| {
                let stocking_class: char = entry.value("stk")?;
                let region: Region = entry.value("region")?;
                let factor = StockingClassFactor {
                    stocking_class,
                    region,
                    factor: entry.value("factor")?,
                    npct_area: entry.value("npct")?,
                };
                found.insert((stocking_class, region), factor);
                Ok(found)
            })?;

        let mut classes: Vec<char> = found.keys().map(|(class, _)| *class).collect();
        classes.dedup();
        debug!("Read stocking class factors for {} classes", classes.len());
        Ok(MatrixMap2::with_generator(classes, Region::ALL, None, |class, region| {
            found.get(&(*class, *region)).copied()
        }))
    }
}

impl ControlMapModifier for StockingClassFactorParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::StockingClassFactors
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_factors(input).map(ControlValue::StockingClassFactors)
    }
}
