//! Basal area and diameter upper bounds (BA_DQ_UPPER_BOUNDS, 108)

use crate::app::models::Coefficients;
use crate::app::services::coefficient_parsers::is_blank_or_zero;
use crate::app::services::control_map::control_value::GroupCoefficients;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::constants::upper_bounds::{DEFAULT_BA, DEFAULT_DQ};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Parser for the upper bounds by basal area group
///
/// Layout: group(3) max basal area(8) space max diameter(8). Lines with a
/// blank or zero group are skipped. Every group from 1 up to the configured
/// maximum is present in the result, with missing groups taking (0.0, 7.6).
pub struct UpperBoundsParser {
    max_ba_groups: i32,
    line_parser: LineParser,
}

impl UpperBoundsParser {
    pub fn new(max_ba_groups: i32) -> Self {
        let line_parser = LineParser::new()
            .integer(3, "group")
            .floating(8, "max_ba")
            .space(1)
            .floating(8, "max_dq")
            .ignore_segment(|segments| is_blank_or_zero(segments.text(0)));
        Self {
            max_ba_groups,
            line_parser,
        }
    }

    pub fn parse_bounds(&self, input: &mut dyn BufRead) -> Result<GroupCoefficients> {
        let mut bounds = self
            .line_parser
            .parse(input, GroupCoefficients::new(), |entry, mut bounds, _| {
                let group: i32 = entry.value("group")?;
                if group < 1 || group > self.max_ba_groups {
                    return Err(Error::value_parse(
                        group.to_string(),
                        format!(
                            "Basal Area Group Id {} is out of range; expecting a value from 1 to {}",
                            group, self.max_ba_groups
                        ),
                    ));
                }
                let max_ba: f32 = entry.value("max_ba")?;
                let max_dq: f32 = entry.value("max_dq")?;
                bounds.insert(group, Coefficients::new(vec![max_ba, max_dq], 1));
                Ok(bounds)
            })?;

        let given = bounds.len();
        for group in 1..=self.max_ba_groups {
            bounds
                .entry(group)
                .or_insert_with(|| Coefficients::new(vec![DEFAULT_BA, DEFAULT_DQ], 1));
        }
        debug!("Read upper bounds for {} of {} groups", given, self.max_ba_groups);
        Ok(bounds)
    }
}

impl ControlMapModifier for UpperBoundsParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::BaDqUpperBounds
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_bounds(input).map(ControlValue::GroupCoefficients)
    }
}
