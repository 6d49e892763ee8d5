//! Coefficients keyed by utilization class, BEC scope or equation group
//!
//! ## Architecture
//!
//! - [`UtilComponentParser`] - UTIL_COMP_BA and UTIL_COMP_DQ, by class, species and BEC scope
//! - [`UtilGroupCoefficientParser`] - Volume tables keyed by class and volume or decay group
//! - [`GroupCoefficientParser`] - Tables keyed by a group number alone

use crate::app::models::{Coefficients, MatrixMap2, MatrixMap3};
use crate::app::services::coefficient_parsers::{
    check_coefficient_count, check_species, is_blank_or_zero, line_coefficients,
};
use crate::app::services::control_map::control_value::{
    GroupCoefficients, UtilComponentCoefficients, UtilGroupCoefficients,
};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{
    ParseResult, float, index_parser, integer, optional, stripped, validate,
};
use crate::constants::coefficient_counts::{
    BREAKAGE, CLOSE_UTIL_VOLUME, TOTAL_STAND_WHOLE_STEM, UTIL_COMP_BA, UTIL_COMP_DQ,
    UTIL_COMP_WS_VOLUME, VOLUME_NET_DECAY,
};
use crate::constants::equation_groups::{MAX_BREAKAGE_GROUPS, MAX_UC_INDEX, MAX_VOLUME_GROUPS};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Lower bounds of utilization classes 1 to 4 as written in the class column
const UC_CODES: &[&str] = &[" 7.5", "12.5", "17.5", "22.5"];

/// A utilization class index column, 1 to 4
fn uc_index() -> impl Fn(&str) -> ParseResult<i32> + Send + Sync {
    validate(integer, |uc: &i32| {
        (!(1..=MAX_UC_INDEX).contains(uc)).then(|| {
            format!("{} is not a valid UC Index, should be 1 to {} inclusive", uc, MAX_UC_INDEX)
        })
    })
}

/// A group index column, 1 to `max_groups`
fn group_index(max_groups: i32) -> impl Fn(&str) -> ParseResult<i32> + Send + Sync {
    validate(integer, move |group: &i32| {
        (!(1..=max_groups).contains(group)).then(|| {
            format!("{} is not a valid Group Index, should be 1 to {} inclusive", group, max_groups)
        })
    })
}

/// Parser for UTIL_COMP_BA (070) and UTIL_COMP_DQ (071)
///
/// Layout: class(4) space sp0(2) space scope(4) then the coefficients in 10
/// columns. The class is written as its lower bound, " 7.5" to "22.5". The
/// scope is blank for every BEC, a region code, or a single BEC alias.
pub struct UtilComponentParser {
    key: ControlKey,
    num_coefficients: usize,
    line_parser: LineParser,
}

impl UtilComponentParser {
    pub fn new(key: ControlKey, num_coefficients: usize) -> Self {
        let line_parser = LineParser::new()
            .value(4, "uc", index_parser("UC", 1, UC_CODES))
            .space(1)
            .stripped(2, "sp0")
            .space(1)
            .value(4, "scope", stripped)
            .multi_value(num_coefficients, 10, "coefficients", optional(float))
            .stop_line(|line| line.starts_with("    "));
        Self {
            key,
            num_coefficients,
            line_parser,
        }
    }

    pub fn ba() -> Self {
        Self::new(ControlKey::UtilCompBa, UTIL_COMP_BA)
    }

    pub fn dq() -> Self {
        Self::new(ControlKey::UtilCompDq, UTIL_COMP_DQ)
    }

    pub fn parse_coefficients(
        &self,
        input: &mut dyn BufRead,
        map: &ControlMap,
    ) -> Result<UtilComponentCoefficients> {
        let becs = map.becs()?;
        let genera = map.genera()?;
        let table = MatrixMap3::new(1..=MAX_UC_INDEX, genera.aliases(), becs.aliases(), None);

        let table = self.line_parser.parse(input, table, |entry, mut table, _| {
            let uc: i32 = entry.value("uc")?;
            let sp0: String = entry.value("sp0")?;
            let scope: String = entry.value_or("scope", String::new())?;
            let values = line_coefficients(&entry, "coefficients")?;

            check_species(genera, &sp0)?;
            let scoped = becs.for_scope(&scope);
            if scoped.is_empty() {
                return Err(Error::value_parse(
                    &scope,
                    format!("Could not find any BECs for scope {}", scope),
                ));
            }
            check_coefficient_count(&values, self.num_coefficients)?;
            for bec in scoped {
                table.put(&uc, &sp0, &bec.alias, Some(Coefficients::new(values.clone(), 1)))?;
            }
            Ok(table)
        })?;
        debug!("Read {}", self.key);
        Ok(table)
    }
}

impl ControlMapModifier for UtilComponentParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input, map)
            .map(ControlValue::UtilComponentCoefficients)
    }
}

/// Parser for the volume tables keyed by utilization class and group
///
/// Layout: class(2) space group(3) then the coefficients in 10 columns. Lines
/// whose class or group is blank or zero are skipped.
pub struct UtilGroupCoefficientParser {
    key: ControlKey,
    num_coefficients: usize,
    max_groups: i32,
    line_parser: LineParser,
}

impl UtilGroupCoefficientParser {
    pub fn new(key: ControlKey, num_coefficients: usize, max_groups: i32) -> Self {
        let line_parser = LineParser::new()
            .value(2, "uc", uc_index())
            .space(1)
            .value(3, "group", group_index(max_groups))
            .multi_value(num_coefficients, 10, "coefficients", optional(float))
            .ignore_segment(|segments| {
                is_blank_or_zero(segments.text(0)) || is_blank_or_zero(segments.text(2))
            });
        Self {
            key,
            num_coefficients,
            max_groups,
            line_parser,
        }
    }

    /// UTIL_COMP_WS_VOLUME (091)
    pub fn util_comp_ws_volume() -> Self {
        Self::new(ControlKey::UtilCompWsVolume, UTIL_COMP_WS_VOLUME, MAX_VOLUME_GROUPS)
    }

    /// CLOSE_UTIL_VOLUME (092)
    pub fn close_util_volume() -> Self {
        Self::new(ControlKey::CloseUtilVolume, CLOSE_UTIL_VOLUME, MAX_VOLUME_GROUPS)
    }

    /// VOLUME_NET_DECAY (093)
    pub fn volume_net_decay() -> Self {
        Self::new(ControlKey::VolumeNetDecay, VOLUME_NET_DECAY, MAX_VOLUME_GROUPS)
    }

    pub fn parse_coefficients(&self, input: &mut dyn BufRead) -> Result<UtilGroupCoefficients> {
        let table = MatrixMap2::new(1..=MAX_UC_INDEX, 1..=self.max_groups, None);
        let table = self.line_parser.parse(input, table, |entry, mut table, _| {
            let uc: i32 = entry.value("uc")?;
            let group: i32 = entry.value("group")?;
            let values = line_coefficients(&entry, "coefficients")?;
            check_coefficient_count(&values, self.num_coefficients)?;
            table.put(&uc, &group, Some(Coefficients::new(values, 1)))?;
            Ok(table)
        })?;
        debug!("Read {}", self.key);
        Ok(table)
    }
}

impl ControlMapModifier for UtilGroupCoefficientParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input)
            .map(ControlValue::UtilGroupCoefficients)
    }
}

/// Parser for the tables keyed by a group number alone
///
/// Layout: group(3) then the coefficients. Lines with a blank or zero group
/// are skipped.
pub struct GroupCoefficientParser {
    key: ControlKey,
    num_coefficients: usize,
    index_from: i32,
    line_parser: LineParser,
}

impl GroupCoefficientParser {
    pub fn new(
        key: ControlKey,
        num_coefficients: usize,
        width: usize,
        index_from: i32,
        max_groups: i32,
    ) -> Self {
        let line_parser = LineParser::new()
            .value(3, "group", group_index(max_groups))
            .multi_value(num_coefficients, width, "coefficients", optional(float))
            .ignore_segment(|segments| is_blank_or_zero(segments.text(0)));
        Self {
            key,
            num_coefficients,
            index_from,
            line_parser,
        }
    }

    /// TOTAL_STAND_WHOLE_STEM_VOL (090), keyed by volume group
    pub fn total_stand_whole_stem_volume() -> Self {
        Self::new(
            ControlKey::TotalStandWholeStemVol,
            TOTAL_STAND_WHOLE_STEM,
            10,
            0,
            MAX_VOLUME_GROUPS,
        )
    }

    /// BREAKAGE (095), keyed by breakage group
    pub fn breakage() -> Self {
        Self::new(ControlKey::Breakage, BREAKAGE, 9, 1, MAX_BREAKAGE_GROUPS)
    }

    pub fn parse_coefficients(&self, input: &mut dyn BufRead) -> Result<GroupCoefficients> {
        let table = self
            .line_parser
            .parse(input, GroupCoefficients::new(), |entry, mut table, _| {
                let group: i32 = entry.value("group")?;
                let values = line_coefficients(&entry, "coefficients")?;
                check_coefficient_count(&values, self.num_coefficients)?;
                table.insert(group, Coefficients::new(values, self.index_from));
                Ok(table)
            })?;
        debug!("Read {} for {} groups", self.key, table.len());
        Ok(table)
    }
}

impl ControlMapModifier for GroupCoefficientParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_coefficients(input).map(ControlValue::GroupCoefficients)
    }
}
