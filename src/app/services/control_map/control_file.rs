//! Control file reader
//!
//! Each control file line is an index in columns 0-2, an extension flag in
//! column 3 and the value from column 4 on. The value is 50 characters long, or
//! 120 when the flag is "X" or ">", and anything after a "!" is a comment. A
//! blank or zero index, or a "C" flag, makes the whole line a comment.
//!
//! Which index maps to which [`ControlKey`], and how its value is read, is
//! declared per application by [`ControlFileParser::for_application`].

use crate::app::models::Minima;
use crate::app::services::control_map::{ControlKey, ControlMap, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{self, float, integer, list, optional, to_map, unstripped};
use crate::config::{ControlParserConfig, VdypApplication};
use crate::constants::{
    CONTROL_COMMENT_FLAG, CONTROL_EXTENDED_FLAGS, CONTROL_EXTENSION_LENGTH,
    CONTROL_INDEX_LENGTH, CONTROL_INLINE_COMMENT, CONTROL_VALUE_LENGTH_EXTENDED,
    CONTROL_VALUE_LENGTH_STANDARD,
};
use crate::Result;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::{debug, warn};

const INDEX_FIELD: &str = "index";
const EXTEND_FIELD: &str = "extend";
const VALUE_FIELD: &str = "value";

/// How the value of a control record is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A resource name that must be given
    FileName,
    /// A resource name that may be left blank or omitted
    OptionalFileName,
    Integer,
    IntegerList,
    /// Whitespace separated minimum height, base area, predicted base area and veteran height
    Minima,
}

impl RecordFormat {
    /// Whether a record of this format defaults to absent when it never appears
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::OptionalFileName)
    }

    /// Convert the value text of a record
    pub fn parse(&self, text: &str, config: &ControlParserConfig) -> Result<ControlValue> {
        let value = match self {
            Self::FileName => ControlValue::FileName(value_parser::filename(text)?),
            Self::OptionalFileName => match optional(value_parser::filename)(text)? {
                Some(name) => ControlValue::FileName(name),
                None => ControlValue::Absent,
            },
            Self::Integer => ControlValue::Integer(integer(text)?),
            Self::IntegerList => ControlValue::IntegerList(list(integer)(text)?),
            Self::Minima => {
                let default_height = config.default_minimum_veteran_height;
                let keys = [
                    (Minima::KEYS[0], None),
                    (Minima::KEYS[1], None),
                    (Minima::KEYS[2], None),
                    (Minima::KEYS[3], Some(default_height)),
                ];
                let parser = to_map(list(float), &keys)?;
                let named = parser(text)?;
                ControlValue::Minima(Minima::from_named(&named, default_height)?)
            }
        };
        Ok(value)
    }
}

/// A control record: the key it fills and how its value is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDefinition {
    pub sequence: u32,
    pub key: ControlKey,
    pub format: RecordFormat,
}

/// Reads control files into a [`ControlMap`]
pub struct ControlFileParser {
    config: ControlParserConfig,
    records: BTreeMap<u32, RecordDefinition>,
    line_parser: LineParser,
}

impl ControlFileParser {
    /// A reader with an empty record table
    pub fn new(config: ControlParserConfig) -> Self {
        let line_parser = LineParser::new()
            .value(CONTROL_INDEX_LENGTH, INDEX_FIELD, optional(integer))
            .value(CONTROL_EXTENSION_LENGTH, EXTEND_FIELD, unstripped)
            .rest(VALUE_FIELD, unstripped)
            .ignore_line(|line| line.trim().is_empty())
            .ignore_segment(|segments| {
                let index = segments.text(0).trim();
                let comment_index = index.is_empty() || integer(index).is_ok_and(|i| i == 0);
                comment_index || segments.text(1) == CONTROL_COMMENT_FLAG
            });
        Self {
            config,
            records: BTreeMap::new(),
            line_parser,
        }
    }

    /// A reader with the record table of the configured application
    pub fn for_application(config: ControlParserConfig) -> Self {
        let application = config.application;
        let mut parser = Self::new(config)
            .record(ControlKey::MaxNumPoly, RecordFormat::Integer)
            .record(ControlKey::BecDef, RecordFormat::FileName)
            .record(ControlKey::Sp0Def, RecordFormat::FileName);

        for (key, format) in input_records(application) {
            parser = parser.record(*key, *format);
        }

        parser = parser
            .record(ControlKey::VdypPolygon, RecordFormat::OptionalFileName)
            .record(ControlKey::VdypLayerBySpecies, RecordFormat::OptionalFileName)
            .record(ControlKey::VdypLayerBySp0ByUtil, RecordFormat::OptionalFileName)
            .record(ControlKey::VolumeEqnGroups, RecordFormat::FileName)
            .record(ControlKey::DecayGroups, RecordFormat::FileName)
            .record(ControlKey::BreakageGroups, RecordFormat::FileName)
            .record(ControlKey::SiteCurveNumbers, RecordFormat::OptionalFileName)
            .record(ControlKey::SiteCurveAgeMax, RecordFormat::OptionalFileName)
            .record(ControlKey::DefaultEqNum, RecordFormat::FileName)
            .record(ControlKey::EqnModifiers, RecordFormat::FileName);

        if application == VdypApplication::FipStart {
            parser = parser.record(ControlKey::StockingClassFactors, RecordFormat::FileName);
        }

        for key in COEFFICIENT_RECORDS {
            parser = parser.record(key, RecordFormat::FileName);
        }

        if application != VdypApplication::FipStart {
            parser = parser
                .record(ControlKey::BaYield, RecordFormat::FileName)
                .record(ControlKey::DqYield, RecordFormat::FileName)
                .record(ControlKey::BaDqUpperBounds, RecordFormat::FileName);
        }

        parser
            .record(ControlKey::Minima, RecordFormat::Minima)
            .record(ControlKey::ModifierFile, RecordFormat::OptionalFileName)
            .record(ControlKey::DebugSwitches, RecordFormat::IntegerList)
    }

    /// Declare a record; keys without a sequence number are ignored
    pub fn record(mut self, key: ControlKey, format: RecordFormat) -> Self {
        if let Some(sequence) = key.sequence() {
            self.records.insert(
                sequence,
                RecordDefinition {
                    sequence,
                    key,
                    format,
                },
            );
        }
        self
    }

    /// Record declared for an index
    pub fn definition(&self, sequence: u32) -> Option<&RecordDefinition> {
        self.records.get(&sequence)
    }

    /// Every declared record in sequence order
    pub fn records(&self) -> impl Iterator<Item = &RecordDefinition> + '_ {
        self.records.values()
    }

    /// Read a control file into `map`
    ///
    /// Values already in the map are replaced by records of the same index, so
    /// several files can be read one after another. Optional records that are
    /// still missing afterwards are set to [`ControlValue::Absent`].
    pub fn parse<R: BufRead>(&self, input: R, map: &mut ControlMap) -> Result<()> {
        self.line_parser.parse(input, &mut *map, |mut entry, map, line_number| {
            let Some(index) = entry.take::<Option<i32>>(INDEX_FIELD)? else {
                return Ok(map);
            };
            let extend: String = entry.value_or(EXTEND_FIELD, String::new())?;
            let rest: String = entry.value_or(VALUE_FIELD, String::new())?;
            let text = control_value_text(&extend, &rest);

            match u32::try_from(index).ok().and_then(|i| self.records.get(&i)) {
                Some(definition) => {
                    debug!("Line {}: record {} = {:?}", line_number, definition.key, text.trim());
                    let value = definition.format.parse(&text, &self.config)?;
                    map.insert(definition.key, value);
                }
                None => {
                    warn!("Line {}: unknown control record {:03}", line_number, index);
                    map.insert_unknown(format!("{:03}", index), text.trim());
                }
            }
            Ok(map)
        })?;

        for definition in self.records.values().filter(|d| d.format.is_optional()) {
            map.insert_if_absent(definition.key, ControlValue::Absent);
        }
        Ok(())
    }
}

/// Records every application reads between the group definitions and the yield tables
const COEFFICIENT_RECORDS: [ControlKey; 25] = [
    ControlKey::CoeBa,
    ControlKey::CoeDq,
    ControlKey::UpperBaByCiS0P,
    ControlKey::HlPrimarySpEqnP1,
    ControlKey::HlPrimarySpEqnP2,
    ControlKey::HlPrimarySpEqnP3,
    ControlKey::HlNonprimary,
    ControlKey::BySpeciesDq,
    ControlKey::SpeciesComponentSizeLimit,
    ControlKey::UtilCompBa,
    ControlKey::UtilCompDq,
    ControlKey::SmallCompProbability,
    ControlKey::SmallCompBa,
    ControlKey::SmallCompDq,
    ControlKey::SmallCompHl,
    ControlKey::SmallCompWsVolume,
    ControlKey::TotalStandWholeStemVol,
    ControlKey::UtilCompWsVolume,
    ControlKey::CloseUtilVolume,
    ControlKey::VolumeNetDecay,
    ControlKey::VolumeNetDecayWaste,
    ControlKey::Breakage,
    ControlKey::VeteranLayerVolumeAdjust,
    ControlKey::VeteranLayerDq,
    ControlKey::VeteranBq,
];

/// Input data records of an application
pub fn input_records(application: VdypApplication) -> &'static [(ControlKey, RecordFormat)] {
    match application {
        VdypApplication::FipStart => &[
            (ControlKey::FipInputYieldPoly, RecordFormat::FileName),
            (ControlKey::FipInputYieldLayer, RecordFormat::FileName),
            (ControlKey::FipInputYieldLxSp0, RecordFormat::FileName),
        ],
        VdypApplication::VriStart => &[
            (ControlKey::VriInputYieldPoly, RecordFormat::FileName),
            (ControlKey::VriInputYieldLayer, RecordFormat::FileName),
            (ControlKey::VriInputYieldHeightAgeSi, RecordFormat::FileName),
            (ControlKey::VriInputYieldSpecDist, RecordFormat::FileName),
        ],
        VdypApplication::Forward => &[
            (ControlKey::ForwardInputVdypPoly, RecordFormat::FileName),
            (ControlKey::ForwardInputVdypLayerBySpecies, RecordFormat::FileName),
            (ControlKey::ForwardInputVdypLayerBySp0ByUtil, RecordFormat::FileName),
            (ControlKey::ForwardInputGrowto, RecordFormat::OptionalFileName),
        ],
    }
}

/// Output data records shared by every application
pub const OUTPUT_RECORDS: [ControlKey; 3] = [
    ControlKey::VdypPolygon,
    ControlKey::VdypLayerBySpecies,
    ControlKey::VdypLayerBySp0ByUtil,
];

/// Value text of a record: cut to the value length and at any inline comment
fn control_value_text(extend: &str, rest: &str) -> String {
    let length = if CONTROL_EXTENDED_FLAGS.contains(&extend) {
        CONTROL_VALUE_LENGTH_EXTENDED
    } else {
        CONTROL_VALUE_LENGTH_STANDARD
    };
    rest.chars()
        .take(length)
        .take_while(|c| *c != CONTROL_INLINE_COMMENT)
        .collect()
}
