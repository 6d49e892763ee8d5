//! BEC zone and SP0 genus definition parsers
//!
//! These two resources come first because every other coefficient table is
//! keyed by the BEC aliases, the SP0 aliases, or both.

use crate::app::models::{BecDefinition, BecLookup, GenusDefinition, GenusDefinitionMap, Region};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{integer, optional, region};
use crate::constants::bec::{NON_DECAY, NON_GROWTH, NON_VOLUME, STOP_REGION};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Parser for the BEC definition file (BEC_DEF, 009)
///
/// Layout: alias(4) space region(1) space name. A "Z" in the region column
/// ends the file.
pub struct BecDefinitionParser {
    default_bec: String,
    line_parser: LineParser,
}

impl BecDefinitionParser {
    pub fn new(default_bec: impl Into<String>) -> Self {
        let line_parser = LineParser::new()
            .stripped(4, "alias")
            .space(1)
            .value(1, "region", region)
            .space(1)
            .stripped_rest("name")
            .stop_segment(|segments| segments.text(2).eq_ignore_ascii_case(STOP_REGION));
        Self {
            default_bec: default_bec.into(),
            line_parser,
        }
    }

    /// Parse the definitions and work out each zone's substitutes
    pub fn parse_lookup(&self, input: &mut dyn BufRead) -> Result<BecLookup> {
        let definitions = self.line_parser.parse(input, Vec::new(), |entry, mut result, _| {
            let alias: String = entry.value("alias")?;
            let region: Region = entry.value("region")?;
            let name: String = entry.value_or("name", String::new())?;
            result.push(BecDefinition::new(alias, region, name));
            Ok(result)
        })?;

        let default = definitions
            .iter()
            .find(|bec| bec.alias == self.default_bec)
            .ok_or_else(|| {
                Error::resource_validation(format!("Could not find default BEC {}", self.default_bec))
            })?;
        let default_alias = default.alias.as_str();
        for (excluded, family) in [(NON_GROWTH, "growth"), (NON_DECAY, "decay"), (NON_VOLUME, "volume")] {
            if excluded.contains(&default_alias) {
                return Err(Error::resource_validation(format!(
                    "Default BEC {} is not a {} BEC.",
                    default_alias, family
                )));
            }
        }

        let definitions: Vec<BecDefinition> = definitions
            .iter()
            .map(|bec| {
                let alias = bec.alias.as_str();
                bec.clone().with_capabilities(
                    !NON_GROWTH.contains(&alias),
                    !NON_VOLUME.contains(&alias),
                    !NON_DECAY.contains(&alias),
                )
            })
            .collect();
        debug!("Read {} BEC definitions", definitions.len());
        Ok(BecLookup::new(definitions, self.default_bec.clone()))
    }
}

impl ControlMapModifier for BecDefinitionParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::BecDef
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_lookup(input).map(ControlValue::BecLookup)
    }
}

/// Parser for the SP0 genus definition file (SP0_DEF, 010)
///
/// Layout: alias(2) space name(32) space preference(2). A blank or zero
/// preference means the genus takes the line number as its preference.
pub struct GenusDefinitionParser {
    num_species: usize,
    line_parser: LineParser,
}

impl GenusDefinitionParser {
    pub fn new(num_species: usize) -> Self {
        let line_parser = LineParser::new()
            .stripped(2, "alias")
            .space(1)
            .stripped(32, "name")
            .space(1)
            .value(2, "preference", optional(integer));
        Self {
            num_species,
            line_parser,
        }
    }

    /// Parse the definitions, requiring every preference slot to be filled
    pub fn parse_genera(&self, input: &mut dyn BufRead) -> Result<GenusDefinitionMap> {
        let slots: Vec<Option<GenusDefinition>> = vec![None; self.num_species];
        let slots = self.line_parser.parse(input, slots, |entry, mut slots, line_number| {
            let alias: String = entry.value("alias")?;
            let name: String = entry.value_or("name", String::new())?;
            let preference = entry
                .value_or::<Option<i32>>("preference", None)?
                .filter(|p| *p != 0)
                .unwrap_or(line_number as i32);

            if preference > self.num_species as i32 {
                return Err(Error::value_parse(
                    preference.to_string(),
                    format!("Preference {} is larger than {}", preference, self.num_species),
                ));
            }
            if preference < 1 {
                return Err(Error::value_parse(
                    preference.to_string(),
                    format!("Preference {} is less than {}", preference, 1),
                ));
            }
            let slot = &mut slots[preference as usize - 1];
            if let Some(existing) = slot {
                return Err(Error::value_parse(
                    preference.to_string(),
                    format!("Preference {} has already been set to {}", preference, existing.alias),
                ));
            }
            *slot = Some(GenusDefinition::new(alias, preference as usize, name));
            Ok(slots)
        })?;

        let genera: Option<Vec<GenusDefinition>> = slots.into_iter().collect();
        let genera = genera
            .ok_or_else(|| Error::resource_validation("Not all genus definitions were provided."))?;
        debug!("Read {} genus definitions", genera.len());
        Ok(GenusDefinitionMap::new(genera))
    }
}

impl ControlMapModifier for GenusDefinitionParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::Sp0Def
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_genera(input).map(ControlValue::Genera)
    }
}
