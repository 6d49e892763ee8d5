//! Equation group tables
//!
//! Volume, decay and breakage equation groups and the default equation number
//! all map every SP0 and BEC pair to a group number. The equation modifier
//! table then reassigns default groups for particular inventory type groups.

use crate::app::models::{BecLookup, MatrixMap2};
use crate::app::services::control_map::control_value::{EquationGroups, EquationModifiers};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, ControlValue};
use crate::app::services::line_parser::LineParser;
use crate::app::services::value_parser::{integer, range};
use crate::constants::bec::{NON_GROWTH, NON_VOLUME};
use crate::constants::equation_groups::{MAX_DEFAULT_GROUP, MAX_ITG};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use tracing::debug;

/// Parser for the tables keyed by SP0 and BEC that hold a group number
///
/// Layout: sp0(2) space bec(4) space group(3), with a two column group for the
/// default equation number. Every SP0 and BEC pair must be given except for
/// the hidden BECs, which take no part in the table.
pub struct EquationGroupParser {
    key: ControlKey,
    hidden_becs: &'static [&'static str],
    line_parser: LineParser,
}

impl EquationGroupParser {
    fn with_layout(key: ControlKey, group_length: usize, hidden_becs: &'static [&'static str]) -> Self {
        let line_parser = LineParser::new()
            .stripped(2, "sp0")
            .space(1)
            .stripped(4, "bec")
            .space(1)
            .integer(group_length, "group");
        Self {
            key,
            hidden_becs,
            line_parser,
        }
    }

    /// VOLUME_EQN_GROUPS (020); non-volume BECs are hidden
    pub fn volume() -> Self {
        Self::with_layout(ControlKey::VolumeEqnGroups, 3, NON_VOLUME)
    }

    /// DECAY_GROUPS (021)
    pub fn decay() -> Self {
        Self::with_layout(ControlKey::DecayGroups, 3, &[])
    }

    /// BREAKAGE_GROUPS (022)
    pub fn breakage() -> Self {
        Self::with_layout(ControlKey::BreakageGroups, 3, &[])
    }

    /// DEFAULT_EQ_NUM (030); non-growth BECs are hidden
    pub fn default_equation() -> Self {
        Self::with_layout(ControlKey::DefaultEqNum, 2, NON_GROWTH)
    }

    /// Parse the table, reporting every missing or unexpected pair at once
    pub fn parse_groups(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<EquationGroups> {
        let sp0_aliases = map.species_aliases()?;
        let becs = map.becs()?;

        let found = self.line_parser.parse(
            input,
            BTreeMap::<String, BTreeMap<String, i32>>::new(),
            |entry, mut found, _| {
                let sp0: String = entry.value("sp0")?;
                let bec: String = entry.value("bec")?;
                if !sp0_aliases.contains(&sp0) {
                    return Err(Error::value_parse(&sp0, format!("{} is not an SP0 identifier", sp0)));
                }
                if !becs.contains(&bec) {
                    return Err(Error::value_parse(&bec, format!("{} is not a BEC identifier", bec)));
                }
                let group: i32 = entry.value("group")?;
                found.entry(sp0).or_default().insert(bec, group);
                Ok(found)
            },
        )?;

        let errors = self.missing_pairs(&found, &sp0_aliases, becs);
        if !errors.is_empty() {
            return Err(Error::resource_validation(errors.join("\n")));
        }

        let mut groups = MatrixMap2::new(sp0_aliases.clone(), becs.aliases(), 0);
        for (sp0, by_bec) in &found {
            for (bec, group) in by_bec {
                groups.put(sp0, bec, *group)?;
            }
        }
        debug!("Read {} for {} species", self.key, found.len());
        Ok(groups)
    }

    fn missing_pairs(
        &self,
        found: &BTreeMap<String, BTreeMap<String, i32>>,
        sp0_aliases: &[String],
        becs: &BecLookup,
    ) -> Vec<String> {
        let expected_becs: BTreeSet<String> = becs
            .aliases()
            .into_iter()
            .filter(|bec| !self.hidden_becs.contains(&bec.as_str()))
            .collect();

        let mut errors = Vec::new();
        for sp0 in sp0_aliases {
            let Some(by_bec) = found.get(sp0) else {
                errors.push(format!("Expected mappings for SP0 {} but it was missing", sp0));
                continue;
            };
            for bec in &expected_becs {
                if !by_bec.contains_key(bec) {
                    errors.push(format!(
                        "Expected mappings for BEC {} but it was missing for SP0 {}",
                        bec, sp0
                    ));
                }
            }
            for bec in by_bec.keys().filter(|bec| !expected_becs.contains(*bec)) {
                errors.push(format!("Unexpected mapping for BEC {} under SP0 {}", bec, sp0));
            }
        }
        errors
    }
}

impl ControlMapModifier for EquationGroupParser {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn parse(&self, input: &mut dyn BufRead, map: &ControlMap) -> Result<ControlValue> {
        self.parse_groups(input, map).map(ControlValue::EquationGroups)
    }
}

/// Parser for the equation group modifiers (EQN_MODIFIERS, 031)
///
/// Layout: default group(2) space inventory type group(2) space reassigned group(2).
pub struct EquationModifierParser {
    line_parser: LineParser,
}

impl Default for EquationModifierParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EquationModifierParser {
    pub fn new() -> Self {
        let line_parser = LineParser::new()
            .value(
                2,
                "default",
                range(integer, 1, true, MAX_DEFAULT_GROUP, true, "Default Equation Group"),
            )
            .space(1)
            .value(2, "itg", range(integer, 1, true, MAX_ITG, true, "Inventory Type Group"))
            .space(1)
            .integer(2, "reassigned");
        Self { line_parser }
    }

    /// Parse the reassignments into a default group by inventory type group map
    pub fn parse_modifiers(&self, input: &mut dyn BufRead) -> Result<EquationModifiers> {
        let modifiers = MatrixMap2::new(1..=MAX_DEFAULT_GROUP, 1..=MAX_ITG, None);
        self.line_parser.parse(input, modifiers, |entry, mut modifiers, _| {
            let default: i32 = entry.value("default")?;
            let itg: i32 = entry.value("itg")?;
            let reassigned: i32 = entry.value("reassigned")?;
            modifiers.put(&default, &itg, Some(reassigned))?;
            Ok(modifiers)
        })
    }
}

impl ControlMapModifier for EquationModifierParser {
    fn control_key(&self) -> ControlKey {
        ControlKey::EqnModifiers
    }

    fn parse(&self, input: &mut dyn BufRead, _map: &ControlMap) -> Result<ControlValue> {
        self.parse_modifiers(input).map(ControlValue::EquationModifiers)
    }
}
