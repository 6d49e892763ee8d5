//! Input and output data file records
//!
//! The polygon, layer and species data files are not read while the control
//! map is resolved. Input files are opened once to check that they exist and
//! are then recorded with the resolver's description of where they were
//! found. Output files are recorded by name only.

use crate::app::adapters::file_resolver::FileResolver;
use crate::app::models::{InputFileDescriptor, OutputFileDescriptor};
use crate::app::services::control_map::{
    ControlKey, ControlMap, ControlMapModifier, ControlValue, Requirement,
};
use crate::{Error, Result};
use tracing::debug;

/// Checks that an input data file can be opened
pub struct InputFileModifier {
    key: ControlKey,
    requirement: Requirement,
    fallback: Option<ControlKey>,
}

impl InputFileModifier {
    pub fn new(key: ControlKey, requirement: Requirement) -> Self {
        Self {
            key,
            requirement,
            fallback: None,
        }
    }

    /// An optional file that defaults to the descriptor already held by `fallback`
    pub fn with_fallback(key: ControlKey, fallback: ControlKey) -> Self {
        Self {
            key,
            requirement: Requirement::Optional,
            fallback: Some(fallback),
        }
    }
}

impl ControlMapModifier for InputFileModifier {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn requirement(&self) -> Requirement {
        self.requirement
    }

    fn default_value(&self, map: &ControlMap) -> Result<ControlValue> {
        let Some(fallback) = self.fallback else {
            return Ok(ControlValue::Absent);
        };
        Ok(map
            .optional::<InputFileDescriptor>(fallback)?
            .cloned()
            .map_or(ControlValue::Absent, ControlValue::InputFile))
    }

    fn modify(&self, map: &mut ControlMap, resolver: &dyn FileResolver) -> Result<()> {
        let Some(name) = map.file_name(self.key)? else {
            return match self.requirement {
                Requirement::Optional => {
                    let value = self.default_value(map)?;
                    map.insert(self.key, value);
                    Ok(())
                }
                Requirement::Required => Err(Error::missing_control(self.key)),
            };
        };

        drop(resolver.resolve_for_input(&name)?);
        let description = resolver.describe(&name);
        debug!("Found {} at {}", self.key, description);
        map.insert(self.key, InputFileDescriptor { name, description });
        Ok(())
    }
}

/// Records the name of an output data file
pub struct OutputFileModifier {
    key: ControlKey,
}

impl OutputFileModifier {
    pub fn new(key: ControlKey) -> Self {
        Self { key }
    }
}

impl ControlMapModifier for OutputFileModifier {
    fn control_key(&self) -> ControlKey {
        self.key
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    fn modify(&self, map: &mut ControlMap, _resolver: &dyn FileResolver) -> Result<()> {
        match map.file_name(self.key)? {
            Some(name) => map.insert(self.key, OutputFileDescriptor { name }),
            None => map.insert(self.key, ControlValue::Absent),
        };
        Ok(())
    }
}
