//! Control map: the keyed configuration assembled from control files
//!
//! A run starts by reading one or more control files into a [`ControlMap`]. Each
//! record lands under its [`ControlKey`] as a raw file name, an absent marker or
//! an inline literal. The [`ControlParser`] then runs the control map modifiers
//! phase by phase, replacing each file name with the table parsed from it.
//!
//! ## Architecture
//!
//! - [`control_key`] - Closed set of keys with their record sequence numbers
//! - [`control_value`] - Closed set of value shapes and typed extraction
//! - [`control_file`] - Fixed-column control file reader and per-application record tables
//! - [`modifier`] - The modifier trait with required, optional and default semantics
//! - [`pipeline`] - Phase ordering and the top level [`ControlParser`]

use crate::app::models::{BecLookup, GenusDefinitionMap};
use crate::config::VdypApplication;
use crate::{Error, Result};
use std::collections::BTreeMap;

pub mod control_file;
pub mod control_key;
pub mod control_value;
pub mod modifier;
pub mod pipeline;

#[cfg(test)]
pub mod tests;

pub use control_file::{ControlFileParser, RecordDefinition, RecordFormat};
pub use control_key::ControlKey;
pub use control_value::{ControlValue, ControlValueType};
pub use modifier::{ControlMapModifier, Requirement};
pub use pipeline::{ControlParser, Phase};

/// Keyed configuration for one run of an application
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMap {
    application: VdypApplication,
    values: BTreeMap<ControlKey, ControlValue>,
    /// Records whose index no record table knows, keyed by the three digit index
    unknown: BTreeMap<String, String>,
}

impl ControlMap {
    pub fn new(application: VdypApplication) -> Self {
        Self {
            application,
            values: BTreeMap::new(),
            unknown: BTreeMap::new(),
        }
    }

    /// Application the map is being built for
    pub fn application(&self) -> VdypApplication {
        self.application
    }

    /// Set an entry, returning the value it replaced
    pub fn insert(&mut self, key: ControlKey, value: impl Into<ControlValue>) -> Option<ControlValue> {
        self.values.insert(key, value.into())
    }

    /// Set an entry only if the key has no value yet
    pub fn insert_if_absent(&mut self, key: ControlKey, value: impl Into<ControlValue>) {
        self.values.entry(key).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: ControlKey) -> Option<&ControlValue> {
        self.values.get(&key)
    }

    pub fn remove(&mut self, key: ControlKey) -> Option<ControlValue> {
        self.values.remove(&key)
    }

    pub fn contains(&self, key: ControlKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Typed reference to an entry
    ///
    /// Fails with the key's name and sequence when the entry is missing or holds
    /// a different shape, including a file name that has not been resolved yet.
    pub fn expect<T: ControlValueType>(&self, key: ControlKey) -> Result<&T> {
        let value = self.values.get(&key).ok_or_else(|| Error::missing_control(key))?;
        T::from_value(value)
            .ok_or_else(|| Error::unexpected_control_type(key, T::TYPE_NAME, value.type_name()))
    }

    /// Typed mutable reference to an entry
    pub fn expect_mut<T: ControlValueType>(&mut self, key: ControlKey) -> Result<&mut T> {
        let value = self
            .values
            .get_mut(&key)
            .ok_or_else(|| Error::missing_control(key))?;
        let found = value.type_name();
        T::from_value_mut(value)
            .ok_or_else(|| Error::unexpected_control_type(key, T::TYPE_NAME, found))
    }

    /// Typed reference to an entry that may be absent
    ///
    /// A missing entry and an [`ControlValue::Absent`] marker both give `None`.
    pub fn optional<T: ControlValueType>(&self, key: ControlKey) -> Result<Option<&T>> {
        match self.values.get(&key) {
            None | Some(ControlValue::Absent) => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| Error::unexpected_control_type(key, T::TYPE_NAME, value.type_name())),
        }
    }

    /// Remove an entry and unwrap it as `T`
    pub fn take<T: ControlValueType>(&mut self, key: ControlKey) -> Result<T> {
        let value = self.values.remove(&key).ok_or_else(|| Error::missing_control(key))?;
        T::from_owned(value).map_err(|value| {
            let found = value.type_name();
            self.values.insert(key, value);
            Error::unexpected_control_type(key, T::TYPE_NAME, found)
        })
    }

    /// Resource name held by an unresolved entry
    ///
    /// Missing, absent and blank entries give `None`. An entry that has already
    /// been resolved into something else is an error.
    pub fn file_name(&self, key: ControlKey) -> Result<Option<String>> {
        match self.values.get(&key) {
            None | Some(ControlValue::Absent) => Ok(None),
            Some(ControlValue::FileName(name)) if name.trim().is_empty() => Ok(None),
            Some(ControlValue::FileName(name)) => Ok(Some(name.trim().to_string())),
            Some(other) => Err(Error::unexpected_control_type(
                key,
                <String as ControlValueType>::TYPE_NAME,
                other.type_name(),
            )),
        }
    }

    /// BEC definitions, once resolved
    pub fn becs(&self) -> Result<&BecLookup> {
        self.expect(ControlKey::BecDef)
    }

    /// Genus definitions, once resolved
    pub fn genera(&self) -> Result<&GenusDefinitionMap> {
        self.expect(ControlKey::Sp0Def)
    }

    /// SP0 aliases in preference order
    pub fn species_aliases(&self) -> Result<Vec<String>> {
        Ok(self.genera()?.aliases())
    }

    /// BEC aliases in definition order
    pub fn bec_aliases(&self) -> Result<Vec<String>> {
        Ok(self.becs()?.aliases())
    }

    /// Every known entry in key order
    pub fn iter(&self) -> impl Iterator<Item = (ControlKey, &ControlValue)> + '_ {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    pub fn keys(&self) -> Vec<ControlKey> {
        self.values.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep a record no record table knows
    pub fn insert_unknown(&mut self, index: impl Into<String>, value: impl Into<String>) {
        self.unknown.insert(index.into(), value.into());
    }

    /// Records no record table knows, keyed by their three digit index
    pub fn unknown_records(&self) -> &BTreeMap<String, String> {
        &self.unknown
    }
}
