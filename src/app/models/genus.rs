//! SP0 genus definitions

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A genus (SP0) and its preference order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenusDefinition {
    /// Two character alias
    pub alias: String,

    /// Preference order, starting from 1
    pub index: usize,

    /// Descriptive name
    pub name: String,
}

impl GenusDefinition {
    pub fn new(alias: impl Into<String>, index: usize, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            index,
            name: name.into(),
        }
    }
}

/// Every genus defined by a control file, ordered by preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenusDefinitionMap {
    genera: Vec<GenusDefinition>,
}

impl GenusDefinitionMap {
    /// Build the map, sorting the definitions by preference
    pub fn new(mut genera: Vec<GenusDefinition>) -> Self {
        genera.sort_by_key(|genus| genus.index);
        Self { genera }
    }

    /// Genus with the alias
    pub fn get(&self, alias: &str) -> Option<&GenusDefinition> {
        self.genera.iter().find(|genus| genus.alias == alias)
    }

    /// Genus at a preference index starting from 1
    pub fn by_index(&self, index: usize) -> Result<&GenusDefinition> {
        self.genera
            .iter()
            .find(|genus| genus.index == index)
            .ok_or_else(|| {
                Error::resource_validation(format!("No genus has preference index {}", index))
            })
    }

    /// Preference index of the genus with the alias
    pub fn index_of(&self, alias: &str) -> Result<usize> {
        self.get(alias).map(|genus| genus.index).ok_or_else(|| {
            Error::value_parse(alias, format!("{} is not a valid genus (SP0)", alias))
        })
    }

    /// Whether a genus with the alias exists
    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Every alias in preference order
    pub fn aliases(&self) -> Vec<String> {
        self.genera.iter().map(|genus| genus.alias.clone()).collect()
    }

    /// Every genus in preference order
    pub fn genera(&self) -> &[GenusDefinition] {
        &self.genera
    }

    pub fn len(&self) -> usize {
        self.genera.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genera.is_empty()
    }
}
