//! Biogeoclimatic (BEC) zone definitions
//!
//! Some BEC zones have no growth or volume equations of their own. The BEC
//! definition parser records, for every zone, which zone supplies each equation
//! family, and [`BecLookup`] applies the chosen [`Substitution`] policy when a
//! zone is requested.

use crate::app::models::Region;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A BEC zone and the zones that supply its equations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BecDefinition {
    /// Zone alias (2 to 4 characters)
    pub alias: String,

    /// Region the zone lies in
    pub region: Region,

    /// Descriptive zone name
    pub name: String,

    /// Zone supplying growth equations, `None` if there is none
    pub growth_bec: Option<String>,

    /// Zone supplying volume equations, `None` if there is none
    pub volume_bec: Option<String>,

    /// Zone supplying decay equations, `None` if there is none
    pub decay_bec: Option<String>,
}

impl BecDefinition {
    /// A zone that supplies all of its own equations
    pub fn new(alias: impl Into<String>, region: Region, name: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            growth_bec: Some(alias.clone()),
            volume_bec: Some(alias.clone()),
            decay_bec: Some(alias.clone()),
            alias,
            region,
            name: name.into(),
        }
    }

    /// Mark which equation families the zone lacks
    pub fn with_capabilities(mut self, growth: bool, volume: bool, decay: bool) -> Self {
        if !growth {
            self.growth_bec = None;
        }
        if !volume {
            self.volume_bec = None;
        }
        if !decay {
            self.decay_bec = None;
        }
        self
    }

    /// Whether the zone has its own growth equations
    pub fn is_growth(&self) -> bool {
        self.growth_bec.as_deref() == Some(self.alias.as_str())
    }

    /// Whether the zone has its own volume equations
    pub fn is_volume(&self) -> bool {
        self.volume_bec.as_deref() == Some(self.alias.as_str())
    }

    /// Whether the zone has its own decay equations
    pub fn is_decay(&self) -> bool {
        self.decay_bec.as_deref() == Some(self.alias.as_str())
    }

    fn is_complete(&self) -> bool {
        self.growth_bec.is_some() && self.volume_bec.is_some() && self.decay_bec.is_some()
    }
}

/// How to treat a zone that lacks some of its equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Substitution {
    /// Fail if the zone lacks any equations
    None,
    /// Return the zone with its missing families left unset
    PartialFillOk,
    /// Fill missing families from the default zone
    Substitute,
}

/// All BEC zones defined by a control file, in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BecLookup {
    definitions: Vec<BecDefinition>,
    default_alias: String,
}

impl BecLookup {
    pub fn new(definitions: Vec<BecDefinition>, default_alias: impl Into<String>) -> Self {
        Self {
            definitions,
            default_alias: default_alias.into(),
        }
    }

    /// Alias of the zone used for substitution
    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    /// Find a zone, applying the substitution policy
    ///
    /// Returns `Ok(None)` when no zone has the alias.
    pub fn get(&self, alias: &str, substitution: Substitution) -> Result<Option<BecDefinition>> {
        let Some(definition) = self.find(alias) else {
            return Ok(None);
        };
        if definition.is_complete() {
            return Ok(Some(definition.clone()));
        }
        match substitution {
            Substitution::PartialFillOk => Ok(Some(definition.clone())),
            Substitution::None => Err(Error::resource_validation(format!(
                "Substitution needed for BEC {} but substitution was not allowed",
                alias
            ))),
            Substitution::Substitute => {
                let default = self.find(&self.default_alias).ok_or_else(|| {
                    Error::resource_validation(format!(
                        "Could not find default BEC {}",
                        self.default_alias
                    ))
                })?;
                if !default.is_complete() {
                    return Err(Error::resource_validation(format!(
                        "Could not substitute for BEC {} because the default BEC {} is incomplete",
                        alias, self.default_alias
                    )));
                }
                let mut substituted = definition.clone();
                substituted.growth_bec = substituted.growth_bec.or_else(|| default.growth_bec.clone());
                substituted.volume_bec = substituted.volume_bec.or_else(|| default.volume_bec.clone());
                substituted.decay_bec = substituted.decay_bec.or_else(|| default.decay_bec.clone());
                Ok(Some(substituted))
            }
        }
    }

    fn find(&self, alias: &str) -> Option<&BecDefinition> {
        self.definitions.iter().find(|bec| bec.alias == alias)
    }

    /// Whether a zone with the alias exists
    pub fn contains(&self, alias: &str) -> bool {
        self.find(alias).is_some()
    }

    /// All zones in file order
    pub fn definitions(&self) -> &[BecDefinition] {
        &self.definitions
    }

    /// All zone aliases in file order
    pub fn aliases(&self) -> Vec<String> {
        self.definitions.iter().map(|bec| bec.alias.clone()).collect()
    }

    /// Zones in the given region
    pub fn for_region(&self, region: Region) -> Vec<&BecDefinition> {
        self.definitions
            .iter()
            .filter(|bec| bec.region == region)
            .collect()
    }

    /// Zones matching a scope
    ///
    /// A blank scope matches every zone, a region code matches the zones in that
    /// region, and anything else is treated as a zone alias.
    pub fn for_scope(&self, scope: &str) -> Vec<&BecDefinition> {
        let scope = scope.trim();
        if scope.is_empty() {
            return self.definitions.iter().collect();
        }
        let mut chars = scope.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            if let Some(region) = Region::from_code(code) {
                return self.for_region(region);
            }
        }
        self.find(scope).into_iter().collect()
    }

    /// Zones with their own growth equations
    pub fn growth_becs(&self) -> Vec<&BecDefinition> {
        self.definitions.iter().filter(|bec| bec.is_growth()).collect()
    }

    /// Zones with their own volume equations
    pub fn volume_becs(&self) -> Vec<&BecDefinition> {
        self.definitions.iter().filter(|bec| bec.is_volume()).collect()
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
