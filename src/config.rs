//! Configuration management and validation.
//!
//! Provides the settings that shape control file parsing: which VDYP application
//! is running (this selects the record table and the extra coefficient tables),
//! and the structural limits used to validate sub-resources.

use crate::constants::{
    DEFAULT_BEC_ALIAS, DEFAULT_MAX_BA_GROUPS, DEFAULT_MAX_SITE_CURVE,
    DEFAULT_MINIMUM_VETERAN_HEIGHT, DEFAULT_NUM_SPECIES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The VDYP application a control file is being read for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VdypApplication {
    /// FIPSTART: initial processing of forest inventory plots
    FipStart,
    /// VRISTART: initial processing of vegetation resource inventory polygons
    VriStart,
    /// VDYP Forward: growth projection
    Forward,
}

impl VdypApplication {
    /// The legacy program number used by modifier files to select lines
    pub fn program_number(&self) -> usize {
        match self {
            VdypApplication::FipStart => 1,
            VdypApplication::VriStart => 3,
            VdypApplication::Forward => 6,
        }
    }

    /// Short name used on the command line and in log output
    pub fn short_name(&self) -> &'static str {
        match self {
            VdypApplication::FipStart => "fip",
            VdypApplication::VriStart => "vri",
            VdypApplication::Forward => "forward",
        }
    }
}

impl fmt::Display for VdypApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VdypApplication::FipStart => "FIPSTART",
            VdypApplication::VriStart => "VRISTART",
            VdypApplication::Forward => "VDYP Forward",
        };
        f.write_str(name)
    }
}

impl FromStr for VdypApplication {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fip" | "fipstart" => Ok(VdypApplication::FipStart),
            "vri" | "vristart" => Ok(VdypApplication::VriStart),
            "forward" | "vdyp" => Ok(VdypApplication::Forward),
            other => Err(Error::configuration(format!(
                "Unknown application '{}'. Expected one of: fip, vri, forward",
                other
            ))),
        }
    }
}

/// Settings for control file parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlParserConfig {
    /// Application whose record table and extra tables are used
    pub application: VdypApplication,

    /// Number of SP0 genus definitions expected in the species definition file
    pub num_species: usize,

    /// BEC zone that substitutes for non-growth, non-volume and non-decay zones
    pub default_bec: String,

    /// Highest basal area group identifier accepted by group keyed tables
    pub max_ba_groups: i32,

    /// Minimum veteran height used when the control file gives zero or less
    pub default_minimum_veteran_height: f32,

    /// Highest site curve number accepted by the age maximum table
    pub max_site_curve: i32,
}

impl Default for ControlParserConfig {
    fn default() -> Self {
        Self {
            application: VdypApplication::FipStart,
            num_species: DEFAULT_NUM_SPECIES,
            default_bec: DEFAULT_BEC_ALIAS.to_string(),
            max_ba_groups: DEFAULT_MAX_BA_GROUPS,
            default_minimum_veteran_height: DEFAULT_MINIMUM_VETERAN_HEIGHT,
            max_site_curve: DEFAULT_MAX_SITE_CURVE,
        }
    }
}

impl ControlParserConfig {
    /// Configuration for the given application with default limits
    pub fn for_application(application: VdypApplication) -> Self {
        Self::default().with_application(application)
    }

    /// Set the application
    pub fn with_application(mut self, application: VdypApplication) -> Self {
        self.application = application;
        self
    }

    /// Set the expected number of SP0 species
    pub fn with_num_species(mut self, num_species: usize) -> Self {
        self.num_species = num_species;
        self
    }

    /// Set the default BEC alias
    pub fn with_default_bec(mut self, default_bec: impl Into<String>) -> Self {
        self.default_bec = default_bec.into();
        self
    }

    /// Set the highest accepted basal area group
    pub fn with_max_ba_groups(mut self, max_ba_groups: i32) -> Self {
        self.max_ba_groups = max_ba_groups;
        self
    }

    /// Check that the limits are usable
    pub fn validate(&self) -> Result<()> {
        if self.num_species == 0 {
            return Err(Error::configuration("num_species must be at least 1"));
        }
        if self.default_bec.trim().is_empty() || self.default_bec.len() > 4 {
            return Err(Error::configuration(format!(
                "default_bec '{}' must be 1 to 4 characters",
                self.default_bec
            )));
        }
        if self.max_ba_groups < 1 {
            return Err(Error::configuration("max_ba_groups must be at least 1"));
        }
        if self.default_minimum_veteran_height <= 0.0 {
            return Err(Error::configuration(
                "default_minimum_veteran_height must be positive",
            ));
        }
        debug!("Validated parser configuration: {:?}", self);
        Ok(())
    }
}
