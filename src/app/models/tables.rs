//! Record types stored in coefficient tables

use crate::app::models::{Coefficients, Region};
use crate::constants::site_curve;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Height coefficients for a non-primary species growing with a primary species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonprimaryHlCoefficients {
    /// Two coefficients starting at index 1
    pub coefficients: Coefficients,

    /// Height equation the coefficients are used with
    pub equation_index: i32,
}

impl NonprimaryHlCoefficients {
    pub fn new(coefficients: Coefficients, equation_index: i32) -> Self {
        Self {
            coefficients,
            equation_index,
        }
    }
}

/// Size limits for a species within a region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentSizeLimits {
    pub lorey_height_maximum: f32,
    pub quad_mean_diameter_maximum: f32,
    pub min_quad_mean_diameter_lorey_height_ratio: f32,
    pub max_quad_mean_diameter_lorey_height_ratio: f32,
}

/// Maximum ages for a site curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteCurveAgeMaximum {
    pub age_coastal: f32,
    pub age_interior: f32,
    pub t1: f32,
    pub t2: f32,
}

impl SiteCurveAgeMaximum {
    /// Maximum age for the region
    pub fn age_maximum(&self, region: Region) -> f32 {
        match region {
            Region::Coastal => self.age_coastal,
            Region::Interior => self.age_interior,
        }
    }
}

impl Default for SiteCurveAgeMaximum {
    fn default() -> Self {
        Self {
            age_coastal: site_curve::DEFAULT_MAX_AGE,
            age_interior: site_curve::DEFAULT_MAX_AGE,
            t1: 0.0,
            t2: 0.0,
        }
    }
}

/// Site curve age maximums keyed by site curve number
///
/// Site curves missing from the table use [`SiteCurveAgeMaximum::default`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteCurveAgeMaximums {
    entries: BTreeMap<i32, SiteCurveAgeMaximum>,
}

impl SiteCurveAgeMaximums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximums for a site curve
    pub fn insert(&mut self, site_curve: i32, maximum: SiteCurveAgeMaximum) {
        self.entries.insert(site_curve, maximum);
    }

    /// Maximums for a site curve, or the default if it is not in the table
    pub fn get(&self, site_curve: i32) -> SiteCurveAgeMaximum {
        self.entries.get(&site_curve).copied().unwrap_or_default()
    }

    /// Whether the site curve was given explicitly
    pub fn contains(&self, site_curve: i32) -> bool {
        self.entries.contains_key(&site_curve)
    }

    /// Number of explicitly given site curves
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stocking class adjustment factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockingClassFactor {
    pub stocking_class: char,
    pub region: Region,
    pub factor: f32,
    pub npct_area: i32,
}

/// Minimum values used to screen polygons and layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Minima {
    pub minimum_height: f32,
    pub minimum_base_area: f32,
    pub minimum_predicted_base_area: f32,
    pub minimum_veteran_height: f32,
}

impl Minima {
    /// Key names used for the positional values of the MINIMA record
    pub const KEYS: [&'static str; 4] = [
        "MINIMUM_HEIGHT",
        "MINIMUM_BASE_AREA",
        "MINIMUM_PREDICTED_BASE_AREA",
        "MINIMUM_VETERAN_HEIGHT",
    ];

    /// Build from named values, applying the minimum veteran height substitute
    pub fn from_named(values: &BTreeMap<String, f32>, default_veteran_height: f32) -> Result<Self> {
        let value = |key: &str| {
            values.get(key).copied().ok_or_else(|| {
                Error::value_parse(key, format!("Missing minimum value {}", key))
            })
        };
        let veteran_height = values
            .get(Self::KEYS[3])
            .copied()
            .filter(|height| *height > 0.0)
            .unwrap_or(default_veteran_height);

        Ok(Self {
            minimum_height: value(Self::KEYS[0])?,
            minimum_base_area: value(Self::KEYS[1])?,
            minimum_predicted_base_area: value(Self::KEYS[2])?,
            minimum_veteran_height: veteran_height,
        })
    }
}

/// An input data file that was located through the file resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFileDescriptor {
    /// Name as written in the control file
    pub name: String,

    /// Where the resolver found it
    pub description: String,
}

/// An output data file named by the control file
///
/// Output files are only opened by the projection itself, never while the
/// control map is being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFileDescriptor {
    pub name: String,
}
