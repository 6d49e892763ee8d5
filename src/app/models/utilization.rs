//! Utilization classes and stand metrics
//!
//! Stand and species measurements are broken down by utilization class: a SMALL
//! class below 7.5 cm, an ALL class summarizing everything from 7.5 cm up, and four
//! diameter bands. A [`UtilizationVector`] holds one value per class, indexed -1
//! (SMALL) through 4 (22.5 cm and over).

use crate::app::models::Coefficients;
use crate::constants::{MAX_REASONABLE_VALUE, PI_40K};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A diameter band used to break down stand measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UtilizationClass {
    Small,
    All,
    U75To125,
    U125To175,
    U175To225,
    Over225,
}

/// The four diameter bands that sum to [`UtilizationClass::All`]
pub const UTIL_CLASSES: [UtilizationClass; 4] = [
    UtilizationClass::U75To125,
    UtilizationClass::U125To175,
    UtilizationClass::U175To225,
    UtilizationClass::Over225,
];

impl UtilizationClass {
    /// Every class in index order
    pub const ALL_CLASSES: [UtilizationClass; 6] = [
        UtilizationClass::Small,
        UtilizationClass::All,
        UtilizationClass::U75To125,
        UtilizationClass::U125To175,
        UtilizationClass::U175To225,
        UtilizationClass::Over225,
    ];

    /// Index of this class within a utilization vector
    pub fn index(&self) -> i32 {
        match self {
            UtilizationClass::Small => -1,
            UtilizationClass::All => 0,
            UtilizationClass::U75To125 => 1,
            UtilizationClass::U125To175 => 2,
            UtilizationClass::U175To225 => 3,
            UtilizationClass::Over225 => 4,
        }
    }

    /// Class at a utilization vector index
    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL_CLASSES.into_iter().find(|uc| uc.index() == index)
    }

    /// Lower diameter bound in cm
    pub fn low_bound(&self) -> f32 {
        match self {
            UtilizationClass::Small => 0.0,
            UtilizationClass::All | UtilizationClass::U75To125 => 7.5,
            UtilizationClass::U125To175 => 12.5,
            UtilizationClass::U175To225 => 17.5,
            UtilizationClass::Over225 => 22.5,
        }
    }

    /// Upper diameter bound in cm
    pub fn high_bound(&self) -> f32 {
        match self {
            UtilizationClass::Small => 7.5,
            UtilizationClass::U75To125 => 12.5,
            UtilizationClass::U125To175 => 17.5,
            UtilizationClass::U175To225 => 22.5,
            UtilizationClass::All | UtilizationClass::Over225 => 10000.0,
        }
    }

    /// Class with the next lower index
    pub fn previous(&self) -> Option<Self> {
        Self::from_index(self.index() - 1)
    }

    /// Class with the next higher index
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Label used in logs and coefficient files
    pub fn label(&self) -> &'static str {
        match self {
            UtilizationClass::Small => "<7.5 cm",
            UtilizationClass::All => ">=7.5 cm",
            UtilizationClass::U75To125 => "7.5 - 12.5 cm",
            UtilizationClass::U125To175 => "12.5 - 17.5 cm",
            UtilizationClass::U175To225 => "17.5 - 22.5 cm",
            UtilizationClass::Over225 => ">22.5 cm",
        }
    }
}

impl fmt::Display for UtilizationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value for each utilization class, indexed -1 through 4
#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationVector {
    coefficients: Coefficients,
}

impl Default for UtilizationVector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilizationVector {
    /// A vector with every class set to zero
    pub fn new() -> Self {
        Self {
            coefficients: Coefficients::empty(6, UtilizationClass::Small.index()),
        }
    }

    /// A vector with SMALL set to `small`, ALL set to `all` and each band set from `bands`
    pub fn from_values(small: f32, all: f32, bands: [f32; 4]) -> Self {
        let mut values = vec![small, all];
        values.extend_from_slice(&bands);
        Self {
            coefficients: Coefficients::new(values, UtilizationClass::Small.index()),
        }
    }

    /// A vector with SMALL at zero, ALL set to `all` and each band set from `bands`
    pub fn from_all_and_bands(all: f32, bands: [f32; 4]) -> Self {
        Self::from_values(0.0, all, bands)
    }

    /// Value for a class
    pub fn get(&self, uc: UtilizationClass) -> f32 {
        self[uc]
    }

    /// Replace the value for a class
    pub fn set(&mut self, uc: UtilizationClass, value: f32) {
        self[uc] = value;
    }

    /// Sum of the four diameter bands
    pub fn sum_of_bands(&self) -> f32 {
        UTIL_CLASSES.iter().map(|uc| self[*uc]).sum()
    }

    /// Underlying coefficients, lower index -1
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }
}

impl Index<UtilizationClass> for UtilizationVector {
    type Output = f32;

    fn index(&self, uc: UtilizationClass) -> &f32 {
        // Offsets 0..6 always exist for the six classes
        &self.coefficients_slice()[(uc.index() + 1) as usize]
    }
}

impl IndexMut<UtilizationClass> for UtilizationVector {
    fn index_mut(&mut self, uc: UtilizationClass) -> &mut f32 {
        &mut self.coefficients_slice_mut()[(uc.index() + 1) as usize]
    }
}

impl UtilizationVector {
    fn coefficients_slice(&self) -> &[f32] {
        self.coefficients.as_slice()
    }

    fn coefficients_slice_mut(&mut self) -> &mut [f32] {
        self.coefficients.as_mut_slice()
    }
}

/// Trees per hectare from basal area (m²/ha) and quadratic mean diameter (cm)
///
/// Zero when either input is not positive.
pub fn trees_per_hectare(basal_area: f32, quad_mean_diameter: f32) -> f32 {
    if basal_area > 0.0 && quad_mean_diameter > 0.0 {
        basal_area / PI_40K / (quad_mean_diameter * quad_mean_diameter)
    } else {
        0.0
    }
}

/// Quadratic mean diameter (cm) from basal area (m²/ha) and trees per hectare
///
/// Zero when either input is not positive, not a number, or unreasonably large.
pub fn quad_mean_diameter(basal_area: f32, trees_per_hectare: f32) -> f32 {
    if basal_area > MAX_REASONABLE_VALUE
        || basal_area.is_nan()
        || trees_per_hectare > MAX_REASONABLE_VALUE
        || trees_per_hectare.is_nan()
    {
        return 0.0;
    }
    if basal_area > 0.0 && trees_per_hectare > 0.0 {
        (basal_area / trees_per_hectare / PI_40K).sqrt()
    } else {
        0.0
    }
}
