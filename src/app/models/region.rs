//! Coastal and interior regions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic region a BEC zone or coefficient row applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Coastal,
    Interior,
}

impl Region {
    /// Every region, coastal first
    pub const ALL: [Region; 2] = [Region::Coastal, Region::Interior];

    /// Single character code used in control files
    pub fn code(&self) -> char {
        match self {
            Region::Coastal => 'C',
            Region::Interior => 'I',
        }
    }

    /// Look up a region by its code, ignoring case
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Region::Coastal),
            'I' => Some(Region::Interior),
            _ => None,
        }
    }

    /// Position of this region within [`Region::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Region::Coastal => 0,
            Region::Interior => 1,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Coastal => f.write_str("COASTAL"),
            Region::Interior => f.write_str("INTERIOR"),
        }
    }
}
