//! Application constants for VDYP control processing
//!
//! This module contains the default limits, fixed-column layout values and
//! numeric tolerances used throughout control file parsing and reconciliation.

// =============================================================================
// Control File Layout
// =============================================================================

/// Width of the record index at the start of every control line
pub const CONTROL_INDEX_LENGTH: usize = 3;

/// Width of the extension flag following the index
pub const CONTROL_EXTENSION_LENGTH: usize = 1;

/// Value width for a normal control record
pub const CONTROL_VALUE_LENGTH_STANDARD: usize = 50;

/// Value width for an extended control record (flag "X" or ">")
pub const CONTROL_VALUE_LENGTH_EXTENDED: usize = 120;

/// Extension flags that select the extended value width
pub const CONTROL_EXTENDED_FLAGS: &[&str] = &["X", ">"];

/// Extension flag that marks a whole line as a comment
pub const CONTROL_COMMENT_FLAG: &str = "C";

/// Marker that starts an inline comment within a control value
pub const CONTROL_INLINE_COMMENT: char = '!';

/// Pattern for a short key field that is blank or zero, such as "   " or " 0.0"
pub const BLANK_OR_ZERO_PATTERN: &str = r"^\s{0,3}0{0,3}\.?0{0,3}\s{0,3}$";

// =============================================================================
// Default Limits
// =============================================================================

/// Number of SP0 species defined by a standard species definition file
pub const DEFAULT_NUM_SPECIES: usize = 16;

/// BEC zone used when a zone has no growth, volume or decay equations of its own
pub const DEFAULT_BEC_ALIAS: &str = "ESSF";

/// Highest basal area group in the upper bounds table
pub const DEFAULT_MAX_BA_GROUPS: i32 = 180;

/// Minimum veteran height substituted when the control file value is not positive
pub const DEFAULT_MINIMUM_VETERAN_HEIGHT: f32 = 10.0;

/// Highest site curve number in the site curve age maximum table
pub const DEFAULT_MAX_SITE_CURVE: i32 = 40;

// =============================================================================
// Sub-resource Constants
// =============================================================================

/// BEC definitions that have no growth equations
pub mod bec {
    /// BEC aliases that cannot be used for growth
    pub const NON_GROWTH: &[&str] = &["AT", "BG"];

    /// BEC aliases that cannot be used for volume
    pub const NON_VOLUME: &[&str] = &["BG"];

    /// BEC aliases that cannot be used for decay
    pub const NON_DECAY: &[&str] = &[];

    /// Region column value that ends a BEC definition file
    pub const STOP_REGION: &str = "Z";
}

/// Equation group and modifier limits
pub mod equation_groups {
    /// Highest default equation group
    pub const MAX_DEFAULT_GROUP: i32 = 40;

    /// Highest inventory type group
    pub const MAX_ITG: i32 = 45;

    /// Highest volume and decay group in the volume coefficient tables
    pub const MAX_VOLUME_GROUPS: i32 = 80;

    /// Highest breakage group
    pub const MAX_BREAKAGE_GROUPS: i32 = 40;

    /// Utilization classes 1 to 4, from 7.5 cm up
    pub const MAX_UC_INDEX: i32 = 4;
}

/// Site curve age maximum defaults
pub mod site_curve {
    /// Age used when the table gives zero or less
    pub const AGE_SUBSTITUTE: f32 = 1999.0;

    /// Highest site curve filled by the catch-all row
    pub const CATCH_ALL_MAX: i32 = 140;

    /// Default coastal and interior maximum age
    pub const DEFAULT_MAX_AGE: f32 = 140.0;
}

/// Upper bounds table defaults
pub mod upper_bounds {
    /// Basal area bound for groups missing from the table
    pub const DEFAULT_BA: f32 = 0.0;

    /// Quadratic mean diameter bound for groups missing from the table
    pub const DEFAULT_DQ: f32 = 7.6;
}

/// Number of coefficients carried by each coefficient table
pub mod coefficient_counts {
    pub const BEC_SPECIES: usize = 10;
    pub const HL_P1: usize = 3;
    pub const HL_P2: usize = 2;
    pub const HL_P3: usize = 4;
    pub const BY_SPECIES_DQ: usize = 3;
    pub const UTIL_COMP_BA: usize = 2;
    pub const UTIL_COMP_DQ: usize = 4;
    pub const SMALL_COMP_PROBABILITY: usize = 4;
    pub const SMALL_COMP_BA: usize = 4;
    pub const SMALL_COMP_DQ: usize = 2;
    pub const SMALL_COMP_HL: usize = 2;
    pub const SMALL_COMP_WS_VOLUME: usize = 4;
    pub const TOTAL_STAND_WHOLE_STEM: usize = 9;
    pub const UTIL_COMP_WS_VOLUME: usize = 4;
    pub const CLOSE_UTIL_VOLUME: usize = 3;
    pub const VOLUME_NET_DECAY: usize = 3;
    pub const VOLUME_NET_DECAY_WASTE: usize = 6;
    pub const BREAKAGE: usize = 6;
    pub const VETERAN_VOLUME_ADJUST: usize = 4;
    pub const VETERAN_DQ: usize = 3;
    pub const BA_YIELD: usize = 7;
    pub const DQ_YIELD: usize = 6;
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Conversion factor between basal area, tree count and diameter: pi / 40000
pub const PI_40K: f32 = (std::f64::consts::PI / 40_000.0) as f32;

/// Quadratic mean diameter below which a stand cannot be reconciled
pub const MIN_RECONCILE_DQ: f32 = 7.5;

/// Relative tolerance between the class basal area sum and the stand total
pub const BA_SUM_TOLERANCE: f32 = 0.000_03;

/// Relative tolerance accepted before Mode 2 is run
pub const MODE_2_CHECK_TOLERANCE: f32 = 1.0e-5;

/// Iteration limit for Mode 2
pub const MODE_2_MAX_ITERATIONS: usize = 4;

/// Relative tolerance for the final sum verification
pub const RECONCILE_VERIFY_TOLERANCE: f32 = 0.0002;

/// Offset above a class lower bound assigned by Mode 3
pub const MODE_3_DQ_OFFSET: f32 = 2.5;

/// Values above this are treated as unusable in diameter computations
pub const MAX_REASONABLE_VALUE: f32 = 1.0e6;

// =============================================================================
// CLI
// =============================================================================

/// Exit codes used by the command line binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_40k_value() {
        assert!((PI_40K - 0.785_398_2e-4).abs() < 1e-10);
    }

    #[test]
    fn test_value_lengths() {
        assert!(CONTROL_VALUE_LENGTH_EXTENDED > CONTROL_VALUE_LENGTH_STANDARD);
        assert_eq!(CONTROL_INDEX_LENGTH + CONTROL_EXTENSION_LENGTH, 4);
    }
}
