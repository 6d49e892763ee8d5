//! Shared test fixtures for domain model tests

use crate::app::models::{BecDefinition, BecLookup, Region};

pub mod matrix_map_tests;

/// Create a BEC lookup with one coastal zone, one interior zone and the
/// non-growth zones AT and BG
pub fn create_test_bec_lookup() -> BecLookup {
    BecLookup::new(
        vec![
            BecDefinition::new("AT", Region::Interior, "Alpine Tundra").with_capabilities(
                false, true, true,
            ),
            BecDefinition::new("BG", Region::Interior, "Bunchgrass").with_capabilities(
                false, false, true,
            ),
            BecDefinition::new("CWH", Region::Coastal, "Coastal Western Hemlock"),
            BecDefinition::new("ESSF", Region::Interior, "Engelmann Spruce"),
        ],
        "ESSF",
    )
}
