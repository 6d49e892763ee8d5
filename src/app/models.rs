//! Domain models for VDYP control data
//!
//! This module contains the value types that control file sub-resources are parsed
//! into and that the resolved control map hands out to consumers.
//!
//! ## Architecture
//!
//! - [`region`] - Coastal and interior regions
//! - [`coefficients`] - Index-offset coefficient vectors
//! - [`matrix_map`] - Dense 2-D and 3-D maps over ordered key dimensions
//! - [`utilization`] - Utilization classes, utilization vectors and stand metrics
//! - [`bec`] - Biogeoclimatic zone definitions and substitution lookup
//! - [`genus`] - SP0 genus definitions ordered by preference
//! - [`tables`] - Small record types stored in coefficient tables

pub mod bec;
pub mod coefficients;
pub mod genus;
pub mod matrix_map;
pub mod region;
pub mod tables;
pub mod utilization;

#[cfg(test)]
pub mod tests;

// Re-export model types for convenience
pub use bec::{BecDefinition, BecLookup, Substitution};
pub use coefficients::Coefficients;
pub use genus::{GenusDefinition, GenusDefinitionMap};
pub use matrix_map::{Dimension, MatrixMap2, MatrixMap3};
pub use region::Region;
pub use tables::{
    ComponentSizeLimits, InputFileDescriptor, Minima, NonprimaryHlCoefficients, OutputFileDescriptor,
    SiteCurveAgeMaximum, SiteCurveAgeMaximums, StockingClassFactor,
};
pub use utilization::{
    UTIL_CLASSES, UtilizationClass, UtilizationVector, quad_mean_diameter, trees_per_hectare,
};
