//! Values held by a control map
//!
//! [`ControlValue`] is a closed set of shapes. A control file record starts out
//! as a raw [`ControlValue::FileName`], an [`ControlValue::Absent`] marker or an
//! inline literal, and its modifier replaces it with one of the structured
//! tables. [`ControlValueType`] maps each payload type to exactly one variant so
//! callers can ask for a typed reference and get a descriptive error otherwise.

use crate::app::models::{
    BecLookup, Coefficients, ComponentSizeLimits, GenusDefinitionMap, InputFileDescriptor,
    MatrixMap2, MatrixMap3, Minima, NonprimaryHlCoefficients, OutputFileDescriptor, Region,
    SiteCurveAgeMaximums, StockingClassFactor,
};
use std::collections::BTreeMap;

/// Coefficients by BEC alias and SP0 alias
pub type BecSpeciesCoefficients = MatrixMap2<String, String, Coefficients>;

/// Coefficients by SP0 alias and region
pub type SpeciesRegionCoefficients = MatrixMap2<String, Region, Coefficients>;

/// Non-primary height coefficients by species, primary species and region
pub type NonprimaryHlTable = MatrixMap3<String, String, Region, Option<NonprimaryHlCoefficients>>;

/// Coefficients by SP0 alias
pub type SpeciesCoefficients = BTreeMap<String, Coefficients>;

/// Component size limits by SP0 alias and region
pub type ComponentSizeTable = MatrixMap2<String, Region, ComponentSizeLimits>;

/// Coefficients by utilization class index, SP0 alias and BEC alias
pub type UtilComponentCoefficients = MatrixMap3<i32, String, String, Option<Coefficients>>;

/// Coefficients by group number
pub type GroupCoefficients = BTreeMap<i32, Coefficients>;

/// Coefficients by utilization class index and group number
pub type UtilGroupCoefficients = MatrixMap2<i32, i32, Option<Coefficients>>;

/// Equation group numbers by SP0 alias and BEC alias
pub type EquationGroups = MatrixMap2<String, String, i32>;

/// Reassigned equation groups by default group and inventory type group
pub type EquationModifiers = MatrixMap2<i32, i32, Option<i32>>;

/// Stocking class factors by stocking class and region
pub type StockingClassFactors = MatrixMap2<char, Region, Option<StockingClassFactor>>;

/// Site curve numbers by SP0 alias and region
pub type SiteCurveNumbers = MatrixMap2<String, Region, Option<i32>>;

/// Single factors by SP0 alias and region
pub type SpeciesRegionFactors = MatrixMap2<String, Region, f32>;

/// A control map entry
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// An optional record that was left blank or never given
    Absent,
    /// A resource name that has not been resolved yet
    FileName(String),
    Integer(i32),
    IntegerList(Vec<i32>),
    Minima(Minima),
    InputFile(InputFileDescriptor),
    OutputFile(OutputFileDescriptor),
    BecLookup(BecLookup),
    Genera(GenusDefinitionMap),
    EquationGroups(EquationGroups),
    EquationModifiers(EquationModifiers),
    StockingClassFactors(StockingClassFactors),
    SiteCurveNumbers(SiteCurveNumbers),
    SiteCurveAgeMaximums(SiteCurveAgeMaximums),
    BecSpeciesCoefficients(BecSpeciesCoefficients),
    SpeciesRegionCoefficients(SpeciesRegionCoefficients),
    NonprimaryHl(NonprimaryHlTable),
    SpeciesCoefficients(SpeciesCoefficients),
    ComponentSizeLimits(ComponentSizeTable),
    UtilComponentCoefficients(UtilComponentCoefficients),
    GroupCoefficients(GroupCoefficients),
    UtilGroupCoefficients(UtilGroupCoefficients),
    SpeciesRegionFactors(SpeciesRegionFactors),
}

impl ControlValue {
    /// Short description of the value's shape, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::FileName(_) => <String as ControlValueType>::TYPE_NAME,
            Self::Integer(_) => <i32 as ControlValueType>::TYPE_NAME,
            Self::IntegerList(_) => <Vec<i32> as ControlValueType>::TYPE_NAME,
            Self::Minima(_) => <Minima as ControlValueType>::TYPE_NAME,
            Self::InputFile(_) => <InputFileDescriptor as ControlValueType>::TYPE_NAME,
            Self::OutputFile(_) => <OutputFileDescriptor as ControlValueType>::TYPE_NAME,
            Self::BecLookup(_) => <BecLookup as ControlValueType>::TYPE_NAME,
            Self::Genera(_) => <GenusDefinitionMap as ControlValueType>::TYPE_NAME,
            Self::EquationGroups(_) => <EquationGroups as ControlValueType>::TYPE_NAME,
            Self::EquationModifiers(_) => <EquationModifiers as ControlValueType>::TYPE_NAME,
            Self::StockingClassFactors(_) => <StockingClassFactors as ControlValueType>::TYPE_NAME,
            Self::SiteCurveNumbers(_) => <SiteCurveNumbers as ControlValueType>::TYPE_NAME,
            Self::SiteCurveAgeMaximums(_) => <SiteCurveAgeMaximums as ControlValueType>::TYPE_NAME,
            Self::BecSpeciesCoefficients(_) => {
                <BecSpeciesCoefficients as ControlValueType>::TYPE_NAME
            }
            Self::SpeciesRegionCoefficients(_) => {
                <SpeciesRegionCoefficients as ControlValueType>::TYPE_NAME
            }
            Self::NonprimaryHl(_) => <NonprimaryHlTable as ControlValueType>::TYPE_NAME,
            Self::SpeciesCoefficients(_) => <SpeciesCoefficients as ControlValueType>::TYPE_NAME,
            Self::ComponentSizeLimits(_) => <ComponentSizeTable as ControlValueType>::TYPE_NAME,
            Self::UtilComponentCoefficients(_) => {
                <UtilComponentCoefficients as ControlValueType>::TYPE_NAME
            }
            Self::GroupCoefficients(_) => <GroupCoefficients as ControlValueType>::TYPE_NAME,
            Self::UtilGroupCoefficients(_) => {
                <UtilGroupCoefficients as ControlValueType>::TYPE_NAME
            }
            Self::SpeciesRegionFactors(_) => <SpeciesRegionFactors as ControlValueType>::TYPE_NAME,
        }
    }

    /// Whether the value is still an unresolved resource name
    pub fn is_file_name(&self) -> bool {
        matches!(self, Self::FileName(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A payload type stored in exactly one [`ControlValue`] variant
pub trait ControlValueType: Sized {
    /// Description used in "expected ... but was ..." messages
    const TYPE_NAME: &'static str;

    fn from_value(value: &ControlValue) -> Option<&Self>;

    fn from_value_mut(value: &mut ControlValue) -> Option<&mut Self>;

    /// Unwrap an owned value, handing it back unchanged on a shape mismatch
    fn from_owned(value: ControlValue) -> std::result::Result<Self, ControlValue>;

    fn into_value(self) -> ControlValue;
}

macro_rules! control_value_type {
    ($variant:ident, $payload:ty, $type_name:literal) => {
        impl ControlValueType for $payload {
            const TYPE_NAME: &'static str = $type_name;

            fn from_value(value: &ControlValue) -> Option<&Self> {
                match value {
                    ControlValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut ControlValue) -> Option<&mut Self> {
                match value {
                    ControlValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_owned(value: ControlValue) -> std::result::Result<Self, ControlValue> {
                match value {
                    ControlValue::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn into_value(self) -> ControlValue {
                ControlValue::$variant(self)
            }
        }

        impl From<$payload> for ControlValue {
            fn from(value: $payload) -> Self {
                ControlValue::$variant(value)
            }
        }
    };
}

control_value_type!(FileName, String, "a file name");
control_value_type!(Integer, i32, "an integer");
control_value_type!(IntegerList, Vec<i32>, "a list of integers");
control_value_type!(Minima, Minima, "minima");
control_value_type!(InputFile, InputFileDescriptor, "an input file");
control_value_type!(OutputFile, OutputFileDescriptor, "an output file");
control_value_type!(BecLookup, BecLookup, "BEC definitions");
control_value_type!(Genera, GenusDefinitionMap, "genus definitions");
control_value_type!(EquationGroups, EquationGroups, "equation groups");
control_value_type!(EquationModifiers, EquationModifiers, "equation group modifiers");
control_value_type!(StockingClassFactors, StockingClassFactors, "stocking class factors");
control_value_type!(SiteCurveNumbers, SiteCurveNumbers, "site curve numbers");
control_value_type!(SiteCurveAgeMaximums, SiteCurveAgeMaximums, "site curve age maximums");
control_value_type!(BecSpeciesCoefficients, BecSpeciesCoefficients, "coefficients by BEC and species");
control_value_type!(
    SpeciesRegionCoefficients,
    SpeciesRegionCoefficients,
    "coefficients by species and region"
);
control_value_type!(NonprimaryHl, NonprimaryHlTable, "non-primary height coefficients");
control_value_type!(SpeciesCoefficients, SpeciesCoefficients, "coefficients by species");
control_value_type!(ComponentSizeLimits, ComponentSizeTable, "component size limits");
control_value_type!(
    UtilComponentCoefficients,
    UtilComponentCoefficients,
    "coefficients by utilization class, species and BEC"
);
control_value_type!(GroupCoefficients, GroupCoefficients, "coefficients by group");
control_value_type!(
    UtilGroupCoefficients,
    UtilGroupCoefficients,
    "coefficients by utilization class and group"
);
control_value_type!(SpeciesRegionFactors, SpeciesRegionFactors, "factors by species and region");
