//! Typed, eagerly resolved view of a control map
//!
//! [`ResolvedControlMap`] takes a fully resolved [`ControlMap`] and pulls every
//! table out of it once. A missing or mistyped entry fails construction with
//! the key's name and sequence number, so consumers never see a lookup error
//! afterwards. Tables that only some applications read are held in an
//! [`ExtraTable`] chosen by the application.
//!
//! ## Architecture
//!
//! - Common tables - definitions, equation groups, height, volume, decay and
//!   breakage coefficients, modifiers and minima
//! - [`ExtraTable`] - stocking class factors for FIPSTART, or the yield tables
//!   and upper bounds for VRISTART and VDYP Forward
//! - Data files - the located input files and the named output files

use crate::app::models::{
    BecLookup, GenusDefinitionMap, InputFileDescriptor, Minima, OutputFileDescriptor,
    SiteCurveAgeMaximum, SiteCurveAgeMaximums,
};
use crate::app::services::control_map::control_file::{OUTPUT_RECORDS, input_records};
use crate::app::services::control_map::control_value::{
    BecSpeciesCoefficients, ComponentSizeTable, EquationGroups, EquationModifiers,
    GroupCoefficients, NonprimaryHlTable, SiteCurveNumbers, SpeciesCoefficients,
    SpeciesRegionCoefficients, SpeciesRegionFactors, StockingClassFactors,
    UtilComponentCoefficients, UtilGroupCoefficients,
};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlValue, ControlValueType};
use crate::config::VdypApplication;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Tables only some applications read
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraTable {
    /// FIPSTART
    Fip {
        stocking_class_factors: StockingClassFactors,
    },
    /// VRISTART and VDYP Forward
    Yield {
        ba_yield: BecSpeciesCoefficients,
        dq_yield: BecSpeciesCoefficients,
        upper_bounds: GroupCoefficients,
    },
}

impl ExtraTable {
    fn take(application: VdypApplication, map: &mut ControlMap) -> Result<Self> {
        let extra = match application {
            VdypApplication::FipStart => ExtraTable::Fip {
                stocking_class_factors: map.take(ControlKey::StockingClassFactors)?,
            },
            VdypApplication::VriStart | VdypApplication::Forward => ExtraTable::Yield {
                ba_yield: map.take(ControlKey::BaYield)?,
                dq_yield: map.take(ControlKey::DqYield)?,
                upper_bounds: map.take(ControlKey::BaDqUpperBounds)?,
            },
        };
        Ok(extra)
    }

    /// Keys held by this table set
    pub fn keys(&self) -> Vec<ControlKey> {
        match self {
            ExtraTable::Fip { .. } => vec![ControlKey::StockingClassFactors],
            ExtraTable::Yield { .. } => vec![
                ControlKey::BaYield,
                ControlKey::DqYield,
                ControlKey::BaDqUpperBounds,
            ],
        }
    }
}

/// Every table an application reads, extracted once from a resolved control map
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedControlMap {
    application: VdypApplication,
    max_num_poly: Option<i32>,

    bec_lookup: BecLookup,
    genera: GenusDefinitionMap,

    volume_equation_groups: EquationGroups,
    decay_equation_groups: EquationGroups,
    breakage_equation_groups: EquationGroups,
    default_equation_groups: EquationGroups,
    equation_modifier_groups: EquationModifiers,

    site_curve_numbers: SiteCurveNumbers,
    site_curve_age_maximums: SiteCurveAgeMaximums,

    coe_ba: BecSpeciesCoefficients,
    coe_dq: BecSpeciesCoefficients,
    upper_ba_by_ci_s0p: SpeciesRegionCoefficients,
    hl_primary_sp_eqn_p1: SpeciesRegionCoefficients,
    hl_primary_sp_eqn_p2: SpeciesRegionCoefficients,
    hl_primary_sp_eqn_p3: SpeciesRegionCoefficients,
    hl_nonprimary: NonprimaryHlTable,
    quad_mean_diameter_by_species: SpeciesCoefficients,
    component_size_limits: ComponentSizeTable,
    basal_area_util_component: UtilComponentCoefficients,
    quad_mean_diameter_util_component: UtilComponentCoefficients,
    small_component_probability: SpeciesCoefficients,
    small_component_basal_area: SpeciesCoefficients,
    small_component_quad_mean_diameter: SpeciesCoefficients,
    small_component_lorey_height: SpeciesCoefficients,
    small_component_whole_stem_volume: SpeciesCoefficients,
    total_stand_whole_stem_volume: GroupCoefficients,
    util_component_whole_stem_volume: UtilGroupCoefficients,
    close_utilization_volume: UtilGroupCoefficients,
    net_decay: UtilGroupCoefficients,
    net_decay_waste: SpeciesCoefficients,
    breakage: GroupCoefficients,
    veteran_layer_volume_adjust: SpeciesCoefficients,
    veteran_dq: SpeciesRegionCoefficients,
    veteran_bq: SpeciesRegionCoefficients,

    extra: ExtraTable,

    minima: Minima,
    ba_modifiers: SpeciesRegionFactors,
    dq_modifiers: SpeciesRegionFactors,
    decay_modifiers: SpeciesRegionFactors,
    waste_modifiers: SpeciesRegionFactors,
    modifier_file: Option<InputFileDescriptor>,
    debug_switches: Vec<i32>,

    input_files: BTreeMap<ControlKey, InputFileDescriptor>,
    output_files: BTreeMap<ControlKey, OutputFileDescriptor>,
}

impl ResolvedControlMap {
    /// Extract every table from a resolved control map
    ///
    /// The map is consumed so the tables move rather than being copied.
    pub fn new(mut map: ControlMap) -> Result<Self> {
        let application = map.application();
        let map = &mut map;

        let mut input_files = BTreeMap::new();
        for (key, format) in input_records(application) {
            let descriptor = if format.is_optional() {
                take_optional::<InputFileDescriptor>(map, *key)?
            } else {
                Some(map.take::<InputFileDescriptor>(*key)?)
            };
            if let Some(descriptor) = descriptor {
                input_files.insert(*key, descriptor);
            }
        }

        let mut output_files = BTreeMap::new();
        for key in OUTPUT_RECORDS {
            if let Some(descriptor) = take_optional::<OutputFileDescriptor>(map, key)? {
                output_files.insert(key, descriptor);
            }
        }

        let resolved = Self {
            application,
            max_num_poly: take_optional(map, ControlKey::MaxNumPoly)?,
            bec_lookup: map.take(ControlKey::BecDef)?,
            genera: map.take(ControlKey::Sp0Def)?,
            volume_equation_groups: map.take(ControlKey::VolumeEqnGroups)?,
            decay_equation_groups: map.take(ControlKey::DecayGroups)?,
            breakage_equation_groups: map.take(ControlKey::BreakageGroups)?,
            default_equation_groups: map.take(ControlKey::DefaultEqNum)?,
            equation_modifier_groups: map.take(ControlKey::EqnModifiers)?,
            site_curve_numbers: map.take(ControlKey::SiteCurveNumbers)?,
            site_curve_age_maximums: map.take(ControlKey::SiteCurveAgeMax)?,
            coe_ba: map.take(ControlKey::CoeBa)?,
            coe_dq: map.take(ControlKey::CoeDq)?,
            upper_ba_by_ci_s0p: map.take(ControlKey::UpperBaByCiS0P)?,
            hl_primary_sp_eqn_p1: map.take(ControlKey::HlPrimarySpEqnP1)?,
            hl_primary_sp_eqn_p2: map.take(ControlKey::HlPrimarySpEqnP2)?,
            hl_primary_sp_eqn_p3: map.take(ControlKey::HlPrimarySpEqnP3)?,
            hl_nonprimary: map.take(ControlKey::HlNonprimary)?,
            quad_mean_diameter_by_species: map.take(ControlKey::BySpeciesDq)?,
            component_size_limits: map.take(ControlKey::SpeciesComponentSizeLimit)?,
            basal_area_util_component: map.take(ControlKey::UtilCompBa)?,
            quad_mean_diameter_util_component: map.take(ControlKey::UtilCompDq)?,
            small_component_probability: map.take(ControlKey::SmallCompProbability)?,
            small_component_basal_area: map.take(ControlKey::SmallCompBa)?,
            small_component_quad_mean_diameter: map.take(ControlKey::SmallCompDq)?,
            small_component_lorey_height: map.take(ControlKey::SmallCompHl)?,
            small_component_whole_stem_volume: map.take(ControlKey::SmallCompWsVolume)?,
            total_stand_whole_stem_volume: map.take(ControlKey::TotalStandWholeStemVol)?,
            util_component_whole_stem_volume: map.take(ControlKey::UtilCompWsVolume)?,
            close_utilization_volume: map.take(ControlKey::CloseUtilVolume)?,
            net_decay: map.take(ControlKey::VolumeNetDecay)?,
            net_decay_waste: map.take(ControlKey::VolumeNetDecayWaste)?,
            breakage: map.take(ControlKey::Breakage)?,
            veteran_layer_volume_adjust: map.take(ControlKey::VeteranLayerVolumeAdjust)?,
            veteran_dq: map.take(ControlKey::VeteranLayerDq)?,
            veteran_bq: map.take(ControlKey::VeteranBq)?,
            extra: ExtraTable::take(application, map)?,
            minima: map.take(ControlKey::Minima)?,
            ba_modifiers: map.take(ControlKey::BaModifiers)?,
            dq_modifiers: map.take(ControlKey::DqModifiers)?,
            decay_modifiers: map.take(ControlKey::DecayModifiers)?,
            waste_modifiers: map.take(ControlKey::WasteModifiers)?,
            modifier_file: take_optional(map, ControlKey::ModifierFile)?,
            debug_switches: take_optional(map, ControlKey::DebugSwitches)?.unwrap_or_default(),
            input_files,
            output_files,
        };

        for (key, value) in map.iter() {
            debug!("{} is not used by {}: {}", key, application, value.type_name());
        }
        info!(
            "Resolved {} tables for {} ({} input files)",
            resolved.genera.len(),
            application,
            resolved.input_files.len()
        );
        Ok(resolved)
    }

    pub fn application(&self) -> VdypApplication {
        self.application
    }

    /// Maximum number of polygons to process, if given
    pub fn max_num_poly(&self) -> Option<i32> {
        self.max_num_poly
    }

    pub fn bec_lookup(&self) -> &BecLookup {
        &self.bec_lookup
    }

    pub fn genus_definitions(&self) -> &GenusDefinitionMap {
        &self.genera
    }

    pub fn volume_equation_groups(&self) -> &EquationGroups {
        &self.volume_equation_groups
    }

    pub fn decay_equation_groups(&self) -> &EquationGroups {
        &self.decay_equation_groups
    }

    pub fn breakage_equation_groups(&self) -> &EquationGroups {
        &self.breakage_equation_groups
    }

    pub fn default_equation_groups(&self) -> &EquationGroups {
        &self.default_equation_groups
    }

    pub fn equation_modifier_groups(&self) -> &EquationModifiers {
        &self.equation_modifier_groups
    }

    /// Equation group for a species in a BEC zone, after any inventory type group reassignment
    pub fn equation_group(&self, sp0: &str, bec: &str, inventory_type_group: i32) -> Result<i32> {
        let default_group = *self
            .default_equation_groups
            .get(&sp0.to_string(), &bec.to_string())?;
        let modified = *self
            .equation_modifier_groups
            .get(&default_group, &inventory_type_group)?;
        Ok(modified.unwrap_or(default_group))
    }

    pub fn site_curve_numbers(&self) -> &SiteCurveNumbers {
        &self.site_curve_numbers
    }

    pub fn site_curve_age_maximums(&self) -> &SiteCurveAgeMaximums {
        &self.site_curve_age_maximums
    }

    /// Maximum ages for a site curve, or the defaults if it was not given
    pub fn maximum_age_by_site_curve(&self, site_curve: i32) -> SiteCurveAgeMaximum {
        self.site_curve_age_maximums.get(site_curve)
    }

    pub fn coe_ba(&self) -> &BecSpeciesCoefficients {
        &self.coe_ba
    }

    pub fn coe_dq(&self) -> &BecSpeciesCoefficients {
        &self.coe_dq
    }

    pub fn upper_ba_by_ci_s0p(&self) -> &SpeciesRegionCoefficients {
        &self.upper_ba_by_ci_s0p
    }

    pub fn hl_primary_sp_eqn_p1(&self) -> &SpeciesRegionCoefficients {
        &self.hl_primary_sp_eqn_p1
    }

    pub fn hl_primary_sp_eqn_p2(&self) -> &SpeciesRegionCoefficients {
        &self.hl_primary_sp_eqn_p2
    }

    pub fn hl_primary_sp_eqn_p3(&self) -> &SpeciesRegionCoefficients {
        &self.hl_primary_sp_eqn_p3
    }

    pub fn hl_nonprimary(&self) -> &NonprimaryHlTable {
        &self.hl_nonprimary
    }

    pub fn quad_mean_diameter_by_species(&self) -> &SpeciesCoefficients {
        &self.quad_mean_diameter_by_species
    }

    pub fn component_size_limits(&self) -> &ComponentSizeTable {
        &self.component_size_limits
    }

    pub fn basal_area_util_component(&self) -> &UtilComponentCoefficients {
        &self.basal_area_util_component
    }

    pub fn quad_mean_diameter_util_component(&self) -> &UtilComponentCoefficients {
        &self.quad_mean_diameter_util_component
    }

    pub fn small_component_probability(&self) -> &SpeciesCoefficients {
        &self.small_component_probability
    }

    pub fn small_component_basal_area(&self) -> &SpeciesCoefficients {
        &self.small_component_basal_area
    }

    pub fn small_component_quad_mean_diameter(&self) -> &SpeciesCoefficients {
        &self.small_component_quad_mean_diameter
    }

    pub fn small_component_lorey_height(&self) -> &SpeciesCoefficients {
        &self.small_component_lorey_height
    }

    pub fn small_component_whole_stem_volume(&self) -> &SpeciesCoefficients {
        &self.small_component_whole_stem_volume
    }

    pub fn total_stand_whole_stem_volume(&self) -> &GroupCoefficients {
        &self.total_stand_whole_stem_volume
    }

    pub fn util_component_whole_stem_volume(&self) -> &UtilGroupCoefficients {
        &self.util_component_whole_stem_volume
    }

    pub fn close_utilization_volume(&self) -> &UtilGroupCoefficients {
        &self.close_utilization_volume
    }

    pub fn net_decay(&self) -> &UtilGroupCoefficients {
        &self.net_decay
    }

    pub fn net_decay_waste(&self) -> &SpeciesCoefficients {
        &self.net_decay_waste
    }

    pub fn breakage(&self) -> &GroupCoefficients {
        &self.breakage
    }

    pub fn veteran_layer_volume_adjust(&self) -> &SpeciesCoefficients {
        &self.veteran_layer_volume_adjust
    }

    pub fn veteran_dq(&self) -> &SpeciesRegionCoefficients {
        &self.veteran_dq
    }

    pub fn veteran_bq(&self) -> &SpeciesRegionCoefficients {
        &self.veteran_bq
    }

    /// Tables specific to the application
    pub fn extra(&self) -> &ExtraTable {
        &self.extra
    }

    /// Stocking class factors; FIPSTART only
    pub fn stocking_class_factors(&self) -> Option<&StockingClassFactors> {
        match &self.extra {
            ExtraTable::Fip {
                stocking_class_factors,
            } => Some(stocking_class_factors),
            ExtraTable::Yield { .. } => None,
        }
    }

    /// Basal area yield coefficients; VRISTART and VDYP Forward only
    pub fn ba_yield(&self) -> Option<&BecSpeciesCoefficients> {
        match &self.extra {
            ExtraTable::Yield { ba_yield, .. } => Some(ba_yield),
            ExtraTable::Fip { .. } => None,
        }
    }

    /// Diameter yield coefficients; VRISTART and VDYP Forward only
    pub fn dq_yield(&self) -> Option<&BecSpeciesCoefficients> {
        match &self.extra {
            ExtraTable::Yield { dq_yield, .. } => Some(dq_yield),
            ExtraTable::Fip { .. } => None,
        }
    }

    /// Basal area and diameter upper bounds by basal area group; VRISTART and VDYP Forward only
    pub fn upper_bounds(&self) -> Option<&GroupCoefficients> {
        match &self.extra {
            ExtraTable::Yield { upper_bounds, .. } => Some(upper_bounds),
            ExtraTable::Fip { .. } => None,
        }
    }

    pub fn minima(&self) -> &Minima {
        &self.minima
    }

    pub fn ba_modifiers(&self) -> &SpeciesRegionFactors {
        &self.ba_modifiers
    }

    pub fn dq_modifiers(&self) -> &SpeciesRegionFactors {
        &self.dq_modifiers
    }

    pub fn decay_modifiers(&self) -> &SpeciesRegionFactors {
        &self.decay_modifiers
    }

    pub fn waste_modifiers(&self) -> &SpeciesRegionFactors {
        &self.waste_modifiers
    }

    /// Modifier file that was applied, if any
    pub fn modifier_file(&self) -> Option<&InputFileDescriptor> {
        self.modifier_file.as_ref()
    }

    pub fn debug_switches(&self) -> &[i32] {
        &self.debug_switches
    }

    /// Debug switch by its 1-based position; switches that were not given are 0
    pub fn debug_switch(&self, position: usize) -> i32 {
        position
            .checked_sub(1)
            .and_then(|i| self.debug_switches.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Located input file for a key
    pub fn input_file(&self, key: ControlKey) -> Result<&InputFileDescriptor> {
        self.input_files
            .get(&key)
            .ok_or_else(|| Error::missing_control(key))
    }

    pub fn input_files(&self) -> &BTreeMap<ControlKey, InputFileDescriptor> {
        &self.input_files
    }

    /// Named output file for a key, if one was given
    pub fn output_file(&self, key: ControlKey) -> Option<&OutputFileDescriptor> {
        self.output_files.get(&key)
    }

    pub fn output_files(&self) -> &BTreeMap<ControlKey, OutputFileDescriptor> {
        &self.output_files
    }
}

impl TryFrom<ControlMap> for ResolvedControlMap {
    type Error = Error;

    fn try_from(map: ControlMap) -> Result<Self> {
        Self::new(map)
    }
}

/// Remove an entry that may be missing or absent
fn take_optional<T: ControlValueType>(map: &mut ControlMap, key: ControlKey) -> Result<Option<T>> {
    match map.remove(key) {
        None | Some(ControlValue::Absent) => Ok(None),
        Some(value) => T::from_owned(value).map(Some).map_err(|value| {
            let found = value.type_name();
            map.insert(key, value);
            Error::unexpected_control_type(key, T::TYPE_NAME, found)
        }),
    }
}
