//! Control keys and their control file sequence numbers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every entry a control map can hold
///
/// Keys read from a control file carry the record sequence number they are
/// found under. Keys that only exist as a side effect of another record, such
/// as the modifier tables installed by the modifier file, have no sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlKey {
    MaxNumPoly,
    BecDef,
    Sp0Def,

    FipInputYieldPoly,
    FipInputYieldLayer,
    FipInputYieldLxSp0,
    VriInputYieldPoly,
    VriInputYieldLayer,
    VriInputYieldHeightAgeSi,
    VriInputYieldSpecDist,
    ForwardInputVdypPoly,
    ForwardInputVdypLayerBySpecies,
    ForwardInputVdypLayerBySp0ByUtil,
    ForwardInputGrowto,

    VdypPolygon,
    VdypLayerBySpecies,
    VdypLayerBySp0ByUtil,

    VolumeEqnGroups,
    DecayGroups,
    BreakageGroups,
    SiteCurveNumbers,
    SiteCurveAgeMax,
    DefaultEqNum,
    EqnModifiers,
    StockingClassFactors,

    CoeBa,
    CoeDq,
    UpperBaByCiS0P,
    HlPrimarySpEqnP1,
    HlPrimarySpEqnP2,
    HlPrimarySpEqnP3,
    HlNonprimary,
    BySpeciesDq,
    SpeciesComponentSizeLimit,
    UtilCompBa,
    UtilCompDq,
    SmallCompProbability,
    SmallCompBa,
    SmallCompDq,
    SmallCompHl,
    SmallCompWsVolume,
    TotalStandWholeStemVol,
    UtilCompWsVolume,
    CloseUtilVolume,
    VolumeNetDecay,
    VolumeNetDecayWaste,
    Breakage,
    VeteranLayerVolumeAdjust,
    VeteranLayerDq,
    VeteranBq,

    BaYield,
    DqYield,
    BaDqUpperBounds,

    Minima,
    ModifierFile,
    DebugSwitches,

    BaModifiers,
    DqModifiers,
    DecayModifiers,
    WasteModifiers,
}

impl ControlKey {
    /// Every key in declaration order
    pub const ALL: [ControlKey; 60] = [
        Self::MaxNumPoly,
        Self::BecDef,
        Self::Sp0Def,
        Self::FipInputYieldPoly,
        Self::FipInputYieldLayer,
        Self::FipInputYieldLxSp0,
        Self::VriInputYieldPoly,
        Self::VriInputYieldLayer,
        Self::VriInputYieldHeightAgeSi,
        Self::VriInputYieldSpecDist,
        Self::ForwardInputVdypPoly,
        Self::ForwardInputVdypLayerBySpecies,
        Self::ForwardInputVdypLayerBySp0ByUtil,
        Self::ForwardInputGrowto,
        Self::VdypPolygon,
        Self::VdypLayerBySpecies,
        Self::VdypLayerBySp0ByUtil,
        Self::VolumeEqnGroups,
        Self::DecayGroups,
        Self::BreakageGroups,
        Self::SiteCurveNumbers,
        Self::SiteCurveAgeMax,
        Self::DefaultEqNum,
        Self::EqnModifiers,
        Self::StockingClassFactors,
        Self::CoeBa,
        Self::CoeDq,
        Self::UpperBaByCiS0P,
        Self::HlPrimarySpEqnP1,
        Self::HlPrimarySpEqnP2,
        Self::HlPrimarySpEqnP3,
        Self::HlNonprimary,
        Self::BySpeciesDq,
        Self::SpeciesComponentSizeLimit,
        Self::UtilCompBa,
        Self::UtilCompDq,
        Self::SmallCompProbability,
        Self::SmallCompBa,
        Self::SmallCompDq,
        Self::SmallCompHl,
        Self::SmallCompWsVolume,
        Self::TotalStandWholeStemVol,
        Self::UtilCompWsVolume,
        Self::CloseUtilVolume,
        Self::VolumeNetDecay,
        Self::VolumeNetDecayWaste,
        Self::Breakage,
        Self::VeteranLayerVolumeAdjust,
        Self::VeteranLayerDq,
        Self::VeteranBq,
        Self::BaYield,
        Self::DqYield,
        Self::BaDqUpperBounds,
        Self::Minima,
        Self::ModifierFile,
        Self::DebugSwitches,
        Self::BaModifiers,
        Self::DqModifiers,
        Self::DecayModifiers,
        Self::WasteModifiers,
    ];

    /// Name of the key as it appears in messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::MaxNumPoly => "MAX_NUM_POLY",
            Self::BecDef => "BEC_DEF",
            Self::Sp0Def => "SP0_DEF",
            Self::FipInputYieldPoly => "FIP_INPUT_YIELD_POLY",
            Self::FipInputYieldLayer => "FIP_INPUT_YIELD_LAYER",
            Self::FipInputYieldLxSp0 => "FIP_INPUT_YIELD_LX_SP0",
            Self::VriInputYieldPoly => "VRI_INPUT_YIELD_POLY",
            Self::VriInputYieldLayer => "VRI_INPUT_YIELD_LAYER",
            Self::VriInputYieldHeightAgeSi => "VRI_INPUT_YIELD_HEIGHT_AGE_SI",
            Self::VriInputYieldSpecDist => "VRI_INPUT_YIELD_SPEC_DIST",
            Self::ForwardInputVdypPoly => "FORWARD_INPUT_VDYP_POLY",
            Self::ForwardInputVdypLayerBySpecies => "FORWARD_INPUT_VDYP_LAYER_BY_SPECIES",
            Self::ForwardInputVdypLayerBySp0ByUtil => "FORWARD_INPUT_VDYP_LAYER_BY_SP0_BY_UTIL",
            Self::ForwardInputGrowto => "FORWARD_INPUT_GROWTO",
            Self::VdypPolygon => "VDYP_POLYGON",
            Self::VdypLayerBySpecies => "VDYP_LAYER_BY_SPECIES",
            Self::VdypLayerBySp0ByUtil => "VDYP_LAYER_BY_SP0_BY_UTIL",
            Self::VolumeEqnGroups => "VOLUME_EQN_GROUPS",
            Self::DecayGroups => "DECAY_GROUPS",
            Self::BreakageGroups => "BREAKAGE_GROUPS",
            Self::SiteCurveNumbers => "SITE_CURVE_NUMBERS",
            Self::SiteCurveAgeMax => "SITE_CURVE_AGE_MAX",
            Self::DefaultEqNum => "DEFAULT_EQ_NUM",
            Self::EqnModifiers => "EQN_MODIFIERS",
            Self::StockingClassFactors => "STOCKING_CLASS_FACTORS",
            Self::CoeBa => "COE_BA",
            Self::CoeDq => "COE_DQ",
            Self::UpperBaByCiS0P => "UPPER_BA_BY_CI_S0_P",
            Self::HlPrimarySpEqnP1 => "HL_PRIMARY_SP_EQN_P1",
            Self::HlPrimarySpEqnP2 => "HL_PRIMARY_SP_EQN_P2",
            Self::HlPrimarySpEqnP3 => "HL_PRIMARY_SP_EQN_P3",
            Self::HlNonprimary => "HL_NONPRIMARY",
            Self::BySpeciesDq => "BY_SPECIES_DQ",
            Self::SpeciesComponentSizeLimit => "SPECIES_COMPONENT_SIZE_LIMIT",
            Self::UtilCompBa => "UTIL_COMP_BA",
            Self::UtilCompDq => "UTIL_COMP_DQ",
            Self::SmallCompProbability => "SMALL_COMP_PROBABILITY",
            Self::SmallCompBa => "SMALL_COMP_BA",
            Self::SmallCompDq => "SMALL_COMP_DQ",
            Self::SmallCompHl => "SMALL_COMP_HL",
            Self::SmallCompWsVolume => "SMALL_COMP_WS_VOLUME",
            Self::TotalStandWholeStemVol => "TOTAL_STAND_WHOLE_STEM_VOL",
            Self::UtilCompWsVolume => "UTIL_COMP_WS_VOLUME",
            Self::CloseUtilVolume => "CLOSE_UTIL_VOLUME",
            Self::VolumeNetDecay => "VOLUME_NET_DECAY",
            Self::VolumeNetDecayWaste => "VOLUME_NET_DECAY_WASTE",
            Self::Breakage => "BREAKAGE",
            Self::VeteranLayerVolumeAdjust => "VETERAN_LAYER_VOLUME_ADJUST",
            Self::VeteranLayerDq => "VETERAN_LAYER_DQ",
            Self::VeteranBq => "VETERAN_BQ",
            Self::BaYield => "BA_YIELD",
            Self::DqYield => "DQ_YIELD",
            Self::BaDqUpperBounds => "BA_DQ_UPPER_BOUNDS",
            Self::Minima => "MINIMA",
            Self::ModifierFile => "MODIFIER_FILE",
            Self::DebugSwitches => "DEBUG_SWITCHES",
            Self::BaModifiers => "BA_MODIFIERS",
            Self::DqModifiers => "DQ_MODIFIERS",
            Self::DecayModifiers => "DECAY_MODIFIERS",
            Self::WasteModifiers => "WASTE_MODIFIERS",
        }
    }

    /// Record sequence number in a control file, if the key is read from one
    pub fn sequence(&self) -> Option<u32> {
        let sequence = match self {
            Self::MaxNumPoly => 1,
            Self::BecDef => 9,
            Self::Sp0Def => 10,
            Self::FipInputYieldPoly | Self::VriInputYieldPoly | Self::ForwardInputVdypPoly => 11,
            Self::FipInputYieldLayer
            | Self::VriInputYieldLayer
            | Self::ForwardInputVdypLayerBySpecies => 12,
            Self::FipInputYieldLxSp0
            | Self::VriInputYieldHeightAgeSi
            | Self::ForwardInputVdypLayerBySp0ByUtil => 13,
            Self::VriInputYieldSpecDist | Self::ForwardInputGrowto => 14,
            Self::VdypPolygon => 15,
            Self::VdypLayerBySpecies => 16,
            Self::VdypLayerBySp0ByUtil => 18,
            Self::VolumeEqnGroups => 20,
            Self::DecayGroups => 21,
            Self::BreakageGroups => 22,
            Self::SiteCurveNumbers => 25,
            Self::SiteCurveAgeMax => 26,
            Self::DefaultEqNum => 30,
            Self::EqnModifiers => 31,
            Self::StockingClassFactors => 33,
            Self::CoeBa => 40,
            Self::CoeDq => 41,
            Self::UpperBaByCiS0P => 43,
            Self::HlPrimarySpEqnP1 => 50,
            Self::HlPrimarySpEqnP2 => 51,
            Self::HlPrimarySpEqnP3 => 52,
            Self::HlNonprimary => 53,
            Self::BySpeciesDq => 60,
            Self::SpeciesComponentSizeLimit => 61,
            Self::UtilCompBa => 70,
            Self::UtilCompDq => 71,
            Self::SmallCompProbability => 80,
            Self::SmallCompBa => 81,
            Self::SmallCompDq => 82,
            Self::SmallCompHl => 85,
            Self::SmallCompWsVolume => 86,
            Self::TotalStandWholeStemVol => 90,
            Self::UtilCompWsVolume => 91,
            Self::CloseUtilVolume => 92,
            Self::VolumeNetDecay => 93,
            Self::VolumeNetDecayWaste => 94,
            Self::Breakage => 95,
            Self::VeteranLayerVolumeAdjust => 96,
            Self::VeteranLayerDq => 97,
            Self::VeteranBq => 98,
            Self::BaYield => 106,
            Self::DqYield => 107,
            Self::BaDqUpperBounds => 108,
            Self::Minima => 197,
            Self::ModifierFile => 198,
            Self::DebugSwitches => 199,
            Self::BaModifiers | Self::DqModifiers | Self::DecayModifiers | Self::WasteModifiers => {
                return None;
            }
        };
        Some(sequence)
    }

    /// Key with the given name
    pub fn from_name(name: &str) -> Option<ControlKey> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sequence() {
            Some(sequence) => write!(f, "{}({:03})", self.name(), sequence),
            None => write!(f, "{}", self.name()),
        }
    }
}
