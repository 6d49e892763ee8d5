//! Control map resolution pipeline
//!
//! Orchestrates the complete control file workflow: reading one or more
//! control files into a raw [`ControlMap`], then running every modifier in a
//! fixed phase order so that later resources can refer to the definitions
//! resolved before them.

use crate::app::adapters::file_resolver::{FileResolver, FileSystemResolver};
use crate::app::services::coefficient_parsers::{
    BecDefinitionParser, BecSpeciesCoefficientParser, BySpeciesDqParser, ComponentSizeParser,
    EquationGroupParser, EquationModifierParser, GenusDefinitionParser, GroupCoefficientParser,
    HlNonprimaryParser, InputFileModifier, ModifierFileParser, OutputFileModifier,
    SiteCurveAgeMaximumParser, SiteCurveParser, SpeciesCoefficientParser,
    SpeciesRegionCoefficientParser, StockingClassFactorParser, UpperBoundsParser,
    UtilComponentParser, UtilGroupCoefficientParser,
};
use crate::app::services::control_map::control_file::{
    ControlFileParser, RecordFormat, input_records, OUTPUT_RECORDS,
};
use crate::app::services::control_map::{ControlKey, ControlMap, ControlMapModifier, Requirement};
use crate::config::{ControlParserConfig, VdypApplication};
use crate::{Error, Result};
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A group of modifiers that run together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    BasicDefinitions,
    GroupDefinitions,
    InputFiles,
    ApplicationTables,
    SiteCurves,
    Coefficients,
    NonFipCoefficients,
    Extras,
}

impl Phase {
    /// Every phase in the order it runs
    pub const ALL: [Phase; 8] = [
        Phase::BasicDefinitions,
        Phase::GroupDefinitions,
        Phase::InputFiles,
        Phase::ApplicationTables,
        Phase::SiteCurves,
        Phase::Coefficients,
        Phase::NonFipCoefficients,
        Phase::Extras,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::BasicDefinitions => "basic definitions",
            Phase::GroupDefinitions => "group definitions",
            Phase::InputFiles => "input files",
            Phase::ApplicationTables => "application tables",
            Phase::SiteCurves => "site curves",
            Phase::Coefficients => "coefficients",
            Phase::NonFipCoefficients => "non-FIP coefficients",
            Phase::Extras => "extras",
        }
    }

    /// Modifiers of this phase for the configured application, in run order
    pub fn modifiers(&self, config: &ControlParserConfig) -> Vec<Box<dyn ControlMapModifier>> {
        let application = config.application;
        match self {
            Phase::BasicDefinitions => vec![
                Box::new(BecDefinitionParser::new(config.default_bec.clone())),
                Box::new(GenusDefinitionParser::new(config.num_species)),
            ],
            Phase::GroupDefinitions => vec![
                Box::new(EquationGroupParser::volume()),
                Box::new(EquationGroupParser::decay()),
                Box::new(EquationGroupParser::breakage()),
                Box::new(EquationGroupParser::default_equation()),
                Box::new(EquationModifierParser::new()),
            ],
            Phase::InputFiles => input_file_modifiers(application),
            Phase::ApplicationTables => match application {
                VdypApplication::FipStart => vec![Box::new(StockingClassFactorParser::new())],
                VdypApplication::VriStart | VdypApplication::Forward => Vec::new(),
            },
            Phase::SiteCurves => vec![
                Box::new(SiteCurveParser::new()),
                Box::new(SiteCurveAgeMaximumParser::new(config.max_site_curve)),
            ],
            Phase::Coefficients => coefficient_modifiers(),
            Phase::NonFipCoefficients => match application {
                VdypApplication::FipStart => Vec::new(),
                VdypApplication::VriStart | VdypApplication::Forward => vec![
                    Box::new(BecSpeciesCoefficientParser::ba_yield()),
                    Box::new(BecSpeciesCoefficientParser::dq_yield()),
                    Box::new(UpperBoundsParser::new(config.max_ba_groups)),
                ],
            },
            Phase::Extras => vec![Box::new(ModifierFileParser::new(application))],
        }
    }
}

fn input_file_modifiers(application: VdypApplication) -> Vec<Box<dyn ControlMapModifier>> {
    let poly = input_records(application).first().map(|(key, _)| *key);
    let mut modifiers: Vec<Box<dyn ControlMapModifier>> = Vec::new();
    for (key, format) in input_records(application) {
        let modifier = match (format, poly) {
            (RecordFormat::OptionalFileName, Some(poly)) => InputFileModifier::with_fallback(*key, poly),
            (RecordFormat::OptionalFileName, None) => InputFileModifier::new(*key, Requirement::Optional),
            _ => InputFileModifier::new(*key, Requirement::Required),
        };
        modifiers.push(Box::new(modifier));
    }
    for key in OUTPUT_RECORDS {
        modifiers.push(Box::new(OutputFileModifier::new(key)));
    }
    modifiers
}

fn coefficient_modifiers() -> Vec<Box<dyn ControlMapModifier>> {
    vec![
        Box::new(BecSpeciesCoefficientParser::coe_ba()),
        Box::new(BecSpeciesCoefficientParser::coe_dq()),
        Box::new(SpeciesRegionCoefficientParser::upper_ba()),
        Box::new(SpeciesRegionCoefficientParser::hl_p1()),
        Box::new(SpeciesRegionCoefficientParser::hl_p2()),
        Box::new(SpeciesRegionCoefficientParser::hl_p3()),
        Box::new(HlNonprimaryParser::new()),
        Box::new(BySpeciesDqParser::new()),
        Box::new(ComponentSizeParser::new()),
        Box::new(UtilComponentParser::ba()),
        Box::new(UtilComponentParser::dq()),
        Box::new(SpeciesCoefficientParser::small_comp_probability()),
        Box::new(SpeciesCoefficientParser::small_comp_ba()),
        Box::new(SpeciesCoefficientParser::small_comp_dq()),
        Box::new(SpeciesCoefficientParser::small_comp_hl()),
        Box::new(SpeciesCoefficientParser::small_comp_ws_volume()),
        Box::new(GroupCoefficientParser::total_stand_whole_stem_volume()),
        Box::new(UtilGroupCoefficientParser::util_comp_ws_volume()),
        Box::new(UtilGroupCoefficientParser::close_util_volume()),
        Box::new(UtilGroupCoefficientParser::volume_net_decay()),
        Box::new(SpeciesCoefficientParser::volume_net_decay_waste()),
        Box::new(GroupCoefficientParser::breakage()),
        Box::new(SpeciesCoefficientParser::veteran_layer_volume_adjust()),
        Box::new(SpeciesRegionCoefficientParser::veteran_dq()),
        Box::new(SpeciesRegionCoefficientParser::veteran_bq()),
    ]
}

/// Reads control files and resolves everything they name
pub struct ControlParser {
    config: ControlParserConfig,
    file_parser: ControlFileParser,
}

impl ControlParser {
    /// Create a parser, rejecting unusable limits
    pub fn new(config: ControlParserConfig) -> Result<Self> {
        config.validate()?;
        let file_parser = ControlFileParser::for_application(config.clone());
        Ok(Self {
            config,
            file_parser,
        })
    }

    pub fn config(&self) -> &ControlParserConfig {
        &self.config
    }

    /// Record table used for the configured application
    pub fn file_parser(&self) -> &ControlFileParser {
        &self.file_parser
    }

    /// Read control files in order into one raw map, without resolving anything
    pub fn read_control_files<R: BufRead>(&self, inputs: impl IntoIterator<Item = R>) -> Result<ControlMap> {
        let mut map = ControlMap::new(self.config.application);
        for (i, input) in inputs.into_iter().enumerate() {
            self.file_parser
                .parse(input, &mut map)
                .map_err(|error| Error::resource_parse(format!("control file {}", i + 1), error))?;
        }
        debug!("Read {} control records", map.len());
        Ok(map)
    }

    /// Read a named control file and resolve it
    ///
    /// Resources named by the control file are resolved with `resolver`.
    pub fn parse(&self, control_file: &str, resolver: &dyn FileResolver) -> Result<ControlMap> {
        let input = resolver.resolve_for_input(control_file)?;
        let mut map = ControlMap::new(self.config.application);
        self.file_parser
            .parse(input, &mut map)
            .map_err(|error| Error::resource_parse(resolver.describe(control_file), error))?;
        self.resolve(&mut map, resolver)?;
        Ok(map)
    }

    /// Read a control file on disk, resolving names relative to its directory
    pub fn parse_file(&self, path: &Path) -> Result<ControlMap> {
        let resolver = FileSystemResolver::for_file(path);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::configuration(format!("{} is not a control file path", path.display()))
            })?;
        self.parse(&name, &resolver)
    }

    /// Run every phase's modifiers against a raw map
    pub fn resolve(&self, map: &mut ControlMap, resolver: &dyn FileResolver) -> Result<()> {
        let start = Instant::now();
        for phase in Phase::ALL {
            self.resolve_phase(phase, map, resolver)?;
        }
        info!(
            "Resolved control map for {} in {:.2?}",
            self.config.application,
            start.elapsed()
        );
        Ok(())
    }

    /// Run the modifiers of a single phase
    pub fn resolve_phase(&self, phase: Phase, map: &mut ControlMap, resolver: &dyn FileResolver) -> Result<()> {
        let modifiers = phase.modifiers(&self.config);
        if modifiers.is_empty() {
            debug!("No {} for {}", phase.name(), self.config.application);
            return Ok(());
        }
        for modifier in &modifiers {
            debug!("Resolving {}", modifier.control_key());
            modifier.modify(map, resolver)?;
        }
        info!("Resolved {} ({} keys)", phase.name(), modifiers.len());
        Ok(())
    }

    /// Keys each phase fills for the configured application
    pub fn phase_keys(&self) -> Vec<(Phase, Vec<ControlKey>)> {
        Phase::ALL
            .iter()
            .map(|phase| {
                let keys = phase
                    .modifiers(&self.config)
                    .iter()
                    .map(|modifier| modifier.control_key())
                    .collect();
                (*phase, keys)
            })
            .collect()
    }
}
