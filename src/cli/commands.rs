//! Command implementations for the VDYP control CLI
//!
//! This module contains the command execution logic and the colored reports
//! printed for each command.

use crate::app::services::control_map::{
    ControlFileParser, ControlParser, ControlValue, RecordDefinition, RecordFormat,
};
use crate::cli::args::{Args, Commands, InspectArgs, KeysArgs};
use crate::config::{ControlParserConfig, VdypApplication};
use crate::{ControlKey, Error, ResolvedControlMap, Result};
use colored::*;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use tracing::{debug, info};

/// What the inspect command found in a control file
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSummary {
    pub application: VdypApplication,
    /// Every populated key with a short description of its value
    pub entries: Vec<(ControlKey, String)>,
    /// Records with an index the application does not declare
    pub unknown_records: Vec<(String, String)>,
    /// Whether referenced resources were parsed
    pub resolved: bool,
}

impl ControlSummary {
    /// Number of keys holding a value other than absent
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|(_, value)| value != ABSENT).count()
    }
}

const ABSENT: &str = "-";

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Inspect(inspect_args)) => {
            setup_logging(inspect_args.get_log_level())?;
            debug!("Command line arguments: {:?}", inspect_args);
            let summary = inspect(&inspect_args)?;
            print_summary(&summary);
            Ok(())
        }
        Some(Commands::Keys(keys_args)) => {
            print_record_table(&keys_args);
            Ok(())
        }
        None => Err(Error::configuration("No command given")),
    }
}

/// Set up structured logging at the given level
///
/// `RUST_LOG` overrides the level when set.
fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vdyp_control={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Read a control file and summarise its keys
///
/// With `--resolve` every referenced resource is parsed and the result is
/// checked by building a [`ResolvedControlMap`].
pub fn inspect(args: &InspectArgs) -> Result<ControlSummary> {
    let start = Instant::now();
    let config = args.to_config()?;
    let parser = ControlParser::new(config)?;

    let map = if args.resolve {
        parser.parse_file(&args.control_file)?
    } else {
        let file = File::open(&args.control_file).map_err(|e| {
            Error::io(
                format!("Failed to open control file {}", args.control_file.display()),
                e,
            )
        })?;
        parser.read_control_files([BufReader::new(file)])?
    };

    let summary = ControlSummary {
        application: map.application(),
        entries: map
            .iter()
            .map(|(key, value)| (key, describe_value(value)))
            .collect(),
        unknown_records: map
            .unknown_records()
            .iter()
            .map(|(index, value)| (index.clone(), value.clone()))
            .collect(),
        resolved: args.resolve,
    };

    if args.resolve {
        let resolved = ResolvedControlMap::new(map)?;
        info!(
            "{} BEC zones, {} genera, {} input files",
            resolved.bec_lookup().len(),
            resolved.genus_definitions().len(),
            resolved.input_files().len()
        );
    }

    info!(
        "Inspected {} in {:.2?}",
        args.control_file.display(),
        start.elapsed()
    );
    Ok(summary)
}

/// Short description of a control value
pub fn describe_value(value: &ControlValue) -> String {
    match value {
        ControlValue::Absent => ABSENT.to_string(),
        ControlValue::FileName(name) => name.clone(),
        ControlValue::Integer(value) => value.to_string(),
        ControlValue::IntegerList(values) => values
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        ControlValue::Minima(minima) => format!(
            "height {} base area {} predicted base area {} veteran height {}",
            minima.minimum_height,
            minima.minimum_base_area,
            minima.minimum_predicted_base_area,
            minima.minimum_veteran_height
        ),
        ControlValue::InputFile(descriptor) => descriptor.description.clone(),
        ControlValue::OutputFile(descriptor) => descriptor.name.clone(),
        ControlValue::BecLookup(becs) => format!("{} BEC zones", becs.len()),
        ControlValue::Genera(genera) => format!("{} genera: {}", genera.len(), genera.aliases().join(" ")),
        other => other.type_name().to_string(),
    }
}

/// Record table declared for an application
pub fn record_table(application: VdypApplication) -> Vec<RecordDefinition> {
    let parser = ControlFileParser::for_application(ControlParserConfig::for_application(application));
    parser.records().copied().collect()
}

fn format_label(format: RecordFormat) -> &'static str {
    match format {
        RecordFormat::FileName => "file",
        RecordFormat::OptionalFileName => "optional file",
        RecordFormat::Integer => "integer",
        RecordFormat::IntegerList => "integer list",
        RecordFormat::Minima => "minima",
    }
}

fn print_summary(summary: &ControlSummary) {
    let mode = if summary.resolved { "resolved" } else { "raw" };
    println!(
        "{} {} ({})",
        "Control map for".bold(),
        summary.application.to_string().bold().cyan(),
        mode
    );
    println!();

    for (key, value) in &summary.entries {
        let label = format!("{:>28}", key.to_string());
        if value == ABSENT {
            println!("{}  {}", label.dimmed(), value.dimmed());
        } else {
            println!("{}  {}", label.green(), value);
        }
    }

    if !summary.unknown_records.is_empty() {
        println!();
        println!("{}", "Unknown records:".yellow().bold());
        for (index, value) in &summary.unknown_records {
            println!("{:>28}  {}", index.yellow(), value);
        }
    }

    println!();
    println!(
        "{} {} of {} keys present",
        "✓".green().bold(),
        summary.present_count(),
        summary.entries.len()
    );
}

fn print_record_table(args: &KeysArgs) {
    println!(
        "{} {}",
        "Control records for".bold(),
        args.application.to_string().bold().cyan()
    );
    println!();
    println!("{:>5}  {:<36}  {}", "Index".bold(), "Key".bold(), "Format".bold());
    for record in record_table(args.application) {
        println!(
            "{:>5}  {:<36}  {}",
            format!("{:03}", record.sequence).cyan(),
            record.key.name(),
            format_label(record.format)
        );
    }
}
