//! Command-line argument definitions for the VDYP control tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::Result;
use crate::config::{ControlParserConfig, VdypApplication};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the VDYP control file tool
///
/// Reads VDYP control files, resolves the coefficient tables they name and
/// reports what was found.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vdyp-control",
    version,
    about = "Read and resolve VDYP control files",
    long_about = "Reads the fixed-column control files that configure the VDYP growth and yield \
                  applications, resolves every coefficient table they reference and prints a \
                  summary of the resulting control map."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a control file and summarise every key
    Inspect(InspectArgs),
    /// Print the control record table for an application
    Keys(KeysArgs),
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Control file to read
    ///
    /// Resources named in the control file are looked up relative to its directory.
    #[arg(value_name = "CONTROL_FILE")]
    pub control_file: PathBuf,

    /// Application the control file configures
    #[arg(
        short = 'a',
        long = "application",
        value_name = "APP",
        default_value = "forward",
        help = "Application the control file configures (fip, vri, forward)"
    )]
    pub application: VdypApplication,

    /// Resolve every referenced resource
    ///
    /// Without this flag only the control file itself is read and file names
    /// are reported as written.
    #[arg(long = "resolve", help = "Parse every resource the control file names")]
    pub resolve: bool,

    /// Number of SP0 genus definitions expected
    #[arg(long = "num-species", value_name = "COUNT")]
    pub num_species: Option<usize>,

    /// BEC zone used for substitution
    #[arg(long = "default-bec", value_name = "ALIAS")]
    pub default_bec: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the keys command
#[derive(Debug, Clone, Parser)]
pub struct KeysArgs {
    /// Application whose record table is printed
    #[arg(
        short = 'a',
        long = "application",
        value_name = "APP",
        default_value = "forward",
        help = "Application whose record table is printed (fip, vri, forward)"
    )]
    pub application: VdypApplication,
}

impl InspectArgs {
    /// Parser configuration built from the arguments
    pub fn to_config(&self) -> Result<ControlParserConfig> {
        let mut config = ControlParserConfig::for_application(self.application);
        if let Some(num_species) = self.num_species {
            config = config.with_num_species(num_species);
        }
        if let Some(default_bec) = &self.default_bec {
            config = config.with_default_bec(default_bec.clone());
        }
        config.validate()?;
        Ok(config)
    }

    /// Log level name selected by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_defaults() {
        let args = Args::try_parse_from(["vdyp-control", "inspect", "vdyp.ctl"]).unwrap();
        let Some(Commands::Inspect(inspect)) = args.command else {
            panic!("expected inspect");
        };

        assert_eq!(inspect.control_file, PathBuf::from("vdyp.ctl"));
        assert_eq!(inspect.application, VdypApplication::Forward);
        assert!(!inspect.resolve);
        assert_eq!(inspect.get_log_level(), "warn");

        let config = inspect.to_config().unwrap();
        assert_eq!(config.application, VdypApplication::Forward);
        assert_eq!(config.num_species, 16);
    }

    #[test]
    fn test_inspect_options() {
        let args = Args::try_parse_from([
            "vdyp-control",
            "inspect",
            "fip.ctl",
            "--application",
            "fip",
            "--resolve",
            "--num-species",
            "4",
            "-vv",
        ])
        .unwrap();
        let Some(Commands::Inspect(inspect)) = args.command else {
            panic!("expected inspect");
        };

        assert_eq!(inspect.application, VdypApplication::FipStart);
        assert!(inspect.resolve);
        assert_eq!(inspect.get_log_level(), "debug");
        assert_eq!(inspect.to_config().unwrap().num_species, 4);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Args::try_parse_from(["vdyp-control", "inspect", "a.ctl", "-a", "bogus"]).is_err());
        assert!(Args::try_parse_from(["vdyp-control", "inspect", "a.ctl", "-q", "-v"]).is_err());
        assert!(Args::try_parse_from(["vdyp-control", "inspect"]).is_err());

        let args = Args::try_parse_from(["vdyp-control", "inspect", "a.ctl", "--default-bec", "TOOLONG"])
            .unwrap();
        let Some(Commands::Inspect(inspect)) = args.command else {
            panic!("expected inspect");
        };
        assert!(inspect.to_config().is_err());
    }

    #[test]
    fn test_keys_application() {
        let args = Args::try_parse_from(["vdyp-control", "keys", "-a", "vri"]).unwrap();
        let Some(Commands::Keys(keys)) = args.command else {
            panic!("expected keys");
        };
        assert_eq!(keys.application, VdypApplication::VriStart);
    }
}
