use anyhow::Context;
use clap::Parser;
use std::process;
use vdyp_control::cli::{args::Args, commands};
use vdyp_control::constants::exit_codes;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(exit_codes::SUCCESS);
    }

    let result = commands::run(args).context("vdyp-control failed");

    match result {
        Ok(()) => process::exit(exit_codes::SUCCESS),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(exit_codes::ERROR);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("VDYP Control - control file reader for the VDYP growth and yield applications");
    println!("=============================================================================");
    println!();
    println!("USAGE:");
    println!("    vdyp-control <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    inspect     Parse a control file and summarise every key");
    println!("    keys        Print the control record table for an application");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # List the records of a VDYP Forward control file:");
    println!("    vdyp-control inspect vdyp.ctl");
    println!();
    println!("    # Parse every coefficient table a FIPSTART control file names:");
    println!("    vdyp-control inspect fipstart.ctl --application fip --resolve -v");
    println!();
    println!("    # Show which records VRISTART reads:");
    println!("    vdyp-control keys --application vri");
}
