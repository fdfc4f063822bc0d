//! SuffixCopy CLI - collect files by suffix into one folder
//!
//! Walks a source tree, copies every match into a flat destination folder
//! and renames on collision.

use anyhow::Context;
use clap::Parser;
use suffixcopy::config::{CliArgs, OutputFormat, RunConfig};
use suffixcopy::core::{CopyRun, RunOutcome};
use suffixcopy::progress::ConsoleDisplay;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG takes precedence over -v
    let default_level = args.log_level();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every matched file was handled without error
fn run(args: CliArgs) -> anyhow::Result<bool> {
    let config = RunConfig::from_cli(&args).map_err(anyhow::Error::msg)?;

    if args.verbose > 0 {
        print_config(&config);
    }

    let display = if args.quiet {
        ConsoleDisplay::disabled()
    } else {
        ConsoleDisplay::new()
    };

    let mut copy_run = CopyRun::new(config, &display);
    let outcome = copy_run
        .execute()
        .with_context(|| format!("collecting from {}", args.source.display()))?;

    match outcome {
        RunOutcome::NoFiles => {
            if args.output_format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "total": 0, "copied": 0, "identical": 0, "errors": 0 }));
            }
            Ok(true)
        }
        RunOutcome::Completed(report) => {
            match args.output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text if !args.quiet => report.print_summary(),
                OutputFormat::Text => {}
            }
            Ok(report.is_success())
        }
    }
}

fn print_config(config: &RunConfig) {
    eprintln!("=== Configuration ===");
    eprintln!("Source:        {}", config.source.display());
    eprintln!("Extension:     {:?}", config.extension);
    eprintln!("Destination:   {}", config.destination_dir().display());
    eprintln!("Match mode:    {:?}", config.match_mode);
    eprintln!("Rename limit:  {:?}", config.rename_limit);
    eprintln!("Identical:     {}", if config.skip_identical { "skip" } else { "copy" });
    eprintln!("Threads:       {}", config.worker_threads());
    eprintln!();
}
