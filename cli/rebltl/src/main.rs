//! rebltl CLI: convert property-specification documents to LTL formulas.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;

use commands::convert::ConvertArgs;
use config::RebltlConfig;

#[derive(Parser)]
#[command(
    name = "rebltl",
    version,
    about = "Convert property-specification documents to LTL formulas"
)]
struct Cli {
    /// Configuration file (default: rebltl.toml in the current directory or above)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every definition of a document into an LTL formula
    Convert {
        /// Input JSON document ("-" for stdin, the default); repeat to merge documents
        #[arg(short, long)]
        input: Vec<String>,
        /// Output file ("-" for stdout, the default)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
        /// Skip definitions that fail to convert and report them at the end
        #[arg(long)]
        keep_going: bool,
        /// Type-check propositions before converting
        #[arg(long)]
        validate: bool,
        /// Type comparator used by validation (exact, castable)
        #[arg(long)]
        comparator: Option<String>,
        /// Print per-definition statistics and runtime to stderr
        #[arg(long)]
        diagnostics: bool,
        /// Unit of the diagnostics runtime (ns, us, ms, s)
        #[arg(long)]
        diagnostics_time_unit: Option<String>,
    },
    /// Type-check and dry-run conversion without writing formulas
    Check {
        /// Input JSON document ("-" for stdin, the default); repeat to merge documents
        #[arg(short, long)]
        input: Vec<String>,
        /// Type comparator (exact, castable)
        #[arg(long)]
        comparator: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            keep_going,
            validate,
            comparator,
            diagnostics,
            diagnostics_time_unit,
        } => {
            let inputs: Vec<&str> = input.iter().map(String::as_str).collect();
            commands::convert::run(
                config.as_ref(),
                &ConvertArgs {
                    inputs: &inputs,
                    output: output.as_deref(),
                    format: format.as_deref(),
                    keep_going,
                    validate,
                    comparator: comparator.as_deref(),
                    diagnostics,
                    time_unit: diagnostics_time_unit.as_deref(),
                },
            )
        }

        Commands::Check { input, comparator } => {
            let inputs: Vec<&str> = input.iter().map(String::as_str).collect();
            commands::check::run(config.as_ref(), &inputs, comparator.as_deref())
        }
    }
}

/// Load the configuration given with `--config`, or search upward from `cwd`.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Option<RebltlConfig>> {
    if let Some(path) = explicit {
        let config = RebltlConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?;
        return Ok(Some(config));
    }
    match RebltlConfig::find_and_load(cwd)? {
        Some((config, dir)) => {
            debug!("using {} from {}", config::CONFIG_FILE, dir.display());
            Ok(Some(config))
        }
        None => Ok(None),
    }
}
