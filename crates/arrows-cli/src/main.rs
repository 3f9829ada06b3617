//! arrows - inspect and convert Arrows map strings
//!
//! Usage: arrows <command> [input]
//!
//! Every command reads one map from a file, or from stdin when the input is
//! `-` or omitted, and writes its result to stdout.

use anyhow::Result;
use arrows_cli::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arrows")]
#[command(about = "Inspect and convert Arrows map strings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a summary of a base64 map
    Inspect {
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and re-encode a base64 map
    Recode {
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Version to stamp onto the output
        #[arg(long)]
        version: Option<u16>,
    },

    /// Convert a base64 map to JSON
    ToJson {
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Convert a JSON map to base64
    FromJson {
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Move every tile of a base64 map by an offset
    Shift {
        #[arg(default_value = "-")]
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true, default_value = "0")]
        dx: i32,
        #[arg(long, allow_hyphen_values = true, default_value = "0")]
        dy: i32,
        /// Version to stamp onto the output
        #[arg(long)]
        version: Option<u16>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Inspect { input, json } => arrows_cli::inspect(&arrows_cli::read_input(&input)?, json)?,
        Command::Recode { input, version } => {
            arrows_cli::recode(&arrows_cli::read_input(&input)?, version, &config)?
        }
        Command::ToJson { input, compact } => {
            arrows_cli::to_json(&arrows_cli::read_input(&input)?, compact, &config)?
        }
        Command::FromJson { input } => arrows_cli::from_json(&arrows_cli::read_input(&input)?)?,
        Command::Shift {
            input,
            dx,
            dy,
            version,
        } => arrows_cli::shift(&arrows_cli::read_input(&input)?, dx, dy, version, &config)?,
    };

    // Summaries already end with a newline
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
