use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::parsers::{parse_bool_env, parse_positive_u64};
use super::types::{OutputFormat, PositiveU64};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Load an ammo file, validate it, and initialize its variable sources
    Check(CheckArgs),
    /// Rewrite an ammo file (YAML/JSON/TOML/HCL) as TOML tables or HCL blocks
    Convert(ConvertArgs),
    /// Run scenario iterations one after another against a base URL
    Run(RunArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// Ammo file (.yaml, .yml, .json, .toml, or .hcl)
    pub ammo: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Ammo file (.yaml, .yml, .json, .toml, or .hcl)
    pub ammo: PathBuf,

    /// Write the rendering here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output surface; defaults to HCL for a .hcl output path and TOML otherwise
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Ammo file (.yaml, .yml, .json, .toml, or .hcl)
    pub ammo: PathBuf,

    /// Base URL that request URIs are joined onto
    #[arg(long = "base-url", short = 'u')]
    pub base_url: String,

    /// Number of iterations to run
    #[arg(long, short = 'n', default_value = "1", value_parser = parse_positive_u64)]
    pub iterations: PositiveU64,

    /// Run only this scenario instead of a weighted choice per iteration
    #[arg(long, short = 's')]
    pub scenario: Option<String>,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Scenario ammo toolkit for load testing: variable sources, templated requests, response extraction, and config conversion."
)]
pub struct VolleyArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (sets log level to debug unless overridden by VOLLEY_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug", global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env, global = true)]
    pub no_color: bool,
}
