//! CLI structure and command definitions.

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sdss")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect SDSS package configurations and dates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved configuration of a package
    Config {
        /// Package name
        name: String,

        /// Dotted key to show (whole configuration if not specified)
        key: Option<String>,

        /// Defaults file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// User configuration file
        #[arg(short, long)]
        user_path: Option<PathBuf>,

        /// Ignore user configuration files
        #[arg(long)]
        no_user: bool,

        /// Use only the user configuration, without the defaults
        #[arg(long)]
        replace: bool,

        /// Fail if the key does not exist
        #[arg(long)]
        strict: bool,

        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the SDSS MJD
    Sjd {
        /// Observatory (APO or LCO); detected if not specified
        #[arg(short, long)]
        observatory: Option<String>,

        /// UTC date as YYYY-MM-DDTHH:MM:SS (now if not specified)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDateTime>,

        /// Print the MJD instead of failing if the observatory is unknown
        #[arg(long)]
        lenient: bool,
    },

    /// Show version information
    Version,
}

fn parse_date(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {}", e))
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Config { name, key, file, user_path, no_user, replace, strict, json } => {
                let args = config::ConfigArgs {
                    name,
                    key: key.as_deref(),
                    file: file.as_deref(),
                    user_path: user_path.as_deref(),
                    allow_user: !no_user,
                    replace: *replace,
                    strict: *strict,
                    json: *json,
                };
                config::execute(&args).await
            }
            Commands::Sjd { observatory, date, lenient } => {
                sjd::execute(observatory.as_deref(), *date, !lenient).await
            }
            Commands::Version => {
                version::execute(self.verbose).await
            }
        }
    }
}
