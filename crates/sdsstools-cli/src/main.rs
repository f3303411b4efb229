//! sdss CLI entry point.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use sdsstools_core::log;
use sdsstools_types::{LogConfig, LogLevel};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive until exit
    let _log_guard = log::init(&log_config(&cli)).ok();

    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn log_config(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::named("sdss");
    config.level = if cli.quiet {
        LogLevel::Error
    } else if cli.debug {
        LogLevel::Trace
    } else if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    config
}
