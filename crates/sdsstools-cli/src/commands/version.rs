//! Show the sdsstools version and, with `--verbose`, each crate's version
//! and the host platform.

use anyhow::Result;
use colored::Colorize;

/// Crates that make up the toolkit, with the versions compiled in.
fn components() -> [(&'static str, &'static str); 3] {
    [
        ("sdsstools-cli", env!("CARGO_PKG_VERSION")),
        ("sdsstools-core", sdsstools_core::VERSION),
        ("sdsstools-types", sdsstools_types::VERSION),
    ]
}

pub async fn execute(verbose: bool) -> Result<()> {
    println!("{} {}", sdsstools_core::APP_NAME.cyan().bold(), sdsstools_core::VERSION);
    if !verbose {
        return Ok(());
    }

    println!("\n{}", "Components:".bold());
    for (name, version) in components() {
        println!("  {:<16} {}", name, version);
    }

    println!("\n{}", "Platform:".bold());
    println!("  {:<16} {}", "Architecture", std::env::consts::ARCH);
    println!("  {:<16} {}", "OS", std::env::consts::OS);
    println!("  {:<16} {}", "Family", std::env::consts::FAMILY);

    Ok(())
}
