//! Process execution utilities.

use sdsstools_types::Result;
use std::process::Command;

/// Output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Exit code, -1 if the process was killed by a signal
    pub code: i32,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a command synchronously.
pub fn run(command: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(command)
        .args(args)
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Fully qualified domain name of this host, as reported by `hostname -f`.
pub fn fqdn() -> Option<String> {
    let output = run("hostname", &["-f"]).ok()?;
    let name = output.stdout.trim();
    if output.success() && !name.is_empty() {
        Some(name.to_string())
    } else {
        None
    }
}
