//! Filesystem utilities.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sdsstools_types::{ProcessEnv, Result, ToolsError, VarSource};
use std::fs;
use std::path::{Path, PathBuf};

static SHELL_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(?:\{([^}]+)\}|([A-Za-z_][A-Za-z0-9_]*))").expect("valid regex"));

/// Expand path with environment variables and tilde.
///
/// Unset variables are left untouched, as a shell would with `$UNSET`
/// quoted.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    expand_path_with(path, &ProcessEnv)
}

/// Like [`expand_path`], resolving variables through `vars`.
pub fn expand_path_with(path: impl AsRef<Path>, vars: &dyn VarSource) -> PathBuf {
    let raw = path.as_ref().to_string_lossy();
    let expanded = SHELL_VAR.replace_all(&raw, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        vars.var(name).unwrap_or_else(|| caps[0].to_string())
    });
    let path = PathBuf::from(expanded.as_ref());

    // Handle tilde expansion
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path
}

/// Read entire file as string (slurp).
pub fn slurp(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .map_err(|e| ToolsError::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Return a path in the temporary directory that does not exist yet.
///
/// The file is created to reserve a unique name and removed straight away.
/// With `create_parents`, the parent directory is created if missing.
pub fn temporary_file_path(suffix: &str, create_parents: bool) -> Result<PathBuf> {
    let file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    let path = file.path().to_path_buf();
    file.close()?;

    if create_parents {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(path)
}
