//! Show a resolved configuration.

use anyhow::{Context, Result};
use sdsstools_core::config::{get_config, GetConfigOptions};
use sdsstools_types::MergeMode;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// Arguments of `sdss config`.
pub struct ConfigArgs<'a> {
    pub name: &'a str,
    pub key: Option<&'a str>,
    pub file: Option<&'a Path>,
    pub user_path: Option<&'a Path>,
    pub allow_user: bool,
    pub replace: bool,
    pub strict: bool,
    pub json: bool,
}

pub async fn execute(args: &ConfigArgs<'_>) -> Result<()> {
    let mut options = GetConfigOptions::default().with_allow_user(args.allow_user);
    if let Some(file) = args.file {
        options = options.with_config_file(file);
    }
    if let Some(user_path) = args.user_path {
        options = options.with_user_path(user_path);
    }
    if args.replace {
        options = options.with_merge_mode(MergeMode::Replace);
    }

    let config = get_config(args.name, options)
        .with_context(|| format!("Failed to load configuration for {}", args.name))?;
    debug!(
        base = ?config.base_source(),
        current = ?config.current_source(),
        "Resolved configuration"
    );

    let value = match args.key {
        Some(key) => {
            let strict = if args.strict { Some(true) } else { None };
            config.lookup(key, strict)?.cloned().unwrap_or(Value::Null)
        }
        None => Value::Mapping(config.into_tree()),
    };

    print!("{}", render(&value, args.json)?);
    Ok(())
}

/// Render scalars bare and collections as YAML or JSON documents.
fn render(value: &Value, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(value)?));
    }

    Ok(match value {
        Value::String(s) => format!("{}\n", s),
        other => serde_yaml::to_string(other)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let tree: Value = serde_yaml::from_str("a: {b: 1}").unwrap();
        assert_eq!(render(&tree, false).unwrap(), "a:\n  b: 1\n");
        assert_eq!(render(&Value::from("text"), false).unwrap(), "text\n");
        assert_eq!(render(&Value::from(3), false).unwrap(), "3\n");

        let json = render(&tree, true).unwrap();
        assert!(json.contains("\"b\": 1"));
    }
}
