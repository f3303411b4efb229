//! YAML loading with environment interpolation, and deep merging.
//!
//! Every string scalar in a loaded document is scanned for `${NAME}`
//! placeholders. A placeholder resolves to the first of:
//!
//! 1. the variable `NAME` in the loader's [`VarSource`] (the process
//!    environment by default),
//! 2. the loader's default for `NAME`,
//! 3. an inline fallback written as `${NAME:-fallback}`,
//!
//! and is left as-is when none applies.
//!
//! A document may start with an `#!extends <path>` line, in which case it is
//! merged over the referenced file. Only one level of inclusion is followed.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sdsstools_types::{ProcessEnv, Result, ToolsError, VarSource};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::fs::{expand_path_with, slurp};

/// A parsed configuration document.
pub type ConfigTree = Mapping;

/// Fallback values for environment variables, keyed by variable name.
pub type EnvDefaults = HashMap<String, String>;

const EXTENDS_MARKER: &str = "#!extends";

/// `${NAME}` or `${NAME:-fallback}`. A `:` in `NAME` is allowed unless it
/// starts the `:-` separator.
static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{((?:[^}:]|:[^}-])+?)(?::-([^}]*))?\}").expect("valid regex")
});

/// Loads YAML documents with a fixed substitution context.
///
/// A loader carries its own defaults and variable source, so two loaders
/// never see each other's settings.
#[derive(Debug, Clone)]
pub struct YamlLoader {
    defaults: EnvDefaults,
    vars: Arc<dyn VarSource>,
}

impl Default for YamlLoader {
    fn default() -> Self {
        Self {
            defaults: EnvDefaults::new(),
            vars: Arc::new(ProcessEnv),
        }
    }
}

impl YamlLoader {
    /// Loader reading the process environment, without defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback values for unset variables.
    pub fn with_defaults(mut self, defaults: EnvDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Resolve variables through `vars` instead of the process environment.
    pub fn with_vars(mut self, vars: Arc<dyn VarSource>) -> Self {
        self.vars = vars;
        self
    }

    /// The variable source used by this loader.
    pub fn vars(&self) -> &dyn VarSource {
        self.vars.as_ref()
    }

    /// Shared handle to the variable source.
    pub fn vars_handle(&self) -> Arc<dyn VarSource> {
        Arc::clone(&self.vars)
    }

    /// The fallback values.
    pub fn defaults(&self) -> &EnvDefaults {
        &self.defaults
    }

    /// Replace every `${NAME}` placeholder in `text`.
    pub fn interpolate(&self, text: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                self.vars
                    .var(name)
                    .or_else(|| self.defaults.get(name).cloned())
                    .or_else(|| caps.get(2).map(|m| m.as_str().to_string()))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Read a YAML file. Relative `#!extends` targets resolve against the
    /// file's directory.
    pub fn read_file(&self, path: impl AsRef<Path>, use_extends: bool) -> Result<ConfigTree> {
        let path = path.as_ref();
        let text = slurp(path)?;
        debug!(path = %path.display(), use_extends, "Reading YAML file");
        self.parse(&text, path.parent(), use_extends)
    }

    /// Parse YAML text. Relative `#!extends` targets resolve against the
    /// working directory.
    pub fn read_str(&self, text: &str, use_extends: bool) -> Result<ConfigTree> {
        self.parse(text, None, use_extends)
    }

    /// Read a YAML document from an open reader.
    pub fn read_reader<R: Read>(&self, mut reader: R, use_extends: bool) -> Result<ConfigTree> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.parse(&text, None, use_extends)
    }

    fn parse(&self, text: &str, origin_dir: Option<&Path>, use_extends: bool) -> Result<ConfigTree> {
        let tree = self.parse_document(text)?;

        // An empty document stays empty even if it names a file to extend
        if !use_extends || tree.is_empty() {
            return Ok(tree);
        }

        let Some(target) = find_extends(text)? else {
            return Ok(tree);
        };

        let target = expand_path_with(&target, self.vars());
        let target = match origin_dir {
            Some(dir) if target.is_relative() => dir.join(target),
            _ => target,
        };

        if !target.exists() {
            return Err(ToolsError::MissingExtendsTarget(target));
        }

        debug!(target = %target.display(), "Following #!extends");
        let base = self.read_file(&target, false)?;
        Ok(merge_trees(tree, base))
    }

    fn parse_document(&self, text: &str) -> Result<ConfigTree> {
        if !has_content(text) {
            return Ok(ConfigTree::new());
        }

        match serde_yaml::from_str::<Value>(text)? {
            Value::Null => Ok(ConfigTree::new()),
            Value::Mapping(mut tree) => {
                for value in tree.values_mut() {
                    self.interpolate_value(value);
                }
                Ok(tree)
            }
            other => Err(ToolsError::Config(format!(
                "Top-level YAML document must be a mapping, found {}",
                type_name(&other)
            ))),
        }
    }

    fn interpolate_value(&self, value: &mut Value) {
        match value {
            Value::String(s) if s.contains("${") => *s = self.interpolate(s),
            Value::Sequence(items) => items.iter_mut().for_each(|v| self.interpolate_value(v)),
            Value::Mapping(map) => map.values_mut().for_each(|v| self.interpolate_value(v)),
            Value::Tagged(tagged) => self.interpolate_value(&mut tagged.value),
            _ => {}
        }
    }
}

/// Whether the text has anything besides blank and comment lines.
fn has_content(text: &str) -> bool {
    text.lines().map(str::trim).any(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Find the `#!extends` target, which must precede any document content.
fn find_extends(text: &str) -> Result<Option<PathBuf>> {
    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix(EXTENDS_MARKER) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let target = rest.split_whitespace().next().ok_or_else(|| {
                    ToolsError::Config("#!extends directive without a path".to_string())
                })?;
                return Ok(Some(PathBuf::from(target)));
            }
        }

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        break;
    }

    Ok(None)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Read a YAML file using the process environment and no defaults.
pub fn read_yaml_file(path: impl AsRef<Path>, use_extends: bool) -> Result<ConfigTree> {
    YamlLoader::new().read_file(path, use_extends)
}

/// Parse YAML text using the process environment and no defaults.
pub fn read_yaml_str(text: &str, use_extends: bool) -> Result<ConfigTree> {
    YamlLoader::new().read_str(text, use_extends)
}

/// Merge a user value with a default one.
///
/// Mappings are merged key by key; anywhere else `user` wins outright, so
/// sequences are replaced rather than concatenated.
pub fn merge_config(user: Value, default: Value) -> Value {
    match (user, default) {
        (Value::Mapping(user), Value::Mapping(default)) => Value::Mapping(merge_trees(user, default)),
        (user, _) => user,
    }
}

/// Merge two configuration trees, `user` taking precedence.
pub fn merge_trees(mut user: ConfigTree, default: ConfigTree) -> ConfigTree {
    for (key, default_value) in default {
        match user.get_mut(&key) {
            Some(user_value) => {
                let taken = std::mem::take(user_value);
                *user_value = merge_config(taken, default_value);
            }
            None => {
                user.insert(key, default_value);
            }
        }
    }
    user
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sdsstools_types::MapVars;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = "
cat1:
    key1: base_value

cat2:
    key2: 1
";

    const EXTENDABLE: &str = "
#

#!extends {base_path}

cat1:
    # test
    key1: value1
";

    fn yaml(text: &str) -> ConfigTree {
        serde_yaml::from_str(text).unwrap()
    }

    fn loader_with(vars: MapVars) -> YamlLoader {
        YamlLoader::new().with_vars(Arc::new(vars))
    }

    fn write_base(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("base.yaml");
        fs::write(&path, BASE).unwrap();
        path
    }

    #[test]
    fn test_merge_user_wins() {
        let merged = merge_trees(yaml("x: 1"), yaml("x: 2"));
        assert_eq!(merged, yaml("x: 1"));
    }

    #[test]
    fn test_merge_nested() {
        let merged = merge_trees(yaml("x: {y: 1}"), yaml("x: {z: 2}"));
        assert_eq!(merged, yaml("x: {y: 1, z: 2}"));
    }

    #[test]
    fn test_merge_replaces_sequences_and_mixed_types() {
        let merged = merge_trees(
            yaml("list: [3]\nmixed: scalar\nother: {a: 1}"),
            yaml("list: [1, 2]\nmixed: {a: 1}\nother: 5"),
        );
        assert_eq!(merged, yaml("list: [3]\nmixed: scalar\nother: {a: 1}"));
    }

    #[test]
    fn test_interpolation_from_env() {
        let loader = loader_with(MapVars::new().with("FOO", "bar"));
        let tree = loader.read_str("path: ${FOO}/data", false).unwrap();
        assert_eq!(tree["path"], Value::from("bar/data"));
    }

    #[test]
    fn test_interpolation_from_defaults() {
        let defaults = EnvDefaults::from([("FOO".to_string(), "baz".to_string())]);
        let loader = loader_with(MapVars::new()).with_defaults(defaults);
        let tree = loader.read_str("path: \"${FOO}/data\"", false).unwrap();
        assert_eq!(tree["path"], Value::from("baz/data"));
    }

    #[test]
    fn test_interpolation_env_beats_defaults() {
        let defaults = EnvDefaults::from([("FOO".to_string(), "baz".to_string())]);
        let loader = loader_with(MapVars::new().with("FOO", "bar")).with_defaults(defaults);
        assert_eq!(loader.interpolate("${FOO}"), "bar");
    }

    #[test]
    fn test_interpolation_unresolved_is_literal() {
        let loader = loader_with(MapVars::new());
        let tree = loader.read_str("path: ${FOO}/data", false).unwrap();
        assert_eq!(tree["path"], Value::from("${FOO}/data"));
    }

    #[test]
    fn test_interpolation_multiple_and_nested() {
        let loader = loader_with(MapVars::new().with("A", "blah").with("B", "foo"));
        let tree = loader
            .read_str(
                "cat2:\n  key5: ${A}/Downloads/${B}\n  list:\n    - ${B}\n    - plain\n  key6: ${MISSING:-my default value}\n",
                false,
            )
            .unwrap();

        let cat2 = tree["cat2"].as_mapping().unwrap();
        assert_eq!(cat2["key5"], Value::from("blah/Downloads/foo"));
        assert_eq!(cat2["list"][0], Value::from("foo"));
        assert_eq!(cat2["list"][1], Value::from("plain"));
        assert_eq!(cat2["key6"], Value::from("my default value"));
    }

    #[test]
    fn test_interpolation_colon_in_name() {
        let loader = loader_with(MapVars::new().with("A:B", "x"));
        assert_eq!(loader.interpolate("${A:B}"), "x");
        assert_eq!(loader.interpolate("${A:B:-d}"), "x");
        assert_eq!(loader.interpolate("${A:-d}"), "d");

        let loader = loader_with(MapVars::new());
        assert_eq!(loader.interpolate("${A:B:-d}"), "d");
        assert_eq!(loader.interpolate("${A:B}"), "${A:B}");
        assert_eq!(loader.interpolate("${A:}"), "${A:}");
    }

    #[test]
    fn test_loaders_do_not_share_defaults() {
        let first = loader_with(MapVars::new())
            .with_defaults(EnvDefaults::from([("FOO".to_string(), "one".to_string())]));
        let second = loader_with(MapVars::new());
        assert_eq!(first.interpolate("${FOO}"), "one");
        assert_eq!(second.interpolate("${FOO}"), "${FOO}");
    }

    #[test]
    fn test_extends_from_str() {
        let dir = TempDir::new().unwrap();
        let base_path = write_base(&dir);
        let text = EXTENDABLE.replace("{base_path}", &base_path.to_string_lossy());

        let data = read_yaml_str(&text, true).unwrap();
        assert_eq!(data, yaml("cat1: {key1: value1}\ncat2: {key2: 1}"));
    }

    #[test]
    fn test_extends_from_reader() {
        let dir = TempDir::new().unwrap();
        let base_path = write_base(&dir);
        let text = EXTENDABLE.replace("{base_path}", &base_path.to_string_lossy());

        let data = YamlLoader::new().read_reader(text.as_bytes(), true).unwrap();
        assert_eq!(data["cat1"]["key1"], Value::from("value1"));
        assert_eq!(data["cat2"]["key2"], Value::from(1));
    }

    #[test]
    fn test_dont_extend() {
        let dir = TempDir::new().unwrap();
        let base_path = write_base(&dir);
        let text = EXTENDABLE.replace("{base_path}", &base_path.to_string_lossy());

        let data = read_yaml_str(&text, false).unwrap();
        assert_eq!(data, yaml("cat1: {key1: value1}"));
    }

    #[test]
    fn test_extends_file_not_found() {
        let dir = TempDir::new().unwrap();
        let base_path = write_base(&dir);
        let text = EXTENDABLE.replace("{base_path}", &base_path.to_string_lossy());
        fs::remove_file(&base_path).unwrap();

        match read_yaml_str(&text, true) {
            Err(ToolsError::MissingExtendsTarget(path)) => assert_eq!(path, base_path),
            other => panic!("expected MissingExtendsTarget, got {:?}", other),
        }
    }

    #[test]
    fn test_extends_relative_to_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir/base.yaml"), BASE).unwrap();

        let path = dir.path().join("extendable.yaml");
        fs::write(&path, EXTENDABLE.replace("{base_path}", "subdir/base.yaml")).unwrap();

        let data = read_yaml_file(&path, true).unwrap();
        assert_eq!(data["cat1"]["key1"], Value::from("value1"));
        assert!(data.contains_key("cat2"));
    }

    #[test]
    fn test_extends_is_single_level() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("root.yaml"), "root: true\n").unwrap();
        fs::write(dir.path().join("middle.yaml"), "#!extends root.yaml\nmiddle: true\n").unwrap();

        let path = dir.path().join("leaf.yaml");
        fs::write(&path, "#!extends middle.yaml\nleaf: true\n").unwrap();

        let data = read_yaml_file(&path, true).unwrap();
        assert_eq!(data, yaml("leaf: true\nmiddle: true"));
    }

    #[test]
    fn test_extends_after_content_is_ignored() {
        let data = read_yaml_str("key: 1\n#!extends /does/not/exist.yaml\n", true).unwrap();
        assert_eq!(data, yaml("key: 1"));
    }

    #[test]
    fn test_extends_without_path() {
        let result = read_yaml_str("#!extends\nkey: 1\n", true);
        assert!(matches!(result, Err(ToolsError::Config(_))));
    }

    #[test]
    fn test_read_empty_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base.yaml");
        fs::write(&path, "").unwrap();

        assert!(read_yaml_file(&path, true).unwrap().is_empty());
        assert!(read_yaml_str("# only a comment\n", true).unwrap().is_empty());
        assert!(read_yaml_str("{}", true).unwrap().is_empty());
    }

    #[test]
    fn test_extends_only_document_is_empty() {
        let dir = TempDir::new().unwrap();
        write_base(&dir);

        let path = dir.path().join("extendable.yaml");
        fs::write(&path, "#!extends base.yaml\n").unwrap();
        assert!(read_yaml_file(&path, true).unwrap().is_empty());

        let text = EXTENDABLE.replace("{base_path}", "/does/not/exist.yaml");
        let comments_only: String = text.lines().take(4).map(|line| format!("{}\n", line)).collect();
        assert!(read_yaml_str(&comments_only, true).unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_document() {
        assert!(matches!(read_yaml_str("- a\n- b\n", true), Err(ToolsError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_yaml_file("/does/not/exist/config.yml", true),
            Err(ToolsError::Config(_))
        ));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                arb_tree_of(inner).prop_map(Value::Mapping),
            ]
        })
    }

    fn arb_tree_of(values: impl Strategy<Value = Value>) -> impl Strategy<Value = ConfigTree> {
        prop::collection::btree_map("[a-d]{1,2}", values, 0..4)
            .prop_map(|m| m.into_iter().map(|(k, v)| (Value::from(k), v)).collect())
    }

    fn prefixed(tree: ConfigTree, prefix: &str) -> ConfigTree {
        tree.into_iter()
            .map(|(k, v)| (Value::from(format!("{}{}", prefix, k.as_str().unwrap_or(""))), v))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_identity(tree in arb_tree_of(arb_value())) {
            prop_assert_eq!(merge_trees(tree.clone(), tree.clone()), tree);
        }

        #[test]
        fn prop_merge_disjoint_is_union(a in arb_tree_of(arb_value()), b in arb_tree_of(arb_value())) {
            let a = prefixed(a, "user_");
            let b = prefixed(b, "default_");
            let merged = merge_trees(a.clone(), b.clone());

            prop_assert_eq!(merged.len(), a.len() + b.len());
            for (key, value) in a.iter().chain(b.iter()) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }
}
