//! Layered configuration.
//!
//! A [`Configuration`] holds a *base* tree (package defaults) and the
//! *content* obtained by deep-merging a *current* tree (user overrides) over
//! it. Both layers can come from YAML files or from in-memory trees.
//!
//! ## Layers
//!
//! Values are resolved in this priority order:
//! 1. The current configuration (explicit path, `<NAME>_CONFIG_PATH`, or a
//!    file found in the user search paths)
//! 2. The base configuration (normally `etc/<name>.yml` in the package)
//!
//! ## Example
//!
//! ```no_run
//! use sdsstools_core::config::{get_config, GetConfigOptions};
//!
//! let config = sdsstools_core::get_config!("myactor")?;
//!
//! // Dotted access walks nested mappings
//! let port = config.get_as::<u16>("actor.port")?.unwrap_or(9999);
//!
//! // Missing keys index to null
//! assert!(config["actor.does_not_exist"].is_null());
//! # Ok::<(), sdsstools_types::ToolsError>(())
//! ```

use crate::util::data::{merge_trees, ConfigTree, EnvDefaults, YamlLoader};
use crate::util::fs::expand_path_with;
use sdsstools_types::{MergeMode, ProcessEnv, Result, ToolsError, VarSource};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::ops::{Deref, Index};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Templates for user configuration files, without extension.
///
/// `{name}` is replaced with the package name and each template is tried
/// with every entry of [`USER_EXTENSIONS`].
pub const DEFAULT_PATHS: &[&str] = &[
    "~/.config/sdss/{name}",
    "~/.config/sdss/{name}/{name}",
    "~/.{name}/{name}",
];

/// Extensions tried for each user configuration template, in order.
pub const USER_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

static NULL: Value = Value::Null;

/// Where a configuration layer comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A YAML file
    Path(PathBuf),
    /// An already parsed tree
    Tree(ConfigTree),
}

impl ConfigSource {
    /// Interpret a loosely typed value as a source.
    ///
    /// `null` means no source, a mapping is a tree, and a string is a path.
    /// Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Mapping(tree) => Ok(Some(ConfigSource::Tree(tree))),
            Value::String(path) => Ok(Some(ConfigSource::Path(PathBuf::from(path)))),
            other => Err(ToolsError::InvalidArgument(format!(
                "Invalid config of type {:?}",
                other
            ))),
        }
    }

    /// The file path, if this source is a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Path(path) => Some(path),
            ConfigSource::Tree(_) => None,
        }
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        ConfigSource::Path(PathBuf::from(path))
    }
}

impl From<String> for ConfigSource {
    fn from(path: String) -> Self {
        ConfigSource::Path(PathBuf::from(path))
    }
}

impl From<ConfigTree> for ConfigSource {
    fn from(tree: ConfigTree) -> Self {
        ConfigSource::Tree(tree)
    }
}

/// Borrowed view over a configuration tree with dotted-key access.
///
/// Keys are split on `.` and each segment selects a nested mapping. Lookup
/// never modifies the tree.
#[derive(Debug, Clone, Copy)]
pub struct ConfigView<'a> {
    tree: &'a ConfigTree,
    strict_mode: bool,
}

impl<'a> ConfigView<'a> {
    /// Wrap a tree.
    pub fn new(tree: &'a ConfigTree, strict_mode: bool) -> Self {
        Self { tree, strict_mode }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }

    /// Whether missing top-level keys are errors.
    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Walk a dotted key.
    ///
    /// With `strict` set to `None` the view's strict mode applies: a missing
    /// top-level key is an error, deeper misses are `None`. `Some(true)` makes
    /// any miss an error and `Some(false)` never fails.
    pub fn lookup(&self, key: &str, strict: Option<bool>) -> Result<Option<&'a Value>> {
        let fully_strict = strict == Some(true);
        let top_strict = fully_strict || (strict.is_none() && self.strict_mode);

        let mut map = self.tree;
        let mut segments = key.split('.').peekable();
        let mut depth = 0;

        while let Some(segment) = segments.next() {
            let Some(value) = map.get(segment) else {
                if fully_strict || (depth == 0 && top_strict) {
                    return Err(ToolsError::KeyNotFound(key.to_string()));
                }
                return Ok(None);
            };

            if segments.peek().is_none() {
                return Ok(Some(value));
            }

            match value.as_mapping() {
                Some(nested) => map = nested,
                None if fully_strict => return Err(ToolsError::KeyNotFound(key.to_string())),
                None => return Ok(None),
            }
            depth += 1;
        }

        Ok(None)
    }

    /// Lenient lookup, `None` for anything missing.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.lookup(key, Some(false)).ok().flatten()
    }

    /// Lookup honouring the view's strict mode.
    pub fn try_get(&self, key: &str) -> Result<Option<&'a Value>> {
        self.lookup(key, None)
    }

    /// Lookup that fails on any missing segment.
    pub fn get_strict(&self, key: &str) -> Result<&'a Value> {
        self.lookup(key, Some(true))?
            .ok_or_else(|| ToolsError::KeyNotFound(key.to_string()))
    }

    /// Deserialize the value at `key`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.try_get(key)? {
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Nested mapping at `key` as a view with the same strict mode.
    pub fn section(&self, key: &str) -> Option<ConfigView<'a>> {
        self.get(key)
            .and_then(Value::as_mapping)
            .map(|tree| ConfigView::new(tree, self.strict_mode))
    }

    /// Value at `key`, wrapped so that further access keeps dotted keys
    /// and this view's strict mode.
    ///
    /// Misses follow [`ConfigView::try_get`] and yield a `null` item.
    pub fn item(&self, key: &str) -> Result<ConfigItem<'a>> {
        let value = self.try_get(key)?.unwrap_or(&NULL);
        Ok(ConfigItem::new(value, self.strict_mode))
    }

    /// Whether a dotted key resolves to a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<'a> Index<&str> for ConfigView<'a> {
    type Output = Value;

    /// Missing keys index to `null`.
    ///
    /// # Panics
    ///
    /// Panics if strict mode is on and the top-level key does not exist.
    fn index(&self, key: &str) -> &Value {
        match self.lookup(key, None) {
            Ok(Some(value)) => value,
            Ok(None) => &NULL,
            Err(e) => panic!("{}", e),
        }
    }
}

/// A value reached through a [`ConfigView`].
///
/// Mapping values re-enter the view, so chained access composes:
/// `config.item("cat1")?["key1.sub"]` walks the same dotted path as
/// `config["cat1.key1.sub"]` and applies the same strict mode at each level.
/// Dereferences to the underlying [`Value`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigItem<'a> {
    value: &'a Value,
    strict_mode: bool,
}

impl<'a> ConfigItem<'a> {
    fn new(value: &'a Value, strict_mode: bool) -> Self {
        Self { value, strict_mode }
    }

    /// The underlying value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// View over the value, if it is a mapping.
    pub fn view(&self) -> Option<ConfigView<'a>> {
        self.value
            .as_mapping()
            .map(|tree| ConfigView::new(tree, self.strict_mode))
    }

    /// Value at a dotted key below this one.
    ///
    /// A mapping behaves as a [`ConfigView`]. Anything else has no keys: in
    /// strict mode that is an error, otherwise the result is `null`.
    pub fn item(&self, key: &str) -> Result<ConfigItem<'a>> {
        match self.view() {
            Some(view) => view.item(key),
            None if self.strict_mode => Err(ToolsError::KeyNotFound(key.to_string())),
            None => Ok(ConfigItem::new(&NULL, self.strict_mode)),
        }
    }
}

impl<'a> Deref for ConfigItem<'a> {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value
    }
}

impl<'a> Index<&str> for ConfigItem<'a> {
    type Output = Value;

    /// # Panics
    ///
    /// Panics where [`ConfigItem::item`] would fail.
    fn index(&self, key: &str) -> &Value {
        match self.item(key) {
            Ok(item) => item.value,
            Err(e) => panic!("{}", e),
        }
    }
}

/// A base configuration with a current configuration merged over it.
///
/// Cloning produces a deep, independent copy.
#[derive(Debug, Clone)]
pub struct Configuration {
    content: ConfigTree,
    base: ConfigTree,
    base_source: Option<PathBuf>,
    current_source: Option<PathBuf>,
    strict_mode: bool,
    loader: YamlLoader,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            content: ConfigTree::new(),
            base: ConfigTree::new(),
            base_source: None,
            current_source: None,
            strict_mode: false,
            loader: YamlLoader::new(),
        }
    }
}

impl Configuration {
    /// Build a configuration from optional current and base layers.
    ///
    /// Variables are read from the process environment. Use
    /// [`Configuration::builder`] for defaults, strict mode, or a custom
    /// variable source.
    pub fn new(current: Option<ConfigSource>, base: Option<ConfigSource>) -> Result<Self> {
        Self::builder().maybe_current(current).maybe_base(base).build()
    }

    /// Start building a configuration.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    fn from_parts(
        current: Option<ConfigSource>,
        base: Option<ConfigSource>,
        loader: YamlLoader,
        strict_mode: bool,
    ) -> Result<Self> {
        let (base, base_source) = match base {
            None => (ConfigTree::new(), None),
            Some(ConfigSource::Tree(tree)) => (tree, None),
            Some(ConfigSource::Path(path)) => {
                let tree = loader.read_file(&path, true)?;
                let canonical = path.canonicalize().unwrap_or(path);
                (tree, Some(canonical))
            }
        };

        let mut config = Self {
            content: ConfigTree::new(),
            base,
            base_source,
            current_source: None,
            strict_mode,
            loader,
        };
        config.load(current, true)?;
        Ok(config)
    }

    /// Replace the current layer.
    ///
    /// With `None` the content reverts to the base. Otherwise the new layer
    /// is parsed and, if `use_base`, merged over the base. On error the
    /// previous content is kept.
    pub fn load(&mut self, current: Option<ConfigSource>, use_base: bool) -> Result<()> {
        let (content, source) = self.resolve(&self.base, current, use_base)?;
        self.content = content;
        self.current_source = source;
        Ok(())
    }

    /// Re-read the base and current layers from their files.
    ///
    /// Layers that did not come from a file are reused as they are. Nothing
    /// changes unless both layers load successfully.
    pub fn reload(&mut self) -> Result<&mut Self> {
        let base = match &self.base_source {
            Some(path) => self.loader.read_file(path, true)?,
            None => self.base.clone(),
        };

        let current = match &self.current_source {
            Some(path) => ConfigSource::Path(path.clone()),
            None => ConfigSource::Tree(self.content.clone()),
        };

        let (content, source) = self.resolve(&base, Some(current), true)?;
        debug!(
            base = ?self.base_source,
            current = ?source,
            "Reloaded configuration"
        );

        self.base = base;
        self.content = content;
        self.current_source = source;
        Ok(self)
    }

    fn resolve(
        &self,
        base: &ConfigTree,
        current: Option<ConfigSource>,
        use_base: bool,
    ) -> Result<(ConfigTree, Option<PathBuf>)> {
        let Some(current) = current else {
            return Ok((base.clone(), self.base_source.clone()));
        };

        let (tree, source) = match current {
            ConfigSource::Tree(tree) => (tree, None),
            ConfigSource::Path(path) => (self.loader.read_file(&path, true)?, Some(path)),
        };

        let content = if use_base {
            merge_trees(tree, base.clone())
        } else {
            tree
        };
        Ok((content, source))
    }

    /// Dotted-key view over the content.
    pub fn view(&self) -> ConfigView<'_> {
        ConfigView::new(&self.content, self.strict_mode)
    }

    /// See [`ConfigView::lookup`].
    pub fn lookup(&self, key: &str, strict: Option<bool>) -> Result<Option<&Value>> {
        self.view().lookup(key, strict)
    }

    /// See [`ConfigView::get`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.view().get(key)
    }

    /// See [`ConfigView::try_get`].
    pub fn try_get(&self, key: &str) -> Result<Option<&Value>> {
        self.view().try_get(key)
    }

    /// See [`ConfigView::get_strict`].
    pub fn get_strict(&self, key: &str) -> Result<&Value> {
        self.view().get_strict(key)
    }

    /// See [`ConfigView::get_as`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.view().get_as(key)
    }

    /// See [`ConfigView::section`].
    pub fn section(&self, key: &str) -> Option<ConfigView<'_>> {
        self.view().section(key)
    }

    /// See [`ConfigView::item`].
    pub fn item(&self, key: &str) -> Result<ConfigItem<'_>> {
        self.view().item(key)
    }

    /// See [`ConfigView::contains_key`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.view().contains_key(key)
    }

    /// Deserialize the whole content into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(Value::Mapping(self.content.clone()))?)
    }

    /// Set a value at a dotted key, creating intermediate mappings.
    ///
    /// Only the content changes; a later `load` or `reload` discards it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut parts: Vec<&str> = key.split('.').collect();
        let last = match parts.pop() {
            Some(last) if !last.is_empty() => last,
            _ => return Err(ToolsError::InvalidArgument(format!("Invalid key {:?}", key))),
        };

        let mut current = &mut self.content;
        for part in parts {
            if !current.get(part).map_or(false, Value::is_mapping) {
                current.insert(Value::from(part), Value::Mapping(Mapping::new()));
            }
            current = match current.get_mut(part) {
                Some(Value::Mapping(nested)) => nested,
                _ => return Err(ToolsError::Bug(format!("{:?} is not a mapping", part))),
            };
        }

        current.insert(Value::from(last), value.into());
        Ok(())
    }

    /// The merged content.
    pub fn content(&self) -> &ConfigTree {
        &self.content
    }

    /// Consume the configuration, returning the merged content.
    pub fn into_tree(self) -> ConfigTree {
        self.content
    }

    /// The base layer.
    pub fn base(&self) -> &ConfigTree {
        &self.base
    }

    /// Canonical path the base was read from.
    pub fn base_source(&self) -> Option<&Path> {
        self.base_source.as_deref()
    }

    /// Path the current content was read from.
    pub fn current_source(&self) -> Option<&Path> {
        self.current_source.as_deref()
    }

    /// Fallback values used for `${NAME}` placeholders.
    pub fn default_envvars(&self) -> &EnvDefaults {
        self.loader.defaults()
    }

    /// Whether missing top-level keys are errors.
    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Change the strict mode.
    pub fn set_strict_mode(&mut self, strict_mode: bool) {
        self.strict_mode = strict_mode;
    }

    /// Top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.content.keys()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Index<&str> for Configuration {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.lookup(key, None) {
            Ok(Some(value)) => value,
            Ok(None) => &NULL,
            Err(e) => panic!("{}", e),
        }
    }
}

impl PartialEq<ConfigTree> for Configuration {
    fn eq(&self, other: &ConfigTree) -> bool {
        &self.content == other
    }
}

/// Builder for [`Configuration`].
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    current: Option<ConfigSource>,
    base: Option<ConfigSource>,
    default_envvars: EnvDefaults,
    vars: Option<Arc<dyn VarSource>>,
    strict_mode: bool,
}

impl ConfigurationBuilder {
    /// Set the current (override) layer.
    pub fn current(mut self, source: impl Into<ConfigSource>) -> Self {
        self.current = Some(source.into());
        self
    }

    /// Set or clear the current layer.
    pub fn maybe_current(mut self, source: Option<ConfigSource>) -> Self {
        self.current = source;
        self
    }

    /// Set the base (defaults) layer.
    pub fn base(mut self, source: impl Into<ConfigSource>) -> Self {
        self.base = Some(source.into());
        self
    }

    /// Set or clear the base layer.
    pub fn maybe_base(mut self, source: Option<ConfigSource>) -> Self {
        self.base = source;
        self
    }

    /// Fallback values for `${NAME}` placeholders.
    pub fn default_envvars(mut self, defaults: EnvDefaults) -> Self {
        self.default_envvars = defaults;
        self
    }

    /// Resolve variables through `vars` instead of the process environment.
    pub fn vars(mut self, vars: Arc<dyn VarSource>) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Make missing top-level keys errors.
    pub fn strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Parse the layers and merge them.
    pub fn build(self) -> Result<Configuration> {
        let vars = self.vars.unwrap_or_else(|| Arc::new(ProcessEnv));
        let loader = YamlLoader::new()
            .with_defaults(self.default_envvars)
            .with_vars(vars);
        Configuration::from_parts(self.current, self.base, loader, self.strict_mode)
    }
}

/// Options for [`get_config`].
#[derive(Debug, Clone)]
pub struct GetConfigOptions {
    /// Package defaults; `<caller_dir>/etc/<name>.yml` when unset
    pub config_file: Option<PathBuf>,
    /// Root of the calling package, filled in by [`get_config!`](crate::get_config)
    pub caller_dir: Option<PathBuf>,
    /// Look for a user configuration
    pub allow_user: bool,
    /// Explicit user configuration file, must exist
    pub user_path: Option<PathBuf>,
    /// Variable holding a user configuration path; `<NAME>_CONFIG_PATH` when unset
    pub config_envvar: Option<String>,
    /// How the user configuration combines with the defaults
    pub merge_mode: MergeMode,
    /// Fallback values for `${NAME}` placeholders
    pub default_envvars: EnvDefaults,
    /// User configuration templates, see [`DEFAULT_PATHS`]
    pub search_paths: Vec<String>,
    /// Variable source; the process environment when unset
    pub vars: Option<Arc<dyn VarSource>>,
}

impl Default for GetConfigOptions {
    fn default() -> Self {
        Self {
            config_file: None,
            caller_dir: None,
            allow_user: true,
            user_path: None,
            config_envvar: None,
            merge_mode: MergeMode::Update,
            default_envvars: EnvDefaults::new(),
            search_paths: DEFAULT_PATHS.iter().map(|p| p.to_string()).collect(),
            vars: None,
        }
    }
}

impl GetConfigOptions {
    /// Use an explicit defaults file.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the calling package's root directory.
    pub fn with_caller_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.caller_dir = Some(dir.into());
        self
    }

    /// Set the calling package's root directory unless already set.
    pub fn with_caller_dir_if_unset(mut self, dir: impl Into<PathBuf>) -> Self {
        if self.caller_dir.is_none() {
            self.caller_dir = Some(dir.into());
        }
        self
    }

    /// Enable or disable the user configuration search.
    pub fn with_allow_user(mut self, allow_user: bool) -> Self {
        self.allow_user = allow_user;
        self
    }

    /// Use an explicit user configuration file.
    pub fn with_user_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_path = Some(path.into());
        self
    }

    /// Name of the variable holding a user configuration path.
    pub fn with_config_envvar(mut self, name: impl Into<String>) -> Self {
        self.config_envvar = Some(name.into());
        self
    }

    /// Set the merge mode.
    pub fn with_merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = merge_mode;
        self
    }

    /// Fallback values for `${NAME}` placeholders.
    pub fn with_default_envvars(mut self, defaults: EnvDefaults) -> Self {
        self.default_envvars = defaults;
        self
    }

    /// Replace the user configuration templates.
    pub fn with_search_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve variables through `vars`.
    pub fn with_vars(mut self, vars: Arc<dyn VarSource>) -> Self {
        self.vars = Some(vars);
        self
    }
}

/// Resolve the configuration of package `name`.
///
/// The defaults file is merged with a user file chosen in this order: the
/// `config_envvar` variable if set, else an explicit `user_path`, else the
/// first existing file in the search paths. With [`MergeMode::Replace`]
/// only the user file is used.
pub fn get_config(name: &str, options: GetConfigOptions) -> Result<Configuration> {
    let vars = options.vars.unwrap_or_else(|| Arc::new(ProcessEnv));

    let config_file = match options.config_file {
        Some(path) => Some(path),
        None => default_config_file(name, options.caller_dir.as_deref()),
    };
    let base = config_file.map(ConfigSource::Path);

    let builder = Configuration::builder()
        .default_envvars(options.default_envvars)
        .vars(Arc::clone(&vars));

    if !options.allow_user {
        return builder.maybe_base(base).build();
    }

    let config_envvar = options
        .config_envvar
        .unwrap_or_else(|| format!("{}_CONFIG_PATH", name.to_uppercase()));

    let user_path = match options.user_path {
        Some(path) => {
            let path = expand_path_with(&path, vars.as_ref());
            if !path.exists() {
                return Err(ToolsError::UserPathNotFound(path));
            }
            Some(path)
        }
        None => find_user_config(name, &options.search_paths, vars.as_ref()),
    };

    let custom = match vars.var(&config_envvar) {
        Some(path) => {
            debug!(variable = %config_envvar, path = %path, "Using user configuration from environment");
            Some(PathBuf::from(path))
        }
        None => user_path,
    };

    let current = custom.map(ConfigSource::Path);
    match options.merge_mode {
        MergeMode::Update => builder.maybe_current(current).maybe_base(base).build(),
        MergeMode::Replace => builder.maybe_current(current).build(),
    }
}

/// `<caller_dir>/etc/<name>.yml`, if the caller is known and the file exists.
fn default_config_file(name: &str, caller_dir: Option<&Path>) -> Option<PathBuf> {
    let path = caller_dir?.join("etc").join(format!("{}.yml", name));
    if path.exists() {
        Some(path)
    } else {
        debug!(path = %path.display(), "No default configuration file");
        None
    }
}

/// First existing user configuration file among the templates.
fn find_user_config(name: &str, templates: &[String], vars: &dyn VarSource) -> Option<PathBuf> {
    templates
        .iter()
        .flat_map(|template| {
            let stem = template.replace("{name}", name);
            USER_EXTENSIONS.iter().map(move |ext| format!("{}{}", stem, ext))
        })
        .map(|candidate| expand_path_with(candidate, vars))
        .find(|path| path.exists())
}

/// Resolve a package configuration with the calling crate's root as the
/// location of `etc/<name>.yml`.
///
/// ```no_run
/// use sdsstools_core::config::GetConfigOptions;
///
/// let config = sdsstools_core::get_config!("myactor")?;
/// let defaults_only = sdsstools_core::get_config!(
///     "myactor",
///     GetConfigOptions::default().with_allow_user(false)
/// )?;
/// # Ok::<(), sdsstools_types::ToolsError>(())
/// ```
#[macro_export]
macro_rules! get_config {
    ($name:expr) => {
        $crate::config::get_config(
            $name,
            $crate::config::GetConfigOptions::default()
                .with_caller_dir_if_unset(env!("CARGO_MANIFEST_DIR")),
        )
    };
    ($name:expr, $options:expr) => {
        $crate::config::get_config(
            $name,
            ($options).with_caller_dir_if_unset(env!("CARGO_MANIFEST_DIR")),
        )
    };
}
