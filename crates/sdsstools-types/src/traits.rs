//! Core trait definitions.

use std::collections::HashMap;
use std::fmt;

/// A source of environment-like variables.
///
/// Configuration loading resolves `${NAME}` placeholders and
/// `<NAME>_CONFIG_PATH` overrides through this trait, so the process
/// environment can be swapped for an in-memory map.
pub trait VarSource: Send + Sync + fmt::Debug {
    /// Look up a variable, returning `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;

    /// Whether the variable is set.
    fn contains(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapVars(HashMap<String, String>);

impl MapVars {
    /// Create an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl VarSource for MapVars {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
