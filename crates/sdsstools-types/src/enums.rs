//! Common enumerations used throughout sdsstools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{ToolsError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    #[serde(alias = "WARNING")]
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl FromStr for LogLevel {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(ToolsError::InvalidArgument(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// How often a file log is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Never rotate
    Never,
    /// One file per hour
    Hourly,
    /// One file per day (midnight rollover)
    #[default]
    Daily,
}

/// How a user configuration is combined with the package defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// The user configuration is deep-merged over the defaults
    #[default]
    Update,
    /// Only the user configuration is used
    Replace,
}

impl FromStr for MergeMode {
    type Err = ToolsError;

    /// Accepts exactly `"update"` or `"replace"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "update" => Ok(MergeMode::Update),
            "replace" => Ok(MergeMode::Replace),
            _ => Err(ToolsError::InvalidArgument(format!("invalid merge mode {:?}", s))),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::Update => write!(f, "update"),
            MergeMode::Replace => write!(f, "replace"),
        }
    }
}

/// SDSS observatories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Observatory {
    /// Apache Point Observatory
    Apo,
    /// Las Campanas Observatory
    Lco,
}

impl Observatory {
    /// Fraction of a day added to the MJD to compute the SJD.
    pub fn sjd_offset(&self) -> f64 {
        match self {
            Observatory::Apo => 0.3,
            Observatory::Lco => 0.4,
        }
    }

    /// Identify the observatory from a fully qualified domain name.
    pub fn from_fqdn(fqdn: &str) -> Option<Self> {
        let fqdn = fqdn.trim().trim_end_matches('.');
        if fqdn.ends_with("apo.nmsu.edu") {
            Some(Observatory::Apo)
        } else if fqdn.ends_with("lco.cl") {
            Some(Observatory::Lco)
        } else {
            None
        }
    }
}

impl FromStr for Observatory {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "APO" => Ok(Observatory::Apo),
            "LCO" => Ok(Observatory::Lco),
            _ => Err(ToolsError::InvalidArgument(format!("Invalid observatory {:?}", s))),
        }
    }
}

impl fmt::Display for Observatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observatory::Apo => write!(f, "APO"),
            Observatory::Lco => write!(f, "LCO"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_mode_is_exact() {
        assert_eq!("update".parse::<MergeMode>().unwrap(), MergeMode::Update);
        assert_eq!("replace".parse::<MergeMode>().unwrap(), MergeMode::Replace);
        assert!("Update".parse::<MergeMode>().is_err());
        assert!("merge".parse::<MergeMode>().is_err());
        assert!("".parse::<MergeMode>().is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("verbose".parse::<LogLevel>().is_err());

        let level: LogLevel = serde_yaml::from_str("WARNING").unwrap();
        assert_eq!(level, LogLevel::Warn);
    }

    #[test]
    fn test_observatory() {
        assert_eq!("lco".parse::<Observatory>().unwrap(), Observatory::Lco);
        assert!("KPNO".parse::<Observatory>().is_err());

        assert_eq!(Observatory::from_fqdn("sdss5-hub.apo.nmsu.edu"), Some(Observatory::Apo));
        assert_eq!(Observatory::from_fqdn("sdss5-hub.lco.cl"), Some(Observatory::Lco));
        assert_eq!(Observatory::from_fqdn("somewhere.at.edu"), None);
    }
}
